// -----------------------------------------------------------------------------
// TypePath

/// A static accessor to type paths and names.
///
/// A stable alternative to [`core::any::type_name`]: the strings do not
/// change with compiler versions, and the module path is what the
/// discriminator fallback uses to locate variants next to their base.
///
/// # Methods
///
/// - [`type_path`]: The unique identifier of the type, cannot be duplicated.
/// - [`type_name`]: Type name without module path, may be duplicated.
/// - [`type_ident`]: The shortest type name, used as the discriminator value.
/// - [`module_path`]: Optional module path.
///
/// These names never start with `::`.
/// Users should also ensure this when implementing it manually.
///
/// # Implementation
///
/// Use [`impl_type_path!`](crate::impl_type_path), which takes the module
/// path of the call site unless one is given:
///
/// ```
/// use pj_reflect::impl_type_path;
/// use pj_reflect::info::TypePath;
///
/// pub trait Animal: Send + Sync {}
/// pub struct Dog;
/// pub struct Cat;
///
/// impl_type_path!(Dog);
/// impl_type_path!(dyn Animal);
/// impl_type_path!((in "zoo::pets") Cat);
///
/// assert!(Dog::type_path().ends_with("::Dog"));
/// assert_eq!(<dyn Animal>::type_ident(), "Animal");
/// assert_eq!(Cat::type_path(), "zoo::pets::Cat");
/// assert_eq!(Cat::module_path(), Some("zoo::pets"));
/// ```
///
/// Or manually:
///
/// ```
/// use pj_reflect::info::TypePath;
///
/// struct Foo;
///
/// impl TypePath for Foo {
///     fn type_path() -> &'static str { "my_crate::foo::Foo" }
///     fn type_name() -> &'static str { "Foo" }
///     fn type_ident() -> &'static str { "Foo" }
///     fn module_path() -> Option<&'static str> { Some("my_crate::foo") }
/// }
/// ```
///
/// [`type_path`]: TypePath::type_path
/// [`type_name`]: TypePath::type_name
/// [`type_ident`]: TypePath::type_ident
/// [`module_path`]: TypePath::module_path
pub trait TypePath: 'static {
    /// Returns the fully qualified path of the type.
    ///
    /// This is the complete unique identifier of a type,
    /// and should **not** be duplicated in different types.
    fn type_path() -> &'static str;

    /// Returns a short, pretty-print enabled path to the type.
    ///
    /// This name allows for duplication.
    fn type_name() -> &'static str;

    /// Returns the short name of the type, without generics.
    fn type_ident() -> &'static str;

    /// Optional module path where the type is defined.
    ///
    /// Primitive built-in types return `None`.
    fn module_path() -> Option<&'static str> {
        None
    }
}

// -----------------------------------------------------------------------------
// DynamicTypePath

/// Provide dynamic dispatch for types that implement [`TypePath`].
///
/// Auto impl for all types that implemented [`TypePath`].
///
/// # Examples
///
/// ```
/// use pj_reflect::{info::DynamicTypePath, Reflect};
///
/// let x = String::from("");
/// assert_eq!(x.reflect_type_path(), "alloc::string::String");
///
/// let y: &dyn Reflect = &x;
/// assert_eq!(y.reflect_type_ident(), "String");
/// ```
pub trait DynamicTypePath {
    /// See [`TypePath::type_path`].
    fn reflect_type_path(&self) -> &'static str;

    /// See [`TypePath::type_name`].
    fn reflect_type_name(&self) -> &'static str;

    /// See [`TypePath::type_ident`].
    fn reflect_type_ident(&self) -> &'static str;

    /// See [`TypePath::module_path`].
    fn reflect_module_path(&self) -> Option<&'static str>;
}

impl<T: TypePath> DynamicTypePath for T {
    #[inline]
    fn reflect_type_path(&self) -> &'static str {
        Self::type_path()
    }

    #[inline]
    fn reflect_type_name(&self) -> &'static str {
        Self::type_name()
    }

    #[inline]
    fn reflect_type_ident(&self) -> &'static str {
        Self::type_ident()
    }

    #[inline]
    fn reflect_module_path(&self) -> Option<&'static str> {
        Self::module_path()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::info::{DynamicTypePath, TypePath};

    trait Marker: Send + Sync {}
    struct Local;

    crate::impl_type_path!(Local);
    crate::impl_type_path!(dyn Marker);

    #[test]
    fn call_site_module_path() {
        assert_eq!(Local::type_path(), "pj_reflect::info::type_path::tests::Local");
        assert_eq!(Local::module_path(), Some("pj_reflect::info::type_path::tests"));
        assert_eq!(Local::type_ident(), "Local");
        assert_eq!(Local::type_name(), "Local");
    }

    #[test]
    fn trait_object_path() {
        assert_eq!(
            <dyn Marker>::type_path(),
            "pj_reflect::info::type_path::tests::Marker"
        );
        assert_eq!(<dyn Marker>::type_ident(), "Marker");
    }

    #[test]
    fn primitives_have_no_module() {
        assert_eq!(u32::type_path(), "u32");
        assert_eq!(u32::module_path(), None);
        assert_eq!(String::type_path(), "alloc::string::String");
        assert_eq!(String::new().reflect_module_path(), Some("alloc::string"));
    }
}
