use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::info::TypePath;

// -----------------------------------------------------------------------------
// Type

/// A [`TypeId`] together with the [`TypePath`] strings of the same type.
///
/// Equality and hashing only consider the `TypeId`.
///
/// # Examples
///
/// ```
/// use pj_reflect::info::Type;
///
/// let ty = Type::of::<String>();
/// assert_eq!(ty.path(), "alloc::string::String");
/// assert_eq!(ty.crate_name(), Some("alloc"));
/// assert!(ty.is::<String>());
/// ```
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
    name: &'static str,
    ident: &'static str,
    module_path: Option<&'static str>,
}

impl Type {
    /// Create a [`Type`] for `T`, which may be a trait object.
    #[inline]
    pub fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: T::type_path(),
            name: T::type_name(),
            ident: T::type_ident(),
            module_path: T::module_path(),
        }
    }

    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// See [`TypePath::type_path`].
    #[inline(always)]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// See [`TypePath::type_name`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// See [`TypePath::type_ident`].
    #[inline(always)]
    pub const fn ident(&self) -> &'static str {
        self.ident
    }

    /// See [`TypePath::module_path`].
    #[inline(always)]
    pub const fn module_path(&self) -> Option<&'static str> {
        self.module_path
    }

    /// The first segment of the module path.
    ///
    /// This is the compilation unit a type lives in. Discriminator
    /// fallback never leaves the crate of the base type.
    pub fn crate_name(&self) -> Option<&'static str> {
        let module_path = self.module_path?;
        module_path.split("::").next()
    }

    /// Returns `true` if this is the type `T`.
    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Type").field(&self.path).finish()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

// -----------------------------------------------------------------------------
// Tests
