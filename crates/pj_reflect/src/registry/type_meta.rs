use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::ops::{Deref, DerefMut};

use pj_utils::TypeIdMap;

use crate::info::{Type, TypePath};
use crate::registry::{TypeRegistry, TypeTrait, TypeTraitSubtype};

// -----------------------------------------------------------------------------
// TypeMeta

/// Runtime storage for type metadata, registered into the [`TypeRegistry`].
///
/// This includes a [`Type`], the bases this type is a variant of,
/// and a [`TypeTrait`] table.
///
/// An instance of `TypeMeta` can be created using the [`TypeMeta::of`]
/// method, but is more often generated by [`impl_reflect!`](crate::impl_reflect),
/// which implements the [`GetTypeMeta`] trait.
///
/// # Example
///
/// ```
/// # use pj_reflect::registry::{TypeMeta, TypeTraitSerialize, FromType};
/// let mut meta = TypeMeta::of::<String>();
/// meta.insert_trait::<TypeTraitSerialize>(FromType::<String>::from_type());
///
/// assert!(meta.has_trait::<TypeTraitSerialize>());
/// assert_eq!(meta.type_ident(), "String");
/// ```
pub struct TypeMeta {
    ty: Type,
    bases: Vec<TypeId>,
    trait_table: TypeIdMap<Box<dyn TypeTrait>>,
}

impl TypeMeta {
    /// Create a empty [`TypeMeta`] from a type.
    ///
    /// `T` may be unsized, base types of a hierarchy are usually trait objects.
    #[inline]
    pub fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            ty: Type::of::<T>(),
            bases: Vec::new(),
            trait_table: TypeIdMap::new(),
        }
    }

    /// Create a empty [`TypeMeta`] from a type with capacity.
    #[inline]
    pub fn with_capacity<T: TypePath + ?Sized>(capacity: usize) -> Self {
        Self {
            ty: Type::of::<T>(),
            bases: Vec::new(),
            trait_table: TypeIdMap::with_capacity(capacity),
        }
    }

    /// Returns the [`Type`] .
    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline(always)]
    pub const fn type_id(&self) -> TypeId {
        self.ty.id()
    }

    #[inline(always)]
    pub const fn type_path(&self) -> &'static str {
        self.ty.path()
    }

    #[inline(always)]
    pub const fn type_name(&self) -> &'static str {
        self.ty.name()
    }

    #[inline(always)]
    pub const fn type_ident(&self) -> &'static str {
        self.ty.ident()
    }

    #[inline(always)]
    pub const fn module_path(&self) -> Option<&'static str> {
        self.ty.module_path()
    }

    #[inline]
    pub fn crate_name(&self) -> Option<&'static str> {
        self.ty.crate_name()
    }

    // -------------------------------------------------------------------------
    // Hierarchy

    /// Declare this type as a variant of the base `B`.
    ///
    /// Stores the [`TypeTraitSubtype<B>`] and records `B` in [`bases`](Self::bases).
    pub fn insert_subtype<B: ?Sized + 'static>(&mut self, subtype: TypeTraitSubtype<B>) {
        self.insert_base(TypeId::of::<B>());
        self.insert_trait(subtype);
    }

    pub(crate) fn insert_base(&mut self, base: TypeId) {
        if !self.bases.contains(&base) {
            self.bases.push(base);
        }
    }

    /// The bases this type is declared as a variant of, in declaration order.
    #[inline]
    pub fn bases(&self) -> &[TypeId] {
        &self.bases
    }

    /// Returns `true` if this type was declared as a variant of `base`.
    ///
    /// A type is not a subtype of itself.
    #[inline]
    pub fn is_subtype_of(&self, base: TypeId) -> bool {
        self.bases.contains(&base)
    }

    // -------------------------------------------------------------------------
    // TypeTraits

    /// Insert a new [`TypeTrait`], replacing any value of the same type.
    #[inline(always)]
    pub fn insert_trait<T: TypeTrait>(&mut self, data: T) {
        self.insert_trait_by_id(TypeId::of::<T>(), Box::new(data));
    }

    #[inline(never)]
    fn insert_trait_by_id(&mut self, id: TypeId, val: Box<dyn TypeTrait>) {
        self.trait_table.insert(id, val);
    }

    /// Removes a [`TypeTrait`] from the meta.
    pub fn remove_trait<T: TypeTrait>(&mut self) -> Option<Box<T>> {
        let value: Box<dyn Any> = self.trait_table.remove(&TypeId::of::<T>())?;
        value.downcast::<T>().ok()
    }

    /// Get a [`TypeTrait`] reference, or return `None` if it's doesn't exist.
    #[inline]
    pub fn get_trait<T: TypeTrait>(&self) -> Option<&T> {
        self.get_trait_by_id(TypeId::of::<T>())
            .and_then(<dyn TypeTrait>::downcast_ref)
    }

    pub fn get_trait_by_id(&self, type_id: TypeId) -> Option<&dyn TypeTrait> {
        self.trait_table.get(&type_id).map(Deref::deref)
    }

    /// Get a mutable [`TypeTrait`] reference, or return `None` if it's doesn't exist.
    #[inline]
    pub fn get_trait_mut<T: TypeTrait>(&mut self) -> Option<&mut T> {
        self.trait_table
            .get_mut(&TypeId::of::<T>())
            .map(DerefMut::deref_mut)
            .and_then(<dyn TypeTrait>::downcast_mut)
    }

    /// Return true if specific [`TypeTrait`] is exist.
    #[inline]
    pub fn has_trait<T: TypeTrait>(&self) -> bool {
        self.trait_table.contains(&TypeId::of::<T>())
    }

    /// Return the number of [`TypeTrait`].
    #[inline]
    pub fn trait_len(&self) -> usize {
        self.trait_table.len()
    }
}

impl core::fmt::Debug for TypeMeta {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeMeta")
            .field("ty", &self.ty)
            .field("bases", &self.bases.len())
            .field("traits", &self.trait_table.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// GetTypeMeta

/// A trait which allows a type to generate its [`TypeMeta`]
/// for registration into the [`TypeRegistry`].
///
/// Usually implemented by [`impl_reflect!`](crate::impl_reflect).
///
/// ## Manually
///
/// ```
/// use pj_reflect::impl_type_path;
/// use pj_reflect::registry::{FromType, GetTypeMeta, TypeMeta, TypeTraitSerialize};
///
/// #[derive(serde::Serialize)]
/// struct Token(u64);
/// impl_type_path!(Token);
///
/// impl GetTypeMeta for Token {
///     fn get_type_meta() -> TypeMeta {
///         let mut meta = TypeMeta::of::<Self>();
///         meta.insert_trait::<TypeTraitSerialize>(FromType::<Self>::from_type());
///         meta
///     }
/// }
///
/// assert!(Token::get_type_meta().has_trait::<TypeTraitSerialize>());
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `GetTypeMeta` so cannot provide type registration information",
    note = "consider implementing it with `impl_reflect!({Self})`"
)]
pub trait GetTypeMeta: TypePath {
    /// Returns the **default** [`TypeMeta`] for this type.
    fn get_type_meta() -> TypeMeta;

    /// Registers other types needed by this type.
    /// **Allow** not to register oneself.
    fn register_dependencies(_registry: &mut TypeRegistry) {}
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use core::any::TypeId;

    use super::TypeMeta;
    use crate::Reflect;
    use crate::registry::{FromType, TypeTraitSerialize, TypeTraitSubtype};

    trait Shape: Reflect {}
    crate::impl_type_path!(dyn Shape);

    struct Square;
    crate::impl_type_path!(Square);
    impl Shape for Square {}

    #[test]
    fn subtype_records_base_once() {
        let mut meta = TypeMeta::of::<Square>();
        let upcast = |v: Box<Square>| -> Box<dyn Shape> { v };
        meta.insert_subtype::<dyn Shape>(TypeTraitSubtype::of::<Square>(upcast));
        meta.insert_subtype::<dyn Shape>(TypeTraitSubtype::of::<Square>(upcast));

        assert_eq!(meta.bases(), &[TypeId::of::<dyn Shape>()]);
        assert!(meta.is_subtype_of(TypeId::of::<dyn Shape>()));
        assert!(!meta.is_subtype_of(TypeId::of::<Square>()));
        assert!(meta.has_trait::<TypeTraitSubtype<dyn Shape>>());
    }

    #[test]
    fn trait_table_roundtrip() {
        let mut meta = TypeMeta::with_capacity::<u8>(1);
        meta.insert_trait::<TypeTraitSerialize>(FromType::<u8>::from_type());
        assert_eq!(meta.trait_len(), 1);
        assert!(meta.remove_trait::<TypeTraitSerialize>().is_some());
        assert!(!meta.has_trait::<TypeTraitSerialize>());
    }
}
