use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use core::any::TypeId;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::warn;
use pj_utils::TypeIdMap;
use pj_utils::hash::{FixedHashState, HashMap, HashSet};

use crate::Reflect;
use crate::info::{Type, TypePath};
use crate::registry::{FromType, GetTypeMeta, RegistryError, TypeMeta, TypeTrait};
use crate::registry::{KnownType, TypeTraitKnownTypes, TypeTraitSubtype};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of reflected types.
///
/// This struct is the central store for type information.
/// [Registering] a type will generate a new [`TypeMeta`] entry in this store
/// using a type's [`GetTypeMeta`] implementation.
///
/// Besides lookups by [`TypeId`], path and name, the registry records
/// polymorphic hierarchies: which types are bases, which variants belong
/// to them, and which discriminator names a base declares explicitly.
///
/// # Example
///
/// ```
/// use pj_reflect::registry::{TypeRegistry, TypeTraitDeserialize};
///
/// let registry = TypeRegistry::new();
///
/// let processor = registry
///     .get_with_type_name("String").unwrap()
///     .get_trait::<TypeTraitDeserialize>().unwrap();
///
/// let s = processor.deserialize(serde_json::json!("rex")).unwrap();
/// assert_eq!(s.take::<String>().unwrap(), "rex");
/// ```
///
/// [Registering]: TypeRegistry::register
pub struct TypeRegistry {
    type_meta_table: TypeIdMap<TypeMeta>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a empty [`TypeRegistry`].
    #[inline]
    pub const fn empty() -> Self {
        Self {
            type_meta_table: TypeIdMap::new(),
            type_path_to_id: HashMap::with_hasher(FixedHashState),
            type_name_to_id: HashMap::with_hasher(FixedHashState),
            ambiguous_names: HashSet::with_hasher(FixedHashState),
        }
    }

    /// Create a type registry with default registrations for primitive types.
    ///
    /// - `bool` `char`
    /// - `i8 - i128` `isize`
    /// - `u8 - u128` `usize`
    /// - `f32` `f64`
    /// - `String`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<u128>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<i128>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry
    }

    // # Validity
    // The type must **not** already exist.
    fn add_new_type_indices(
        type_meta: &TypeMeta,
        type_path_to_id: &mut HashMap<&'static str, TypeId>,
        type_name_to_id: &mut HashMap<&'static str, TypeId>,
        ambiguous_names: &mut HashSet<&'static str>,
    ) {
        let ty = type_meta.ty();
        let type_name = ty.name();

        if !ambiguous_names.contains(type_name) {
            if type_name_to_id.contains_key(type_name) {
                warn!("type name `{type_name}` is ambiguous, lookups by name are disabled");
                type_name_to_id.remove(type_name);
                ambiguous_names.insert(type_name);
            } else {
                type_name_to_id.insert(type_name, ty.id());
            }
        }

        type_path_to_id.insert(ty.path(), ty.id());
    }

    fn register_internal(
        &mut self,
        type_id: TypeId,
        get_type_meta: impl FnOnce() -> TypeMeta,
    ) -> bool {
        self.type_meta_table.try_insert(type_id, || {
            let meta = get_type_meta();
            Self::add_new_type_indices(
                &meta,
                &mut self.type_path_to_id,
                &mut self.type_name_to_id,
                &mut self.ambiguous_names,
            );
            meta
        })
    }

    /// Try add or do nothing.
    ///
    /// - If the [`TypeId`] already exists, does nothing and returns `false`.
    /// - Otherwise inserts the meta and returns `true`.
    ///
    /// This method will _not_ register type dependencies.
    #[inline]
    pub fn try_insert_type_meta(&mut self, type_meta: TypeMeta) -> bool {
        self.register_internal(type_meta.type_id(), || type_meta)
    }

    /// Insert or **Overwrite** a [`TypeMeta`].
    ///
    /// Path and name indices are only added for new types.
    /// This method will _not_ register type dependencies.
    pub fn insert_type_meta(&mut self, type_meta: TypeMeta) {
        if !self.type_meta_table.contains(&type_meta.type_id()) {
            Self::add_new_type_indices(
                &type_meta,
                &mut self.type_path_to_id,
                &mut self.type_name_to_id,
                &mut self.ambiguous_names,
            );
        }
        self.type_meta_table.insert(type_meta.type_id(), type_meta);
    }

    /// Attempts to register the type `T` if it has not yet been registered already.
    ///
    /// This will also register any type dependencies as specified by
    /// [`GetTypeMeta::register_dependencies`], for `impl_reflect!(Dog: dyn Animal)`
    /// that is the base `dyn Animal`.
    ///
    /// If the meta for type `T` already exists, it will not be registered again
    /// and neither will its type dependencies.
    ///
    /// # Example
    ///
    /// ```
    /// # use core::any::TypeId;
    /// # use pj_reflect::registry::{TypeRegistry, TypeTraitSerialize};
    /// #[derive(serde::Serialize, serde::Deserialize)]
    /// struct Foo { value: i32 }
    /// pj_reflect::impl_reflect!(Foo);
    ///
    /// let mut type_registry = TypeRegistry::default();
    /// type_registry.register::<Foo>();
    ///
    /// assert!(type_registry.contains(TypeId::of::<Foo>()));
    /// assert!(type_registry.get_type_trait::<TypeTraitSerialize>(TypeId::of::<Foo>()).is_some());
    /// ```
    pub fn register<T: GetTypeMeta>(&mut self) {
        if self.register_internal(TypeId::of::<T>(), T::get_type_meta) {
            T::register_dependencies(self);
        }
    }

    /// Automatically registers all types declared via `impl_auto_register!`.
    ///
    /// This method is equivalent to calling [`register`](Self::register) for each qualifying type.
    /// Repeated calls are cheap and will not insert duplicates.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if automatic registration succeeded on the current platform; otherwise, `false`.
    ///
    /// ## Feature Dependency
    ///
    /// This method requires the `auto_register` feature. When disabled, it always do nothing and
    /// returns `false`.
    ///
    /// ## Platform Support
    ///
    /// Supported platforms include Linux, macOS, Windows, iOS, Android, and Web, enabled by
    /// the `inventory` crate. On unsupported platforms, this method becomes a no-op.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            use crate::__macro_exports::auto_register;
            // Reduce the cost of duplicate registrations.
            if self.contains(TypeId::of::<auto_register::__AvailFlag>()) {
                return true;
            }
            auto_register::__register_types(self);
            self.contains(TypeId::of::<auto_register::__AvailFlag>())
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    /// Registers the type trait `D` for type `T`.
    ///
    /// # Panic
    ///
    /// Panics if `T` has not been registered.
    pub fn register_type_trait<T: TypePath, D: TypeTrait + FromType<T>>(&mut self) {
        self.insert_type_trait::<T, D>(D::from_type());
    }

    /// Inserts a type trait value for type `T`, which may be a trait object.
    ///
    /// # Panic
    ///
    /// Panics if `T` has not been registered.
    pub fn insert_type_trait<T: TypePath + ?Sized, D: TypeTrait>(&mut self, data: D) {
        match self.type_meta_table.get_mut(&TypeId::of::<T>()) {
            Some(type_meta) => type_meta.insert_trait(data),
            None => panic!(
                "Called `TypeRegistry::insert_type_trait`, but the type `{}` of type_trait `{}` without registering",
                T::type_path(),
                core::any::type_name::<D>(),
            ),
        }
    }

    // -------------------------------------------------------------------------
    // Hierarchy

    /// Register a base type, usually a trait object.
    ///
    /// Returns `false` if it was already registered.
    pub fn register_base<B: TypePath + ?Sized>(&mut self) -> bool {
        self.register_internal(TypeId::of::<B>(), TypeMeta::of::<B>)
    }

    /// Declare the registered type `T` as a variant of `B`.
    ///
    /// `B` is registered if needed. Equivalent to listing the base
    /// in `impl_reflect!`, for types that cannot do so.
    ///
    /// # Panic
    ///
    /// Panics if `T` has not been registered.
    pub fn register_subtype<B: TypePath + ?Sized, T: Reflect + TypePath>(
        &mut self,
        upcast: fn(Box<T>) -> Box<B>,
    ) {
        self.register_base::<B>();
        match self.type_meta_table.get_mut(&TypeId::of::<T>()) {
            Some(type_meta) => type_meta.insert_subtype::<B>(TypeTraitSubtype::of::<T>(upcast)),
            None => panic!(
                "Called `TypeRegistry::register_subtype`, but the type `{}` is not registered",
                T::type_path(),
            ),
        }
    }

    /// Explicitly declare `T` as a known variant of the base `B`.
    ///
    /// `T` (and through it `B`) is registered if needed. The discriminator value
    /// is the type ident of `T`, and known types take precedence over the
    /// naming convention when resolving a discriminator.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotASubtype`] if `T` is not declared as a variant of `B`.
    /// - [`RegistryError::DuplicateKnownType`] if `B` already declares a different
    ///   type with the same name. Declaring the same type twice is accepted.
    pub fn register_known_type<B: TypePath + ?Sized, T: GetTypeMeta>(
        &mut self,
    ) -> Result<(), RegistryError> {
        self.register::<T>();

        let base_id = TypeId::of::<B>();
        let is_variant = self
            .get(TypeId::of::<T>())
            .is_some_and(|meta| meta.is_subtype_of(base_id));
        if !is_variant {
            return Err(RegistryError::NotASubtype {
                ty: T::type_path(),
                base: B::type_path(),
            });
        }

        self.register_base::<B>();
        let Some(base) = self.type_meta_table.get_mut(&base_id) else {
            return Err(RegistryError::UnregisteredType(B::type_path()));
        };
        if !base.has_trait::<TypeTraitKnownTypes>() {
            base.insert_trait(TypeTraitKnownTypes::new());
        }
        let Some(known) = base.get_trait_mut::<TypeTraitKnownTypes>() else {
            return Err(RegistryError::UnregisteredType(B::type_path()));
        };

        let entry = KnownType {
            name: T::type_ident(),
            ty: Type::of::<T>(),
        };
        match known.insert(entry) {
            Ok(()) => Ok(()),
            Err(existing) if existing.ty == entry.ty => Ok(()),
            Err(existing) => {
                warn!(
                    "known type `{}` of `{}` rejected, the name already maps to `{}`",
                    entry.name,
                    B::type_path(),
                    existing.ty.path(),
                );
                Err(RegistryError::DuplicateKnownType {
                    base: B::type_path(),
                    name: entry.name,
                    existing: existing.ty.path(),
                })
            }
        }
    }

    // -------------------------------------------------------------------------
    // Queries

    /// Whether the type with given [`TypeId`] has been registered in this registry.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains(&type_id)
    }

    /// Returns a reference to the [`TypeMeta`] of the type with the given [`TypeId`].
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.type_meta_table.get(&type_id)
    }

    /// Returns a mutable reference to the [`TypeMeta`] of the type with the given [`TypeId`].
    #[inline]
    pub fn get_mut(&mut self, type_id: TypeId) -> Option<&mut TypeMeta> {
        self.type_meta_table.get_mut(&type_id)
    }

    /// Returns the [`TypeMeta`] of `T`, which may be a trait object.
    #[inline]
    pub fn get_type<T: ?Sized + 'static>(&self) -> Option<&TypeMeta> {
        self.type_meta_table.get_type::<T>()
    }

    /// Returns a reference to the [`TypeMeta`] of the type with
    /// the given [type path].
    ///
    /// [type path]: crate::info::TypePath::type_path
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeMeta> {
        match self.type_path_to_id.get(type_path) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns a reference to the [`TypeMeta`] of the type with the given [type name].
    ///
    /// If the type name is ambiguous, or if no type with the given name
    /// has been registered, returns `None`.
    ///
    /// [type name]: crate::info::TypePath::type_name
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&TypeMeta> {
        match self.type_name_to_id.get(type_name) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns `true` if the given [type name] matches multiple registered types.
    ///
    /// [type name]: crate::info::TypePath::type_name
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// Returns a reference to the [`TypeTrait`] of type `T` associated with the given [`TypeId`].
    pub fn get_type_trait<T: TypeTrait>(&self, type_id: TypeId) -> Option<&T> {
        match self.get(type_id) {
            Some(type_meta) => type_meta.get_trait::<T>(),
            None => None,
        }
    }

    /// Returns an iterator over the [`TypeMeta`]s of the registered types.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }

    /// Returns the registered variants of `base`, in arbitrary order.
    pub fn iter_subtypes(&self, base: TypeId) -> impl Iterator<Item = &TypeMeta> {
        self.type_meta_table
            .values()
            .filter(move |meta| meta.is_subtype_of(base))
    }

    /// Returns a ([`TypeMeta`], [`TypeTrait`]) iterator for all entries
    /// where data of that type was found.
    pub fn iter_with_trait<T: TypeTrait>(&self) -> impl Iterator<Item = (&TypeMeta, &T)> {
        self.type_meta_table.values().filter_map(|item| {
            let type_trait = item.get_trait::<T>();
            type_trait.map(|t| (item, t))
        })
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

/// A shared, lockable [`TypeRegistry`].
///
/// Registration happens up front through [`write`](Self::write); converters
/// only take read locks.
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    /// The wrapped [`TypeRegistry`].
    pub internal: Arc<RwLock<TypeRegistry>>,
}

impl TypeRegistryArc {
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            internal: Arc::new(RwLock::new(registry)),
        }
    }

    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for TypeRegistryArc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.read().type_path_to_id.keys().fmt(f)
    }
}

// -----------------------------------------------------------------------------
// Tests
