// -----------------------------------------------------------------------------
// impl_type_path

/// Implement [`TypePath`](crate::info::TypePath) for a type or a trait object.
///
/// The module path is taken from the call site, unless given as a
/// string literal with `(in "some::module")`.
///
/// ```
/// # use pj_reflect::impl_type_path;
/// pub trait Animal: Send + Sync {}
/// pub struct Dog;
/// pub struct Cat;
///
/// impl_type_path!(Dog);
/// impl_type_path!(dyn Animal);
/// impl_type_path!((in "zoo::pets") Cat);
/// ```
#[macro_export]
macro_rules! impl_type_path {
    ((in $module:literal) dyn $ident:ident) => {
        $crate::impl_type_path!(@impl [dyn $ident] [$module] $ident);
    };
    ((in $module:literal) $ident:ident) => {
        $crate::impl_type_path!(@impl [$ident] [$module] $ident);
    };
    (dyn $ident:ident) => {
        $crate::impl_type_path!(@impl [dyn $ident] [::core::module_path!()] $ident);
    };
    ($ident:ident) => {
        $crate::impl_type_path!(@impl [$ident] [::core::module_path!()] $ident);
    };
    (@impl [$($ty:tt)+] [$($module:tt)+] $ident:ident) => {
        impl $crate::info::TypePath for $($ty)+ {
            #[inline(always)]
            fn type_path() -> &'static str {
                ::core::concat!($($module)+, "::", ::core::stringify!($ident))
            }

            #[inline(always)]
            fn type_name() -> &'static str {
                ::core::stringify!($ident)
            }

            #[inline(always)]
            fn type_ident() -> &'static str {
                ::core::stringify!($ident)
            }

            #[inline(always)]
            fn module_path() -> ::core::option::Option<&'static str> {
                ::core::option::Option::Some($($module)+)
            }
        }
    };
}

// -----------------------------------------------------------------------------
// impl_reflect

/// Implement [`TypePath`](crate::info::TypePath) and
/// [`GetTypeMeta`](crate::registry::GetTypeMeta) for a `serde` type.
///
/// The generated meta carries [`TypeTraitSerialize`] and [`TypeTraitDeserialize`].
/// Listing `dyn Base` after a colon declares the type as a variant of each base:
/// a [`TypeTraitSubtype`] is stored and registering the type also registers the bases.
///
/// ```
/// # use pj_reflect::{impl_reflect, impl_type_path, Reflect};
/// # use pj_reflect::registry::TypeRegistry;
/// pub trait Animal: Reflect {}
/// impl_type_path!(dyn Animal);
///
/// #[derive(serde::Serialize, serde::Deserialize)]
/// pub struct Dog { pub name: String }
/// impl Animal for Dog {}
/// impl_reflect!(Dog: dyn Animal);
///
/// let mut registry = TypeRegistry::empty();
/// registry.register::<Dog>();
/// assert!(registry.get_type::<dyn Animal>().is_some());
/// ```
///
/// [`TypeTraitSerialize`]: crate::registry::TypeTraitSerialize
/// [`TypeTraitDeserialize`]: crate::registry::TypeTraitDeserialize
/// [`TypeTraitSubtype`]: crate::registry::TypeTraitSubtype
#[macro_export]
macro_rules! impl_reflect {
    ($ident:ident $(: $(dyn $base:ident),+ $(,)?)?) => {
        $crate::impl_type_path!($ident);

        impl $crate::registry::GetTypeMeta for $ident {
            fn get_type_meta() -> $crate::registry::TypeMeta {
                let mut meta = $crate::registry::TypeMeta::with_capacity::<Self>(2);
                meta.insert_trait::<$crate::registry::TypeTraitSerialize>(
                    $crate::registry::FromType::<Self>::from_type(),
                );
                meta.insert_trait::<$crate::registry::TypeTraitDeserialize>(
                    $crate::registry::FromType::<Self>::from_type(),
                );
                $($(
                    meta.insert_subtype::<dyn $base>(
                        $crate::registry::TypeTraitSubtype::of::<Self>(
                            |value: $crate::__macro_exports::Box<Self>| -> $crate::__macro_exports::Box<dyn $base> { value },
                        ),
                    );
                )+)?
                meta
            }

            fn register_dependencies(_registry: &mut $crate::registry::TypeRegistry) {
                $($(
                    _registry.register_base::<dyn $base>();
                )+)?
            }
        }
    };
}

// -----------------------------------------------------------------------------
// impl_auto_register

/// Submit types for [`TypeRegistry::auto_register`](crate::registry::TypeRegistry::auto_register).
///
/// Expands to nothing when the `auto_register` feature is disabled.
///
/// ```
/// # use pj_reflect::{impl_auto_register, impl_reflect};
/// #[derive(serde::Serialize, serde::Deserialize)]
/// pub struct Settings { pub verbose: bool }
/// impl_reflect!(Settings);
/// impl_auto_register!(Settings);
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! impl_auto_register {
    ($($ty:ty),+ $(,)?) => {
        $(
            $crate::__macro_exports::auto_register::inventory::submit! {
                $crate::__macro_exports::auto_register::__AutoRegisterFunc(
                    <$ty as $crate::__macro_exports::auto_register::__RegisterType>::__register
                )
            }
        )+
    };
}

/// Submit types for [`TypeRegistry::auto_register`](crate::registry::TypeRegistry::auto_register).
///
/// Expands to nothing when the `auto_register` feature is disabled.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! impl_auto_register {
    ($($ty:ty),+ $(,)?) => {};
}
