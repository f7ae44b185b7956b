use alloc::string::String;

use crate::info::TypePath;
use crate::registry::{FromType, GetTypeMeta, TypeMeta};
use crate::registry::{TypeTraitDeserialize, TypeTraitSerialize};

// -----------------------------------------------------------------------------
// Helpers

macro_rules! impl_get_type_meta {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl GetTypeMeta for $ty {
                fn get_type_meta() -> TypeMeta {
                    let mut meta = TypeMeta::with_capacity::<Self>(2);
                    meta.insert_trait::<TypeTraitSerialize>(FromType::<Self>::from_type());
                    meta.insert_trait::<TypeTraitDeserialize>(FromType::<Self>::from_type());
                    meta
                }
            }
        )+
    };
}

macro_rules! impl_primitive_type_path {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl TypePath for $ty {
                #[inline(always)]
                fn type_path() -> &'static str {
                    ::core::stringify!($ty)
                }

                #[inline(always)]
                fn type_name() -> &'static str {
                    ::core::stringify!($ty)
                }

                #[inline(always)]
                fn type_ident() -> &'static str {
                    ::core::stringify!($ty)
                }
            }
        )+
    };
}

// -----------------------------------------------------------------------------
// Primitives

impl_primitive_type_path!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
);

impl_get_type_meta!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
);

// -----------------------------------------------------------------------------
// String

crate::impl_type_path!((in "alloc::string") String);

impl_get_type_meta!(String);
