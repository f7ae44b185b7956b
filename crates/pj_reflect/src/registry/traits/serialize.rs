use serde::{Serialize, Serializer};

use crate::Reflect;
use crate::info::TypePath;
use crate::registry::FromType;

/// A container providing `serde` serialization support for reflected types.
///
/// Internally stores a function pointer for a specific type. When given a
/// reflected value, it downcasts to the concrete type and exposes its
/// `serde` implementation through `erased_serde`.
///
/// # Panic
///
/// Passing an incorrectly typed `&dyn Reflect` value will cause a panic.
///
/// # Examples
///
/// ```
/// # use pj_reflect::{impl_reflect, Reflect};
/// # use pj_reflect::registry::{TypeTraitSerialize, TypeRegistry};
/// #[derive(serde::Serialize, serde::Deserialize)]
/// struct Point { x: i32 }
/// impl_reflect!(Point);
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Point>();
///
/// let input = Point { x: 3 };
/// let processor = registry.get_type_trait::<TypeTraitSerialize>(input.ty_id()).unwrap();
///
/// let output = serde_json::to_string(processor.erased(&input)).unwrap();
/// assert_eq!(output, r#"{"x":3}"#);
/// ```
#[derive(Clone)]
pub struct TypeTraitSerialize {
    fun: fn(value: &dyn Reflect) -> &dyn erased_serde::Serialize,
}

impl<T: Serialize + TypePath + Reflect> FromType<T> for TypeTraitSerialize {
    fn from_type() -> Self {
        Self {
            fun: |value| match value.downcast_ref::<T>() {
                Some(val) => val as &dyn erased_serde::Serialize,
                None => {
                    panic!(
                        "Serial type mismatched, Serial Type `{}` with Value Type: {}",
                        T::type_path(),
                        value.reflect_type_path(),
                    );
                }
            },
        }
    }
}

impl TypeTraitSerialize {
    /// Returns the value as an erased `serde` serializable.
    ///
    /// # Panic
    /// - Mismatched Type
    #[inline(always)]
    pub fn erased<'a>(&self, value: &'a dyn Reflect) -> &'a dyn erased_serde::Serialize {
        (self.fun)(value)
    }

    /// Call T's [`Serialize`].
    ///
    /// # Panic
    /// - Mismatched Type
    #[inline(always)]
    pub fn serialize<S: Serializer>(
        &self,
        value: &dyn Reflect,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        (self.fun)(value).serialize(serializer)
    }
}
