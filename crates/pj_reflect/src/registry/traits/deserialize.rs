use alloc::boxed::Box;

use serde::{Deserialize, Deserializer};

use crate::Reflect;
use crate::info::TypePath;
use crate::registry::FromType;

/// A container providing `serde` deserialization support for reflected types.
///
/// The stored function deserializes the concrete type and boxes it as a
/// `dyn Reflect`, so callers holding only a [`TypeId`](core::any::TypeId)
/// can still produce a value.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use pj_reflect::impl_reflect;
/// use pj_reflect::registry::{TypeTraitDeserialize, TypeRegistry};
///
/// #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
/// struct Point { x: i32 }
/// impl_reflect!(Point);
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Point>();
///
/// let processor = registry.get_type_trait::<TypeTraitDeserialize>(TypeId::of::<Point>()).unwrap();
///
/// let value = processor.deserialize(serde_json::json!({ "x": 5 })).unwrap();
/// assert_eq!(value.take::<Point>().unwrap(), Point { x: 5 });
/// ```
#[derive(Clone)]
pub struct TypeTraitDeserialize {
    func: fn(
        deserializer: &mut dyn erased_serde::Deserializer,
    ) -> Result<Box<dyn Reflect>, erased_serde::Error>,
}

impl TypeTraitDeserialize {
    /// Deserializes a reflected value.
    ///
    /// See [`TypeTraitDeserialize`] for examples.
    #[inline(always)]
    pub fn deserialize<'de, D: Deserializer<'de>>(
        &self,
        deserializer: D,
    ) -> Result<Box<dyn Reflect>, D::Error> {
        let mut erased = <dyn erased_serde::Deserializer>::erase(deserializer);
        (self.func)(&mut erased).map_err(<D::Error as serde::de::Error>::custom)
    }
}

impl<T: for<'a> Deserialize<'a> + TypePath + Reflect> FromType<T> for TypeTraitDeserialize {
    fn from_type() -> Self {
        Self {
            func: |deserializer| Ok(Box::new(T::deserialize(deserializer)?)),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::TypeTraitDeserialize;
    use crate::registry::FromType;

    #[test]
    fn structural_error_is_reported() {
        let processor: TypeTraitDeserialize = FromType::<u32>::from_type();
        let err = processor.deserialize(serde_json::json!("seven")).unwrap_err();
        assert!(err.to_string().contains("invalid type"));

        let value = processor.deserialize(serde_json::json!(7)).unwrap();
        assert_eq!(value.take::<u32>().unwrap(), 7);
    }
}
