use alloc::boxed::Box;

use pj_reflect::Reflect;
use pj_reflect::info::TypePath;
use pj_reflect::registry::FromType;
use serde_json::Value;

use crate::Error;
use crate::driver::{DeserializeDriver, SerializeDriver};

// -----------------------------------------------------------------------------
// JsonCodec

/// A hand-written structural codec.
///
/// Needed by types whose fields are polymorphic: `serde` cannot reach the
/// registry, the codec passes nested values back to the driver instead.
///
/// ```
/// use pj_json::driver::{DeserializeDriver, JsonCodec, SerializeDriver};
/// use pj_json::Error;
/// use serde_json::{Value, json};
///
/// pub struct Meters(f64);
/// pj_reflect::impl_type_path!(Meters);
///
/// impl JsonCodec for Meters {
///     fn write_json(&self, _driver: &SerializeDriver<'_>) -> Result<Value, Error> {
///         Ok(json!(format!("{}m", self.0)))
///     }
///
///     fn read_json(value: Value, _driver: &DeserializeDriver<'_>) -> Result<Self, Error> {
///         value
///             .as_str()
///             .and_then(|s| s.strip_suffix('m'))
///             .and_then(|s| s.parse().ok())
///             .map(Meters)
///             .ok_or_else(|| Error::malformed("expected a length like `3m`"))
///     }
/// }
/// ```
pub trait JsonCodec: Reflect + Sized {
    fn write_json(&self, driver: &SerializeDriver<'_>) -> Result<Value, Error>;

    fn read_json(value: Value, driver: &DeserializeDriver<'_>) -> Result<Self, Error>;
}

// -----------------------------------------------------------------------------
// TypeTraitJsonCodec

/// Type-erased [`JsonCodec`] stored in a type's meta.
///
/// # Panic
///
/// Writing an incorrectly typed `&dyn Reflect` value will cause a panic.
#[derive(Clone)]
pub struct TypeTraitJsonCodec {
    write: fn(&dyn Reflect, &SerializeDriver<'_>) -> Result<Value, Error>,
    read: fn(Value, &DeserializeDriver<'_>) -> Result<Box<dyn Reflect>, Error>,
}

impl<T: JsonCodec + TypePath> FromType<T> for TypeTraitJsonCodec {
    fn from_type() -> Self {
        Self {
            write: |value, driver| match value.downcast_ref::<T>() {
                Some(val) => val.write_json(driver),
                None => panic!(
                    "Codec type mismatched, Codec Type `{}` with Value Type: {}",
                    T::type_path(),
                    value.reflect_type_path(),
                ),
            },
            read: |value, driver| Ok(Box::new(T::read_json(value, driver)?)),
        }
    }
}

impl TypeTraitJsonCodec {
    #[inline]
    pub fn write(&self, value: &dyn Reflect, driver: &SerializeDriver<'_>) -> Result<Value, Error> {
        (self.write)(value, driver)
    }

    #[inline]
    pub fn read(&self, value: Value, driver: &DeserializeDriver<'_>) -> Result<Box<dyn Reflect>, Error> {
        (self.read)(value, driver)
    }
}
