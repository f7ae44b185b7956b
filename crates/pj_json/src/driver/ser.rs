use alloc::string::{String, ToString};

use log::trace;
use pj_reflect::Reflect;
use pj_reflect::registry::{TypeRegistry, TypeTraitSerialize};
use serde_json::Value;

use crate::Error;
use crate::driver::TypeTraitJsonCodec;

// -----------------------------------------------------------------------------
// SerializeDriver

/// Converts reflected values into `serde_json::Value`, see the
/// [module documentation](crate::driver) for the dispatch order.
///
/// # Examples
///
/// ```
/// # use pj_json::driver::SerializeDriver;
/// # use pj_reflect::registry::TypeRegistry;
/// #[derive(serde::Serialize, serde::Deserialize)]
/// struct Point { x: i32 }
/// pj_reflect::impl_reflect!(Point);
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Point>();
///
/// let driver = SerializeDriver::new(&registry);
/// assert_eq!(driver.to_string(&Point { x: 1 }).unwrap(), r#"{"x":1}"#);
/// ```
#[derive(Clone, Copy)]
pub struct SerializeDriver<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> SerializeDriver<'a> {
    #[inline]
    pub const fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    #[inline]
    pub const fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    pub fn serialize(&self, value: &dyn Reflect) -> Result<Value, Error> {
        let Some(meta) = self.registry.get(value.ty_id()) else {
            return Err(Error::UnregisteredType(value.reflect_type_path().to_string()));
        };

        #[cfg(all(debug_assertions, feature = "debug"))]
        let _frame = super::type_stack::Frame::push(meta.type_path());

        if let Some(converter) = super::find_converter(self.registry, meta, |c| c.can_write()) {
            trace!("`{}` written by converter", meta.type_path());
            return converter.write_json(value, self);
        }

        if let Some(codec) = meta.get_trait::<TypeTraitJsonCodec>() {
            trace!("`{}` written by codec", meta.type_path());
            return codec.write(value, self);
        }

        if let Some(serialize) = meta.get_trait::<TypeTraitSerialize>() {
            return serde_json::to_value(serialize.erased(value)).map_err(|source| {
                Error::StructuralEncode {
                    type_path: meta.type_path(),
                    source,
                }
            });
        }

        Err(Error::NoCodec(meta.type_path()))
    }

    pub fn to_string(&self, value: &dyn Reflect) -> Result<String, Error> {
        let value = self.serialize(value)?;
        Ok(serde_json::to_string(&value)?)
    }

    pub fn to_string_pretty(&self, value: &dyn Reflect) -> Result<String, Error> {
        let value = self.serialize(value)?;
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use pj_reflect::registry::TypeRegistry;
    use serde_json::json;

    use super::SerializeDriver;
    use crate::Error;

    struct Opaque;
    pj_reflect::impl_type_path!(Opaque);

    impl pj_reflect::registry::GetTypeMeta for Opaque {
        fn get_type_meta() -> pj_reflect::registry::TypeMeta {
            pj_reflect::registry::TypeMeta::of::<Self>()
        }
    }

    #[test]
    fn primitives_use_serde() {
        let registry = TypeRegistry::new();
        let driver = SerializeDriver::new(&registry);
        assert_eq!(driver.serialize(&5_u8).unwrap(), json!(5));
        assert_eq!(driver.serialize(&String::from("a")).unwrap(), json!("a"));
    }

    #[test]
    fn missing_codec_and_registration() {
        let mut registry = TypeRegistry::empty();
        let driver = SerializeDriver::new(&registry);
        assert!(matches!(driver.serialize(&Opaque), Err(Error::UnregisteredType(_))));

        registry.register::<Opaque>();
        let driver = SerializeDriver::new(&registry);
        assert!(matches!(driver.serialize(&Opaque), Err(Error::NoCodec(_))));
    }
}
