use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::{String, ToString};

use log::trace;
use pj_reflect::Reflect;
use pj_reflect::info::Type;
use serde_json::Value;

use crate::converter::JsonConverter;
use crate::driver::{DeserializeDriver, SerializeDriver};
use crate::guard::{Direction, ReentrancyGuard};
use crate::resolver::SubtypeResolver;
use crate::Error;

/// The discriminator field name used by [`InheritanceConverter::new`].
pub const DEFAULT_DISCRIMINATOR: &str = "discriminator";

// -----------------------------------------------------------------------------
// InheritanceConverter

/// Writes and reads values of a polymorphic hierarchy with an embedded
/// discriminator field naming the concrete variant.
///
/// Attach one converter per base type with
/// [`register_converter`](crate::converter::register_converter).
///
/// # Writing
///
/// The structural form of the value is produced by the driver with this
/// converter suppressed, then the discriminator is inserted as the first
/// field, holding the variant's type ident:
///
/// ```
/// use pj_json::converter::{InheritanceConverter, register_converter};
/// use pj_json::driver::SerializeDriver;
/// use pj_reflect::registry::TypeRegistry;
/// use pj_reflect::{impl_reflect, impl_type_path, Reflect};
///
/// pub trait Animal: Reflect {}
/// impl_type_path!(dyn Animal);
///
/// #[derive(serde::Serialize, serde::Deserialize)]
/// pub struct Dog { pub name: String }
/// impl Animal for Dog {}
/// impl_reflect!(Dog: dyn Animal);
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Dog>();
/// register_converter::<dyn Animal>(&mut registry, InheritanceConverter::with_discriminator("kind"));
///
/// let dog = Dog { name: "Rex".into() };
/// let json = SerializeDriver::new(&registry).to_string(&dog).unwrap();
/// assert_eq!(json, r#"{"kind":"Dog","name":"Rex"}"#);
/// ```
///
/// # Reading
///
/// The discriminator is resolved against the declared type with
/// [`SubtypeResolver`], and the payload is decoded as the resolved type.
/// The discriminator field is left in the payload, structural decoders
/// that ignore unknown fields never see a difference.
///
/// The converter reports [`can_convert`](JsonConverter::can_convert) for every
/// type; it is only consulted for the types it is attached to and their variants.
#[derive(Debug)]
pub struct InheritanceConverter {
    discriminator: Cow<'static, str>,
    guard: ReentrancyGuard,
}

impl InheritanceConverter {
    /// A converter using [`DEFAULT_DISCRIMINATOR`].
    pub fn new() -> Self {
        Self::with_discriminator(DEFAULT_DISCRIMINATOR)
    }

    pub fn with_discriminator(discriminator: impl Into<Cow<'static, str>>) -> Self {
        Self {
            discriminator: discriminator.into(),
            guard: ReentrancyGuard::new(),
        }
    }

    /// The name of the discriminator field.
    #[inline]
    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }
}

impl Default for InheritanceConverter {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl JsonConverter for InheritanceConverter {
    #[inline]
    fn can_convert(&self, _ty: &Type) -> bool {
        true
    }

    fn can_write(&self) -> bool {
        !self.guard.consume(Direction::Write)
    }

    fn can_read(&self) -> bool {
        !self.guard.consume(Direction::Read)
    }

    fn write_json(&self, value: &dyn Reflect, driver: &SerializeDriver<'_>) -> Result<Value, Error> {
        let structural = {
            let _suppressed = self.guard.enter(Direction::Write);
            driver.serialize(value)?
        };

        let Value::Object(mut object) = structural else {
            return Err(Error::malformed(format_args!(
                "`{}` must serialize to a JSON object to carry the discriminator `{}`",
                value.reflect_type_path(),
                self.discriminator,
            )));
        };

        if object.contains_key(self.discriminator()) {
            return Err(Error::DiscriminatorConflict {
                discriminator: self.discriminator.to_string(),
                type_path: value.reflect_type_path(),
            });
        }

        let ident = value.reflect_type_ident();
        trace!("writing `{}` with discriminator `{ident}`", value.reflect_type_path());
        object.shift_insert(0, self.discriminator.to_string(), Value::String(ident.to_string()));
        Ok(Value::Object(object))
    }

    fn read_json(
        &self,
        value: Value,
        declared: &Type,
        driver: &DeserializeDriver<'_>,
    ) -> Result<Box<dyn Reflect>, Error> {
        let Value::Object(object) = &value else {
            return Err(Error::malformed(format_args!(
                "expected a JSON object carrying `{}` for `{}`, found {}",
                self.discriminator,
                declared.path(),
                kind_of(&value),
            )));
        };

        let discriminator: String = match object.get(self.discriminator()) {
            Some(Value::String(name)) => name.clone(),
            Some(other) => {
                return Err(Error::malformed(format_args!(
                    "discriminator `{}` of `{}` must be a string, found {}",
                    self.discriminator,
                    declared.path(),
                    kind_of(other),
                )));
            }
            None => {
                return Err(Error::MissingDiscriminator {
                    discriminator: self.discriminator.to_string(),
                    base: declared.path(),
                });
            }
        };

        let resolved = SubtypeResolver::resolve(driver.registry(), declared, &discriminator)?;
        trace!("reading discriminator `{discriminator}` as `{}`", resolved.type_path());

        let _suppressed = self.guard.enter(Direction::Read);
        driver
            .deserialize(value, resolved.type_id())
            .map_err(|err| err.with_resolution(&discriminator, declared.path()))
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use pj_reflect::registry::TypeRegistry;
    use pj_reflect::{Reflect, impl_reflect, impl_type_path};
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::InheritanceConverter;
    use crate::Error;
    use crate::converter::{JsonConverter, register_converter};
    use crate::driver::{DeserializeDriver, SerializeDriver};
    use crate::guard::Direction;

    pub trait Shape: Reflect {}
    impl_type_path!(dyn Shape);

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    pub struct Circle {
        pub r: u32,
    }
    impl Shape for Circle {}
    impl_reflect!(Circle: dyn Shape);

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    pub struct Point(u32);
    impl Shape for Point {}
    impl_reflect!(Point: dyn Shape);

    // Its structural form already has a `type` field.
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    pub struct Tagged {
        #[serde(rename = "type")]
        pub tag: u32,
    }
    impl Shape for Tagged {}
    impl_reflect!(Tagged: dyn Shape);

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register::<Circle>();
        registry.register::<Point>();
        registry.register::<Tagged>();
        register_converter::<dyn Shape>(&mut registry, InheritanceConverter::with_discriminator("type"));
        registry
    }

    #[test]
    fn default_discriminator() {
        assert_eq!(InheritanceConverter::new().discriminator(), "discriminator");
        assert_eq!(InheritanceConverter::with_discriminator("kind").discriminator(), "kind");
    }

    #[test]
    fn can_write_consumes_once() {
        let converter = InheritanceConverter::new();
        assert!(converter.can_write());
        {
            let _suppressed = converter.guard.enter(Direction::Write);
            assert!(!converter.can_write());
            assert!(converter.can_write());
            assert!(converter.can_read());
        }
        assert!(converter.can_write());
    }

    #[test]
    fn discriminator_is_first() {
        let registry = registry();
        let value = SerializeDriver::new(&registry).serialize(&Circle { r: 2 }).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["type", "r"]);
        assert_eq!(value, json!({ "type": "Circle", "r": 2 }));
    }

    #[test]
    fn non_object_structural_form() {
        let registry = registry();
        let err = SerializeDriver::new(&registry).serialize(&Point(3)).unwrap_err();
        assert!(matches!(err, Error::MalformedPayload(_)));
    }

    #[test]
    fn discriminator_conflict() {
        let registry = registry();
        let err = SerializeDriver::new(&registry)
            .serialize(&Tagged { tag: 1 })
            .unwrap_err();
        assert!(matches!(
            err,
            Error::DiscriminatorConflict { ref discriminator, .. } if discriminator == "type"
        ));
    }

    #[test]
    fn read_resolves_variant() {
        let registry = registry();
        let driver = DeserializeDriver::new(&registry);
        let shape = driver
            .deserialize(json!({ "type": "Circle", "r": 7 }), TypeId::of::<dyn Shape>())
            .unwrap();
        assert_eq!(shape.take::<Circle>().unwrap(), Circle { r: 7 });
    }

    #[test]
    fn read_rejects_bad_payloads() {
        let registry = registry();
        let driver = DeserializeDriver::new(&registry);
        let base = TypeId::of::<dyn Shape>();

        let err = driver.deserialize(json!([1, 2]), base).unwrap_err();
        assert!(matches!(err, Error::MalformedPayload(_)));

        let err = driver.deserialize(json!({ "type": 3 }), base).unwrap_err();
        assert!(matches!(err, Error::MalformedPayload(_)));

        let err = driver.deserialize(json!({ "r": 3 }), base).unwrap_err();
        assert!(matches!(err, Error::MissingDiscriminator { .. }));

        let err = driver.deserialize(json!({ "type": "Square" }), base).unwrap_err();
        assert!(matches!(err, Error::UnknownDiscriminator { .. }));

        let err = driver
            .deserialize(json!({ "type": "Circle", "r": "big" }), base)
            .unwrap_err();
        match err {
            Error::StructuralDecode {
                type_path,
                discriminator,
                base,
                ..
            } => {
                assert!(type_path.ends_with("::Circle"));
                assert_eq!(discriminator.as_deref(), Some("Circle"));
                assert_eq!(base, Some("pj_json::converter::inheritance::tests::Shape"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
