use alloc::boxed::Box;
use alloc::format;
use core::any::TypeId;

use log::trace;
use pj_reflect::Reflect;
use pj_reflect::info::TypePath;
use pj_reflect::registry::{TypeRegistry, TypeTraitDeserialize, TypeTraitSubtype};
use serde_json::Value;

use crate::Error;
use crate::driver::TypeTraitJsonCodec;

// -----------------------------------------------------------------------------
// DeserializeDriver

/// Converts `serde_json::Value`s into reflected values of a requested type,
/// see the [module documentation](crate::driver) for the dispatch order.
///
/// The JSON carries no type information of its own, so the target type
/// must be given. For a polymorphic base with an attached converter, the
/// target is the base and the payload names the variant.
///
/// # Examples
///
/// ```
/// # use pj_json::driver::DeserializeDriver;
/// # use pj_reflect::registry::TypeRegistry;
/// #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
/// struct Point { x: i32 }
/// pj_reflect::impl_reflect!(Point);
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Point>();
///
/// let driver = DeserializeDriver::new(&registry);
/// let point: Point = driver.from_str_as(r#"{"x":4}"#).unwrap();
/// assert_eq!(point, Point { x: 4 });
/// ```
#[derive(Clone, Copy)]
pub struct DeserializeDriver<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> DeserializeDriver<'a> {
    #[inline]
    pub const fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    #[inline]
    pub const fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    /// Read `value` as the type with the given [`TypeId`].
    ///
    /// The result is of that type, or of a variant of it when a
    /// converter resolves the payload.
    pub fn deserialize(&self, value: Value, type_id: TypeId) -> Result<Box<dyn Reflect>, Error> {
        let Some(meta) = self.registry.get(type_id) else {
            return Err(Error::UnregisteredType(format!("{type_id:?}")));
        };

        #[cfg(all(debug_assertions, feature = "debug"))]
        let _frame = super::type_stack::Frame::push(meta.type_path());

        if let Some(converter) = super::find_converter(self.registry, meta, |c| c.can_read()) {
            trace!("`{}` read by converter", meta.type_path());
            return converter.read_json(value, meta.ty(), self);
        }

        if let Some(codec) = meta.get_trait::<TypeTraitJsonCodec>() {
            trace!("`{}` read by codec", meta.type_path());
            return codec.read(value, self);
        }

        if let Some(deserialize) = meta.get_trait::<TypeTraitDeserialize>() {
            return deserialize
                .deserialize(value)
                .map_err(|source| Error::StructuralDecode {
                    type_path: meta.type_path(),
                    discriminator: None,
                    base: None,
                    source,
                });
        }

        Err(Error::NoCodec(meta.type_path()))
    }

    /// Read `value` as `T`.
    pub fn deserialize_as<T: Reflect + TypePath>(&self, value: Value) -> Result<T, Error> {
        self.deserialize(value, TypeId::of::<T>())?
            .take::<T>()
            .map_err(|other| Error::NotASubtype {
                ty: other.reflect_type_path(),
                base: T::type_path(),
            })
    }

    /// Read `value` as the base `B`, usually a trait object.
    ///
    /// The decoded variant is turned into `Box<B>` through its
    /// [`TypeTraitSubtype<B>`].
    pub fn deserialize_dyn<B: TypePath + ?Sized>(&self, value: Value) -> Result<Box<B>, Error> {
        let decoded = self.deserialize(value, TypeId::of::<B>())?;
        let ty = decoded.reflect_type_path();
        let not_a_subtype = || Error::NotASubtype {
            ty,
            base: B::type_path(),
        };

        let subtype = self
            .registry
            .get_type_trait::<TypeTraitSubtype<B>>(decoded.ty_id())
            .ok_or_else(not_a_subtype)?;
        subtype.cast(decoded).map_err(|_| not_a_subtype())
    }

    /// Parse `text` and read it as `T`.
    pub fn from_str_as<T: Reflect + TypePath>(&self, text: &str) -> Result<T, Error> {
        self.deserialize_as(serde_json::from_str(text)?)
    }

    /// Parse `text` and read it as the base `B`.
    pub fn from_str_dyn<B: TypePath + ?Sized>(&self, text: &str) -> Result<Box<B>, Error> {
        self.deserialize_dyn(serde_json::from_str(text)?)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use pj_reflect::registry::TypeRegistry;
    use serde_json::json;

    use super::DeserializeDriver;
    use crate::Error;

    #[derive(Debug)]
    struct Unregistered;
    pj_reflect::impl_type_path!(Unregistered);

    #[test]
    fn primitives_use_serde() {
        let registry = TypeRegistry::new();
        let driver = DeserializeDriver::new(&registry);
        assert_eq!(driver.deserialize_as::<u16>(json!(300)).unwrap(), 300);
        assert_eq!(driver.from_str_as::<String>("\"rex\"").unwrap(), "rex");
    }

    #[test]
    fn errors() {
        let registry = TypeRegistry::new();
        let driver = DeserializeDriver::new(&registry);

        let err = driver.deserialize_as::<u8>(json!(-1)).unwrap_err();
        assert!(matches!(err, Error::StructuralDecode { type_path: "u8", .. }));

        let err = driver.from_str_as::<u8>("{").unwrap_err();
        assert!(matches!(err, Error::Json(_)));

        let err = driver.deserialize_as::<Unregistered>(json!(null)).unwrap_err();
        assert!(matches!(err, Error::UnregisteredType(_)));
    }
}
