//! The converter seam of the dispatch drivers.
//!
//! A [`JsonConverter`] is attached to a type (usually a polymorphic base)
//! through [`TypeTraitConverter`]. The drivers consult converters of a value's
//! own type and of its declared bases before any structural codec.

use alloc::boxed::Box;
use alloc::sync::Arc;

use pj_reflect::Reflect;
use pj_reflect::info::{Type, TypePath};
use pj_reflect::registry::TypeRegistry;
use serde_json::Value;

use crate::Error;
use crate::driver::{DeserializeDriver, SerializeDriver};

// -----------------------------------------------------------------------------
// Modules

mod inheritance;

// -----------------------------------------------------------------------------
// Exports

pub use inheritance::{DEFAULT_DISCRIMINATOR, InheritanceConverter};

// -----------------------------------------------------------------------------
// JsonConverter

/// Custom JSON conversion for a family of types.
///
/// The drivers only call [`write_json`](Self::write_json) when
/// [`can_convert`](Self::can_convert) and [`can_write`](Self::can_write) both
/// return `true`, in that order, and likewise for reading.
pub trait JsonConverter: Send + Sync + 'static {
    /// Whether this converter handles values of `ty`.
    fn can_convert(&self, ty: &Type) -> bool;

    fn can_write(&self) -> bool {
        true
    }

    fn can_read(&self) -> bool {
        true
    }

    fn write_json(&self, value: &dyn Reflect, driver: &SerializeDriver<'_>) -> Result<Value, Error>;

    /// Read `value` as the `declared` type, or a variant of it.
    fn read_json(
        &self,
        value: Value,
        declared: &Type,
        driver: &DeserializeDriver<'_>,
    ) -> Result<Box<dyn Reflect>, Error>;
}

// -----------------------------------------------------------------------------
// TypeTraitConverter

/// Attaches a shared [`JsonConverter`] to a registered type.
#[derive(Clone)]
pub struct TypeTraitConverter {
    converter: Arc<dyn JsonConverter>,
}

impl TypeTraitConverter {
    pub fn new(converter: impl JsonConverter) -> Self {
        Self {
            converter: Arc::new(converter),
        }
    }

    #[inline]
    pub fn converter(&self) -> &dyn JsonConverter {
        &*self.converter
    }
}

/// Register `B` (usually `dyn Base`) and attach `converter` to it.
///
/// Replaces any converter previously attached to `B`.
pub fn register_converter<B: TypePath + ?Sized>(
    registry: &mut TypeRegistry,
    converter: impl JsonConverter,
) {
    registry.register_base::<B>();
    registry.insert_type_trait::<B, _>(TypeTraitConverter::new(converter));
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::any::TypeId;
    use core::fmt::Debug;

    use pj_reflect::info::{DynamicTypePath, Type, TypePath};
    use pj_reflect::registry::{
        FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeRegistryArc, TypeTraitSubtype,
    };
    use pj_reflect::{Reflect, impl_reflect, impl_type_path};
    use serde::{Deserialize, Serialize};
    use serde_json::{Map, Value, json};

    use super::{InheritanceConverter, register_converter};
    use crate::driver::{DeserializeDriver, JsonCodec, SerializeDriver, TypeTraitJsonCodec};
    use crate::{Error, SubtypeResolver};

    pub trait Animal: Reflect {
        fn name(&self) -> &str;
        fn sound(&self) -> &'static str;
    }
    impl_type_path!(dyn Animal);

    impl Debug for dyn Animal {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            write!(f, "{}({})", self.reflect_type_ident(), self.name())
        }
    }

    pub trait Pet: Reflect {}
    impl_type_path!(dyn Pet);

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    pub struct Dog {
        pub name: String,
    }
    impl_reflect!(Dog: dyn Animal, dyn Pet);
    impl Pet for Dog {}

    impl Animal for Dog {
        fn name(&self) -> &str {
            &self.name
        }

        fn sound(&self) -> &'static str {
            "woof"
        }
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    pub struct Cat {
        pub name: String,
        #[serde(default)]
        pub lives: u8,
    }
    impl_reflect!(Cat: dyn Animal);

    impl Animal for Cat {
        fn name(&self) -> &str {
            &self.name
        }

        fn sound(&self) -> &'static str {
            "meow"
        }
    }

    mod wild {
        use alloc::string::String;

        use serde::{Deserialize, Serialize};

        use super::Animal;

        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        pub struct Cat {
            pub name: String,
            pub habitat: String,
        }
        pj_reflect::impl_reflect!(Cat: dyn Animal);

        impl Animal for Cat {
            fn name(&self) -> &str {
                &self.name
            }

            fn sound(&self) -> &'static str {
                "roar"
            }
        }
    }

    /// Holds animals of any kind, each written with its own discriminator.
    pub struct Herd {
        pub name: String,
        pub members: Vec<Box<dyn Animal>>,
    }
    impl_type_path!(Herd);

    impl Animal for Herd {
        fn name(&self) -> &str {
            &self.name
        }

        fn sound(&self) -> &'static str {
            "..."
        }
    }

    impl JsonCodec for Herd {
        fn write_json(&self, driver: &SerializeDriver<'_>) -> Result<Value, Error> {
            let members = self
                .members
                .iter()
                .map(|member| driver.serialize(member.as_reflect()))
                .collect::<Result<Vec<_>, _>>()?;

            let mut object = Map::new();
            object.insert("name".into(), Value::String(self.name.clone()));
            object.insert("members".into(), Value::Array(members));
            Ok(Value::Object(object))
        }

        fn read_json(value: Value, driver: &DeserializeDriver<'_>) -> Result<Self, Error> {
            let Value::Object(mut object) = value else {
                return Err(Error::malformed("a herd must be an object"));
            };
            let Some(Value::String(name)) = object.remove("name") else {
                return Err(Error::malformed("a herd needs a name"));
            };
            let Some(Value::Array(members)) = object.remove("members") else {
                return Err(Error::malformed("a herd needs members"));
            };
            let members = members
                .into_iter()
                .map(|member| driver.deserialize_dyn::<dyn Animal>(member))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Herd { name, members })
        }
    }

    impl GetTypeMeta for Herd {
        fn get_type_meta() -> TypeMeta {
            let mut meta = TypeMeta::with_capacity::<Self>(2);
            meta.insert_trait::<TypeTraitJsonCodec>(FromType::<Self>::from_type());
            meta.insert_subtype::<dyn Animal>(TypeTraitSubtype::of::<Self>(|herd| herd));
            meta
        }

        fn register_dependencies(registry: &mut TypeRegistry) {
            registry.register_base::<dyn Animal>();
        }
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register::<Dog>();
        registry.register::<Cat>();
        registry.register::<Herd>();
        register_converter::<dyn Animal>(&mut registry, InheritanceConverter::with_discriminator("kind"));
        registry
    }

    fn round_trip<V: Animal + TypePath + PartialEq + Debug>(registry: &TypeRegistry, value: V) {
        let json = SerializeDriver::new(registry).serialize(&value).unwrap();
        assert_eq!(json["kind"], V::type_ident());

        let animal = DeserializeDriver::new(registry)
            .deserialize_dyn::<dyn Animal>(json)
            .unwrap();
        assert_eq!(animal.into_reflect().take::<V>().unwrap(), value);
    }

    #[test]
    fn discriminator_is_written_first() {
        let registry = registry();
        let driver = SerializeDriver::new(&registry);

        let text = driver.to_string(&Dog { name: "Rex".into() }).unwrap();
        assert_eq!(text, r#"{"kind":"Dog","name":"Rex"}"#);

        let cat = Cat {
            name: "Tom".into(),
            lives: 9,
        };
        assert_eq!(driver.to_string(&cat).unwrap(), r#"{"kind":"Cat","name":"Tom","lives":9}"#);
    }

    #[test]
    fn trait_object_is_written_as_its_variant() {
        let registry = registry();
        let animal: Box<dyn Animal> = Box::new(Cat {
            name: "Tom".into(),
            lives: 3,
        });

        let value = SerializeDriver::new(&registry)
            .serialize(animal.as_reflect())
            .unwrap();
        assert_eq!(value, json!({"kind": "Cat", "name": "Tom", "lives": 3}));
    }

    #[test]
    fn read_resolves_variant_from_discriminator() {
        let registry = registry();
        let driver = DeserializeDriver::new(&registry);

        let animal = driver
            .from_str_dyn::<dyn Animal>(r#"{"kind":"Cat","name":"Tom"}"#)
            .unwrap();
        assert_eq!(animal.sound(), "meow");

        let cat = animal.into_reflect().take::<Cat>().unwrap();
        assert_eq!(cat, Cat { name: "Tom".into(), lives: 0 });

        // Position of the discriminator does not matter on read.
        let animal = driver
            .deserialize_dyn::<dyn Animal>(json!({"name": "Rex", "kind": "Dog"}))
            .unwrap();
        assert_eq!(animal.sound(), "woof");
    }

    #[test]
    fn variants_round_trip() {
        let registry = registry();
        round_trip(&registry, Dog { name: "Rex".into() });
        round_trip(
            &registry,
            Cat {
                name: "Tom".into(),
                lives: 9,
            },
        );

        let mut registry = self::registry();
        registry.register_known_type::<dyn Animal, wild::Cat>().unwrap();
        round_trip(
            &registry,
            wild::Cat {
                name: "Bagheera".into(),
                habitat: "jungle".into(),
            },
        );
    }

    #[test]
    fn every_variant_resolves_from_its_ident() {
        let registry = registry();
        let base = Type::of::<dyn Animal>();

        let mut idents: Vec<&str> = Vec::new();
        for variant in registry.iter_subtypes(base.id()) {
            let resolved = SubtypeResolver::resolve(&registry, &base, variant.type_ident()).unwrap();
            assert_eq!(resolved.type_id(), variant.type_id());
            idents.push(variant.type_ident());
        }
        idents.sort_unstable();
        assert_eq!(idents, ["Cat", "Dog", "Herd"]);
    }

    #[test]
    fn missing_and_unknown_discriminators() {
        let registry = registry();
        let driver = DeserializeDriver::new(&registry);

        match driver.from_str_dyn::<dyn Animal>(r#"{"name":"Rex"}"#).unwrap_err() {
            Error::MissingDiscriminator {
                discriminator,
                base,
            } => {
                assert_eq!(discriminator, "kind");
                assert_eq!(base, "pj_json::converter::tests::Animal");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = driver
            .from_str_dyn::<dyn Animal>(r#"{"kind":"Fish","name":"Nemo"}"#)
            .unwrap_err();
        assert!(matches!(
            &err,
            Error::UnknownDiscriminator { discriminator, .. } if discriminator == "Fish"
        ));
    }

    #[test]
    fn non_object_payloads_are_malformed() {
        let registry = registry();
        let driver = DeserializeDriver::new(&registry);

        for payload in [json!([1, 2]), json!("Dog"), json!(null), json!({"kind": 7})] {
            let err = driver.deserialize_dyn::<dyn Animal>(payload).unwrap_err();
            assert!(matches!(err, Error::MalformedPayload(_)), "{err}");
        }
    }

    #[test]
    fn structural_errors_name_variant_and_discriminator() {
        let registry = registry();
        let driver = DeserializeDriver::new(&registry);

        let err = driver
            .from_str_dyn::<dyn Animal>(r#"{"kind":"Cat","lives":2}"#)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to decode `pj_json::converter::tests::Cat`, \
             resolved from discriminator `Cat` of `pj_json::converter::tests::Animal`"
        );
    }

    #[test]
    fn known_type_wins_over_convention() {
        let mut registry = registry();
        registry.register_known_type::<dyn Animal, wild::Cat>().unwrap();
        let animal = DeserializeDriver::new(&registry)
            .from_str_dyn::<dyn Animal>(r#"{"kind":"Cat","name":"Shere Khan","habitat":"jungle"}"#)
            .unwrap();
        assert_eq!(animal.sound(), "roar");

        // Without the declaration the nested module is out of reach.
        let registry = self::registry();
        let animal = DeserializeDriver::new(&registry)
            .from_str_dyn::<dyn Animal>(r#"{"kind":"Cat","name":"Tom","habitat":"sofa"}"#)
            .unwrap();
        assert_eq!(animal.sound(), "meow");
    }

    #[test]
    fn nested_values_carry_their_own_discriminator() {
        let registry = registry();
        let herd = Herd {
            name: "strays".into(),
            members: vec![
                Box::new(Dog { name: "Rex".into() }),
                Box::new(Cat {
                    name: "Tom".into(),
                    lives: 9,
                }),
            ],
        };

        let value = SerializeDriver::new(&registry).serialize(&herd).unwrap();
        assert_eq!(
            value,
            json!({
                "kind": "Herd",
                "name": "strays",
                "members": [
                    {"kind": "Dog", "name": "Rex"},
                    {"kind": "Cat", "name": "Tom", "lives": 9},
                ],
            })
        );
        assert_eq!(value.as_object().unwrap().keys().next().unwrap(), "kind");

        let animal = DeserializeDriver::new(&registry)
            .deserialize_dyn::<dyn Animal>(value.clone())
            .unwrap();
        let again = SerializeDriver::new(&registry)
            .serialize(animal.as_reflect())
            .unwrap();
        assert_eq!(again, value);

        let herd = animal.into_reflect().take::<Herd>().unwrap();
        let members: Vec<_> = herd.members.iter().map(|m| m.reflect_type_ident()).collect();
        assert_eq!(members, ["Dog", "Cat"]);
    }

    #[test]
    fn failed_read_leaves_converter_usable() {
        let registry = registry();
        let driver = DeserializeDriver::new(&registry);

        // The inner member fails after the outer herd entered suppression.
        let err = driver
            .deserialize_dyn::<dyn Animal>(json!({
                "kind": "Herd",
                "name": "broken",
                "members": [{"kind": "Dog", "name": "Rex"}, {"kind": "Fish"}],
            }))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownDiscriminator { .. }));

        let animal = driver
            .from_str_dyn::<dyn Animal>(r#"{"kind":"Dog","name":"Rex"}"#)
            .unwrap();
        assert_eq!(animal.name(), "Rex");

        let text = SerializeDriver::new(&registry)
            .to_string(&Dog { name: "Rex".into() })
            .unwrap();
        assert_eq!(text, r#"{"kind":"Dog","name":"Rex"}"#);
    }

    #[test]
    fn variant_of_two_converted_bases() {
        let mut registry = registry();
        register_converter::<dyn Pet>(&mut registry, InheritanceConverter::with_discriminator("pet_type"));
        let driver = DeserializeDriver::new(&registry);

        // The converter of the first declared base writes.
        let text = SerializeDriver::new(&registry)
            .to_string(&Dog { name: "Rex".into() })
            .unwrap();
        assert_eq!(text, r#"{"kind":"Dog","name":"Rex"}"#);

        let animal = driver.from_str_dyn::<dyn Animal>(&text).unwrap();
        assert_eq!(animal.name(), "Rex");

        let pet = driver
            .from_str_dyn::<dyn Pet>(r#"{"pet_type":"Dog","name":"Rex"}"#)
            .unwrap();
        assert_eq!(pet.into_reflect().take::<Dog>().unwrap(), Dog { name: "Rex".into() });

        let err = driver.from_str_dyn::<dyn Pet>(&text).err().unwrap();
        assert!(matches!(
            err,
            Error::MissingDiscriminator { ref discriminator, .. } if discriminator == "pet_type"
        ));
    }

    #[test]
    fn parallel_reads_of_different_variants() {
        let registry = registry();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8_u8)
                .map(|i| {
                    let registry = &registry;
                    scope.spawn(move || {
                        let driver = DeserializeDriver::new(registry);
                        let expected = if i % 2 == 0 { "Dog" } else { "Cat" };
                        for _ in 0..200 {
                            let animal = driver
                                .deserialize_dyn::<dyn Animal>(json!({"kind": expected, "name": "x"}))
                                .unwrap();
                            assert_eq!(animal.reflect_type_ident(), expected);
                        }
                        // A failing decode on this thread leaks nothing to the next one.
                        let err = driver.deserialize_dyn::<dyn Animal>(json!({"kind": expected}));
                        assert!(err.is_err());
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }
        });
    }

    #[test]
    fn parallel_writes_through_shared_registry() {
        let registry = TypeRegistryArc::new(registry());

        std::thread::scope(|scope| {
            for i in 0..8_u8 {
                let registry = registry.clone();
                scope.spawn(move || {
                    let registry = registry.read();
                    let driver = SerializeDriver::new(&registry);
                    for _ in 0..200 {
                        let value = if i % 2 == 0 {
                            driver.serialize(&Dog { name: "Rex".into() }).unwrap()
                        } else {
                            driver.serialize(&Cat { name: "Tom".into(), lives: 1 }).unwrap()
                        };
                        let first = value.as_object().unwrap().keys().next().unwrap();
                        assert_eq!(first, "kind");
                    }
                });
            }
        });
        assert!(registry.read().contains(TypeId::of::<dyn Animal>()));
    }
}
