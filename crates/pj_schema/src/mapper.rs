use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use core::any::TypeId;

use log::{trace, warn};
use pj_reflect::info::{Type, TypePath};
use pj_utils::TypeIdMap;
use pj_utils::hash::HashSet;

use crate::error::SchemaError;
use crate::schema::JsonSchema;

// -----------------------------------------------------------------------------
// SchemaResolver

struct Definition {
    name: String,
    ty: Type,
    schema: JsonSchema,
}

/// The shared definitions collected while mapping types, keyed by type.
///
/// Each definition gets a unique name derived from the type name; schemas
/// point at it with `#/definitions/{name}`.
#[derive(Default)]
pub struct SchemaResolver {
    definitions: TypeIdMap<Definition>,
    names: HashSet<String>,
}

impl SchemaResolver {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn has_schema(&self, type_id: TypeId) -> bool {
        self.definitions.contains(&type_id)
    }

    /// Add the definition of `ty`.
    ///
    /// Returns the definition name, suffixed with a number if another type
    /// already uses the type name.
    pub fn add_schema(&mut self, ty: Type, schema: JsonSchema) -> Result<&str, SchemaError> {
        if self.has_schema(ty.id()) {
            return Err(SchemaError::DuplicateDefinition(ty.path()));
        }

        let mut name = String::from(ty.name());
        let mut suffix = 2;
        while self.names.contains(&name) {
            name = format!("{}{suffix}", ty.name());
            suffix += 1;
        }
        trace!("definition `{name}` added for `{}`", ty.path());

        self.names.insert(name.clone());
        self.definitions.insert(ty.id(), Definition { name, ty, schema });
        Ok(self.definition_name(ty.id()).unwrap_or_default())
    }

    pub fn get_schema(&self, type_id: TypeId) -> Option<&JsonSchema> {
        self.definitions.get(&type_id).map(|d| &d.schema)
    }

    pub fn definition_name(&self, type_id: TypeId) -> Option<&str> {
        self.definitions.get(&type_id).map(|d| d.name.as_str())
    }

    /// The `$ref` value pointing at the definition of the type.
    pub fn definition_ref(&self, type_id: TypeId) -> Option<String> {
        self.definition_name(type_id)
            .map(|name| format!("#/definitions/{name}"))
    }

    /// Follow `$ref`s to the referenced definition.
    ///
    /// Returns the last schema reached if a reference does not name a
    /// definition of this resolver, or if references form a cycle.
    pub fn actual_schema<'a>(&'a self, schema: &'a JsonSchema) -> &'a JsonSchema {
        let mut current = schema;
        for _ in 0..=self.definitions.len() {
            let Some(reference) = current.reference.as_deref() else {
                return current;
            };
            let Some(target) = self.find_by_ref(reference) else {
                return current;
            };
            current = target;
        }
        current
    }

    fn find_by_ref(&self, reference: &str) -> Option<&JsonSchema> {
        let name = reference.strip_prefix("#/definitions/")?;
        self.definitions
            .values()
            .find(|d| d.name == name)
            .map(|d| &d.schema)
    }

    /// All definitions as `(name, type, schema)`, in arbitrary order.
    pub fn definitions(&self) -> impl Iterator<Item = (&str, &Type, &JsonSchema)> {
        self.definitions
            .values()
            .map(|d| (d.name.as_str(), &d.ty, &d.schema))
    }
}

// -----------------------------------------------------------------------------
// TypeMapper

/// Provides the schema of one type, replacing any generated one.
pub trait TypeMapper: Send + Sync {
    fn mapped_type(&self) -> Type;

    /// Whether schemas of the type point at a shared definition.
    fn use_reference(&self) -> bool;

    /// Fill `schema` for the mapped type, registering definitions in `resolver`.
    fn generate_schema(&self, schema: &mut JsonSchema, resolver: &mut SchemaResolver);
}

// -----------------------------------------------------------------------------
// ObjectTypeMapper

/// Maps a type to a fixed object schema, stored once as a definition.
///
/// ```
/// use pj_schema::{JsonSchema, ObjectTypeMapper, SchemaResolver, TypeMapper};
///
/// pub struct Money;
/// pj_reflect::impl_type_path!(Money);
///
/// let mapper = ObjectTypeMapper::new::<Money>(JsonSchema::object());
/// let mut resolver = SchemaResolver::new();
///
/// let mut field = JsonSchema::new();
/// mapper.generate_schema(&mut field, &mut resolver);
/// assert_eq!(field.reference.as_deref(), Some("#/definitions/Money"));
/// ```
pub struct ObjectTypeMapper {
    mapped_type: Type,
    factory: Box<dyn Fn(&SchemaResolver) -> JsonSchema + Send + Sync>,
}

impl ObjectTypeMapper {
    pub fn new<T: TypePath + ?Sized>(schema: JsonSchema) -> Self {
        Self::with_factory::<T>(move |_| schema.clone())
    }

    /// The schema is built on first use, with access to the definitions so far.
    pub fn with_factory<T: TypePath + ?Sized>(
        factory: impl Fn(&SchemaResolver) -> JsonSchema + Send + Sync + 'static,
    ) -> Self {
        Self {
            mapped_type: Type::of::<T>(),
            factory: Box::new(factory),
        }
    }
}

impl TypeMapper for ObjectTypeMapper {
    #[inline]
    fn mapped_type(&self) -> Type {
        self.mapped_type
    }

    #[inline]
    fn use_reference(&self) -> bool {
        true
    }

    fn generate_schema(&self, schema: &mut JsonSchema, resolver: &mut SchemaResolver) {
        let id = self.mapped_type.id();
        if !resolver.has_schema(id) {
            let definition = (self.factory)(resolver);
            if let Err(err) = resolver.add_schema(self.mapped_type, definition) {
                warn!("definition of `{}` not added: {err}", self.mapped_type.path());
            }
        }
        schema.reference = resolver.definition_ref(id);
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::any::TypeId;
    use core::sync::atomic::{AtomicUsize, Ordering};

    use pj_reflect::info::Type;
    use pj_reflect::registry::TypeRegistry;
    use pj_reflect::{Reflect, impl_reflect, impl_type_path};
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::{ObjectTypeMapper, SchemaResolver, TypeMapper};
    use crate::{JsonProperty, JsonSchema, SchemaError, SchemaKind};

    pub struct Pet;
    pj_reflect::impl_type_path!(Pet);

    mod other {
        pub struct Pet;
        pj_reflect::impl_type_path!(Pet);
    }

    #[test]
    fn definition_is_added_once() {
        let mut pet = JsonSchema::object();
        pet.add_property(JsonProperty::new("name", JsonSchema::of_kind(SchemaKind::String)));
        let mapper = ObjectTypeMapper::new::<Pet>(pet);
        let mut resolver = SchemaResolver::new();

        let mut a = JsonSchema::new();
        let mut b = JsonSchema::new();
        mapper.generate_schema(&mut a, &mut resolver);
        mapper.generate_schema(&mut b, &mut resolver);

        assert_eq!(a.reference.as_deref(), Some("#/definitions/Pet"));
        assert_eq!(a, b);
        assert_eq!(resolver.definitions().count(), 1);
        assert!(resolver.actual_schema(&a).property("name").is_some());
        assert!(mapper.use_reference());
        assert!(mapper.mapped_type().is::<Pet>());
    }

    #[test]
    fn names_are_unique() {
        let mut resolver = SchemaResolver::new();
        resolver.add_schema(Type::of::<Pet>(), JsonSchema::object()).unwrap();
        let name = resolver
            .add_schema(Type::of::<other::Pet>(), JsonSchema::object())
            .unwrap();
        assert_eq!(name, "Pet2");

        let err = resolver
            .add_schema(Type::of::<Pet>(), JsonSchema::new())
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateDefinition(_)));
        assert_eq!(
            resolver.definition_ref(TypeId::of::<other::Pet>()).as_deref(),
            Some("#/definitions/Pet2")
        );
    }

    #[test]
    fn reference_cycles_stop() {
        let mut resolver = SchemaResolver::new();
        resolver
            .add_schema(Type::of::<Pet>(), JsonSchema::with_reference("#/definitions/Pet"))
            .unwrap();
        let start = JsonSchema::with_reference("#/definitions/Pet");
        let end = resolver.actual_schema(&start);
        assert_eq!(end.reference.as_deref(), Some("#/definitions/Pet"));
    }

    fn string_property(name: &str, required: bool) -> JsonProperty {
        let mut property = JsonProperty::new(name, JsonSchema::of_kind(SchemaKind::String));
        property.set_required(required);
        property
    }

    #[test]
    fn existing_definition_is_reused() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let mapper = ObjectTypeMapper::with_factory::<Pet>(|_| {
            CALLS.fetch_add(1, Ordering::Relaxed);
            JsonSchema::object()
        });

        let mut resolver = SchemaResolver::new();
        let mut declared = JsonSchema::object();
        declared.title = Some("declared".into());
        resolver.add_schema(Type::of::<Pet>(), declared).unwrap();

        let mut field = JsonSchema::new();
        mapper.generate_schema(&mut field, &mut resolver);
        assert_eq!(CALLS.load(Ordering::Relaxed), 0);
        assert_eq!(field.reference.as_deref(), Some("#/definitions/Pet"));
        assert_eq!(resolver.definitions().count(), 1);
        assert_eq!(
            resolver.actual_schema(&field).title.as_deref(),
            Some("declared")
        );
    }

    #[test]
    fn factory_definition_is_shared() {
        let mapper = ObjectTypeMapper::with_factory::<Pet>(|_| {
            let mut schema = JsonSchema::object();
            schema.add_property(string_property("name", true));
            schema
        });
        let mut resolver = SchemaResolver::new();

        let mut owner = JsonSchema::new();
        let mut walker = JsonSchema::new();
        mapper.generate_schema(&mut owner, &mut resolver);
        mapper.generate_schema(&mut walker, &mut resolver);

        assert_eq!(owner.reference, walker.reference);
        assert_eq!(resolver.definitions().count(), 1);
        assert_eq!(resolver.actual_schema(&owner).required(), ["name"]);
    }

    // -------------------------------------------------------------------------
    // Hierarchy

    pub trait Animal: Reflect {}
    impl_type_path!(dyn Animal);

    #[derive(Serialize, Deserialize)]
    pub struct Dog {
        pub name: String,
    }
    impl_reflect!(Dog: dyn Animal);
    impl Animal for Dog {}

    #[derive(Serialize, Deserialize)]
    pub struct Parrot {
        pub name: String,
        pub words: Vec<String>,
    }
    impl_reflect!(Parrot: dyn Animal);
    impl Animal for Parrot {}

    fn animal_schema(discriminator: &str) -> JsonSchema {
        let mut schema = JsonSchema::object();
        schema.set_discriminator(Some(discriminator.into()));
        schema.add_property(string_property(discriminator, true));
        schema.add_property(string_property("name", true));
        schema
    }

    #[test]
    fn hierarchy_lists_variants_by_reference() {
        let mut registry = TypeRegistry::new();
        registry.register::<Dog>();
        registry.register::<Parrot>();

        let mut resolver = SchemaResolver::new();
        let mut variants: Vec<_> = registry
            .iter_subtypes(TypeId::of::<dyn Animal>())
            .map(|meta| *meta.ty())
            .collect();
        variants.sort_by_key(|ty| ty.ident());

        let mut base = animal_schema("kind");
        for ty in variants {
            let mut variant = animal_schema("kind");
            variant.title = Some(ty.ident().into());
            resolver.add_schema(ty, variant).unwrap();
            base.one_of
                .push(JsonSchema::with_reference(resolver.definition_ref(ty.id()).unwrap()));
        }

        let value = serde_json::to_value(&base).unwrap();
        assert_eq!(value["discriminator"], "kind");
        assert_eq!(value["required"], json!(["kind", "name"]));
        assert_eq!(
            value["oneOf"],
            json!([{"$ref": "#/definitions/Dog"}, {"$ref": "#/definitions/Parrot"}])
        );

        let parrot = resolver.actual_schema(&base.one_of[1]);
        assert_eq!(parrot.title.as_deref(), Some("Parrot"));
        assert!(parrot.property("kind").unwrap().is_discriminator());
    }
}
