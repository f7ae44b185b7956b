use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::handle::ParentHandle;
use crate::property::JsonProperty;

// -----------------------------------------------------------------------------
// SchemaKind

/// The `type` keyword of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Object,
    Array,
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

// -----------------------------------------------------------------------------
// NullHandling

/// How nullability is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullHandling {
    /// `null` in the type or in a `oneOf` member.
    JsonSchema,
    /// The `x-nullable` flag. Properties are nullable unless required.
    Swagger,
}

// -----------------------------------------------------------------------------
// JsonSchema

/// A schema node.
///
/// Object schemas own their properties and a required-name set. Properties
/// read and write their required flag through the parent, see [`JsonProperty`].
///
/// Cloning is deep: the clone has its own required set and its properties
/// are bound to the clone.
///
/// # Examples
///
/// ```
/// use pj_schema::{JsonProperty, JsonSchema, SchemaKind};
///
/// let mut pet = JsonSchema::object();
/// pet.set_discriminator(Some("kind".into()));
///
/// let mut kind = JsonProperty::new("kind", JsonSchema::of_kind(SchemaKind::String));
/// kind.set_required(true);
/// pet.add_property(kind);
///
/// assert_eq!(pet.required(), ["kind"]);
/// assert!(pet.property("kind").unwrap().is_discriminator());
/// ```
pub struct JsonSchema {
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<SchemaKind>,
    pub nullable: bool,
    pub read_only: bool,
    pub one_of: Vec<JsonSchema>,
    /// The `$ref` keyword, e.g. `#/definitions/Pet`.
    pub reference: Option<String>,
    properties: Vec<JsonProperty>,
    handle: ParentHandle,
}

impl JsonSchema {
    /// An empty schema, accepting anything.
    pub fn new() -> Self {
        Self {
            title: None,
            description: None,
            kind: None,
            nullable: false,
            read_only: false,
            one_of: Vec::new(),
            reference: None,
            properties: Vec::new(),
            handle: ParentHandle::new(),
        }
    }

    pub fn of_kind(kind: SchemaKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::new()
        }
    }

    #[inline]
    pub fn object() -> Self {
        Self::of_kind(SchemaKind::Object)
    }

    /// A schema referring to a definition.
    pub fn with_reference(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            ..Self::new()
        }
    }

    /// The handle properties of this schema bind to.
    #[inline]
    pub fn handle(&self) -> &ParentHandle {
        &self.handle
    }

    pub fn discriminator(&self) -> Option<String> {
        self.handle.discriminator()
    }

    pub fn set_discriminator(&mut self, discriminator: Option<String>) {
        self.handle.set_discriminator(discriminator);
    }

    /// The required property names, in insertion order.
    pub fn required(&self) -> Vec<String> {
        self.handle.required()
    }

    // -------------------------------------------------------------------------
    // Properties

    /// Attach `property` and append it, replacing a property with the same name in place.
    pub fn add_property(&mut self, property: JsonProperty) -> &mut JsonProperty {
        match self.position(property.name()) {
            Some(index) => self.insert_at(index, property, true),
            None => {
                let index = self.properties.len();
                self.insert_at(index, property, false)
            }
        }
    }

    /// Attach `property` and insert it at `index`, removing a property with the same name.
    ///
    /// # Panics
    ///
    /// Panics if `index > len` once the old property is removed.
    pub fn insert_property(&mut self, index: usize, property: JsonProperty) -> &mut JsonProperty {
        if let Some(old) = self.position(property.name()) {
            self.properties.remove(old);
        }
        self.insert_at(index, property, false)
    }

    fn insert_at(&mut self, index: usize, mut property: JsonProperty, replace: bool) -> &mut JsonProperty {
        property.attach(&self.handle);
        if replace {
            self.properties[index] = property;
        } else {
            self.properties.insert(index, property);
        }
        &mut self.properties[index]
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name() == name)
    }

    /// The properties, in declaration order.
    #[inline]
    pub fn properties(&self) -> &[JsonProperty] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&JsonProperty> {
        self.properties.iter().find(|p| p.name() == name)
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut JsonProperty> {
        self.properties.iter_mut().find(|p| p.name() == name)
    }

    // -------------------------------------------------------------------------
    // Nullability

    pub fn is_nullable(&self, null_handling: NullHandling) -> bool {
        match null_handling {
            NullHandling::Swagger => self.nullable,
            NullHandling::JsonSchema => {
                self.kind == Some(SchemaKind::Null)
                    || self.one_of.iter().any(|s| s.is_nullable(NullHandling::JsonSchema))
            }
        }
    }
}

impl Default for JsonSchema {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for JsonSchema {
    fn clone(&self) -> Self {
        let handle = self.handle.deep_copy();
        let properties = self
            .properties
            .iter()
            .map(|property| property.rebound_clone(&handle))
            .collect();

        Self {
            title: self.title.clone(),
            description: self.description.clone(),
            kind: self.kind,
            nullable: self.nullable,
            read_only: self.read_only,
            one_of: self.one_of.clone(),
            reference: self.reference.clone(),
            properties,
            handle,
        }
    }
}

impl PartialEq for JsonSchema {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.description == other.description
            && self.kind == other.kind
            && self.nullable == other.nullable
            && self.read_only == other.read_only
            && self.one_of == other.one_of
            && self.reference == other.reference
            && self.required() == other.required()
            && self.discriminator() == other.discriminator()
            && self.properties.len() == other.properties.len()
            && self
                .properties
                .iter()
                .zip(&other.properties)
                .all(|(a, b)| a.name() == b.name() && a.schema() == b.schema())
    }
}

impl core::fmt::Debug for JsonSchema {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("JsonSchema")
            .field("title", &self.title)
            .field("kind", &self.kind)
            .field("reference", &self.reference)
            .field("one_of", &self.one_of)
            .field("properties", &self.properties)
            .field("parent", &self.handle)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
