//! `serde` support for [`JsonSchema`], using the JSON Schema keywords.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::handle::ParentHandle;
use crate::property::JsonProperty;
use crate::schema::{JsonSchema, SchemaKind};

#[inline]
fn is_false(value: &bool) -> bool {
    !*value
}

#[inline]
fn is_empty<T>(value: &&[T]) -> bool {
    value.is_empty()
}

// -----------------------------------------------------------------------------
// Serialize

#[derive(Serialize)]
struct SchemaOut<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<SchemaKind>,
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    reference: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    discriminator: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    required: Vec<String>,
    #[serde(skip_serializing_if = "PropertiesOut::is_empty")]
    properties: PropertiesOut<'a>,
    #[serde(rename = "oneOf", skip_serializing_if = "is_empty")]
    one_of: &'a [JsonSchema],
    #[serde(rename = "x-nullable", skip_serializing_if = "is_false")]
    nullable: bool,
    #[serde(rename = "readOnly", skip_serializing_if = "is_false")]
    read_only: bool,
}

struct PropertiesOut<'a>(&'a [JsonProperty]);

impl PropertiesOut<'_> {
    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for PropertiesOut<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for property in self.0 {
            map.serialize_entry(property.name(), property.schema())?;
        }
        map.end()
    }
}

impl Serialize for JsonSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SchemaOut {
            title: self.title.as_deref(),
            description: self.description.as_deref(),
            kind: self.kind,
            reference: self.reference.as_deref(),
            discriminator: self.discriminator(),
            required: self.required(),
            properties: PropertiesOut(self.properties()),
            one_of: &self.one_of,
            nullable: self.nullable,
            read_only: self.read_only,
        }
        .serialize(serializer)
    }
}

// -----------------------------------------------------------------------------
// Deserialize

#[derive(Deserialize)]
struct SchemaIn {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<SchemaKind>,
    #[serde(rename = "$ref", default)]
    reference: Option<String>,
    #[serde(default)]
    discriminator: Option<String>,
    #[serde(default)]
    required: Vec<String>,
    #[serde(default)]
    properties: PropertiesIn,
    #[serde(rename = "oneOf", default)]
    one_of: Vec<JsonSchema>,
    #[serde(rename = "x-nullable", default)]
    nullable: bool,
    #[serde(rename = "readOnly", default)]
    read_only: bool,
}

/// Properties in document order.
#[derive(Default)]
struct PropertiesIn(Vec<(String, JsonSchema)>);

impl<'de> Deserialize<'de> for PropertiesIn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PropertiesVisitor;

        impl<'de> Visitor<'de> for PropertiesVisitor {
            type Value = PropertiesIn;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of property schemas")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut properties = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, JsonSchema>()? {
                    properties.push(entry);
                }
                Ok(PropertiesIn(properties))
            }
        }

        deserializer.deserialize_map(PropertiesVisitor)
    }
}

impl<'de> Deserialize<'de> for JsonSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let input = SchemaIn::deserialize(deserializer)?;

        let mut schema = JsonSchema::new();
        schema.title = input.title;
        schema.description = input.description;
        schema.kind = input.kind;
        schema.reference = input.reference;
        schema.one_of = input.one_of;
        schema.nullable = input.nullable;
        schema.read_only = input.read_only;

        let handle: &ParentHandle = schema.handle();
        for name in &input.required {
            handle.set_required(name, true);
        }
        handle.set_discriminator(input.discriminator);

        for (name, property_schema) in input.properties.0 {
            schema.add_property(JsonProperty::new(name, property_schema));
        }
        Ok(schema)
    }
}

// -----------------------------------------------------------------------------
// Tests
