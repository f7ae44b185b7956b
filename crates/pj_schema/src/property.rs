use alloc::string::String;

use crate::handle::ParentHandle;
use crate::schema::{JsonSchema, NullHandling};

// -----------------------------------------------------------------------------
// Binding

/// Where a property's required flag lives.
#[derive(Debug, Clone)]
pub enum Binding {
    /// Not part of an object schema yet, the flag is kept here.
    Unattached { buffered_required: bool },
    /// The flag is membership of the name in the parent's required set.
    Attached { parent: ParentHandle },
}

// -----------------------------------------------------------------------------
// JsonProperty

/// A named property of an object schema.
///
/// The required flag is stored in the parent's required-name set. Before
/// the property is attached the flag is buffered, and the first
/// [`attach`](Self::attach) applies a buffered `true` to the parent. Later
/// attaches move the property to another parent without replaying it.
///
/// ```
/// use pj_schema::{JsonProperty, JsonSchema, ParentHandle};
///
/// let mut name = JsonProperty::new("name", JsonSchema::new());
/// name.set_required(true);
/// assert!(name.is_required());
///
/// let first = ParentHandle::new();
/// name.attach(&first);
/// assert!(first.is_required("name"));
///
/// name.set_required(false);
/// assert!(!first.is_required("name"));
///
/// let second = ParentHandle::new();
/// name.attach(&second);
/// assert!(!second.is_required("name"));
/// ```
///
/// Cloning keeps the binding: the clone reads and writes the same parent.
#[derive(Debug, Clone)]
pub struct JsonProperty {
    name: String,
    schema: JsonSchema,
    binding: Binding,
}

impl JsonProperty {
    /// An unattached, not required property.
    pub fn new(name: impl Into<String>, schema: JsonSchema) -> Self {
        Self {
            name: name.into(),
            schema,
            binding: Binding::Unattached {
                buffered_required: false,
            },
        }
    }

    /// An unattached property holding a deep copy of `schema`.
    pub fn from_schema(name: impl Into<String>, schema: &JsonSchema) -> Self {
        Self::new(name, schema.clone())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn schema(&self) -> &JsonSchema {
        &self.schema
    }

    #[inline]
    pub fn schema_mut(&mut self) -> &mut JsonSchema {
        &mut self.schema
    }

    #[inline]
    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    pub fn parent(&self) -> Option<&ParentHandle> {
        match &self.binding {
            Binding::Attached { parent } => Some(parent),
            Binding::Unattached { .. } => None,
        }
    }

    /// Bind the property to `parent`.
    ///
    /// On the first attach a buffered `true` is added to the parent's required set.
    pub fn attach(&mut self, parent: &ParentHandle) {
        let previous = core::mem::replace(
            &mut self.binding,
            Binding::Attached {
                parent: parent.clone(),
            },
        );
        if let Binding::Unattached {
            buffered_required: true,
        } = previous
        {
            parent.set_required(&self.name, true);
        }
    }

    /// A clone bound to `parent` without touching its required set.
    pub(crate) fn rebound_clone(&self, parent: &ParentHandle) -> Self {
        Self {
            name: self.name.clone(),
            schema: self.schema.clone(),
            binding: Binding::Attached {
                parent: parent.clone(),
            },
        }
    }

    pub fn set_required(&mut self, required: bool) {
        match &mut self.binding {
            Binding::Attached { parent } => parent.set_required(&self.name, required),
            Binding::Unattached { buffered_required } => *buffered_required = required,
        }
    }

    pub fn is_required(&self) -> bool {
        match &self.binding {
            Binding::Attached { parent } => parent.is_required(&self.name),
            Binding::Unattached { buffered_required } => *buffered_required,
        }
    }

    /// Returns `true` if the parent's discriminator is this property.
    pub fn is_discriminator(&self) -> bool {
        self.parent()
            .is_some_and(|parent| parent.is_discriminator(&self.name))
    }

    #[inline]
    pub fn read_only(&self) -> bool {
        self.schema.read_only
    }

    #[inline]
    pub fn set_read_only(&mut self, read_only: bool) {
        self.schema.read_only = read_only;
    }

    /// The first `oneOf` member that is not nullable, or the property's own schema.
    pub fn actual_property_schema(&self) -> &JsonSchema {
        self.schema
            .one_of
            .iter()
            .find(|schema| !schema.is_nullable(NullHandling::JsonSchema))
            .unwrap_or(&self.schema)
    }

    /// With [`NullHandling::Swagger`] a property is nullable unless required.
    pub fn is_nullable(&self, null_handling: NullHandling) -> bool {
        match null_handling {
            NullHandling::Swagger => !self.is_required(),
            NullHandling::JsonSchema => self.schema.is_nullable(null_handling),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
