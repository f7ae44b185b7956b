use alloc::vec::Vec;

use crate::info::Type;

/// One explicit discriminator declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownType {
    /// The discriminator value, the type ident of the variant.
    pub name: &'static str,
    pub ty: Type,
}

/// The variants explicitly declared on a base type.
///
/// Stored in the base's [`TypeMeta`](crate::registry::TypeMeta) and filled by
/// [`TypeRegistry::register_known_type`](crate::registry::TypeRegistry::register_known_type).
/// Lookups by discriminator consult this list before any naming convention.
#[derive(Debug, Clone, Default)]
pub struct TypeTraitKnownTypes {
    entries: Vec<KnownType>,
}

impl TypeTraitKnownTypes {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a declaration.
    ///
    /// Returns the existing entry if `name` is already declared,
    /// the list is unchanged in that case.
    pub fn insert(&mut self, entry: KnownType) -> Result<(), KnownType> {
        match self.find(entry.name) {
            Some(existing) => Err(*existing),
            None => {
                self.entries.push(entry);
                Ok(())
            }
        }
    }

    /// Find the declaration with the given discriminator value.
    pub fn find(&self, name: &str) -> Option<&KnownType> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &KnownType> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
