use thiserror::Error;

/// Errors raised while collecting schema definitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("a definition for `{0}` already exists")]
    DuplicateDefinition(&'static str),
}
