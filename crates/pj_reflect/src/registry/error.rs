use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// Rejected hierarchy declarations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("type `{0}` has not been registered")]
    UnregisteredType(&'static str),

    #[error("type `{ty}` is not declared as a variant of `{base}`")]
    NotASubtype {
        ty: &'static str,
        base: &'static str,
    },

    #[error("known type name `{name}` of `{base}` already maps to `{existing}`")]
    DuplicateKnownType {
        base: &'static str,
        name: &'static str,
        existing: &'static str,
    },
}
