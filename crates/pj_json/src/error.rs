use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// Errors raised while converting values to or from JSON.
///
/// Every error names what the converter saw: the discriminator field and
/// the base type being resolved, or the type whose structural codec failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The payload is not shaped as expected, e.g. not a JSON object,
    /// or a discriminator that is not a string.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("discriminator field `{discriminator}` is missing, cannot read `{base}`")]
    MissingDiscriminator {
        discriminator: String,
        base: &'static str,
    },

    #[error("discriminator value `{discriminator}` does not name a variant of `{base}`")]
    UnknownDiscriminator {
        discriminator: String,
        base: &'static str,
    },

    /// The structural decoder rejected the payload of a type.
    ///
    /// `discriminator` and `base` are set when the type was resolved from a
    /// discriminator value.
    #[error("failed to decode `{type_path}`{}", resolved_from(.discriminator, .base))]
    StructuralDecode {
        type_path: &'static str,
        discriminator: Option<String>,
        base: Option<&'static str>,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode `{type_path}`")]
    StructuralEncode {
        type_path: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The structural form of a value already has a field named like the discriminator.
    #[error("`{type_path}` already has a field named `{discriminator}`")]
    DiscriminatorConflict {
        discriminator: String,
        type_path: &'static str,
    },

    #[error("type `{0}` is not registered")]
    UnregisteredType(String),

    #[error("no converter, codec or serde support registered for `{0}`")]
    NoCodec(&'static str),

    #[error("`{ty}` is not a variant of `{base}`")]
    NotASubtype {
        ty: &'static str,
        base: &'static str,
    },

    /// Invalid JSON text.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a [`Error::MalformedPayload`].
    ///
    /// With the `debug` feature in debug builds, the message carries the
    /// stack of types being converted on this thread.
    pub fn malformed(msg: impl core::fmt::Display) -> Self {
        #[cfg(all(debug_assertions, feature = "debug"))]
        {
            let stack = crate::driver::type_stack::snapshot();
            if !stack.is_empty() {
                return Self::MalformedPayload(alloc::format!("{msg} (stack:\n{stack})"));
            }
        }
        Self::MalformedPayload(alloc::format!("{msg}"))
    }

    /// Attach the discriminator and base a decoded type was resolved from.
    ///
    /// Only a [`Error::StructuralDecode`] without resolution context is changed,
    /// so the innermost resolution is kept for nested values.
    pub(crate) fn with_resolution(self, discriminator: &str, base: &'static str) -> Self {
        match self {
            Self::StructuralDecode {
                type_path,
                discriminator: None,
                source,
                ..
            } => Self::StructuralDecode {
                type_path,
                discriminator: Some(discriminator.into()),
                base: Some(base),
                source,
            },
            other => other,
        }
    }
}

fn resolved_from(discriminator: &Option<String>, base: &Option<&'static str>) -> String {
    match (discriminator, base) {
        (Some(discriminator), Some(base)) => {
            alloc::format!(", resolved from discriminator `{discriminator}` of `{base}`")
        }
        _ => String::new(),
    }
}

// -----------------------------------------------------------------------------
// Tests
