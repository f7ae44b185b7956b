//! Type-erased conversion between reflected values and `serde_json::Value`.
//!
//! ## Dispatch
//!
//! Both drivers follow the same priority order for a type `T`:
//!
//! 1. The first [`JsonConverter`] attached to `T` or to one of its declared
//!    bases that accepts the type (see [`TypeTraitConverter`]). If any of
//!    them is suppressed, the call comes from a converter asking for the
//!    structural form and converters are skipped.
//! 2. A hand-written [`JsonCodec`] registered as [`TypeTraitJsonCodec`].
//!    Used for types holding polymorphic fields, which need the driver
//!    for their nested values.
//! 3. The `serde` implementation of `T` ([`TypeTraitSerialize`] /
//!    [`TypeTraitDeserialize`]).
//!
//! Otherwise conversion fails with [`Error::NoCodec`](crate::Error::NoCodec).
//!
//! [`JsonConverter`]: crate::converter::JsonConverter
//! [`TypeTraitConverter`]: crate::converter::TypeTraitConverter
//! [`TypeTraitSerialize`]: pj_reflect::registry::TypeTraitSerialize
//! [`TypeTraitDeserialize`]: pj_reflect::registry::TypeTraitDeserialize

use pj_reflect::registry::{TypeMeta, TypeRegistry};

use crate::converter::{JsonConverter, TypeTraitConverter};

// -----------------------------------------------------------------------------
// Debug utils

#[cfg(all(debug_assertions, feature = "debug"))]
pub(crate) mod type_stack;

// -----------------------------------------------------------------------------
// Modules

mod codec;
mod de;
mod ser;

// -----------------------------------------------------------------------------
// Exports

pub use codec::{JsonCodec, TypeTraitJsonCodec};
pub use de::DeserializeDriver;
pub use ser::SerializeDriver;

// -----------------------------------------------------------------------------
// Converter lookup

/// The first converter on the type itself or on one of its bases, unless
/// one of them is suppressed.
///
/// `enabled` is evaluated for every converter accepting the type, it may
/// consume suppression flags. A suppressed converter means this call is the
/// structural delegation of a converter, so no converter is used at all.
fn find_converter<'r>(
    registry: &'r TypeRegistry,
    meta: &TypeMeta,
    enabled: impl Fn(&dyn JsonConverter) -> bool,
) -> Option<&'r dyn JsonConverter> {
    let candidates = core::iter::once(meta.type_id())
        .chain(meta.bases().iter().copied())
        .filter_map(|id| registry.get_type_trait::<TypeTraitConverter>(id))
        .map(TypeTraitConverter::converter)
        .filter(|converter| converter.can_convert(meta.ty()));

    let mut found = None;
    let mut suppressed = false;
    for converter in candidates {
        if !enabled(converter) {
            suppressed = true;
        } else if found.is_none() {
            found = Some(converter);
        }
    }

    if suppressed { None } else { found }
}
