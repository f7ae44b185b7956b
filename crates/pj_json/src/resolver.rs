use alloc::format;
use alloc::string::ToString;

use log::{debug, trace, warn};
use pj_reflect::info::Type;
use pj_reflect::registry::{TypeMeta, TypeRegistry, TypeTraitKnownTypes};

use crate::Error;

// -----------------------------------------------------------------------------
// SubtypeResolver

/// Maps a discriminator string to a concrete variant of a base type.
///
/// Resolution order:
///
/// 1. The base's explicit declarations ([`TypeTraitKnownTypes`]), matched by name.
/// 2. The naming convention: the type registered at `{base module}::{discriminator}`,
///    accepted only if it lives in the base's crate and is a declared variant
///    of the base (or the base itself).
/// 3. Otherwise [`Error::UnknownDiscriminator`]. There is no default variant.
///
/// Resolution only reads the registry, the same inputs always give the same result.
pub struct SubtypeResolver;

impl SubtypeResolver {
    /// Resolve `discriminator` against the base type `base`.
    ///
    /// Fails with [`Error::UnregisteredType`] if `base` is not registered.
    pub fn resolve<'r>(
        registry: &'r TypeRegistry,
        base: &Type,
        discriminator: &str,
    ) -> Result<&'r TypeMeta, Error> {
        let Some(base_meta) = registry.get(base.id()) else {
            return Err(Error::UnregisteredType(base.path().to_string()));
        };

        if let Some(meta) = Self::known_type(registry, base_meta, discriminator) {
            trace!(
                "discriminator `{discriminator}` of `{}` resolved to known type `{}`",
                base_meta.type_path(),
                meta.type_path(),
            );
            return Ok(meta);
        }

        if let Some(meta) = Self::by_convention(registry, base_meta, discriminator) {
            debug!(
                "discriminator `{discriminator}` of `{}` resolved by naming convention to `{}`",
                base_meta.type_path(),
                meta.type_path(),
            );
            return Ok(meta);
        }

        Err(Error::UnknownDiscriminator {
            discriminator: discriminator.to_string(),
            base: base_meta.type_path(),
        })
    }

    fn known_type<'r>(
        registry: &'r TypeRegistry,
        base_meta: &TypeMeta,
        discriminator: &str,
    ) -> Option<&'r TypeMeta> {
        let known = base_meta.get_trait::<TypeTraitKnownTypes>()?;
        let entry = known.find(discriminator)?;
        registry.get(entry.ty.id())
    }

    fn by_convention<'r>(
        registry: &'r TypeRegistry,
        base_meta: &TypeMeta,
        discriminator: &str,
    ) -> Option<&'r TypeMeta> {
        let module = base_meta.module_path()?;
        let candidate = registry.get_with_type_path(&format!("{module}::{discriminator}"))?;

        if candidate.crate_name() != base_meta.crate_name() {
            warn!(
                "`{}` matches discriminator `{discriminator}` but is outside the crate of `{}`",
                candidate.type_path(),
                base_meta.type_path(),
            );
            return None;
        }

        let base = base_meta.type_id();
        if candidate.type_id() != base && !candidate.is_subtype_of(base) {
            warn!(
                "`{}` matches discriminator `{discriminator}` but is not a variant of `{}`",
                candidate.type_path(),
                base_meta.type_path(),
            );
            return None;
        }

        Some(candidate)
    }
}

// -----------------------------------------------------------------------------
// Tests
