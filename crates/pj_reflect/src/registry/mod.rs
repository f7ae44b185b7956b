//! Type registry for non-object information querying.
//!
//! ## Menu
//!
//! - [`TypeTrait`]: A capability supported by a type, stored in its [`TypeMeta`].
//! - [`FromType`]: Create a `TypeTrait` from a concrete type.
//! - [`TypeMeta`]: A [`Type`], the bases it is a variant of, and a `TypeTrait` table.
//! - [`GetTypeMeta`]: Create the `TypeMeta` of a type.
//! - [`TypeRegistry`]: A container for storing and querying `TypeMeta`s.
//! - TypeTraits:
//!     - [`TypeTraitSerialize`]: `serde` serialization of a reflected value.
//!     - [`TypeTraitDeserialize`]: `serde` deserialization into a boxed reflected value.
//!     - [`TypeTraitSubtype`]: Turn a boxed variant into a boxed base trait object.
//!     - [`TypeTraitKnownTypes`]: Explicit discriminator declarations of a base type.
//!
//! ## Hierarchies
//!
//! A base is usually a trait object such as `dyn Animal`, registered with
//! [`TypeRegistry::register_base`]. Variants are linked to it through
//! [`TypeMeta::insert_subtype`] (done by `impl_reflect!(Dog: dyn Animal)`),
//! or later with [`TypeRegistry::register_subtype`].
//!
//! ## auto_register
//!
//! See [`TypeRegistry::auto_register`].
//!
//! [`Type`]: crate::info::Type

// -----------------------------------------------------------------------------
// Modules

mod error;
mod from_type;
mod traits;
mod type_meta;
mod type_registry;
mod type_trait;

// -----------------------------------------------------------------------------
// Exports

pub use error::RegistryError;
pub use from_type::FromType;
pub use traits::{KnownType, TypeTraitKnownTypes, TypeTraitSubtype};
pub use traits::{TypeTraitDeserialize, TypeTraitSerialize};
pub use type_meta::{GetTypeMeta, TypeMeta};
pub use type_registry::{TypeRegistry, TypeRegistryArc};
pub use type_trait::TypeTrait;
