#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod handle;
mod mapper;
mod property;
mod schema;
mod serialization;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::SchemaError;
pub use handle::ParentHandle;
pub use mapper::{ObjectTypeMapper, SchemaResolver, TypeMapper};
pub use property::{Binding, JsonProperty};
pub use schema::{JsonSchema, NullHandling, SchemaKind};
