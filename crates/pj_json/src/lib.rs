#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod converter;
pub mod driver;
pub mod guard;
pub mod resolver;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use converter::{InheritanceConverter, JsonConverter, register_converter};
pub use driver::{DeserializeDriver, JsonCodec, SerializeDriver};
pub use error::Error;
pub use resolver::SubtypeResolver;

pub use serde_json::Value;
