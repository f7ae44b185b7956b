#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Usually, we need to use `crate` in the crate itself and `pj_reflect` in doc tests.
// Exported macros always expand to `$crate`, but keeping the alias lets
// the in-crate primitive impls read the same as user code.
extern crate self as pj_reflect;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod impls;
mod macros;
mod reflection;

pub mod info;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use reflection::Reflect;
