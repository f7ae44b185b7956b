#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use pj_json as json;
pub use pj_reflect as reflect;
pub use pj_schema as schema;
pub use pj_utils as utils;
