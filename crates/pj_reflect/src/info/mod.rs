//! Compile-time type identity.
//!
//! - [`TypePath`]: stable type names, without the `::` prefix.
//!     - [`type_path`](TypePath::type_path): full name, unique per type.
//!     - [`type_name`](TypePath::type_name): name without module path, may be duplicated.
//!     - [`type_ident`](TypePath::type_ident): name without module path and generics.
//!     - [`module_path`](TypePath::module_path): optional module path (e.g. `"zoo::animals"`).
//! - [`DynamicTypePath`]: dynamic dispatch for `TypePath`.
//! - [`Type`]: a `TypeId` plus the `TypePath` strings of one type.

// -----------------------------------------------------------------------------
// Modules

mod ty;
mod type_path;

// -----------------------------------------------------------------------------
// Exports

pub use ty::Type;
pub use type_path::{DynamicTypePath, TypePath};
