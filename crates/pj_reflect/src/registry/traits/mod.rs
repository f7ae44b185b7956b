mod deserialize;
mod known_types;
mod serialize;
mod subtype;

pub use deserialize::TypeTraitDeserialize;
pub use known_types::{KnownType, TypeTraitKnownTypes};
pub use serialize::TypeTraitSerialize;
pub use subtype::TypeTraitSubtype;
