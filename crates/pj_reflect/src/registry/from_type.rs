/// Create a [`TypeTrait`] for the type `T`.
///
/// # Example
///
/// ```
/// # use pj_reflect::registry::{FromType, TypeMeta, TypeTraitSerialize};
/// let mut meta = TypeMeta::of::<String>();
///
/// meta.insert_trait::<TypeTraitSerialize>(FromType::<String>::from_type());
/// ```
///
/// [`TypeTrait`]: crate::registry::TypeTrait
pub trait FromType<T> {
    fn from_type() -> Self;
}
