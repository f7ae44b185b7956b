use core::any::Any;

/// A capability stored in a [`TypeMeta`](crate::registry::TypeMeta).
///
/// Auto implemented for every `Send + Sync + 'static` type, the trait table
/// is keyed by the `TypeId` of the trait value itself.
pub trait TypeTrait: Any + Send + Sync {}

impl<T: Any + Send + Sync> TypeTrait for T {}

impl dyn TypeTrait {
    /// Downcasts the type trait to type `T` by reference.
    #[inline]
    pub fn downcast_ref<T: TypeTrait>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    /// Downcasts the type trait to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: TypeTrait>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }
}
