use alloc::boxed::Box;
use core::any::{Any, TypeId};

use crate::info::{DynamicTypePath, TypePath};

// -----------------------------------------------------------------------------
// Reflect

/// An object-safe view of a value whose type is known to the registry.
///
/// Auto implemented for every `Send + Sync` type with a [`TypePath`].
/// Base traits of a polymorphic hierarchy use it as a supertrait, so a
/// `&dyn Base` can be passed wherever a `&dyn Reflect` is expected and
/// the concrete variant is still reachable.
///
/// # Type Identification
///
/// [`Any::type_id`] on a `Box<dyn Reflect>` returns the box's type id,
/// use [`Reflect::ty_id`] instead:
///
/// ```
/// # use pj_reflect::Reflect;
/// # use core::any::{Any, TypeId};
/// let x: Box<dyn Reflect> = Box::new(32_i32);
///
/// assert!(x.type_id() != TypeId::of::<i32>());
/// assert!(x.ty_id() == TypeId::of::<i32>());
/// ```
///
/// # Downcasting
///
/// ```
/// # use pj_reflect::Reflect;
/// let x: Box<dyn Reflect> = Box::new(String::from("rex"));
/// assert!(x.is::<String>());
/// assert_eq!(x.downcast_ref::<String>().unwrap(), "rex");
/// assert_eq!(x.take::<String>().unwrap(), "rex");
/// ```
pub trait Reflect: DynamicTypePath + Any + Send + Sync {
    /// Returns the [`TypeId`] of the underlying type.
    fn ty_id(&self) -> TypeId;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn as_reflect(&self) -> &dyn Reflect;

    fn into_reflect(self: Box<Self>) -> Box<dyn Reflect>;
}

impl<T: TypePath + Send + Sync> Reflect for T {
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    #[inline]
    fn as_reflect(&self) -> &dyn Reflect {
        self
    }

    #[inline]
    fn into_reflect(self: Box<Self>) -> Box<dyn Reflect> {
        self
    }
}

impl dyn Reflect {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline]
    pub fn is<T: Reflect>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    #[inline]
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Downcasts the boxed value to `Box<T>`.
    ///
    /// Returns the original box if the underlying type is not `T`.
    pub fn downcast<T: Reflect>(self: Box<Self>) -> Result<Box<T>, Box<dyn Reflect>> {
        if !self.is::<T>() {
            return Err(self);
        }
        match self.into_any().downcast::<T>() {
            Ok(value) => Ok(value),
            Err(_) => unreachable!("type id checked before downcast"),
        }
    }

    /// Downcasts the boxed value and unboxes it.
    #[inline]
    pub fn take<T: Reflect>(self: Box<Self>) -> Result<T, Box<dyn Reflect>> {
        self.downcast::<T>().map(|value| *value)
    }
}

impl core::fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Reflect({})", self.reflect_type_path())
    }
}

// -----------------------------------------------------------------------------
// Tests
