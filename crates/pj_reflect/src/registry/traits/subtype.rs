use alloc::boxed::Box;

use crate::Reflect;

/// Links a variant to one of its bases.
///
/// Stored in the variant's [`TypeMeta`] under `TypeTraitSubtype<B>`, where `B`
/// is usually a trait object like `dyn Animal`. A value decoded as
/// `Box<dyn Reflect>` can then be turned into `Box<B>` without knowing the
/// concrete type.
///
/// # Examples
///
/// ```
/// # use pj_reflect::{impl_type_path, Reflect};
/// # use pj_reflect::registry::TypeTraitSubtype;
/// trait Animal: Reflect { fn sound(&self) -> &'static str; }
/// impl_type_path!(dyn Animal);
///
/// struct Dog;
/// impl_type_path!(Dog);
/// impl Animal for Dog { fn sound(&self) -> &'static str { "woof" } }
///
/// let subtype = TypeTraitSubtype::<dyn Animal>::of::<Dog>(|v| v);
///
/// let value: Box<dyn Reflect> = Box::new(Dog);
/// let animal = subtype.cast(value).ok().unwrap();
/// assert_eq!(animal.sound(), "woof");
/// ```
///
/// [`TypeMeta`]: crate::registry::TypeMeta
pub struct TypeTraitSubtype<B: ?Sized + 'static> {
    cast: Box<dyn Fn(Box<dyn Reflect>) -> Result<Box<B>, Box<dyn Reflect>> + Send + Sync>,
}

impl<B: ?Sized + 'static> TypeTraitSubtype<B> {
    /// Create the link for variant `T` from its upcast function.
    pub fn of<T: Reflect>(upcast: fn(Box<T>) -> Box<B>) -> Self {
        Self {
            cast: Box::new(move |value| value.downcast::<T>().map(upcast)),
        }
    }

    /// Turn a boxed variant into its base.
    ///
    /// Returns the value unchanged if it is not the variant this link was created for.
    #[inline]
    pub fn cast(&self, value: Box<dyn Reflect>) -> Result<Box<B>, Box<dyn Reflect>> {
        (self.cast)(value)
    }
}

// -----------------------------------------------------------------------------
// Tests
