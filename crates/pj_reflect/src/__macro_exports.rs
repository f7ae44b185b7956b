//! Items used by the exported macros. Not part of the public API.

pub use alloc::boxed::Box;

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::registry::{GetTypeMeta, TypeRegistry};

    /// A registration function submitted by `impl_auto_register!`.
    pub struct __AutoRegisterFunc(pub fn(&mut TypeRegistry));

    inventory::collect!(__AutoRegisterFunc);

    /// Registration hook implemented for every [`GetTypeMeta`] type.
    pub trait __RegisterType {
        fn __register(registry: &mut TypeRegistry);
    }

    impl<T: GetTypeMeta> __RegisterType for T {
        #[inline]
        fn __register(registry: &mut TypeRegistry) {
            registry.register::<T>();
        }
    }

    /// Marker type registered through `inventory` itself.
    ///
    /// If it is present after [`__register_types`], static
    /// registration works on this platform.
    pub struct __AvailFlag;

    crate::impl_type_path!((in "pj_reflect::__macro_exports::auto_register") __AvailFlag);

    impl GetTypeMeta for __AvailFlag {
        fn get_type_meta() -> crate::registry::TypeMeta {
            crate::registry::TypeMeta::with_capacity::<Self>(0)
        }
    }

    inventory::submit! {
        __AutoRegisterFunc(<__AvailFlag as __RegisterType>::__register)
    }

    /// Runs every submitted registration function.
    pub fn __register_types(registry: &mut TypeRegistry) {
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry);
        }
    }
}
