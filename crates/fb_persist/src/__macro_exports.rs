//! Items referenced by code that `#[derive(Persist)]` generates.
//!
//! Not public API.

pub mod macro_utils {
    pub use ::alloc::boxed::Box;
    pub use ::alloc::string::String;
    pub use ::core::any::Any;
    pub use ::core::option::Option;
    pub use ::core::result::Result;
}

#[cfg(feature = "auto_register")]
pub mod auto_register {
    use core::any::TypeId;

    pub use inventory;

    use crate::info::{IgnoreReason, NonGenericTypeInfoCell, TypeInfo, TypeMarkers, TypePath, Typed};
    use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};

    /// A registration function submitted by `#[persist(auto_register)]`.
    pub struct __AutoRegisterFunc(pub fn(&mut TypeRegistry));

    inventory::collect!(__AutoRegisterFunc);

    pub trait __RegisterType {
        fn __register(registry: &mut TypeRegistry);
    }

    impl<T: GetTypeMeta> __RegisterType for T {
        #[inline]
        fn __register(registry: &mut TypeRegistry) {
            registry.register::<T>();
        }
    }

    /// Registered through `inventory` itself, so its presence in the
    /// registry shows that static registration works on this platform.
    pub struct __AvailFlag;

    impl TypePath for __AvailFlag {
        fn type_path() -> &'static str {
            "fb_persist::__macro_exports::auto_register::__AvailFlag"
        }

        fn type_name() -> &'static str {
            "__AvailFlag"
        }
    }

    impl Typed for __AvailFlag {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| {
                TypeInfo::opaque::<Self>()
                    .with_markers(TypeMarkers::ignored(IgnoreReason::Synthesized))
            })
        }
    }

    inventory::submit! {
        __AutoRegisterFunc(|registry| {
            registry.insert_type_meta(TypeMeta::of::<__AvailFlag>());
        })
    }

    pub(crate) fn register_all(registry: &mut TypeRegistry) -> bool {
        // Repeated calls only pay for the lookup.
        if registry.contains(TypeId::of::<__AvailFlag>()) {
            return true;
        }
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry);
        }
        let available = registry.contains(TypeId::of::<__AvailFlag>());
        log::debug!("auto registration finished, {} types known", registry.len());
        available
    }
}
