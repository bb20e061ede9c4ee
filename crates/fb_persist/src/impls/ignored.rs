use alloc::sync::Arc;
use core::marker::PhantomData;

use crate::info::{
    GenericTypeInfoCell, GenericTypePathCell, IgnoreReason, NonGenericTypeInfoCell, TypeInfo,
    TypeMarkers, TypePath, Typed, concat,
};
use crate::Persist;
use crate::persist::impl_persist_cast_fn;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeTraitClone, TypeTraitDefault};

// -----------------------------------------------------------------------------
// Callback

/// A shared event handler.
///
/// Handlers are never saved. The type is registered with
/// [`TypeTraitClone`], so a hot swap carries the handler over to the new
/// instance.
pub type Callback = Arc<dyn Fn() + Send + Sync>;

impl TypePath for Callback {
    #[inline]
    fn type_path() -> &'static str {
        "fb_persist::impls::Callback"
    }

    #[inline]
    fn type_name() -> &'static str {
        "Callback"
    }
}

impl Typed for Callback {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| {
            TypeInfo::opaque::<Self>().with_markers(TypeMarkers::ignored(IgnoreReason::Callback))
        })
    }
}

impl Persist for Callback {
    impl_persist_cast_fn!(Opaque);
}

impl GetTypeMeta for Callback {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait::<TypeTraitClone>(FromType::<Self>::from_type());
        meta
    }
}

/// A callback that does nothing.
pub fn noop_callback() -> Callback {
    Arc::new(|| {})
}

// -----------------------------------------------------------------------------
// PhantomData

impl<T: ?Sized + TypePath> TypePath for PhantomData<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["core::marker::PhantomData<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["PhantomData<", T::type_name(), ">"]))
    }
}

impl<T: ?Sized + TypePath> Typed for PhantomData<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::opaque::<Self>().with_markers(TypeMarkers::ignored(IgnoreReason::Synthesized))
        })
    }
}

impl<T: ?Sized + TypePath + Send + Sync> Persist for PhantomData<T> {
    impl_persist_cast_fn!(Opaque);
}

impl<T: ?Sized + TypePath + Send + Sync> GetTypeMeta for PhantomData<T> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
        meta.insert_trait::<TypeTraitClone>(FromType::<Self>::from_type());
        meta
    }
}


#[cfg(test)]
mod tests {
    use super::{Callback, noop_callback};
    use crate::info::{Classification, IgnoreReason, Typed};
    use crate::registry::{TypeRegistry, TypeTraitClone};
    use core::marker::PhantomData;

    #[test]
    fn engine_state_is_ignored() {
        assert_eq!(Callback::type_info().classify(), Classification::Ignored);
        assert_eq!(
            <PhantomData<u8>>::type_info().ignore_reason(),
            Some(IgnoreReason::Synthesized)
        );
    }

    #[test]
    fn callbacks_clone_by_handle() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Callback>();

        let original = noop_callback();
        let copy = registry
            .get_type_trait::<TypeTraitClone>(core::any::TypeId::of::<Callback>())
            .unwrap()
            .clone_value(&original)
            .unwrap()
            .take::<Callback>()
            .unwrap();
        assert!(alloc::sync::Arc::ptr_eq(&original, &copy));
    }
}
