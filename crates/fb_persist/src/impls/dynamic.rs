use alloc::boxed::Box;
use core::any::Any;

use crate::info::{NonGenericTypeInfoCell, TypeInfo, TypePath, Typed};
use crate::registry::{GetTypeMeta, TypeMeta};
use crate::{Persist, PersistMut, PersistRef};

// -----------------------------------------------------------------------------
// Box<dyn Persist>

// A polymorphic slot. Everything but `persist_mut` and `persist_set` looks
// through the box to the value inside, so the slot reports and serializes
// as its current runtime type.

impl TypePath for Box<dyn Persist> {
    #[inline]
    fn type_path() -> &'static str {
        "alloc::boxed::Box<dyn fb_persist::Persist>"
    }

    #[inline]
    fn type_name() -> &'static str {
        "Box<dyn Persist>"
    }
}

impl Typed for Box<dyn Persist> {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(TypeInfo::dynamic::<Self>)
    }
}

impl Persist for Box<dyn Persist> {
    #[inline]
    fn persist_type_info(&self) -> &'static TypeInfo {
        (**self).persist_type_info()
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        (**self).as_any_mut()
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        (*self).into_any()
    }

    #[inline]
    fn as_persist(&self) -> &dyn Persist {
        &**self
    }

    #[inline]
    fn as_persist_mut(&mut self) -> &mut dyn Persist {
        &mut **self
    }

    #[inline]
    fn persist_ref(&self) -> PersistRef<'_> {
        (**self).persist_ref()
    }

    #[inline]
    fn persist_mut(&mut self) -> PersistMut<'_> {
        PersistMut::Dynamic(self)
    }

    /// Accepts a value of any type.
    #[inline]
    fn persist_set(&mut self, value: Box<dyn Persist>) -> Result<(), Box<dyn Persist>> {
        *self = value;
        Ok(())
    }
}

impl GetTypeMeta for Box<dyn Persist> {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::of::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use crate::info::{Classification, Typed};
    use crate::{Persist, PersistMut, PersistRef};

    #[test]
    fn slots_report_their_contents() {
        let mut slot: Box<dyn Persist> = Box::new(3_i16);
        let as_field: &mut dyn Persist = &mut slot;

        assert_eq!(as_field.persist_type_info().type_path(), "i16");
        assert!(as_field.is::<i16>());
        assert!(matches!(as_field.persist_ref(), PersistRef::Primitive(_)));
        assert!(matches!(as_field.persist_mut(), PersistMut::Dynamic(_)));

        as_field.persist_set(Box::new(true)).unwrap();
        assert_eq!(slot.downcast_ref::<bool>(), Some(&true));
        assert_eq!(
            <Box<dyn Persist>>::type_info().classify(),
            Classification::Composite
        );
    }
}
