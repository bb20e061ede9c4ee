use alloc::vec::Vec;

use crate::info::{GenericTypeInfoCell, GenericTypePathCell, TypeInfo, TypePath, Typed, concat};
use crate::persist::impl_persist_cast_fn;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};
use crate::{Nullable, Persist, Sequence};

// -----------------------------------------------------------------------------
// Option

impl<T: TypePath> TypePath for Option<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["core::option::Option<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Option<", T::type_name(), ">"]))
    }
}

impl<T: Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(TypeInfo::nullable::<Self, T>)
    }
}

impl<T: Typed + Persist + Default> Persist for Option<T> {
    impl_persist_cast_fn!(Nullable);
}

impl<T: Typed + Persist + Default> Nullable for Option<T> {
    #[inline]
    fn get(&self) -> Option<&dyn Persist> {
        self.as_ref().map(|value| value as &dyn Persist)
    }

    #[inline]
    fn get_mut(&mut self) -> Option<&mut dyn Persist> {
        self.as_mut().map(|value| value as &mut dyn Persist)
    }

    #[inline]
    fn set_none(&mut self) {
        *self = None;
    }

    #[inline]
    fn get_or_insert_default(&mut self) -> &mut dyn Persist {
        self.get_or_insert_with(T::default)
    }
}

impl<T: GetTypeMeta + Persist + Default> GetTypeMeta for Option<T> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

// -----------------------------------------------------------------------------
// Vec

impl<T: TypePath> TypePath for Vec<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["alloc::vec::Vec<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Vec<", T::type_name(), ">"]))
    }
}

impl<T: Typed> Typed for Vec<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(TypeInfo::sequence::<Self, T>)
    }
}

impl<T: Typed + Persist + Default> Persist for Vec<T> {
    impl_persist_cast_fn!(Sequence);
}

impl<T: Typed + Persist + Default> Sequence for Vec<T> {
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Persist> {
        <[T]>::get(self, index).map(|value| value as &dyn Persist)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Persist> {
        <[T]>::get_mut(self, index).map(|value| value as &mut dyn Persist)
    }

    #[inline]
    fn clear(&mut self) {
        Vec::clear(self);
    }

    #[inline]
    fn reserve(&mut self, additional: usize) {
        Vec::reserve(self, additional);
    }

    fn push_default(&mut self) -> &mut dyn Persist {
        let index = Vec::len(self);
        self.push(T::default());
        &mut self[index]
    }
}

impl<T: GetTypeMeta + Persist + Default> GetTypeMeta for Vec<T> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

#[cfg(test)]
mod tests {
    use crate::info::{TypePath, Typed};
    use crate::{Nullable, Sequence};

    #[test]
    fn generic_paths_nest() {
        assert_eq!(
            <Vec<Option<u8>>>::type_path(),
            "alloc::vec::Vec<core::option::Option<u8>>"
        );
        assert_eq!(<Vec<Option<u8>>>::type_name(), "Vec<Option<u8>>");
        assert!(core::ptr::eq(
            <Vec<u8>>::type_info(),
            <Vec<u8>>::type_info()
        ));
        assert!(!core::ptr::eq(
            <Vec<u8>>::type_info(),
            <Vec<u16>>::type_info()
        ));
    }

    #[test]
    fn nullable_inserts_defaults() {
        let mut slot: Option<i32> = None;
        assert!(Nullable::is_none(&slot));
        Nullable::get_or_insert_default(&mut slot);
        assert_eq!(slot, Some(0));
        Nullable::set_none(&mut slot);
        assert_eq!(slot, None);
    }

    #[test]
    fn sequence_grows_with_defaults() {
        let mut items = vec![1_u8];
        Sequence::push_default(&mut items);
        assert_eq!(Sequence::len(&items), 2);
        assert_eq!(items, [1, 0]);
        Sequence::clear(&mut items);
        assert!(Sequence::is_empty(&items));
    }
}
