//! Static storage for type information.
//!
//! - [`NonGenericTypeInfoCell`]: one [`TypeInfo`] per `static`, backed by a
//!   [`OnceLock`].
//! - [`GenericTypeInfoCell`] and [`GenericTypePathCell`]: a `static` inside a
//!   generic function is shared by every instantiation, so these cells keep
//!   one leaked value per [`TypeId`].

use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use fb_utils::TypeIdMap;

use crate::info::TypeInfo;

mod sealed {
    use super::TypeInfo;
    use alloc::string::String;

    pub trait CellValue: Send + Sync + 'static {}

    impl CellValue for String {}
    impl CellValue for TypeInfo {}
}

use sealed::CellValue;

// -----------------------------------------------------------------------------
// NonGenericTypeCell

/// Lazily initialized storage for a non-generic type's information.
pub struct NonGenericTypeCell<T: CellValue>(OnceLock<T>);

/// See [`NonGenericTypeCell`].
///
/// # Example
///
/// ```
/// use fb_persist::info::{CompositeInfo, FieldInfo, NonGenericTypeInfoCell, TypeInfo, TypePath};
///
/// struct Crate {
///     weight: f32,
/// }
///
/// impl TypePath for Crate {
///     fn type_path() -> &'static str { "props::Crate" }
///     fn type_name() -> &'static str { "Crate" }
/// }
///
/// fn crate_info() -> &'static TypeInfo {
///     static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///     CELL.get_or_init(|| TypeInfo::composite::<Crate>(
///         CompositeInfo::new::<Crate>(false, &[FieldInfo::new::<f32>("weight")])
///     ))
/// }
///
/// assert_eq!(crate_info().as_composite().unwrap().len(), 1);
/// assert!(core::ptr::eq(crate_info(), crate_info()));
/// ```
pub type NonGenericTypeInfoCell = NonGenericTypeCell<TypeInfo>;

impl<T: CellValue> NonGenericTypeCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored value, producing it with `f` on first access.
    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> T) -> &T {
        self.0.get_or_init(f)
    }
}

impl<T: CellValue> Default for NonGenericTypeCell<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// GenericTypeCell

/// Storage for information of generic types, one entry per instantiation.
pub struct GenericTypeCell<T: CellValue>(RwLock<TypeIdMap<&'static T>>);

/// See [`GenericTypeCell`].
pub type GenericTypeInfoCell = GenericTypeCell<TypeInfo>;

/// See [`GenericTypeCell`].
///
/// # Example
///
/// ```
/// use fb_persist::info::{GenericTypePathCell, TypePath, concat};
///
/// struct Slot<T>(T);
///
/// impl<T: TypePath> TypePath for Slot<T> {
///     fn type_path() -> &'static str {
///         static CELL: GenericTypePathCell = GenericTypePathCell::new();
///         CELL.get_or_insert::<Self>(|| concat(&["inv::Slot<", T::type_path(), ">"]))
///     }
///     fn type_name() -> &'static str {
///         static CELL: GenericTypePathCell = GenericTypePathCell::new();
///         CELL.get_or_insert::<Self>(|| concat(&["Slot<", T::type_name(), ">"]))
///     }
/// }
///
/// assert_eq!(<Slot<u8>>::type_path(), "inv::Slot<u8>");
/// assert_eq!(<Slot<bool>>::type_name(), "Slot<bool>");
/// ```
pub type GenericTypePathCell = GenericTypeCell<String>;

impl<T: CellValue> GenericTypeCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the value stored for `G`, producing it with `f` on first access.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> T) -> &T {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> T) -> &T {
        let cached = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied();

        match cached {
            Some(value) => value,
            None => *self
                .0
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .get_or_insert(type_id, || Box::leak(Box::new(f()))),
        }
    }
}

impl<T: CellValue> Default for GenericTypeCell<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Concatenates string slices into an owned [`String`].
///
/// Used to build paths of generic types.
pub fn concat(parts: &[&str]) -> String {
    let len = parts.iter().map(|part| part.len()).sum();
    let mut out = String::with_capacity(len);
    parts.iter().for_each(|part| out.push_str(part));
    out
}

