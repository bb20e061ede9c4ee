use crate::info::{TypeInfo, TypePath};

// -----------------------------------------------------------------------------
// Typed

/// Static access to a type's [`TypeInfo`].
///
/// Implemented by [`#[derive(Persist)]`](crate::derive::Persist); manual
/// implementations store the info in a [`NonGenericTypeInfoCell`] or, for
/// generic types, a [`GenericTypeInfoCell`].
///
/// The returned reference is the same for every call, so callers may compare
/// infos with [`core::ptr::eq`].
///
/// [`NonGenericTypeInfoCell`]: crate::info::NonGenericTypeInfoCell
/// [`GenericTypeInfoCell`]: crate::info::GenericTypeInfoCell
pub trait Typed: TypePath {
    fn type_info() -> &'static TypeInfo;
}
