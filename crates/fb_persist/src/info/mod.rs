//! Static type information and the type classifier.
//!
//! Every persistable type describes itself once through [`Typed`]:
//! its [`TypePath`], its structural [`TypeKind`] and its [`TypeMarkers`].
//! [`TypeInfo::classify`] turns that description into the
//! [`Classification`] the rest of the crate works with.

mod cell;
mod composite_info;
mod type_info;
mod type_path;
mod typed;

pub use cell::{
    GenericTypeCell, GenericTypeInfoCell, GenericTypePathCell, NonGenericTypeCell,
    NonGenericTypeInfoCell, concat,
};
pub use composite_info::{CompositeInfo, FieldInfo, FieldMarkers};
pub use type_info::{
    Classification, IgnoreReason, NullableInfo, PrimitiveInfo, ScalarKind, SequenceInfo, TypeInfo,
    TypeKind, TypeMarkers,
};
pub use type_path::{Type, TypePath};
pub use typed::Typed;
