//! Provide some tools for parsing token stream.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod persist_derive;
mod persist_meta;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{FieldAttributes, TypeAttributes};

pub(crate) use persist_derive::{PersistDerive, PersistEnum, PersistStruct};
pub(crate) use persist_meta::PersistMeta;
