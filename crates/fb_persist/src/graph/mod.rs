//! Graph serialization and restoration.
//!
//! - [`serialize`]: a live composite value to a [`SaveRecord`].
//! - [`restore_into`]: a record onto an existing value.
//! - [`deserialize`] and [`deserialize_as`]: a record to a new value.
//!
//! Both directions walk the value by kind and consult the type's
//! [`FieldSelection`]. Failures below the top level are contained to the
//! field that raised them and reported to the
//! [`PersistContext`](crate::PersistContext).
//!
//! Object graphs are trees: a value owns its fields, and `Box<dyn Persist>`
//! slots own their contents. Shared references are not persistable, so a
//! walk always terminates.
//!
//! [`SaveRecord`]: crate::record::SaveRecord
//! [`FieldSelection`]: crate::select::FieldSelection

mod copy;
mod de;
mod ser;

pub use de::{RestoredFields, deserialize, deserialize_as, restore_into};
pub use ser::serialize;

pub(crate) use copy::{CopyMode, copy_value};
pub(crate) use de::read_value;
pub(crate) use ser::write_value;
