//! The stored, format-neutral form of object graphs.
//!
//! A [`SaveRecord`] is what serialization produces and restoration consumes.
//! Records implement serde's traits, so any serde format can hold them.

mod color;
mod save_record;
mod value;

pub use color::Color;
pub use save_record::SaveRecord;
pub use value::Value;
