//! [`Persist`](crate::Persist) implementations for foreign types.
//!
//! - Scalars: `bool`, integers up to 64 bits, `f32`, `f64`, `String`,
//!   `glam::Vec2` and [`Color`](crate::record::Color).
//! - Wrappers: `Option<T>` (nullable) and `Vec<T>` (sequence).
//! - `Box<dyn Persist>`: a polymorphic slot.
//! - Ignored engine state: [`Callback`] and `PhantomData<T>`.

mod dynamic;
mod ignored;
mod scalar;
mod wrappers;

pub use ignored::{Callback, noop_callback};
