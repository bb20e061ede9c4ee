//! Persistence and live state-migration for game-state object graphs.
//!
//! The crate walks object graphs whose types it does not know in advance,
//! driven by a schema that every persistable type registers once:
//!
//! - [`info`]: static type information (the schema) and the type classifier.
//! - [`select`]: the per-type field selection policy.
//! - [`graph`]: serialization into [`SaveRecord`]s and restoration from them.
//! - [`backfill`]: re-seeding fields a restore did not populate.
//! - [`hot_swap`]: replacing a live instance with a new type version.
//! - [`registry`]: type metadata, name-based construction and caches.
//! - [`save_set`]: versioned collections of per-entity records.
//!
//! # Example
//!
//! ```
//! use fb_persist::{PersistContext, derive::Persist, graph, registry::TypeRegistry};
//!
//! #[derive(Persist, Default, PartialEq, Debug)]
//! #[persist(default)]
//! struct Lamp {
//!     lit: bool,
//!     fuel: f32,
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<Lamp>();
//!
//! let mut ctx = PersistContext::new(&registry);
//! let record = graph::serialize(&Lamp { lit: true, fuel: 0.5 }, &mut ctx).unwrap();
//!
//! let restored: Lamp = graph::deserialize_as(&record, &mut ctx).unwrap();
//! assert_eq!(restored, Lamp { lit: true, fuel: 0.5 });
//! assert!(ctx.diagnostics().is_empty());
//! ```
//!
//! [`SaveRecord`]: crate::record::SaveRecord

// -----------------------------------------------------------------------------
// Compilation config

/// Some macros used for compilation control.
pub mod cfg {
    fb_cfg::define_alias! {
        #[cfg(feature = "auto_register")] => auto_register,
        #[cfg(all(debug_assertions, feature = "debug"))] => debug,
    }
}

// -----------------------------------------------------------------------------
// Extern Self

// Generated code refers to `::fb_persist`, including code generated for
// this crate's own tests.
extern crate self as fb_persist;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod context;
mod persist;

pub mod backfill;
pub mod error;
pub mod graph;
pub mod hot_swap;
pub mod impls;
pub mod info;
pub mod lifecycle;
pub mod record;
pub mod registry;
pub mod save_set;
pub mod select;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use context::{Diagnostic, Diagnostics, PersistContext, ResourceLookup};
pub use fb_persist_derive as derive;
pub use persist::{Composite, Nullable, Persist, PersistMut, PersistRef, Primitive, Sequence};
