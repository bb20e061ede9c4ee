//! Type metadata, capabilities and name-based construction.
//!
//! - [`TypeTrait`]: a capability attached to a registered type.
//! - [`FromType`]: builds a capability for a concrete type.
//! - [`TypeMeta`]: a type's [`TypeInfo`] plus its capability table.
//! - [`GetTypeMeta`]: produces the `TypeMeta` a type registers with.
//! - [`TypeRegistry`]: the store of `TypeMeta`s and the field selection cache.
//! - [`AssemblyScope`]: the module scope short type names resolve in.
//! - Capabilities:
//!     - [`TypeTraitDefault`]: zero-argument construction.
//!     - [`TypeTraitClone`]: copying opaque values.
//!     - [`TypeTraitPostRestore`]: the post-restore hook.
//!
//! ## auto_register
//!
//! Types declared with `#[persist(auto_register)]` are collected through the
//! [`inventory`] crate; see [`TypeRegistry::auto_register`].
//!
//! [`TypeInfo`]: crate::info::TypeInfo
//! [`inventory`]: https://docs.rs/inventory

mod constructor;
mod from_type;
mod traits;
mod type_meta;
mod type_registry;
mod type_trait;

pub use constructor::AssemblyScope;
pub use from_type::FromType;
pub use traits::{TypeTraitClone, TypeTraitDefault, TypeTraitPostRestore};
pub use type_meta::{GetTypeMeta, TypeMeta};
pub use type_registry::TypeRegistry;
pub use type_trait::TypeTrait;
