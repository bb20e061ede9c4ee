//! Derive macro for `fb_persist`.
//!
//! See [`Persist`](derive_persist).
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static PERSIST_ATTRIBUTE_NAME: &str = "persist";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;
mod utils;

// -----------------------------------------------------------------------------
// Macros

/// # Persist Derivation
///
/// `#[derive(Persist)]` implements the following traits:
///
/// - `TypePath`
/// - `Typed`
/// - `Persist`
/// - `GetTypeMeta`
/// - `Composite` (for `struct T { ... }` and `struct T;`)
/// - `Primitive` (for fieldless `enum T { ... }`, stored by discriminant)
///
/// Generic types are not supported. Tuple structs and enums with fields
/// must be marked `opaque`.
///
/// ## Type Attributes
///
/// ```rust, ignore
/// #[derive(Persist)]
/// #[persist(exclusive, default, auto_register)]
/// struct Ledger {
///     #[persist(save)]
///     gold: u32,
///     scratch: u32,
/// }
/// ```
///
/// - `exclusive`: only fields marked `save` are persisted.
/// - `always_save`: fields of this type are persisted even if the type is ignored.
/// - `ignored = reason`: the type belongs to an ignored category. `reason` is one
///   of `scene_handle`, `resource`, `callback`, `coroutine` and `synthesized`.
/// - `opaque`: the macro does not look at the type's contents. The type
///   cannot be saved, but hot swap carries it over when it is `clone`.
/// - `type_path = "..."`: overrides the default `module_path!()::Ident` path.
///
/// ## Available Traits
///
/// The macro cannot see which standard traits a type implements, so
/// registry capabilities are declared:
///
/// - `default`: `Default`, required for name-based construction and backfill.
/// - `clone`: `Clone`.
/// - `post_restore`: `fb_persist::lifecycle::PostRestore`.
///
/// ## Disabling Implementations
///
/// `#[persist(Composite = false)]` skips the `Composite` implementation so the
/// type can provide its own field accessors. The same holds for `TypePath`,
/// `Typed` and `GetTypeMeta`.
///
/// ## Field Attributes
///
/// - `save`: persist the field even if its type is ignored; in an
///   `exclusive` type, persist it at all.
/// - `skip`: never persist the field. Wins over `save`.
/// - `ignore`: hide the field from the schema entirely. Its type need not
///   implement any trait of this crate.
/// - `base`: the field holds the base type, whose fields are inherited and
///   come first in the field order. At most one per type.
///
/// ## Auto Registration
///
/// `#[persist(auto_register)]` submits the type for
/// `TypeRegistry::auto_register`. It is a no-op without the `auto_register`
/// feature.
#[proc_macro_derive(Persist, attributes(persist))]
pub fn derive_persist(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    impls::match_persist_impls(&ast)
}
