// -----------------------------------------------------------------------------
// Modules

mod match_persist;

mod composite_kind;
mod enum_kind;
mod opaque_kind;

mod auto_register;
mod trait_get_type_meta;
mod trait_persist;
mod trait_type_path;
mod trait_typed;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use match_persist::match_persist_impls;

use auto_register::get_auto_register_impl;
use composite_kind::impl_composite;
use enum_kind::impl_enum;
use opaque_kind::impl_opaque;
use trait_get_type_meta::impl_trait_get_type_meta;
use trait_persist::impl_trait_persist;
use trait_type_path::impl_trait_type_path;
use trait_typed::impl_trait_typed;
