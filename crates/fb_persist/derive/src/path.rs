//! Paths of `fb_persist` items, as seen from the crate invoking the derive.
//!
//! Kept in one place so that moving an item in `fb_persist` only needs
//! one change here.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the correct access path to the `fb_persist` crate.
///
/// 1. For crates that depend on `fb_persist`, `::fb_persist` is returned.
/// 2. For crates that depend on `fb_core`, `::fb_core::persist` is returned.
/// 3. For other situations, `::fb_persist` is returned, but this may be incorrect.
///
/// Reading the manifest is relatively expensive, so the path is obtained
/// once per derive and passed around.
pub(crate) fn fb_persist() -> syn::Path {
    fb_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("fb_persist"))
}

// -----------------------------------------------------------------------------
// Items

macro_rules! define_paths {
    ($($name:ident => $($segment:ident)::+;)*) => {$(
        #[inline(always)]
        pub(crate) fn $name(fb_persist_path: &syn::Path) -> TokenStream {
            quote! { #fb_persist_path::$($segment)::+ }
        }
    )*};
}

define_paths! {
    persist_ => Persist;
    persist_ref_ => PersistRef;
    persist_mut_ => PersistMut;
    composite_ => Composite;
    primitive_ => Primitive;

    type_path_ => info::TypePath;
    typed_ => info::Typed;
    type_info_ => info::TypeInfo;
    type_markers_ => info::TypeMarkers;
    ignore_reason_ => info::IgnoreReason;
    scalar_kind_ => info::ScalarKind;
    composite_info_ => info::CompositeInfo;
    field_info_ => info::FieldInfo;
    field_markers_ => info::FieldMarkers;
    non_generic_type_info_cell_ => info::NonGenericTypeInfoCell;

    value_ => record::Value;
    value_error_ => error::ValueError;
    field_access_error_ => error::FieldAccessError;

    type_registry_ => registry::TypeRegistry;
    get_type_meta_ => registry::GetTypeMeta;
    type_meta_ => registry::TypeMeta;
    from_type_ => registry::FromType;
    type_trait_default_ => registry::TypeTraitDefault;
    type_trait_clone_ => registry::TypeTraitClone;
    type_trait_post_restore_ => registry::TypeTraitPostRestore;

    macro_utils_ => __macro_exports::macro_utils;
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(fb_persist_path: &syn::Path) -> TokenStream {
    quote! {
        #fb_persist_path::__macro_exports::auto_register
    }
}
