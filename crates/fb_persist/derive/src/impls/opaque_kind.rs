use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::{get_auto_register_impl, impl_trait_get_type_meta, impl_trait_persist};
use super::{impl_trait_type_path, impl_trait_typed};

use crate::derive_data::PersistMeta;

/// Implement persistence for types marked `opaque`.
///
/// The contents are never walked, so nothing is saved; the type only
/// takes part in construction and hot swap.
pub(crate) fn impl_opaque(meta: &PersistMeta) -> TokenStream {
    let type_info_ = crate::path::type_info_(meta.fb_persist_path());
    let markers = meta.markers_expression();

    let type_path_trait_tokens = impl_trait_type_path(meta);
    let typed_trait_tokens = impl_trait_typed(
        meta,
        quote! { #type_info_::opaque::<Self>().with_markers(#markers) },
    );
    let persist_trait_tokens = impl_trait_persist(meta, &format_ident!("Opaque"));
    let get_type_meta_tokens = impl_trait_get_type_meta(meta, crate::utils::empty());
    let auto_register_tokens = get_auto_register_impl(meta);

    quote! {
        #type_path_trait_tokens

        #typed_trait_tokens

        #persist_trait_tokens

        #get_type_meta_tokens

        #auto_register_tokens
    }
}
