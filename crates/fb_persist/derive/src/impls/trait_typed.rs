use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::PersistMeta;

/// Generate implementation code for `Typed`
///
/// `type_info_tokens` comes from the `to_info_tokens` of
/// [`PersistStruct`] and [`PersistEnum`], or is an opaque info.
///
/// [`PersistStruct`]: crate::derive_data::PersistStruct
/// [`PersistEnum`]: crate::derive_data::PersistEnum
pub(crate) fn impl_trait_typed(meta: &PersistMeta, type_info_tokens: TokenStream) -> TokenStream {
    if !meta.attrs().impl_switches.impl_typed {
        return crate::utils::empty();
    }

    let fb_persist_path = meta.fb_persist_path();
    let typed_ = crate::path::typed_(fb_persist_path);
    let type_info_ = crate::path::type_info_(fb_persist_path);
    let info_cell_ = crate::path::non_generic_type_info_cell_(fb_persist_path);
    let ident = meta.ident();

    quote! {
        impl #typed_ for #ident {
            fn type_info() -> &'static #type_info_ {
                static CELL: #info_cell_ = #info_cell_::new();
                CELL.get_or_init(|| {
                    #type_info_tokens
                })
            }
        }
    }
}
