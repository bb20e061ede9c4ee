use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::PersistMeta;

/// Generate implementation codes for `TypePath`
pub(crate) fn impl_trait_type_path(meta: &PersistMeta) -> TokenStream {
    if !meta.attrs().impl_switches.impl_type_path {
        return crate::utils::empty();
    }

    let type_path_ = crate::path::type_path_(meta.fb_persist_path());
    let ident = meta.ident();
    let type_path = meta.type_path();
    let type_name = meta.type_name();
    let module_path = meta.module_path();

    quote! {
        impl #type_path_ for #ident {
            #[inline]
            fn type_path() -> &'static str {
                #type_path
            }

            #[inline]
            fn type_name() -> &'static str {
                #type_name
            }

            #[inline]
            fn module_path() -> ::core::option::Option<&'static str> {
                #module_path
            }
        }
    }
}
