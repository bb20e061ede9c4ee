use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned};
use syn::Ident;

use crate::derive_data::PersistMeta;

/// Generate implementation code for `GetTypeMeta` trait.
///
/// `register_deps_tokens` is usually related to the type of field.
pub(crate) fn impl_trait_get_type_meta(
    meta: &PersistMeta,
    register_deps_tokens: TokenStream,
) -> TokenStream {
    if !meta.attrs().impl_switches.impl_get_type_meta {
        return crate::utils::empty();
    }

    let fb_persist_path = meta.fb_persist_path();
    let get_type_meta_ = crate::path::get_type_meta_(fb_persist_path);
    let type_meta_ = crate::path::type_meta_(fb_persist_path);
    let from_type_ = crate::path::from_type_(fb_persist_path);

    let outer_ = Ident::new("__outer", Span::call_site());
    let avail = &meta.attrs().avail_traits;

    let insert = |span: Option<Span>, type_trait_: TokenStream| match span {
        Some(span) => quote_spanned! { span =>
            #type_meta_::insert_trait::<#type_trait_>(&mut #outer_, #from_type_::<Self>::from_type());
        },
        None => crate::utils::empty(),
    };

    let insert_default = insert(avail.default, crate::path::type_trait_default_(fb_persist_path));
    let insert_clone = insert(avail.clone, crate::path::type_trait_clone_(fb_persist_path));
    let insert_post_restore = insert(
        avail.post_restore,
        crate::path::type_trait_post_restore_(fb_persist_path),
    );

    let ident = meta.ident();

    quote! {
        impl #get_type_meta_ for #ident {
            fn get_type_meta() -> #type_meta_ {
                #[allow(unused_mut)]
                let mut #outer_ = #type_meta_::of::<Self>();
                #insert_default
                #insert_clone
                #insert_post_restore
                #outer_
            }

            #register_deps_tokens
        }
    }
}
