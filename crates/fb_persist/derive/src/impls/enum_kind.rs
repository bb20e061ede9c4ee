use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::{get_auto_register_impl, impl_trait_get_type_meta, impl_trait_persist};
use super::{impl_trait_type_path, impl_trait_typed};

use crate::derive_data::PersistEnum;

/// Implement persistence for fieldless enums, stored by discriminant.
pub(crate) fn impl_enum(info: &PersistEnum) -> TokenStream {
    let meta = info.meta();

    let type_path_trait_tokens = impl_trait_type_path(meta);
    let typed_trait_tokens = impl_trait_typed(meta, info.to_info_tokens());
    let persist_trait_tokens = impl_trait_persist(meta, &format_ident!("Primitive"));
    let primitive_trait_tokens = impl_trait_primitive(info);
    let get_type_meta_tokens = impl_trait_get_type_meta(meta, crate::utils::empty());
    let auto_register_tokens = get_auto_register_impl(meta);

    quote! {
        #type_path_trait_tokens

        #typed_trait_tokens

        #persist_trait_tokens

        #primitive_trait_tokens

        #get_type_meta_tokens

        #auto_register_tokens
    }
}

fn impl_trait_primitive(info: &PersistEnum) -> TokenStream {
    let meta = info.meta();
    let fb_persist_path = meta.fb_persist_path();
    let primitive_ = crate::path::primitive_(fb_persist_path);
    let type_path_ = crate::path::type_path_(fb_persist_path);
    let value_ = crate::path::value_(fb_persist_path);
    let value_error_ = crate::path::value_error_(fb_persist_path);
    let macro_utils_ = crate::path::macro_utils_(fb_persist_path);
    let ident = meta.ident();
    let variants = info.variants();

    let to_value = if variants.is_empty() {
        quote! { match *self {} }
    } else {
        quote! {
            #value_::Enum(match self {
                #( Self::#variants => Self::#variants as i64, )*
            })
        }
    };

    quote! {
        impl #primitive_ for #ident {
            fn to_value(&self) -> #value_ {
                #to_value
            }

            fn set_value(&mut self, value: &#value_) -> #macro_utils_::Result<(), #value_error_> {
                let discriminant = value.as_discriminant()?;
                #( if discriminant == Self::#variants as i64 {
                    *self = Self::#variants;
                    return #macro_utils_::Result::Ok(());
                } )*
                #macro_utils_::Result::Err(#value_error_::UnknownDiscriminant {
                    type_path: <Self as #type_path_>::type_path(),
                    discriminant,
                })
            }
        }
    }
}
