use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::{get_auto_register_impl, impl_trait_get_type_meta, impl_trait_persist};
use super::{impl_trait_type_path, impl_trait_typed};

use crate::derive_data::PersistStruct;

/// Implement full persistence for named and unit structs.
pub(crate) fn impl_composite(info: &PersistStruct) -> TokenStream {
    let meta = info.meta();

    let type_path_trait_tokens = impl_trait_type_path(meta);
    let typed_trait_tokens = impl_trait_typed(meta, info.to_info_tokens());
    let persist_trait_tokens = impl_trait_persist(meta, &format_ident!("Composite"));

    let composite_trait_tokens = if meta.attrs().impl_switches.impl_composite {
        impl_trait_composite(info)
    } else {
        crate::utils::empty()
    };

    let get_type_meta_tokens = impl_trait_get_type_meta(meta, get_registry_dependencies(info));
    let auto_register_tokens = get_auto_register_impl(meta);

    quote! {
        #type_path_trait_tokens

        #typed_trait_tokens

        #persist_trait_tokens

        #composite_trait_tokens

        #get_type_meta_tokens

        #auto_register_tokens
    }
}

/// Accessors match on the field name. Names not declared on the struct
/// are looked up on the base, if any.
fn impl_trait_composite(info: &PersistStruct) -> TokenStream {
    let meta = info.meta();
    let fb_persist_path = meta.fb_persist_path();
    let persist_ = crate::path::persist_(fb_persist_path);
    let composite_ = crate::path::composite_(fb_persist_path);
    let type_path_ = crate::path::type_path_(fb_persist_path);
    let field_access_error_ = crate::path::field_access_error_(fb_persist_path);
    let macro_utils_ = crate::path::macro_utils_(fb_persist_path);
    let ident = meta.ident();

    let names = info.fields().iter().map(|field| field.name()).collect::<Vec<_>>();
    let members = info.fields().iter().map(|field| field.ident).collect::<Vec<_>>();

    let (fallback_ref, fallback_mut) = match info.base() {
        Some(base) => {
            let base_ty = base.ty;
            let base_ident = base.ident;
            (
                quote! { <#base_ty as #composite_>::field(&self.#base_ident, name) },
                quote! { <#base_ty as #composite_>::field_mut(&mut self.#base_ident, name) },
            )
        }
        None => {
            let no_such_field = quote! {
                #macro_utils_::Result::Err(#field_access_error_::NoSuchField {
                    type_path: <Self as #type_path_>::type_path(),
                    field: #macro_utils_::String::from(name),
                })
            };
            (no_such_field.clone(), no_such_field)
        }
    };

    let (body_ref, body_mut) = if names.is_empty() {
        (fallback_ref, fallback_mut)
    } else {
        (
            quote! {
                match name {
                    #( #names => #macro_utils_::Result::Ok(&self.#members as &dyn #persist_), )*
                    _ => #fallback_ref,
                }
            },
            quote! {
                match name {
                    #( #names => #macro_utils_::Result::Ok(&mut self.#members as &mut dyn #persist_), )*
                    _ => #fallback_mut,
                }
            },
        )
    };

    quote! {
        impl #composite_ for #ident {
            fn field(
                &self,
                name: &str,
            ) -> #macro_utils_::Result<&dyn #persist_, #field_access_error_> {
                #body_ref
            }

            fn field_mut(
                &mut self,
                name: &str,
            ) -> #macro_utils_::Result<&mut dyn #persist_, #field_access_error_> {
                #body_mut
            }
        }
    }
}

fn get_registry_dependencies(info: &PersistStruct) -> TokenStream {
    let type_registry_ = crate::path::type_registry_(info.meta().fb_persist_path());
    let types = info.active_types().collect::<Vec<_>>();

    if types.is_empty() {
        return crate::utils::empty();
    }

    quote! {
        fn register_dependencies(registry: &mut #type_registry_) {
            #( #type_registry_::register::<#types>(registry); )*
        }
    }
}
