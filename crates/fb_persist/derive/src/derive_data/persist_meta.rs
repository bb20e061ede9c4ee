use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Ident, Path};

use super::TypeAttributes;

/// Type-level information shared by every generated implementation.
pub(crate) struct PersistMeta<'a> {
    fb_persist_path: Path,
    attrs: TypeAttributes,
    ident: &'a Ident,
}

impl core::fmt::Debug for PersistMeta<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PersistMeta")
            .field("fb_persist_path", &self.fb_persist_path.to_token_stream())
            .field("ident", &self.ident)
            .field("attrs", &self.attrs)
            .finish()
    }
}

impl<'a> PersistMeta<'a> {
    #[inline]
    pub fn new(attrs: TypeAttributes, ident: &'a Ident) -> Self {
        Self {
            fb_persist_path: crate::path::fb_persist(),
            attrs,
            ident,
        }
    }

    #[inline]
    pub fn fb_persist_path(&self) -> &Path {
        &self.fb_persist_path
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn ident(&self) -> &'a Ident {
        self.ident
    }

    /// `&'static str` expression of the full type path.
    pub fn type_path(&self) -> TokenStream {
        match &self.attrs.type_path {
            Some(custom) => custom.to_token_stream(),
            None => {
                let name = self.ident.to_string();
                quote! { ::core::concat!(::core::module_path!(), "::", #name) }
            }
        }
    }

    /// `&'static str` expression of the short type name.
    pub fn type_name(&self) -> TokenStream {
        match &self.attrs.type_path {
            Some(custom) => {
                let value = custom.value();
                let name = value.rsplit("::").next().unwrap_or(&value);
                quote! { #name }
            }
            None => {
                let name = self.ident.to_string();
                quote! { #name }
            }
        }
    }

    /// `Option<&'static str>` expression of the module path.
    pub fn module_path(&self) -> TokenStream {
        match &self.attrs.type_path {
            Some(custom) => match custom.value().rsplit_once("::") {
                Some((module, _)) => quote! { ::core::option::Option::Some(#module) },
                None => quote! { ::core::option::Option::None },
            },
            None => quote! { ::core::option::Option::Some(::core::module_path!()) },
        }
    }

    /// `TypeMarkers` expression of the type-level markers.
    pub fn markers_expression(&self) -> TokenStream {
        let type_markers_ = crate::path::type_markers_(&self.fb_persist_path);
        let always_save = self.attrs.always_save;
        let exclusive_save = self.attrs.exclusive;
        let ignore = match &self.attrs.ignored {
            Some(variant) => {
                let ignore_reason_ = crate::path::ignore_reason_(&self.fb_persist_path);
                quote! { ::core::option::Option::Some(#ignore_reason_::#variant) }
            }
            None => quote! { ::core::option::Option::None },
        };

        quote! {
            #type_markers_ {
                ignore: #ignore,
                always_save: #always_save,
                exclusive_save: #exclusive_save,
            }
        }
    }
}
