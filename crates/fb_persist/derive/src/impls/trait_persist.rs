use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

use crate::derive_data::PersistMeta;

/// Generate implementation code for `Persist`.
///
/// `kind` names the `PersistRef` and `PersistMut` variant the type is
/// exposed as.
pub(crate) fn impl_trait_persist(meta: &PersistMeta, kind: &Ident) -> TokenStream {
    let fb_persist_path = meta.fb_persist_path();
    let persist_ = crate::path::persist_(fb_persist_path);
    let persist_ref_ = crate::path::persist_ref_(fb_persist_path);
    let persist_mut_ = crate::path::persist_mut_(fb_persist_path);
    let typed_ = crate::path::typed_(fb_persist_path);
    let type_info_ = crate::path::type_info_(fb_persist_path);
    let macro_utils_ = crate::path::macro_utils_(fb_persist_path);
    let ident = meta.ident();

    quote! {
        impl #persist_ for #ident {
            #[inline]
            fn persist_type_info(&self) -> &'static #type_info_ {
                <Self as #typed_>::type_info()
            }

            #[inline]
            fn as_any(&self) -> &dyn #macro_utils_::Any {
                self
            }

            #[inline]
            fn as_any_mut(&mut self) -> &mut dyn #macro_utils_::Any {
                self
            }

            #[inline]
            fn into_any(self: #macro_utils_::Box<Self>) -> #macro_utils_::Box<dyn #macro_utils_::Any> {
                self
            }

            #[inline]
            fn as_persist(&self) -> &dyn #persist_ {
                self
            }

            #[inline]
            fn as_persist_mut(&mut self) -> &mut dyn #persist_ {
                self
            }

            #[inline]
            fn persist_ref(&self) -> #persist_ref_<'_> {
                #persist_ref_::#kind(self)
            }

            #[inline]
            fn persist_mut(&mut self) -> #persist_mut_<'_> {
                #persist_mut_::#kind(self)
            }

            fn persist_set(
                &mut self,
                value: #macro_utils_::Box<dyn #persist_>,
            ) -> #macro_utils_::Result<(), #macro_utils_::Box<dyn #persist_>> {
                *self = <dyn #persist_>::take::<Self>(value)?;
                #macro_utils_::Result::Ok(())
            }
        }
    }
}
