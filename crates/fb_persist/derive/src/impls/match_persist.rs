use proc_macro::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::derive_data::PersistDerive;

/// Provided for `#[derive(Persist)]`.
pub(crate) fn match_persist_impls(ast: &DeriveInput) -> TokenStream {
    // Parse type kind, attribute and fields infomation.
    let persist_derive = match PersistDerive::from_input(ast) {
        Ok(val) => val,
        Err(err) => return err.into_compile_error().into(),
    };

    let persist_impls: proc_macro2::TokenStream = match persist_derive {
        PersistDerive::Composite(info) => super::impl_composite(&info),
        PersistDerive::Enum(info) => super::impl_enum(&info),
        PersistDerive::Opaque(meta) => super::impl_opaque(&meta),
    };

    TokenStream::from(quote! {
        const _: () = {
            #persist_impls
        };
    })
}
