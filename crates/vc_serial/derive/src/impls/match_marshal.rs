use proc_macro::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::derive_data::MarshalDerive;

/// Provided for `#[derive(Marshal)]`.
pub(crate) fn match_marshal_impls(ast: DeriveInput) -> TokenStream {
    // Parse type kind, attributes and fields.
    let marshal_derive = match MarshalDerive::from_input(&ast) {
        Ok(val) => val,
        Err(err) => return err.into_compile_error().into(),
    };

    let marshal_impls: proc_macro2::TokenStream = match marshal_derive {
        MarshalDerive::Struct(info) => crate::impls::impl_struct(&info),
        MarshalDerive::Enum(info) => crate::impls::impl_enum(&info),
    };

    TokenStream::from(quote! {
        const _: () = {
            #marshal_impls
        };
    })
}
