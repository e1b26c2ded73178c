use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::MarshalMeta;

/// Generate the `FieldType` impl that lets the type appear as a field of
/// another record.
///
/// ```ignore
/// impl<__C: Context> FieldType<__C> for Foo {
///     const KIND: Kind = Kind::Object;
///     fn codec(meta: &FieldMeta, registry: &Registry<__C>) -> Result<Codec<Self, __C>> {
///         object_codec::<Self, __C>(meta, registry)
///     }
/// }
/// ```
pub(crate) fn impl_field_type(meta: &MarshalMeta, where_clause: &TokenStream) -> TokenStream {
    let vc_serial_path = meta.vc_serial_path();
    let field_type_ = crate::path::field_type_(vc_serial_path);
    let kind_ = crate::path::kind_(vc_serial_path);
    let field_meta_ = crate::path::field_meta_(vc_serial_path);
    let registry_ = crate::path::registry_(vc_serial_path);
    let result_ = crate::path::result_(vc_serial_path);
    let codec_ = crate::path::codec_(vc_serial_path);
    let object_codec_ = crate::path::object_codec_(vc_serial_path);

    let ident = meta.ident();
    let impl_generics = meta.impl_generics(true);
    let ty_generics = meta.type_generics();
    let context = meta.context_type();

    quote! {
        impl #impl_generics #field_type_<#context> for #ident #ty_generics #where_clause {
            const KIND: #kind_ = #kind_::Object;

            #[inline]
            fn codec(
                meta: &#field_meta_,
                registry: &#registry_<#context>,
            ) -> #result_<#codec_<Self, #context>> {
                #object_codec_::<Self, #context>(meta, registry)
            }
        }
    }
}
