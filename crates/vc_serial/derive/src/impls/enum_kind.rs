use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::MarshalEnum;

/// Implement `Marshal`, `Variants` and `FieldType` for a polymorphic enum.
///
/// Each variant wraps one record. Values are written as the variant's tag
/// followed by the record's own plan, through the `Tagged` serializer unless
/// the enum names its own with `#[marshal(custom = ..)]`.
pub(crate) fn impl_enum(info: &MarshalEnum) -> TokenStream {
    let meta = &info.meta;
    let vc_serial_path = meta.vc_serial_path();
    let marshal_ = crate::path::marshal_(vc_serial_path);
    let object_ = crate::path::object_(vc_serial_path);
    let schema_type_ = crate::path::schema_type_(vc_serial_path);
    let serializer_ = crate::path::serializer_(vc_serial_path);
    let variants_ = crate::path::variants_(vc_serial_path);
    let tag_width_ = crate::path::tag_width_(vc_serial_path);
    let tagged_ = crate::path::tagged_(vc_serial_path);
    let default_ = crate::path::default_();
    let option_ = crate::path::option_();

    let ident = meta.ident();
    let ty_generics = meta.type_generics();
    let context = meta.context_type();
    let name = meta.type_name();

    let serializer = match &meta.attrs().custom {
        Some(ser) => quote! { #ser },
        None => quote! { #tagged_<Self> },
    };

    let arms_ident: Vec<_> = info.variants.iter().map(|v| &v.data.ident).collect();
    let arms_tag: Vec<_> = info.variants.iter().map(|v| v.tag).collect();
    let arms_payload: Vec<_> = info.variants.iter().map(|v| v.payload).collect();

    let width = info.tag_width.variant_ident();
    let fallback = match info.fallback() {
        Some(v) => {
            let variant = &v.data.ident;
            let payload = v.payload;
            quote! { #option_::Some(Self::#variant(<#payload as #default_>::default())) }
        }
        None => quote! { #option_::None },
    };

    let generic_payloads: Vec<_> = info
        .variants
        .iter()
        .map(|v| v.payload)
        .filter(|ty| meta.mentions_type_param(ty))
        .collect();

    let mut bounds: Vec<TokenStream> = generic_payloads
        .iter()
        .map(|ty| quote! { #ty: #marshal_<#context> + #default_ })
        .collect();
    // `Tagged<Self>` is satisfied by the impls below, a bound would cycle.
    if let Some(ser) = meta.attrs().custom.as_ref().filter(|_| meta.is_generic()) {
        bounds.push(quote! { #ser: #serializer_<#ident #ty_generics, #context> + #default_ });
    }
    let where_clause = meta.where_clause(bounds);
    let impl_generics = meta.impl_generics(true);

    let variants_where = meta.where_clause(
        generic_payloads
            .iter()
            .map(|ty| quote! { #ty: #default_ }),
    );
    let variants_generics = meta.impl_generics(false);

    let field_type_impl = crate::impls::impl_field_type(meta, &where_clause);

    quote! {
        impl #impl_generics #marshal_<#context> for #ident #ty_generics #where_clause {
            fn schema() -> #schema_type_<Self, #context> {
                #schema_type_::new(#name).custom::<#serializer>()
            }

            fn as_object(&self) -> &dyn #object_<#context> {
                match self {
                    #( Self::#arms_ident(value) => value, )*
                }
            }

            fn as_object_mut(&mut self) -> &mut dyn #object_<#context> {
                match self {
                    #( Self::#arms_ident(value) => value, )*
                }
            }
        }

        impl #variants_generics #variants_ for #ident #ty_generics #variants_where {
            const TAG_WIDTH: #tag_width_ = #tag_width_::#width;

            fn tag(&self) -> u32 {
                match self {
                    #( Self::#arms_ident(_) => #arms_tag, )*
                }
            }

            fn from_tag(tag: u32) -> #option_<Self> {
                match tag {
                    #( #arms_tag => #option_::Some(Self::#arms_ident(<#arms_payload as #default_>::default())), )*
                    _ => #option_::None,
                }
            }

            fn fallback() -> #option_<Self> {
                #fallback
            }
        }

        #field_type_impl
    }
}
