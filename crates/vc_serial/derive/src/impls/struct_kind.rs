use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{MarshalStruct, StructField};

/// Implement `Marshal` and `FieldType` for a struct.
///
/// The generated schema reads:
///
/// ```ignore
/// SchemaType::new("Texture")
///     .constructor(<Self as Default>::default)
///     .ancestor(|this: &Self| &this.base, |this: &mut Self| &mut this.base)
///     .field(
///         FieldDescriptor::new("width", |this: &Self| &this.width, |this: &mut Self| &mut this.width)
///             .modifiers(Modifiers::USHORT),
///     )
///     .read_hook(|this, input| Texture::read(this, input))
/// ```
pub(crate) fn impl_struct(info: &MarshalStruct) -> TokenStream {
    let meta = &info.meta;
    let vc_serial_path = meta.vc_serial_path();
    let marshal_ = crate::path::marshal_(vc_serial_path);
    let schema_type_ = crate::path::schema_type_(vc_serial_path);
    let serializer_ = crate::path::serializer_(vc_serial_path);
    let field_type_ = crate::path::field_type_(vc_serial_path);
    let default_ = crate::path::default_();

    let ident = meta.ident();
    let ty_generics = meta.type_generics();
    let context = meta.context_type();
    let attrs = meta.attrs();
    let name = meta.type_name();

    // A type-level serializer owns instantiation, no constructor needed.
    let constructor = match &attrs.custom {
        Some(_) => TokenStream::new(),
        None => quote! { .constructor(<Self as #default_>::default) },
    };

    let ancestor = info.ancestor().map(|field| {
        let member = &field.member;
        quote! {
            .ancestor(|this: &Self| &this.#member, |this: &mut Self| &mut this.#member)
        }
    });

    let fields = info.own_fields().map(|field| field_tokens(info, field));

    let read_hook = attrs.read_hook.as_ref().map(|hook| {
        quote! { .read_hook(|this, input| #hook(this, input)) }
    });
    let write_hook = attrs.write_hook.as_ref().map(|hook| {
        quote! { .write_hook(|this, output| #hook(this, output)) }
    });
    let custom = attrs.custom.as_ref().map(|ser| quote! { .custom::<#ser>() });

    // Bounds only for types that mention a type parameter.
    let mut bounds = Vec::new();
    if meta.is_generic() {
        match &attrs.custom {
            Some(ser) => {
                bounds.push(quote! { #ser: #serializer_<#ident #ty_generics, #context> + #default_ });
            }
            None => bounds.push(quote! { #ident #ty_generics: #default_ }),
        }
    }
    for field in info.fields.iter().filter(|f| f.attrs.skip.is_none()) {
        let ty = &field.data.ty;
        if !meta.mentions_type_param(ty) {
            continue;
        }
        if field.attrs.ancestor.is_some() {
            bounds.push(quote! { #ty: #marshal_<#context> });
        } else if let Some(ser) = &field.attrs.custom {
            bounds.push(quote! { #ty: ::core::marker::Send + ::core::marker::Sync + 'static });
            bounds.push(quote! { #ser: #serializer_<#ty, #context> + #default_ });
        } else {
            bounds.push(quote! { #ty: #field_type_<#context> });
        }
    }
    let where_clause = meta.where_clause(bounds);
    let impl_generics = meta.impl_generics(true);

    let field_type_impl = crate::impls::impl_field_type(meta, &where_clause);

    quote! {
        impl #impl_generics #marshal_<#context> for #ident #ty_generics #where_clause {
            fn schema() -> #schema_type_<Self, #context> {
                #schema_type_::new(#name)
                    #constructor
                    #ancestor
                    #(#fields)*
                    #read_hook
                    #write_hook
                    #custom
            }
        }

        #field_type_impl
    }
}

/// `.field(FieldDescriptor::new(..)..)` for one own field.
fn field_tokens(info: &MarshalStruct, field: &StructField) -> TokenStream {
    let vc_serial_path = info.meta.vc_serial_path();
    let field_descriptor_ = crate::path::field_descriptor_(vc_serial_path);
    let modifiers_ = crate::path::modifiers_(vc_serial_path);
    let length_prefix_ = crate::path::length_prefix_(vc_serial_path);

    let name = field.name();
    let member = &field.member;
    let getters = quote! {
        #name, |this: &Self| &this.#member, |this: &mut Self| &mut this.#member
    };

    if let Some(ser) = &field.attrs.custom {
        return quote! {
            .field(#field_descriptor_::custom::<_, #ser>(#getters))
        };
    }

    let names: Vec<_> = field
        .attrs
        .modifier_names()
        .map(|n| syn::Ident::new(n, proc_macro2::Span::call_site()))
        .collect();
    let modifiers = (!names.is_empty()).then(|| {
        quote! { .modifiers(#(#modifiers_::#names)|*) }
    });
    let length = field.attrs.length.map(|(width, _)| {
        let width = width.variant_ident();
        quote! { .length(#length_prefix_::#width) }
    });

    quote! {
        .field(#field_descriptor_::new(#getters) #modifiers #length)
    }
}
