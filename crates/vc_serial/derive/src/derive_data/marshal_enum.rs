use proc_macro2::Span;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Fields, Token, Type, Variant};

use super::{MarshalMeta, VariantAttributes, Width, attributes::marshal_attrs};

// -----------------------------------------------------------------------------
// Define

pub(crate) struct MarshalEnum<'a> {
    pub meta: MarshalMeta<'a>,
    pub variants: Vec<EnumVariant<'a>>,
    pub tag_width: Width,
}

/// One registered concrete type of a polymorphic enum.
pub(crate) struct EnumVariant<'a> {
    /// The raw variant.
    pub data: &'a Variant,
    /// The record wrapped by the variant.
    pub payload: &'a Type,
    pub tag: u32,
    pub fallback: bool,
}

// -----------------------------------------------------------------------------
// Implementation

impl<'a> MarshalEnum<'a> {
    pub fn new(
        meta: MarshalMeta<'a>,
        variants: &'a Punctuated<Variant, Token![,]>,
        span: Span,
    ) -> syn::Result<Self> {
        if variants.is_empty() {
            return Err(syn::Error::new(span, "a polymorphic enum needs at least one variant"));
        }
        if let Some(hook) = meta.attrs().read_hook.as_ref().or(meta.attrs().write_hook.as_ref()) {
            return Err(syn::Error::new_spanned(
                hook,
                "hooks apply to records, put them on the variant's payload type",
            ));
        }

        let tag_width = meta.attrs().tag_width.map_or(Width::Byte, |(w, _)| w);

        let mut parsed: Vec<EnumVariant<'a>> = Vec::with_capacity(variants.len());
        let mut fallback_seen = false;

        for (position, data) in variants.iter().enumerate() {
            let payload = match &data.fields {
                Fields::Unnamed(fields) if fields.unnamed.len() == 1 => &fields.unnamed[0],
                _ => {
                    return Err(syn::Error::new(
                        data.span(),
                        "variants must wrap exactly one record, e.g. `Circle(Circle)`",
                    ));
                }
            };
            if let Some(attr) = marshal_attrs(&payload.attrs).next() {
                return Err(syn::Error::new_spanned(
                    attr,
                    "marshal attributes go on the variant, not its payload",
                ));
            }

            let attrs = VariantAttributes::parse_attrs(&data.attrs)?;
            let (tag, tag_span) = attrs.tag.unwrap_or((position as u32, data.ident.span()));

            if tag_width == Width::Byte && tag > u32::from(u8::MAX) {
                return Err(syn::Error::new(
                    tag_span,
                    "tag does not fit a byte, use `#[marshal(tag_width = int)]` or `compact`",
                ));
            }
            if let Some(other) = parsed.iter().find(|v| v.tag == tag) {
                return Err(syn::Error::new(
                    tag_span,
                    format!("tag {tag} is already used by `{}`", other.data.ident),
                ));
            }
            if let Some(span) = attrs.fallback {
                if fallback_seen {
                    return Err(syn::Error::new(span, "only one variant can be the `fallback`"));
                }
                fallback_seen = true;
            }

            parsed.push(EnumVariant {
                data,
                payload: &payload.ty,
                tag,
                fallback: attrs.fallback.is_some(),
            });
        }

        Ok(Self {
            meta,
            variants: parsed,
            tag_width,
        })
    }

    pub fn fallback(&self) -> Option<&EnumVariant<'a>> {
        self.variants.iter().find(|v| v.fallback)
    }
}
