use proc_macro2::Span;
use syn::spanned::Spanned;
use syn::{Attribute, LitInt};

use super::{duplicate, marshal_attrs};

/// Variant level `#[marshal(...)]` attributes.
///
/// Examples:
/// - `#[marshal(tag = 3)]`
/// - `#[marshal(tag = 0, fallback)]`
#[derive(Default)]
pub(crate) struct VariantAttributes {
    pub tag: Option<(u32, Span)>,
    pub fallback: Option<Span>,
}

impl VariantAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in marshal_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("tag") {
                    if this.tag.is_some() {
                        return Err(duplicate(&meta));
                    }
                    let lit: LitInt = meta.value()?.parse()?;
                    this.tag = Some((lit.base10_parse()?, lit.span()));
                } else if meta.path.is_ident("fallback") {
                    if this.fallback.is_some() {
                        return Err(duplicate(&meta));
                    }
                    this.fallback = Some(meta.path.span());
                } else {
                    return Err(meta.error("unknown variant attribute, expected `tag` or `fallback`"));
                }
                Ok(())
            })?;
        }
        Ok(this)
    }
}
