//! Provide some tools for parsing `#[marshal(...)]` attributes.

// -----------------------------------------------------------------------------
// Modules

mod field_attributes;
mod type_attributes;
mod variant_attributes;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use field_attributes::FieldAttributes;
pub(crate) use type_attributes::TypeAttributes;
pub(crate) use variant_attributes::VariantAttributes;

use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Ident};

use crate::MARSHAL_ATTRIBUTE_NAME;

/// Iterate over `#[marshal(...)]` attributes only.
pub(crate) fn marshal_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident(MARSHAL_ATTRIBUTE_NAME))
}

/// Shared error for an attribute given twice.
pub(crate) fn duplicate(meta: &ParseNestedMeta) -> syn::Error {
    let name = meta
        .path
        .get_ident()
        .map(Ident::to_string)
        .unwrap_or_default();
    meta.error(format!("duplicate `{name}` attribute"))
}

/// Width of a length prefix or a discriminant.
///
/// Format: `byte`, `int` or `compact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Width {
    Byte,
    Int,
    Compact,
}

impl Width {
    /// Parse the `= width` part of `key = width`.
    pub fn parse_value(meta: &ParseNestedMeta) -> syn::Result<(Self, Span)> {
        let ident: Ident = meta.value()?.parse()?;
        let width = match ident.to_string().as_str() {
            "byte" => Self::Byte,
            "int" => Self::Int,
            "compact" => Self::Compact,
            _ => {
                return Err(syn::Error::new(
                    ident.span(),
                    "expected `byte`, `int` or `compact`",
                ));
            }
        };
        Ok((width, ident.span()))
    }

    pub fn variant_ident(self) -> Ident {
        let name = match self {
            Self::Byte => "Byte",
            Self::Int => "Int",
            Self::Compact => "Compact",
        };
        Ident::new(name, Span::call_site())
    }
}
