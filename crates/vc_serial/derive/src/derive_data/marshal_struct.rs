use syn::spanned::Spanned;
use syn::{Field, Fields, Index, Member};

use super::{FieldAttributes, MarshalMeta};

// -----------------------------------------------------------------------------
// Define

pub(crate) struct MarshalStruct<'a> {
    pub meta: MarshalMeta<'a>,
    pub fields: Vec<StructField<'a>>,
}

/// Represents a field on a struct or tuple struct.
pub(crate) struct StructField<'a> {
    /// The raw field.
    pub data: &'a Field,
    /// The marshal attributes on the field.
    pub attrs: FieldAttributes,
    /// `this.name` or `this.0`.
    pub member: Member,
}

// -----------------------------------------------------------------------------
// Implementation

impl StructField<'_> {
    /// Name recorded in the schema. Tuple fields use their index.
    pub fn name(&self) -> String {
        match &self.member {
            Member::Named(ident) => ident.to_string(),
            Member::Unnamed(index) => index.index.to_string(),
        }
    }
}

impl<'a> MarshalStruct<'a> {
    pub fn new(meta: MarshalMeta<'a>, fields: &'a Fields) -> syn::Result<Self> {
        if let Some((_, span)) = meta.attrs().tag_width {
            return Err(syn::Error::new(span, "`tag_width` only applies to enums"));
        }

        let mut parsed = Vec::with_capacity(fields.len());
        let mut ancestor_seen = false;

        for (index, data) in fields.iter().enumerate() {
            let attrs = FieldAttributes::parse_attrs(&data.attrs)?;

            if let Some(span) = attrs.ancestor {
                if ancestor_seen {
                    return Err(syn::Error::new(span, "a record has at most one `ancestor`"));
                }
                ancestor_seen = true;
            }

            let member = match &data.ident {
                Some(ident) => Member::Named(ident.clone()),
                None => Member::Unnamed(Index {
                    index: index as u32,
                    span: data.span(),
                }),
            };

            parsed.push(StructField { data, attrs, member });
        }

        Ok(Self {
            meta,
            fields: parsed,
        })
    }

    pub fn ancestor(&self) -> Option<&StructField<'a>> {
        self.fields.iter().find(|f| f.attrs.ancestor.is_some())
    }

    /// Fields transcoded by this type's own plan, in declaration order.
    pub fn own_fields(&self) -> impl Iterator<Item = &StructField<'a>> {
        self.fields
            .iter()
            .filter(|f| f.attrs.ancestor.is_none() && f.attrs.skip.is_none())
    }
}
