use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Type};

use super::{Width, duplicate, marshal_attrs};

/// Field level `#[marshal(...)]` attributes.
///
/// Examples:
/// - `#[marshal(ancestor)]`
/// - `#[marshal(skip)]`
/// - `#[marshal(ushort, length = byte)]`
/// - `#[marshal(custom = DeflatedText)]`
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub ancestor: Option<Span>,
    pub skip: Option<Span>,
    pub compact: bool,
    pub ushort: bool,
    pub ubyte: bool,
    pub utf: bool,
    pub length: Option<(Width, Span)>,
    pub custom: Option<Type>,
    /// Span of the first encoding modifier, for conflict reports.
    modifier_span: Option<Span>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in marshal_attrs(attrs) {
            attr.parse_nested_meta(|meta| this.parse_meta(&meta))?;
        }
        this.validate()?;
        Ok(this)
    }

    fn flag(meta: &ParseNestedMeta, slot: &mut bool) -> syn::Result<()> {
        if *slot {
            return Err(duplicate(meta));
        }
        *slot = true;
        Ok(())
    }

    fn parse_meta(&mut self, meta: &ParseNestedMeta) -> syn::Result<()> {
        let span = meta.path.get_ident().map_or_else(Span::call_site, |i| i.span());

        if meta.path.is_ident("ancestor") {
            if self.ancestor.is_some() {
                return Err(duplicate(meta));
            }
            self.ancestor = Some(span);
            return Ok(());
        }
        if meta.path.is_ident("skip") {
            if self.skip.is_some() {
                return Err(duplicate(meta));
            }
            self.skip = Some(span);
            return Ok(());
        }
        if meta.path.is_ident("custom") {
            if self.custom.is_some() {
                return Err(duplicate(meta));
            }
            self.custom = Some(meta.value()?.parse()?);
            return Ok(());
        }

        if meta.path.is_ident("compact") {
            Self::flag(meta, &mut self.compact)?;
        } else if meta.path.is_ident("ushort") {
            Self::flag(meta, &mut self.ushort)?;
        } else if meta.path.is_ident("ubyte") {
            Self::flag(meta, &mut self.ubyte)?;
        } else if meta.path.is_ident("utf") {
            Self::flag(meta, &mut self.utf)?;
        } else if meta.path.is_ident("length") {
            if self.length.is_some() {
                return Err(duplicate(meta));
            }
            self.length = Some(Width::parse_value(meta)?);
        } else {
            return Err(meta.error(
                "unknown field attribute, expected one of `ancestor`, `skip`, `custom`, `compact`, `ushort`, `ubyte`, `utf`, `length`",
            ));
        }
        self.modifier_span.get_or_insert(span);
        Ok(())
    }

    /// `ancestor`, `skip` and `custom` each exclude every other attribute.
    fn validate(&self) -> syn::Result<()> {
        let exclusive = [
            (self.ancestor, "ancestor"),
            (self.skip, "skip"),
            (self.custom.as_ref().map(|_| Span::call_site()), "custom"),
        ];
        let given = exclusive.iter().filter(|(span, _)| span.is_some()).count();
        let has_modifier = self.modifier_span.is_some();

        for (span, name) in exclusive {
            let Some(span) = span else { continue };
            if given > 1 || has_modifier {
                let span = self.modifier_span.filter(|_| has_modifier).unwrap_or(span);
                return Err(syn::Error::new(
                    span,
                    format!("`{name}` cannot be combined with other marshal attributes"),
                ));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn modifier_names(&self) -> impl Iterator<Item = &'static str> {
        [
            (self.compact, "COMPACT"),
            (self.ushort, "USHORT"),
            (self.ubyte, "UBYTE"),
            (self.utf, "UTF"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
    }
}
