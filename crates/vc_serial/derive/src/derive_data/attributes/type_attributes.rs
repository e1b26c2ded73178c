use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Path, Type};

use super::{Width, duplicate, marshal_attrs};

/// Type level `#[marshal(...)]` attributes.
///
/// Examples:
/// - `#[marshal(read_hook = Self::read, write_hook = write_texture)]`
/// - `#[marshal(custom = ShapeSerializer)]`
/// - `#[marshal(context = PackageContext)]`
/// - `#[marshal(tag_width = compact)]`
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub custom: Option<Type>,
    pub read_hook: Option<Path>,
    pub write_hook: Option<Path>,
    pub context: Option<Type>,
    pub tag_width: Option<(Width, Span)>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in marshal_attrs(attrs) {
            attr.parse_nested_meta(|meta| this.parse_meta(&meta))?;
        }
        Ok(this)
    }

    fn parse_meta(&mut self, meta: &ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("custom") {
            if self.custom.is_some() {
                return Err(duplicate(meta));
            }
            self.custom = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("read_hook") {
            if self.read_hook.is_some() {
                return Err(duplicate(meta));
            }
            self.read_hook = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("write_hook") {
            if self.write_hook.is_some() {
                return Err(duplicate(meta));
            }
            self.write_hook = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("context") {
            if self.context.is_some() {
                return Err(duplicate(meta));
            }
            self.context = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("tag_width") {
            if self.tag_width.is_some() {
                return Err(duplicate(meta));
            }
            self.tag_width = Some(Width::parse_value(meta)?);
        } else {
            return Err(meta.error(
                "unknown type attribute, expected one of `custom`, `read_hook`, `write_hook`, `context`, `tag_width`",
            ));
        }
        Ok(())
    }
}
