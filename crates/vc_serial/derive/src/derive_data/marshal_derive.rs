use syn::{Data, DeriveInput};

use super::{MarshalEnum, MarshalMeta, MarshalStruct, TypeAttributes};

pub(crate) enum MarshalDerive<'a> {
    /// Named, tuple and unit structs.
    Struct(MarshalStruct<'a>),
    /// Closed polymorphic type, one record per variant.
    Enum(MarshalEnum<'a>),
}

impl<'a> MarshalDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;
        let meta = MarshalMeta::new(input, attrs)?;

        match &input.data {
            Data::Struct(data) => Ok(Self::Struct(MarshalStruct::new(meta, &data.fields)?)),
            Data::Enum(data) => Ok(Self::Enum(MarshalEnum::new(
                meta,
                &data.variants,
                input.ident.span(),
            )?)),
            Data::Union(_) => Err(syn::Error::new(
                input.ident.span(),
                "`Marshal` cannot be derived for unions",
            )),
        }
    }
}
