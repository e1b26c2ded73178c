use proc_macro2::{TokenStream, TokenTree};
use quote::{ToTokens, quote};
use syn::{DeriveInput, GenericParam, Generics, Ident, Path, Type, TypeGenerics, parse_quote};

use super::TypeAttributes;

/// Type level information shared by struct and enum derives.
pub(crate) struct MarshalMeta<'a> {
    vc_serial_path: Path,
    attrs: TypeAttributes,
    ident: &'a Ident,
    generics: &'a Generics,
    type_params: Vec<&'a Ident>,
}

impl<'a> MarshalMeta<'a> {
    pub fn new(ast: &'a DeriveInput, attrs: TypeAttributes) -> syn::Result<Self> {
        if let Some(lifetime) = ast.generics.lifetimes().next() {
            return Err(syn::Error::new_spanned(
                lifetime,
                "`Marshal` cannot be derived for types with lifetime parameters",
            ));
        }

        Ok(Self {
            vc_serial_path: crate::path::vc_serial(),
            attrs,
            ident: &ast.ident,
            generics: &ast.generics,
            type_params: ast.generics.type_params().map(|p| &p.ident).collect(),
        })
    }

    #[inline]
    pub fn vc_serial_path(&self) -> &Path {
        &self.vc_serial_path
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn ident(&self) -> &Ident {
        self.ident
    }

    /// The name recorded in the schema, used in errors and logs.
    #[inline]
    pub fn type_name(&self) -> String {
        self.ident.to_string()
    }

    #[inline]
    pub fn type_generics(&self) -> TypeGenerics<'_> {
        self.generics.split_for_impl().1
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// The context type of the generated impls.
    ///
    /// Either the type pinned by `#[marshal(context = ..)]` or the extra
    /// generic parameter `__C`.
    pub fn context_type(&self) -> TokenStream {
        match &self.attrs.context {
            Some(ty) => ty.to_token_stream(),
            None => quote!(__C),
        }
    }

    /// Impl generics, with the `__C: Context` parameter when `with_context`
    /// is set and no context type is pinned.
    pub fn impl_generics(&self, with_context: bool) -> TokenStream {
        let mut generics = self.generics.clone();
        if with_context && self.attrs.context.is_none() {
            let context_ = crate::path::context_(&self.vc_serial_path);
            let param: GenericParam = parse_quote!(__C: #context_);
            generics.params.push(param);
        }
        let (impl_generics, _, _) = generics.split_for_impl();
        impl_generics.to_token_stream()
    }

    /// Where clause holding the user's predicates, the thread-safety bounds
    /// of every type parameter and `extra`.
    pub fn where_clause(&self, extra: impl IntoIterator<Item = TokenStream>) -> TokenStream {
        let existing = self
            .generics
            .where_clause
            .iter()
            .flat_map(|clause| clause.predicates.iter())
            .map(ToTokens::to_token_stream);

        let params = self.type_params.iter().map(|param| {
            quote! { #param: ::core::marker::Send + ::core::marker::Sync + 'static }
        });

        let predicates: Vec<TokenStream> = existing.chain(params).chain(extra).collect();
        quote! { where #(#predicates,)* }
    }

    /// Whether `ty` names one of the type parameters.
    ///
    /// Only such types receive where-bounds. Bounding concrete field types
    /// would send the trait solver round in circles for self-referential
    /// records such as `Node { children: Vec<Node> }`.
    pub fn mentions_type_param(&self, ty: &Type) -> bool {
        !self.type_params.is_empty() && self.tokens_mention(ty.to_token_stream())
    }

    fn tokens_mention(&self, tokens: TokenStream) -> bool {
        tokens.into_iter().any(|tree| match tree {
            TokenTree::Ident(ident) => self.type_params.iter().any(|p| **p == ident),
            TokenTree::Group(group) => self.tokens_mention(group.stream()),
            _ => false,
        })
    }
}
