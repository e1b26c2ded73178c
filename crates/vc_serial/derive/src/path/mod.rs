//! This independent module is used to provide the required paths,
//! so as to minimize changes when the `vc_serial` structure is modified.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the correct access path to the `vc_serial` crate.
///
/// 1. For crates that depend on `vc_serial`, `::vc_serial` is returned.
/// 2. For crates that depend on `vc_asset_io`, `::vc_asset_io::serial` is returned.
/// 3. Otherwise `::vc_serial` is returned, which may be incorrect.
///
/// Reading the manifest is relatively expensive, so the path is obtained
/// once per derive and passed around.
pub(crate) fn vc_serial() -> syn::Path {
    vc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("vc_serial"))
}

// -----------------------------------------------------------------------------
// Items

#[inline(always)]
pub(crate) fn context_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! { #vc_serial_path::Context }
}

#[inline(always)]
pub(crate) fn marshal_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! { #vc_serial_path::Marshal }
}

#[inline(always)]
pub(crate) fn object_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! { #vc_serial_path::Object }
}

#[inline(always)]
pub(crate) fn field_type_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! { #vc_serial_path::FieldType }
}

#[inline(always)]
pub(crate) fn serializer_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! { #vc_serial_path::Serializer }
}

#[inline(always)]
pub(crate) fn variants_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! { #vc_serial_path::Variants }
}

#[inline(always)]
pub(crate) fn schema_type_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! { #vc_serial_path::SchemaType }
}

#[inline(always)]
pub(crate) fn field_descriptor_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! { #vc_serial_path::FieldDescriptor }
}

#[inline(always)]
pub(crate) fn modifiers_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! { #vc_serial_path::Modifiers }
}

#[inline(always)]
pub(crate) fn length_prefix_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! { #vc_serial_path::LengthPrefix }
}

#[inline(always)]
pub(crate) fn tag_width_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! { #vc_serial_path::TagWidth }
}

#[inline(always)]
pub(crate) fn tagged_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! { #vc_serial_path::Tagged }
}

#[inline(always)]
pub(crate) fn kind_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! { #vc_serial_path::Kind }
}

#[inline(always)]
pub(crate) fn field_meta_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! { #vc_serial_path::FieldMeta }
}

#[inline(always)]
pub(crate) fn registry_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! { #vc_serial_path::Registry }
}

#[inline(always)]
pub(crate) fn codec_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! { #vc_serial_path::Codec }
}

#[inline(always)]
pub(crate) fn result_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! { #vc_serial_path::Result }
}

#[inline(always)]
pub(crate) fn object_codec_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! { #vc_serial_path::object_codec }
}

// -----------------------------------------------------------------------------
// core

#[inline(always)]
pub(crate) fn default_() -> TokenStream {
    quote! { ::core::default::Default }
}

#[inline(always)]
pub(crate) fn option_() -> TokenStream {
    quote! { ::core::option::Option }
}
