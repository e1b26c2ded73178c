//! Provide some tools for parsing token stream.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod marshal_derive;
mod marshal_enum;
mod marshal_meta;
mod marshal_struct;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{FieldAttributes, TypeAttributes, VariantAttributes, Width};

pub(crate) use marshal_derive::MarshalDerive;
pub(crate) use marshal_enum::MarshalEnum;
pub(crate) use marshal_meta::MarshalMeta;
pub(crate) use marshal_struct::{MarshalStruct, StructField};
