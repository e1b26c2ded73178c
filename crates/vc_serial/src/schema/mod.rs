//! Declarative type descriptions consumed by the plan builder.

// -----------------------------------------------------------------------------
// Modules

mod field;
mod kind;
mod schema_type;

// -----------------------------------------------------------------------------
// Exports

pub use field::FieldDescriptor;
pub use kind::{FieldMeta, IntEncoding, Kind, LengthPrefix, Modifiers};
pub use schema_type::{ReadHook, SchemaType, WriteHook};
