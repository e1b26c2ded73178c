//! Schema-driven object marshaling for packaged asset containers.
//!
//! Record types describe themselves once through a [`SchemaType`], usually
//! generated by `#[derive(Marshal)]`. A [`Registry`] compiles each schema
//! into a [`Plan`], an ordered list of bound read/write steps, and caches it.
//! [`ObjectInput`] and [`ObjectOutput`] run those plans against a
//! [`vc_stream`] byte stream.
//!
//! ## Menu
//!
//! - [`Marshal`]: a transcodable record; [`Object`] its type-erased view.
//! - [`SchemaType`], [`FieldDescriptor`], [`Modifiers`], [`LengthPrefix`]:
//!   the declarative description of a type.
//! - [`FieldType`], [`Codec`]: built-in field codecs, see [`codec`].
//! - [`Registry`], [`Plan`], [`PlanState`]: the plan cache.
//! - [`Serializer`], [`Variants`], [`Tagged`]: custom serializers and closed
//!   polymorphism.
//! - [`ObjectInput`], [`ObjectOutput`]: the stream facade.
//!
//! ## Plan order
//!
//! A plan runs its ancestor's whole sequence first, then either its own
//! fields in declaration order or, when declared, the read/write hook that
//! replaces them. Hooks never affect the ancestor.
//!
//! # Example
//!
//! ```
//! use vc_serial::{Marshal, Registry};
//!
//! #[derive(Marshal, Default, Debug, PartialEq)]
//! struct Named {
//!     #[marshal(ubyte)]
//!     id: i32,
//!     name: String,
//! }
//!
//! #[derive(Marshal, Default, Debug, PartialEq)]
//! struct Texture {
//!     #[marshal(ancestor)]
//!     base: Named,
//!     #[marshal(ushort, length = byte)]
//!     mips: Vec<i32>,
//! }
//!
//! let registry = Registry::new();
//! let texture = Texture {
//!     base: Named { id: 7, name: "grass".into() },
//!     mips: vec![256, 128],
//! };
//!
//! let bytes = registry.to_bytes(&(), &texture).unwrap();
//! assert_eq!(bytes, [7, 6, b'g', b'r', b'a', b's', b's', 0, 2, 0, 1, 128, 0]);
//! assert_eq!(registry.from_bytes::<Texture>(&(), &bytes).unwrap(), texture);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;
extern crate self as vc_serial;

// -----------------------------------------------------------------------------
// Modules

mod custom;
mod error;
mod object;
mod plan;
mod registry;
mod schema;
mod stream;

pub mod codec;

#[cfg(test)]
mod testing;

// -----------------------------------------------------------------------------
// Exports

pub use codec::{Codec, FieldType, object_codec};
pub use custom::{Serializer, TagWidth, Tagged, Variants};
pub use error::{MarshalError, Result, SchemaError};
pub use object::{Context, Marshal, Object};
pub use plan::{ErasedPlan, Plan, PlanState, ReadStep, WriteStep};
pub use registry::Registry;
pub use schema::{
    FieldDescriptor, FieldMeta, IntEncoding, Kind, LengthPrefix, Modifiers, ReadHook, SchemaType,
    WriteHook,
};
pub use stream::{ObjectInput, ObjectOutput};

pub use vc_serial_derive::Marshal;

pub use vc_stream;
