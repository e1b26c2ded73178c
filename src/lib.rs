//! Binary object marshaling for game asset containers.
//!
//! - [`stream`]: little-endian primitive, text and compact-integer streams.
//! - [`serial`]: schema-driven object transcoding on top of those streams,
//!   with `#[derive(Marshal)]`.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use vc_serial as serial;
pub use vc_stream as stream;
