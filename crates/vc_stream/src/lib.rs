//! Byte-level stream primitives for packaged asset containers.
//!
//! This crate is the lowest layer of the asset I/O stack. It knows nothing
//! about records or schemas; it only moves numbers and text across a byte
//! cursor in the exact layout the container format uses.
//!
//! ## Menu
//!
//! - [`DataInput`] / [`DataOutput`]: object safe read/write contracts.
//! - [`DataInputStream`] / [`DataOutputStream`]: adapters over any
//!   [`Read`](std::io::Read) / [`Write`](std::io::Write).
//! - [`Charset`]: the single-byte text encoding used by `line` strings.
//! - [`compact`]: the variable-length signed integer codec.
//!
//! ## Layout
//!
//! All fixed-width values are little-endian.
//!
//! | value | layout |
//! |---|---|
//! | compact int | 1-5 bytes, see [`compact`] |
//! | line text | compact length, then charset bytes (`len > 0`) or UTF-16LE units (`len < 0`), NUL terminated |
//! | UTF text | `i32` byte length, then UTF-16LE bytes |
//! | byte block | compact length, then raw bytes |
//!
//! # Example
//!
//! ```
//! use vc_stream::{Charset, DataInput, DataInputStream, DataOutput, DataOutputStream};
//!
//! let mut output = DataOutputStream::new(Vec::new(), Charset::Latin1);
//! output.write_compact_int(-70).unwrap();
//! output.write_line("hello").unwrap();
//!
//! let bytes = output.into_inner();
//! let mut input = DataInputStream::new(bytes.as_slice(), Charset::Latin1);
//! assert_eq!(input.read_compact_int().unwrap(), -70);
//! assert_eq!(input.read_line().unwrap(), "hello");
//! ```

// -----------------------------------------------------------------------------
// Modules

mod charset;
mod error;
mod input;
mod output;

pub mod compact;

// -----------------------------------------------------------------------------
// Exports

pub use charset::Charset;
pub use error::{Result, StreamError};
pub use input::{DataInput, DataInputStream};
pub use output::{DataOutput, DataOutputStream};
