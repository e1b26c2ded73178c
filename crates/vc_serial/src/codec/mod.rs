//! Field codecs: the read/write operation pair bound to one field.
//!
//! ## Menu
//!
//! - [`Codec`]: a shared read/write closure pair for values of one type.
//! - [`FieldType`]: maps a Rust field type and its [`FieldMeta`] to a codec.
//! - [`object_codec`]: the ordinary object dispatch used for composite fields.
//!
//! | kind | modifier | read | write |
//! |---|---|---|---|
//! | `i8` byte | | unsigned 8-bit, reinterpreted | low 8 bits |
//! | `i16` short | | unsigned 16-bit, reinterpreted | low 16 bits |
//! | `i32` int | `compact` | compact integer | compact integer |
//! | `i32` int | `ushort` | unsigned 16-bit, widened | low 16 bits |
//! | `i32` int | `ubyte` | unsigned 8-bit, widened | low 8 bits |
//! | `i32` int | | fixed 32-bit | fixed 32-bit |
//! | `i64` long | | fixed 64-bit | fixed 64-bit |
//! | `f32` float | | IEEE-754 32-bit | IEEE-754 32-bit |
//! | `String` | `utf` | `i32`-length UTF-16 | `i32`-length UTF-16 |
//! | `String` | | line text | line text |
//! | `Vec<E>` array | `length` | length prefix, then `E` per element | |

use alloc::sync::Arc;
use core::fmt;

use crate::error::Result;
use crate::object::Context;
use crate::registry::Registry;
use crate::schema::{FieldMeta, Kind};
use crate::stream::{ObjectInput, ObjectOutput};

// -----------------------------------------------------------------------------
// Modules

mod array;
mod object;
mod primitive;

// -----------------------------------------------------------------------------
// Exports

pub use object::object_codec;

// -----------------------------------------------------------------------------
// Codec

type ReadFn<V, C> = dyn Fn(&mut ObjectInput<'_, C>) -> Result<V> + Send + Sync;
type WriteFn<V, C> = dyn Fn(&V, &mut ObjectOutput<'_, C>) -> Result<()> + Send + Sync;

/// Read/write operations for values of type `V`.
///
/// Built once per field when the owning plan compiles and cloned cheaply
/// into the steps that need it.
pub struct Codec<V, C: Context> {
    read: Arc<ReadFn<V, C>>,
    write: Arc<WriteFn<V, C>>,
}

impl<V, C: Context> Codec<V, C> {
    pub fn new(
        read: impl Fn(&mut ObjectInput<'_, C>) -> Result<V> + Send + Sync + 'static,
        write: impl Fn(&V, &mut ObjectOutput<'_, C>) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            read: Arc::new(read),
            write: Arc::new(write),
        }
    }

    #[inline]
    pub fn read(&self, input: &mut ObjectInput<'_, C>) -> Result<V> {
        (self.read)(input)
    }

    #[inline]
    pub fn write(&self, value: &V, output: &mut ObjectOutput<'_, C>) -> Result<()> {
        (self.write)(value, output)
    }
}

impl<V, C: Context> Clone for Codec<V, C> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            read: self.read.clone(),
            write: self.write.clone(),
        }
    }
}

impl<V, C: Context> fmt::Debug for Codec<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("value", &core::any::type_name::<V>())
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// FieldType

/// A Rust type usable as a built-in field.
///
/// Implemented for `i8`, `i16`, `i32`, `i64`, `f32`, `String` and `Vec<E>`.
/// `#[derive(Marshal)]` implements it for records and polymorphic enums
/// through [`object_codec`].
pub trait FieldType<C: Context>: Send + Sync + Sized + 'static {
    const KIND: Kind;

    /// Validates `meta` against this kind and builds the codec.
    fn codec(meta: &FieldMeta, registry: &Registry<C>) -> Result<Codec<Self, C>>;
}
