//! Custom serializers: user code that takes over a field or a whole type.
//!
//! A [`Serializer`] replaces all built-in handling. The typical use is
//! polymorphic instantiation: read a discriminant, pick the concrete type,
//! then let that type's compiled plan populate it. [`Tagged`] is the
//! built-in serializer for closed polymorphic enums, driven by their
//! [`Variants`] mapping.

use crate::error::Result;
use crate::object::Context;
use crate::stream::{ObjectInput, ObjectOutput};

// -----------------------------------------------------------------------------
// Modules

mod tagged;

// -----------------------------------------------------------------------------
// Exports

pub use tagged::{TagWidth, Tagged, Variants};

// -----------------------------------------------------------------------------
// Serializer

/// Whole-value read/write of `T`, replacing the built-in handling.
///
/// One instance per registry is shared by every field and type naming the
/// serializer, so implementations must not keep per-call state.
///
/// The engine provides no reverse mapping between [`write_object`] and
/// [`instantiate`]: the author keeps the discriminant logic of both sides
/// consistent.
///
/// [`write_object`]: Serializer::write_object
/// [`instantiate`]: Serializer::instantiate
pub trait Serializer<T, C: Context>: Send + Sync + 'static {
    /// Creates an empty value, possibly consuming a leading discriminant.
    fn instantiate(&self, input: &mut ObjectInput<'_, C>) -> Result<T>;

    /// Populates `obj`, usually through [`ObjectInput::read_into`].
    fn read_object(&self, obj: &mut T, input: &mut ObjectInput<'_, C>) -> Result<()>;

    /// Writes `obj`, including whatever [`instantiate`](Serializer::instantiate)
    /// expects to read first.
    fn write_object(&self, obj: &T, output: &mut ObjectOutput<'_, C>) -> Result<()>;
}
