use core::any::type_name;
use core::fmt;
use core::marker::PhantomData;

use vc_stream::{DataInput, DataOutput};

use crate::custom::Serializer;
use crate::error::{MarshalError, Result};
use crate::object::{Context, Marshal};
use crate::stream::{ObjectInput, ObjectOutput};

// -----------------------------------------------------------------------------
// TagWidth

/// Wire form of a discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TagWidth {
    /// Unsigned 8-bit.
    #[default]
    Byte,
    /// Fixed 32-bit.
    Int,
    /// Compact variable-length integer.
    Compact,
}

impl TagWidth {
    /// Largest tag the width can carry.
    pub const fn max_tag(self) -> u32 {
        match self {
            Self::Byte => u8::MAX as u32,
            Self::Int | Self::Compact => u32::MAX,
        }
    }

    fn read(self, input: &mut dyn DataInput) -> Result<u32> {
        Ok(match self {
            Self::Byte => u32::from(input.read_unsigned_byte()?),
            Self::Int => input.read_int()? as u32,
            Self::Compact => input.read_compact_int()? as u32,
        })
    }

    fn write(self, type_name: &'static str, tag: u32, output: &mut dyn DataOutput) -> Result<()> {
        if tag > self.max_tag() {
            return Err(MarshalError::TagOverflow {
                type_name,
                tag,
                width: self,
            });
        }
        match self {
            Self::Byte => output.write_byte(tag as u8)?,
            Self::Int => output.write_int(tag as i32)?,
            Self::Compact => output.write_compact_int(tag as i32)?,
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Variants

/// The registered discriminant mapping of a closed polymorphic type.
///
/// Derived for enums by `#[derive(Marshal)]`, where each variant wraps one
/// concrete record and carries `#[marshal(tag = N)]`.
pub trait Variants: Sized {
    const TAG_WIDTH: TagWidth;

    /// Discriminant of the active variant.
    fn tag(&self) -> u32;

    /// Empty value of the variant registered under `tag`.
    fn from_tag(tag: u32) -> Option<Self>;

    /// Empty value used for unregistered tags, `None` to reject them.
    fn fallback() -> Option<Self>;
}

// -----------------------------------------------------------------------------
// Tagged

/// Discriminant-first [`Serializer`] for a [`Variants`] type.
///
/// Reads the tag, instantiates the registered variant and populates it with
/// the payload's own plan. An unregistered tag resolves to
/// [`Variants::fallback`] with a warning, or fails with
/// [`MarshalError::UnknownDiscriminant`] when the type has no fallback.
pub struct Tagged<T>(PhantomData<fn() -> T>);

impl<T> Default for Tagged<T> {
    #[inline]
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T> fmt::Debug for Tagged<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tagged<{}>", type_name::<T>())
    }
}

impl<T: Variants + Marshal<C>, C: Context> Serializer<T, C> for Tagged<T> {
    fn instantiate(&self, input: &mut ObjectInput<'_, C>) -> Result<T> {
        let tag = T::TAG_WIDTH.read(&mut **input)?;
        if let Some(obj) = T::from_tag(tag) {
            return Ok(obj);
        }
        match T::fallback() {
            Some(obj) => {
                log::warn!(
                    "unknown discriminant {tag} for `{}`, using the fallback variant",
                    type_name::<T>()
                );
                Ok(obj)
            }
            None => Err(MarshalError::UnknownDiscriminant {
                type_name: type_name::<T>(),
                tag,
            }),
        }
    }

    #[inline]
    fn read_object(&self, obj: &mut T, input: &mut ObjectInput<'_, C>) -> Result<()> {
        input.read_into(obj)
    }

    fn write_object(&self, obj: &T, output: &mut ObjectOutput<'_, C>) -> Result<()> {
        T::TAG_WIDTH.write(type_name::<T>(), obj.tag(), &mut **output)?;
        output.write_fields(obj)
    }
}

// -----------------------------------------------------------------------------
// Tests
