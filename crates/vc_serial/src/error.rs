use alloc::boxed::Box;
use core::error::Error as StdError;

use thiserror::Error;
use vc_stream::StreamError;

use crate::custom::TagWidth;
use crate::schema::{Kind, LengthPrefix};

// -----------------------------------------------------------------------------
// SchemaError

/// Why a [`SchemaType`](crate::SchemaType) could not be compiled into a plan.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("no constructor and no type-level custom serializer")]
    NoConstructor,

    #[error("field `{field}`: modifier `{modifier}` does not apply to {kind} values")]
    Modifier {
        field: &'static str,
        modifier: &'static str,
        kind: Kind,
    },

    #[error("field `{field}`: a length policy only applies to array fields")]
    Length { field: &'static str },

    #[error("field `{field}`: a custom serializer cannot be combined with other modifiers")]
    CustomModifiers { field: &'static str },

    #[error("field `{0}` is declared twice")]
    DuplicateField(&'static str),

    #[error("more than one ancestor declared")]
    DuplicateAncestor,
}

// -----------------------------------------------------------------------------
// MarshalError

/// Failure of a read, a write or a plan build.
///
/// Errors raised at any depth (array element, nested object, ancestor)
/// reach the caller unchanged. After a failed read the partially populated
/// value must be discarded.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MarshalError {
    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("cannot build a plan for `{type_name}`: {reason}")]
    Schema {
        type_name: &'static str,
        reason: SchemaError,
    },

    #[error("unknown discriminant {tag} for `{type_name}`")]
    UnknownDiscriminant { type_name: &'static str, tag: u32 },

    #[error("array of {len} elements does not fit a {prefix} length prefix")]
    LengthOverflow { len: usize, prefix: LengthPrefix },

    #[error("discriminant {tag} of `{type_name}` does not fit a {width:?} tag")]
    TagOverflow {
        type_name: &'static str,
        tag: u32,
        width: TagWidth,
    },

    #[error("plan for `{0}` was used before it was built")]
    Unbuilt(&'static str),

    #[error("value handed to the plan of `{expected}` has another type")]
    TypeMismatch { expected: &'static str },

    #[error(transparent)]
    Custom(Box<dyn StdError + Send + Sync>),
}

impl MarshalError {
    /// Wraps a serializer-specific failure.
    #[inline]
    pub fn custom(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Custom(err.into())
    }

    /// Returns the stream fault behind this error, if any.
    pub fn as_stream(&self) -> Option<&StreamError> {
        match self {
            Self::Stream(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T, E = MarshalError> = core::result::Result<T, E>;

// -----------------------------------------------------------------------------
// Tests
