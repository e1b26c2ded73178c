use core::fmt;

use bitflags::bitflags;

use crate::error::{MarshalError, SchemaError};

// -----------------------------------------------------------------------------
// Kind

/// Primitive-kind tag of a field, the closed set of shapes the engine knows
/// how to transcode without a custom serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Byte,
    Short,
    Int,
    Long,
    Float,
    String,
    Array,
    Object,
}

impl Kind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// Modifiers

bitflags! {
    /// Encoding annotations of a field.
    ///
    /// On array fields the modifiers describe the elements.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// `int` as a compact variable-length integer.
        const COMPACT = 1 << 0;
        /// `int` as an unsigned 16-bit value.
        const USHORT  = 1 << 1;
        /// `int` as an unsigned 8-bit value.
        const UBYTE   = 1 << 2;
        /// `string` as `i32`-length UTF-16 text instead of a line.
        const UTF     = 1 << 3;
    }
}

impl Modifiers {
    /// Modifiers that select an `int` encoding.
    pub const INT_ENCODING: Self = Self::COMPACT.union(Self::USHORT).union(Self::UBYTE);

    /// Selected `int` encoding. `Compact > UShort > UByte > Fixed`.
    pub const fn int_encoding(self) -> IntEncoding {
        if self.contains(Self::COMPACT) {
            IntEncoding::Compact
        } else if self.contains(Self::USHORT) {
            IntEncoding::UShort
        } else if self.contains(Self::UBYTE) {
            IntEncoding::UByte
        } else {
            IntEncoding::Fixed
        }
    }

    /// Attribute name of the lowest set flag, for diagnostics.
    pub(crate) fn first_name(self) -> &'static str {
        if self.contains(Self::COMPACT) {
            "compact"
        } else if self.contains(Self::USHORT) {
            "ushort"
        } else if self.contains(Self::UBYTE) {
            "ubyte"
        } else if self.contains(Self::UTF) {
            "utf"
        } else {
            "none"
        }
    }
}

/// Wire form of an `int` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntEncoding {
    Fixed,
    Compact,
    UShort,
    UByte,
}

// -----------------------------------------------------------------------------
// LengthPrefix

/// Width of an array's element count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LengthPrefix {
    /// Unsigned 8-bit, `0..=255`.
    Byte,
    /// Fixed signed 32-bit.
    Int,
    /// Compact variable-length integer.
    #[default]
    Compact,
}

impl LengthPrefix {
    /// Largest element count the prefix can carry.
    pub const fn max_len(self) -> usize {
        match self {
            Self::Byte => u8::MAX as usize,
            Self::Int | Self::Compact => i32::MAX as usize,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Int => "int",
            Self::Compact => "compact",
        }
    }
}

impl fmt::Display for LengthPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// FieldMeta

/// What a codec sees of the field it is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    /// Name of the type declaring the field.
    pub owner: &'static str,
    pub name: &'static str,
    pub modifiers: Modifiers,
    pub length: Option<LengthPrefix>,
}

impl FieldMeta {
    #[inline]
    pub const fn new(owner: &'static str, name: &'static str) -> Self {
        Self {
            owner,
            name,
            modifiers: Modifiers::empty(),
            length: None,
        }
    }

    /// Declared length policy, compact when unspecified.
    #[inline]
    pub fn length_prefix(&self) -> LengthPrefix {
        self.length.unwrap_or_default()
    }

    /// Wraps `reason` into a schema error of the owning type.
    #[inline]
    pub fn schema_error(&self, reason: SchemaError) -> MarshalError {
        MarshalError::Schema {
            type_name: self.owner,
            reason,
        }
    }

    /// Fails unless every modifier on this field is in `allowed`.
    pub fn allow_modifiers(&self, kind: Kind, allowed: Modifiers) -> Result<(), MarshalError> {
        let extra = self.modifiers.difference(allowed);
        if extra.is_empty() {
            return Ok(());
        }
        Err(self.schema_error(SchemaError::Modifier {
            field: self.name,
            modifier: extra.first_name(),
            kind,
        }))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{FieldMeta, IntEncoding, Kind, LengthPrefix, Modifiers};
    use crate::{MarshalError, SchemaError};

    #[test]
    fn int_encoding_precedence() {
        let all = Modifiers::COMPACT | Modifiers::USHORT | Modifiers::UBYTE;
        assert_eq!(all.int_encoding(), IntEncoding::Compact);
        assert_eq!((Modifiers::USHORT | Modifiers::UBYTE).int_encoding(), IntEncoding::UShort);
        assert_eq!(Modifiers::UBYTE.int_encoding(), IntEncoding::UByte);
        assert_eq!(Modifiers::UTF.int_encoding(), IntEncoding::Fixed);
        assert_eq!(Modifiers::empty().int_encoding(), IntEncoding::Fixed);
    }

    #[test]
    fn length_defaults_to_compact() {
        let mut meta = FieldMeta::new("Foo", "items");
        assert_eq!(meta.length_prefix(), LengthPrefix::Compact);
        meta.length = Some(LengthPrefix::Byte);
        assert_eq!(meta.length_prefix().max_len(), 255);
    }

    #[test]
    fn allow_modifiers_reports_first_offender() {
        let mut meta = FieldMeta::new("Foo", "name");
        meta.modifiers = Modifiers::UTF | Modifiers::USHORT;

        assert!(meta.allow_modifiers(Kind::String, Modifiers::UTF | Modifiers::USHORT).is_ok());

        let err = meta.allow_modifiers(Kind::String, Modifiers::UTF).unwrap_err();
        assert!(matches!(
            err,
            MarshalError::Schema {
                type_name: "Foo",
                reason: SchemaError::Modifier {
                    field: "name",
                    modifier: "ushort",
                    kind: Kind::String,
                },
            }
        ));
    }
}
