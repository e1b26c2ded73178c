use alloc::string::String;

use vc_stream::{DataInput, DataOutput};

use crate::codec::{Codec, FieldType};
use crate::error::Result;
use crate::object::Context;
use crate::registry::Registry;
use crate::schema::{FieldMeta, IntEncoding, Kind, Modifiers};

impl<C: Context> FieldType<C> for i8 {
    const KIND: Kind = Kind::Byte;

    fn codec(meta: &FieldMeta, _: &Registry<C>) -> Result<Codec<Self, C>> {
        meta.allow_modifiers(Kind::Byte, Modifiers::empty())?;
        Ok(Codec::new(
            |input| Ok(input.read_unsigned_byte()? as i8),
            |value, output| Ok(output.write_byte(*value as u8)?),
        ))
    }
}

impl<C: Context> FieldType<C> for i16 {
    const KIND: Kind = Kind::Short;

    fn codec(meta: &FieldMeta, _: &Registry<C>) -> Result<Codec<Self, C>> {
        meta.allow_modifiers(Kind::Short, Modifiers::empty())?;
        Ok(Codec::new(
            |input| Ok(input.read_unsigned_short()? as i16),
            |value, output| Ok(output.write_short(*value as u16)?),
        ))
    }
}

impl<C: Context> FieldType<C> for i32 {
    const KIND: Kind = Kind::Int;

    fn codec(meta: &FieldMeta, _: &Registry<C>) -> Result<Codec<Self, C>> {
        meta.allow_modifiers(Kind::Int, Modifiers::INT_ENCODING)?;
        Ok(match meta.modifiers.int_encoding() {
            IntEncoding::Compact => Codec::new(
                |input| Ok(input.read_compact_int()?),
                |value, output| Ok(output.write_compact_int(*value)?),
            ),
            IntEncoding::UShort => Codec::new(
                |input| Ok(i32::from(input.read_unsigned_short()?)),
                |value, output| Ok(output.write_short(*value as u16)?),
            ),
            IntEncoding::UByte => Codec::new(
                |input| Ok(i32::from(input.read_unsigned_byte()?)),
                |value, output| Ok(output.write_byte(*value as u8)?),
            ),
            IntEncoding::Fixed => Codec::new(
                |input| Ok(input.read_int()?),
                |value, output| Ok(output.write_int(*value)?),
            ),
        })
    }
}

impl<C: Context> FieldType<C> for i64 {
    const KIND: Kind = Kind::Long;

    fn codec(meta: &FieldMeta, _: &Registry<C>) -> Result<Codec<Self, C>> {
        meta.allow_modifiers(Kind::Long, Modifiers::empty())?;
        Ok(Codec::new(
            |input| Ok(input.read_long()?),
            |value, output| Ok(output.write_long(*value)?),
        ))
    }
}

impl<C: Context> FieldType<C> for f32 {
    const KIND: Kind = Kind::Float;

    fn codec(meta: &FieldMeta, _: &Registry<C>) -> Result<Codec<Self, C>> {
        meta.allow_modifiers(Kind::Float, Modifiers::empty())?;
        Ok(Codec::new(
            |input| Ok(input.read_float()?),
            |value, output| Ok(output.write_float(*value)?),
        ))
    }
}

impl<C: Context> FieldType<C> for String {
    const KIND: Kind = Kind::String;

    fn codec(meta: &FieldMeta, _: &Registry<C>) -> Result<Codec<Self, C>> {
        meta.allow_modifiers(Kind::String, Modifiers::UTF)?;
        Ok(if meta.modifiers.contains(Modifiers::UTF) {
            Codec::new(
                |input| Ok(input.read_utf()?),
                |value: &String, output| Ok(output.write_utf(value)?),
            )
        } else {
            Codec::new(
                |input| Ok(input.read_line()?),
                |value: &String, output| Ok(output.write_line(value)?),
            )
        })
    }
}

// -----------------------------------------------------------------------------
// Tests
