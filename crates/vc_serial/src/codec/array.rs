use alloc::vec::Vec;

use vc_stream::{DataInput, DataOutput, StreamError};

use crate::codec::{Codec, FieldType};
use crate::error::{MarshalError, Result};
use crate::object::Context;
use crate::registry::Registry;
use crate::schema::{FieldMeta, Kind, LengthPrefix};

/// Upper bound of the up-front reservation for a decoded array, so a corrupt
/// length fails on EOF instead of on allocation.
const PREALLOC_LIMIT: usize = 4096;

fn read_len(prefix: LengthPrefix, input: &mut dyn DataInput) -> Result<usize> {
    let len = match prefix {
        LengthPrefix::Byte => return Ok(usize::from(input.read_unsigned_byte()?)),
        LengthPrefix::Int => input.read_int()?,
        LengthPrefix::Compact => input.read_compact_int()?,
    };
    usize::try_from(len).map_err(|_| StreamError::InvalidLength(i64::from(len)).into())
}

fn write_len(prefix: LengthPrefix, len: usize, output: &mut dyn DataOutput) -> Result<()> {
    if len > prefix.max_len() {
        return Err(MarshalError::LengthOverflow { len, prefix });
    }
    match prefix {
        LengthPrefix::Byte => output.write_byte(len as u8)?,
        LengthPrefix::Int => output.write_int(len as i32)?,
        LengthPrefix::Compact => output.write_compact_int(len as i32)?,
    }
    Ok(())
}

/// Arrays take the field's length policy for their own prefix and hand the
/// remaining modifiers to the element codec. Nested arrays reuse the same
/// policy at every level.
impl<C: Context, E: FieldType<C>> FieldType<C> for Vec<E> {
    const KIND: Kind = Kind::Array;

    fn codec(meta: &FieldMeta, registry: &Registry<C>) -> Result<Codec<Self, C>> {
        let prefix = meta.length_prefix();
        let element = E::codec(meta, registry)?;
        let read_element = element.clone();

        Ok(Codec::new(
            move |input| {
                let len = read_len(prefix, &mut **input)?;
                let mut items = Vec::with_capacity(len.min(PREALLOC_LIMIT));
                for _ in 0..len {
                    items.push(read_element.read(input)?);
                }
                Ok(items)
            },
            move |items: &Vec<E>, output| {
                write_len(prefix, items.len(), &mut **output)?;
                for item in items {
                    element.write(item, output)?;
                }
                Ok(())
            },
        ))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use proptest::prelude::*;

    use crate::codec::{Codec, FieldType};
    use crate::schema::{FieldMeta, LengthPrefix, Modifiers};
    use crate::testing::{decode, encode};
    use crate::{MarshalError, Registry, SchemaError};

    fn codec<V: FieldType<()>>(
        registry: &Registry<()>,
        modifiers: Modifiers,
        length: Option<LengthPrefix>,
    ) -> Codec<V, ()> {
        let mut meta = FieldMeta::new("Sample", "items");
        meta.modifiers = modifiers;
        meta.length = length;
        V::codec(&meta, registry).unwrap()
    }

    #[test]
    fn ushort_elements_behind_compact_length() {
        let registry = Registry::new();
        let codec = codec::<Vec<i32>>(&registry, Modifiers::USHORT, Some(LengthPrefix::Compact));
        let bytes = encode(&registry, |output| codec.write(&vec![1, 2, 3], output));
        assert_eq!(bytes, [0x03, 1, 0, 2, 0, 3, 0]);
    }

    #[test]
    fn prefix_widths() {
        let registry = Registry::new();
        let items = vec![7_i32];

        let byte = codec::<Vec<i32>>(&registry, Modifiers::UBYTE, Some(LengthPrefix::Byte));
        assert_eq!(encode(&registry, |o| byte.write(&items, o)), [1, 7]);

        let int = codec::<Vec<i32>>(&registry, Modifiers::UBYTE, Some(LengthPrefix::Int));
        assert_eq!(encode(&registry, |o| int.write(&items, o)), [1, 0, 0, 0, 7]);
    }

    #[test]
    fn byte_prefix_boundary() {
        let registry = Registry::new();
        let codec = codec::<Vec<i32>>(&registry, Modifiers::UBYTE, Some(LengthPrefix::Byte));

        let full = vec![1_i32; 255];
        let bytes = encode(&registry, |o| codec.write(&full, o));
        assert_eq!(bytes[0], 0xFF);
        assert_eq!(decode(&registry, &bytes, |i| codec.read(i)), full);

        let mut sink = Vec::new();
        let err = crate::testing::try_encode(&registry, &mut sink, |o| codec.write(&vec![1_i32; 256], o))
            .unwrap_err();
        assert!(matches!(
            err,
            MarshalError::LengthOverflow { len: 256, prefix: LengthPrefix::Byte }
        ));
        // Nothing of the rejected array reaches the stream.
        assert!(sink.is_empty());
    }

    #[test]
    fn negative_length_is_a_stream_error() {
        let registry = Registry::new();
        let codec = codec::<Vec<i32>>(&registry, Modifiers::empty(), Some(LengthPrefix::Int));
        let err = crate::testing::try_decode(&registry, &[0xFF, 0xFF, 0xFF, 0xFF], |i| codec.read(i))
            .unwrap_err();
        assert!(matches!(
            err.as_stream(),
            Some(vc_stream::StreamError::InvalidLength(-1))
        ));
    }

    #[test]
    fn nested_arrays_share_policy() {
        let registry = Registry::new();
        let codec = codec::<Vec<Vec<i32>>>(&registry, Modifiers::UBYTE, Some(LengthPrefix::Byte));
        let nested = vec![vec![1, 2], Vec::new(), vec![3]];
        let bytes = encode(&registry, |o| codec.write(&nested, o));
        assert_eq!(bytes, [3, 2, 1, 2, 0, 1, 3]);
        assert_eq!(decode(&registry, &bytes, |i| codec.read(i)), nested);
    }

    #[test]
    fn element_modifiers_are_validated() {
        let registry = Registry::<()>::new();
        let mut meta = FieldMeta::new("Sample", "names");
        meta.modifiers = Modifiers::COMPACT;
        let err = <Vec<String> as FieldType<()>>::codec(&meta, &registry).unwrap_err();
        assert!(matches!(err, MarshalError::Schema { reason: SchemaError::Modifier { .. }, .. }));
    }

    proptest! {
        #[test]
        fn arrays_round_trip(
            items in proptest::collection::vec(any::<i32>(), 0..300),
            policy in prop_oneof![
                Just(LengthPrefix::Byte),
                Just(LengthPrefix::Int),
                Just(LengthPrefix::Compact),
            ],
        ) {
            let registry = Registry::new();
            let codec = codec::<Vec<i32>>(&registry, Modifiers::COMPACT, Some(policy));
            let mut bytes = Vec::new();
            let written = crate::testing::try_encode(&registry, &mut bytes, |o| codec.write(&items, o));

            if items.len() > 255 && policy == LengthPrefix::Byte {
                let overflowed = matches!(written, Err(MarshalError::LengthOverflow { .. }));
                prop_assert!(overflowed);
            } else {
                prop_assert!(written.is_ok());
                prop_assert_eq!(decode(&registry, &bytes, |i| codec.read(i)), items);
            }
        }
    }
}
