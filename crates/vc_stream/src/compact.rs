//! Compact (variable-length) signed integer codec.
//!
//! ```text
//! byte 0     : S C M M M M M M   S = sign, C = continue, 6 magnitude bits
//! byte 1..=3 : C M M M M M M M   C = continue, 7 magnitude bits
//! byte 4     : - - - M M M M M   5 magnitude bits, never continues
//! ```
//!
//! The magnitude is stored least significant group first. Trailing zero
//! groups are dropped, so values in `-63..=63` take a single byte.
//!
//! The full `i32` range round-trips. `i32::MIN` has magnitude `2^31`, which
//! decodes back to `i32::MIN` through wrapping negation.

/// Largest number of bytes a compact integer occupies.
pub const MAX_LEN: usize = 5;

const SIGN: u8 = 0x80;
const FIRST_CONTINUE: u8 = 0x40;
const CONTINUE: u8 = 0x80;

/// Encodes `value`, returning the buffer and the number of used bytes.
pub fn encode(value: i32) -> ([u8; MAX_LEN], usize) {
    let magnitude = value.unsigned_abs();
    let mut bytes = [
        (magnitude & 0x3F) as u8,
        ((magnitude >> 6) & 0x7F) as u8,
        ((magnitude >> 13) & 0x7F) as u8,
        ((magnitude >> 20) & 0x7F) as u8,
        ((magnitude >> 27) & 0x1F) as u8,
    ];
    if value < 0 {
        bytes[0] |= SIGN;
    }

    let mut len = MAX_LEN;
    while len > 1 && bytes[len - 1] == 0 {
        len -= 1;
    }
    for (index, byte) in bytes.iter_mut().take(len - 1).enumerate() {
        *byte |= if index == 0 { FIRST_CONTINUE } else { CONTINUE };
    }

    (bytes, len)
}

/// Number of bytes [`encode`] produces for `value`.
#[inline]
pub fn encoded_len(value: i32) -> usize {
    encode(value).1
}

/// Decodes one compact integer, pulling bytes from `next`.
pub fn decode<E>(mut next: impl FnMut() -> Result<u8, E>) -> Result<i32, E> {
    let mut magnitude = 0u32;
    let mut negative = false;

    for index in 0..MAX_LEN {
        let byte = next()?;
        match index {
            0 => {
                negative = byte & SIGN != 0;
                magnitude |= u32::from(byte & 0x3F);
                if byte & FIRST_CONTINUE == 0 {
                    break;
                }
            }
            4 => magnitude |= u32::from(byte & 0x1F) << 27,
            _ => {
                magnitude |= u32::from(byte & 0x7F) << (6 + (index - 1) * 7);
                if byte & CONTINUE == 0 {
                    break;
                }
            }
        }
    }

    let value = magnitude as i32;
    Ok(if negative { value.wrapping_neg() } else { value })
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{decode, encode};

    fn bytes_of(value: i32) -> Vec<u8> {
        let (buf, len) = encode(value);
        buf[..len].to_vec()
    }

    fn decode_all(bytes: &[u8]) -> i32 {
        let mut iter = bytes.iter().copied();
        let value = decode(|| iter.next().ok_or(())).unwrap();
        assert!(iter.next().is_none(), "decoder left bytes behind");
        value
    }

    #[test]
    fn known_layouts() {
        assert_eq!(bytes_of(0), [0x00]);
        assert_eq!(bytes_of(1), [0x01]);
        assert_eq!(bytes_of(-1), [0x81]);
        assert_eq!(bytes_of(63), [0x3F]);
        assert_eq!(bytes_of(64), [0x40, 0x01]);
        assert_eq!(bytes_of(-64), [0xC0, 0x01]);
        assert_eq!(bytes_of(8191), [0x7F, 0x7F]);
        assert_eq!(bytes_of(8192), [0x40, 0x80, 0x01]);
        assert_eq!(bytes_of(i32::MAX), [0x7F, 0xFF, 0xFF, 0xFF, 0x0F]);
        assert_eq!(bytes_of(i32::MIN), [0xC0, 0x80, 0x80, 0x80, 0x10]);
    }

    #[test]
    fn boundaries() {
        for value in [0, -1, 1, 63, -63, 64, i32::MAX, i32::MIN, i32::MIN + 1] {
            assert_eq!(decode_all(&bytes_of(value)), value, "value {value}");
        }
    }

    #[test]
    fn truncated_input_fails() {
        let bytes = bytes_of(100_000);
        let mut iter = bytes[..1].iter().copied();
        assert!(decode(|| iter.next().ok_or(())).is_err());
    }

    proptest! {
        #[test]
        fn round_trip(value in any::<i32>()) {
            prop_assert_eq!(decode_all(&bytes_of(value)), value);
        }
    }
}
