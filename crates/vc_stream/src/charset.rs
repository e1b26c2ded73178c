use core::fmt;

use crate::{Result, StreamError};

// -----------------------------------------------------------------------------
// Charset

/// Encoding of the positive-length form of `line` text.
///
/// Text that the charset cannot represent falls back to UTF-16LE on write,
/// see [`DataOutput::write_line`](crate::DataOutput::write_line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Charset {
    /// ISO-8859-1: one byte per code point up to `U+00FF`.
    #[default]
    Latin1,
    /// UTF-8. Every string is representable.
    Utf8,
}

impl Charset {
    /// Canonical name, used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Latin1 => "ISO-8859-1",
            Self::Utf8 => "UTF-8",
        }
    }

    /// Encodes `text`, or returns `None` if a character is not representable.
    pub fn encode(self, text: &str) -> Option<Vec<u8>> {
        match self {
            Self::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).ok())
                .collect(),
            Self::Utf8 => Some(text.as_bytes().to_vec()),
        }
    }

    /// Decodes `bytes` in this charset.
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        match self {
            Self::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            Self::Utf8 => {
                String::from_utf8(bytes.to_vec()).map_err(|_| StreamError::MalformedText(self))
            }
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// UTF-16LE

pub(crate) fn encode_utf16le(units: impl Iterator<Item = u16>) -> Vec<u8> {
    units.flat_map(u16::to_le_bytes).collect()
}

pub(crate) fn decode_utf16le(bytes: &[u8]) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(StreamError::MalformedUtf16);
    }
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|_| StreamError::MalformedUtf16)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Charset, decode_utf16le, encode_utf16le};

    #[test]
    fn latin1_rejects_wide_chars() {
        assert_eq!(Charset::Latin1.encode("caf\u{e9}"), Some(vec![b'c', b'a', b'f', 0xE9]));
        assert_eq!(Charset::Latin1.encode("\u{41f}"), None);
        assert_eq!(Charset::Latin1.decode(&[0xE9]).unwrap(), "\u{e9}");
    }

    #[test]
    fn utf8_rejects_invalid_bytes() {
        assert!(Charset::Utf8.decode(&[0xFF, 0xFE]).is_err());
        assert_eq!(Charset::Utf8.encode("\u{41f}").unwrap().len(), 2);
    }

    #[test]
    fn utf16_pairs() {
        let bytes = encode_utf16le("a\u{1F600}".encode_utf16());
        assert_eq!(bytes.len(), 6);
        assert_eq!(decode_utf16le(&bytes).unwrap(), "a\u{1F600}");
        assert!(decode_utf16le(&bytes[..5]).is_err());
    }
}
