use std::io::Write;

use crate::charset::encode_utf16le;
use crate::{Charset, Result, StreamError, compact};

#[inline]
fn prefix_len(len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| StreamError::LengthOverflow(len))
}

// -----------------------------------------------------------------------------
// DataOutput

/// Write side of the byte stream contract, the mirror of
/// [`DataInput`](crate::DataInput).
pub trait DataOutput {
    /// Writes all of `buf` or fails.
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()>;

    /// Charset of positive-length `line` text.
    fn charset(&self) -> Charset;

    /// Offset of the next byte, counted from the start of the enclosing
    /// container.
    fn position(&self) -> u64;

    fn write_byte(&mut self, value: u8) -> Result<()> {
        self.write_bytes(&[value])
    }

    fn write_short(&mut self, value: u16) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    fn write_int(&mut self, value: i32) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    fn write_long(&mut self, value: i64) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    fn write_float(&mut self, value: f32) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    fn write_compact_int(&mut self, value: i32) -> Result<()> {
        let (buf, len) = compact::encode(value);
        self.write_bytes(&buf[..len])
    }

    /// Writes NUL-terminated text behind a compact length.
    ///
    /// Uses the stream charset when it can represent every character,
    /// UTF-16LE (negative length) otherwise. Empty text is a single `0`.
    fn write_line(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return self.write_compact_int(0);
        }

        match self.charset().encode(text) {
            Some(mut bytes) => {
                bytes.push(0);
                self.write_compact_int(prefix_len(bytes.len())?)?;
                self.write_bytes(&bytes)
            }
            None => {
                let units = text.encode_utf16().chain([0]).count();
                let len = prefix_len(units)?;
                self.write_compact_int(-len)?;
                self.write_bytes(&encode_utf16le(text.encode_utf16().chain([0])))
            }
        }
    }

    /// Writes UTF-16LE text behind a fixed `i32` byte length.
    fn write_utf(&mut self, text: &str) -> Result<()> {
        let bytes = encode_utf16le(text.encode_utf16());
        self.write_int(prefix_len(bytes.len())?)?;
        self.write_bytes(&bytes)
    }

    /// Writes a raw byte block behind a compact length.
    fn write_byte_array(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_compact_int(prefix_len(bytes.len())?)?;
        self.write_bytes(bytes)
    }
}

impl<D: DataOutput + ?Sized> DataOutput for &mut D {
    #[inline]
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write_bytes(buf)
    }

    #[inline]
    fn charset(&self) -> Charset {
        (**self).charset()
    }

    #[inline]
    fn position(&self) -> u64 {
        (**self).position()
    }
}

// -----------------------------------------------------------------------------
// DataOutputStream

/// [`DataOutput`] over any [`Write`].
#[derive(Debug)]
pub struct DataOutputStream<W> {
    inner: W,
    charset: Charset,
    position: u64,
}

impl<W: Write> DataOutputStream<W> {
    /// Creates a stream positioned at offset `0`.
    #[inline]
    pub fn new(inner: W, charset: Charset) -> Self {
        Self::with_position(inner, charset, 0)
    }

    /// Creates a stream whose first byte lands at `position` inside the
    /// enclosing container.
    #[inline]
    pub fn with_position(inner: W, charset: Charset, position: u64) -> Self {
        Self {
            inner,
            charset,
            position,
        }
    }

    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Flushes the sink.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush().map_err(|source| StreamError::Io {
            position: self.position,
            source,
        })
    }

    #[inline]
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> DataOutput for DataOutputStream<W> {
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.inner
            .write_all(buf)
            .map_err(|source| StreamError::Io {
                position: self.position,
                source,
            })?;
        self.position += buf.len() as u64;
        Ok(())
    }

    #[inline]
    fn charset(&self) -> Charset {
        self.charset
    }

    #[inline]
    fn position(&self) -> u64 {
        self.position
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{DataOutput, DataOutputStream};
    use crate::{Charset, DataInput, DataInputStream};

    fn written(charset: Charset, f: impl FnOnce(&mut DataOutputStream<Vec<u8>>)) -> Vec<u8> {
        let mut output = DataOutputStream::new(Vec::new(), charset);
        f(&mut output);
        output.into_inner()
    }

    #[test]
    fn line_prefers_charset() {
        let bytes = written(Charset::Latin1, |o| o.write_line("abc").unwrap());
        assert_eq!(bytes, [0x04, b'a', b'b', b'c', 0x00]);
    }

    #[test]
    fn line_falls_back_to_utf16() {
        let bytes = written(Charset::Latin1, |o| o.write_line("\u{41f}").unwrap());
        assert_eq!(bytes, [0x82, 0x1F, 0x04, 0x00, 0x00]);

        // UTF-8 represents everything, so no fallback happens.
        let bytes = written(Charset::Utf8, |o| o.write_line("\u{41f}").unwrap());
        assert_eq!(bytes, [0x03, 0xD0, 0x9F, 0x00]);
    }

    #[test]
    fn empty_line_is_single_zero() {
        assert_eq!(written(Charset::Latin1, |o| o.write_line("").unwrap()), [0x00]);
    }

    #[test]
    fn utf_layout() {
        let bytes = written(Charset::Latin1, |o| o.write_utf("hi").unwrap());
        assert_eq!(bytes, [4, 0, 0, 0, b'h', 0, b'i', 0]);
    }

    #[test]
    fn position_tracks_written_bytes() {
        let mut output = DataOutputStream::with_position(Vec::new(), Charset::Latin1, 10);
        output.write_int(7).unwrap();
        output.write_byte_array(&[1, 2, 3]).unwrap();
        assert_eq!(output.position(), 18);
    }

    proptest! {
        #[test]
        fn text_round_trip(text in any::<String>(), latin1 in any::<bool>()) {
            let charset = if latin1 { Charset::Latin1 } else { Charset::Utf8 };
            let bytes = written(charset, |o| {
                o.write_line(&text).unwrap();
                o.write_utf(&text).unwrap();
            });
            let mut input = DataInputStream::new(bytes.as_slice(), charset);
            prop_assert_eq!(input.read_line().unwrap(), text.clone());
            prop_assert_eq!(input.read_utf().unwrap(), text);
        }

        #[test]
        fn block_round_trip(block in proptest::collection::vec(any::<u8>(), 0..512)) {
            let bytes = written(Charset::Latin1, |o| o.write_byte_array(&block).unwrap());
            let mut input = DataInputStream::new(bytes.as_slice(), Charset::Latin1);
            prop_assert_eq!(input.read_byte_array().unwrap(), block);
        }
    }
}
