use std::io::Read;

use crate::charset::decode_utf16le;
use crate::{Charset, Result, StreamError, compact};

/// Upper bound of a single allocation while reading length-prefixed data,
/// so a corrupt prefix fails on EOF instead of reserving gigabytes.
const READ_CHUNK: usize = 64 * 1024;

// -----------------------------------------------------------------------------
// DataInput

/// Read side of the byte stream contract.
///
/// Implementors provide [`read_fully`](DataInput::read_fully); every typed
/// read is built on top of it. The trait is object safe so that higher
/// layers can hold a `&mut dyn DataInput` regardless of the byte source.
pub trait DataInput {
    /// Fills `buf` completely or fails.
    fn read_fully(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Charset of positive-length `line` text.
    fn charset(&self) -> Charset;

    /// Offset of the next byte, counted from the start of the enclosing
    /// container.
    fn position(&self) -> u64;

    /// Reads exactly `len` bytes.
    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(len.min(READ_CHUNK));
        while bytes.len() < len {
            let start = bytes.len();
            let end = (start + READ_CHUNK).min(len);
            bytes.resize(end, 0);
            self.read_fully(&mut bytes[start..])?;
        }
        Ok(bytes)
    }

    /// Discards `len` bytes.
    fn skip(&mut self, len: usize) -> Result<()> {
        let mut scratch = [0u8; 256];
        let mut remaining = len;
        while remaining > 0 {
            let step = remaining.min(scratch.len());
            self.read_fully(&mut scratch[..step])?;
            remaining -= step;
        }
        Ok(())
    }

    fn read_unsigned_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_fully(&mut buf)?;
        Ok(buf[0])
    }

    fn read_byte(&mut self) -> Result<i8> {
        self.read_unsigned_byte().map(|b| b as i8)
    }

    fn read_unsigned_short(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_fully(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn read_short(&mut self) -> Result<i16> {
        self.read_unsigned_short().map(|v| v as i16)
    }

    fn read_int(&mut self) -> Result<i32> {
        let mut buf = [0u8; 4];
        self.read_fully(&mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }

    fn read_long(&mut self) -> Result<i64> {
        let mut buf = [0u8; 8];
        self.read_fully(&mut buf)?;
        Ok(i64::from_le_bytes(buf))
    }

    fn read_float(&mut self) -> Result<f32> {
        let mut buf = [0u8; 4];
        self.read_fully(&mut buf)?;
        Ok(f32::from_le_bytes(buf))
    }

    /// See [`compact`](crate::compact) for the layout.
    fn read_compact_int(&mut self) -> Result<i32> {
        compact::decode(|| self.read_unsigned_byte())
    }

    /// Reads NUL-terminated text behind a compact length.
    ///
    /// A positive length counts charset bytes, a negative one counts UTF-16LE
    /// code units. The NUL terminator is checked and stripped.
    fn read_line(&mut self) -> Result<String> {
        let len = self.read_compact_int()?;
        if len == 0 {
            return Ok(String::new());
        }

        if len > 0 {
            let mut bytes = self.read_bytes(len as usize)?;
            if bytes.pop() != Some(0) {
                return Err(StreamError::MalformedText(self.charset()));
            }
            self.charset().decode(&bytes)
        } else {
            let units = len.unsigned_abs() as usize;
            let mut bytes = self.read_bytes(units * 2)?;
            if bytes.split_off(bytes.len() - 2) != [0, 0] {
                return Err(StreamError::MalformedUtf16);
            }
            decode_utf16le(&bytes)
        }
    }

    /// Reads UTF-16LE text behind a fixed `i32` byte length.
    fn read_utf(&mut self) -> Result<String> {
        let len = self.read_int()?;
        if len < 0 {
            return Err(StreamError::InvalidLength(i64::from(len)));
        }
        let bytes = self.read_bytes(len as usize)?;
        decode_utf16le(&bytes)
    }

    /// Reads a raw byte block behind a compact length.
    fn read_byte_array(&mut self) -> Result<Vec<u8>> {
        let len = self.read_compact_int()?;
        if len < 0 {
            return Err(StreamError::InvalidLength(i64::from(len)));
        }
        self.read_bytes(len as usize)
    }
}

impl<D: DataInput + ?Sized> DataInput for &mut D {
    #[inline]
    fn read_fully(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read_fully(buf)
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
// DataInputStream

/// [`DataInput`] over any [`Read`].
///
/// The stream does no buffering of its own; wrap the source in a
/// `BufReader` when it is a file or socket.
#[derive(Debug)]
pub struct DataInputStream<R> {
    inner: R,
    charset: Charset,
    position: u64,
}

impl<R: Read> DataInputStream<R> {
    /// Creates a stream positioned at offset `0`.
    #[inline]
    pub fn new(inner: R, charset: Charset) -> Self {
        Self::with_position(inner, charset, 0)
    }

    /// Creates a stream whose first byte lives at `position` inside the
    /// enclosing container. Only affects [`DataInput::position`] and error
    /// reports.
    #[inline]
    pub fn with_position(inner: R, charset: Charset, position: u64) -> Self {
        Self {
            inner,
            charset,
            position,
        }
    }

    #[inline]
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    #[inline]
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> DataInput for DataInputStream<R> {
    fn read_fully(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner
            .read_exact(buf)
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
