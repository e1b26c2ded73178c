use std::io;

use thiserror::Error;

use crate::Charset;

// -----------------------------------------------------------------------------
// Error

/// Failure of the underlying byte source or sink, or of data that cannot be
/// represented in the stream layout.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StreamError {
    #[error("I/O failure at stream offset {position}: {source}")]
    Io {
        position: u64,
        #[source]
        source: io::Error,
    },

    #[error("invalid length prefix {0}")]
    InvalidLength(i64),

    #[error("length {0} does not fit the stream's length prefix")]
    LengthOverflow(usize),

    #[error("malformed {0} text")]
    MalformedText(Charset),

    #[error("malformed UTF-16LE text")]
    MalformedUtf16,
}

impl StreamError {
    /// Returns `true` if the source ran out of bytes.
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::UnexpectedEof)
    }
}

pub type Result<T, E = StreamError> = core::result::Result<T, E>;
