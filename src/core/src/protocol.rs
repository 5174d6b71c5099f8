//! Wire protocol between the mail server and the loader
//!
//! A request is the identity length as a native-endian `usize` followed by
//! exactly that many identity bytes. The reply is a bare ASCII string with no
//! terminator; the loader closes the connection after sending it.

use crate::error::SizeError;

/// Identities must be strictly shorter than this many bytes.
pub const MAXKEY: usize = 512;

/// Width of the length field on the wire.
pub const SIZE_FIELD_LEN: usize = std::mem::size_of::<usize>();

/// Reply sent back to the caller, exactly once per connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Resolution succeeded. Sent even when the cache write failed.
    Ok,
    /// The length field could not be read.
    ReadSize,
    /// The length field was at or above [`MAXKEY`].
    InvalidSize,
    /// The length field was zero.
    ZeroSize,
    /// The identity bytes could not be read.
    ReadUser,
    /// Diagnostic supplied verbatim by the backend module.
    Module(String),
}

impl Reply {
    pub fn as_str(&self) -> &str {
        match self {
            Reply::Ok => "OK",
            Reply::ReadSize => "Error reading request (size)",
            Reply::InvalidSize => "Error: invalid request size",
            Reply::ZeroSize => "Error: zero request size",
            Reply::ReadUser => "Error reading request (user)",
            Reply::Module(msg) => msg,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.as_str().as_bytes()
    }
}

impl From<SizeError> for Reply {
    fn from(err: SizeError) -> Self {
        match err {
            SizeError::Zero => Reply::ZeroSize,
            SizeError::TooLarge { .. } => Reply::InvalidSize,
        }
    }
}

/// Decode the length field.
pub fn decode_size(field: [u8; SIZE_FIELD_LEN]) -> usize {
    usize::from_ne_bytes(field)
}

/// Check a decoded length against the protocol bounds.
///
/// Rejects zero and anything at or above [`MAXKEY`]. A length of exactly
/// `MAXKEY` is rejected even though a `MAXKEY`-byte buffer could hold it.
pub fn validate_size(size: usize) -> Result<usize, SizeError> {
    if size >= MAXKEY {
        return Err(SizeError::TooLarge { size, max: MAXKEY });
    }
    if size == 0 {
        return Err(SizeError::Zero);
    }
    Ok(size)
}

/// Frame an identity as a request. Used by clients and tests.
pub fn encode_request(identity: &[u8]) -> Vec<u8> {
    encode_request_with_size(identity.len(), identity)
}

/// Frame a request with an arbitrary length field, which may disagree with
/// the payload.
pub fn encode_request_with_size(size: usize, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SIZE_FIELD_LEN + payload.len());
    buf.extend_from_slice(&size.to_ne_bytes());
    buf.extend_from_slice(payload);
    buf
}
