//! Identity being resolved

use crate::error::SizeError;
use crate::protocol::validate_size;
use std::fmt;

/// Raw identity bytes, conventionally a short ASCII user name.
///
/// Always between 1 and `MAXKEY - 1` bytes long. Compared byte for byte;
/// no case folding or normalization happens here.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Identity(Vec<u8>);

impl Identity {
    /// Wrap identity bytes, enforcing the protocol length bounds
    pub fn new<B: Into<Vec<u8>>>(bytes: B) -> Result<Self, SizeError> {
        let bytes = bytes.into();
        validate_size(bytes.len())?;
        Ok(Identity(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The identity as UTF-8, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Hex encoding used as the cache id in debug logs
    pub fn cache_id(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Identity")
            .field(&String::from_utf8_lossy(&self.0))
            .finish()
    }
}

impl AsRef<[u8]> for Identity {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
