//! Opaque authorization state produced by a backend module

/// Serialized group memberships for one identity.
///
/// The layout belongs to the module that produced it; the core only moves
/// the bytes into the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationState(Vec<u8>);

impl AuthorizationState {
    pub fn new(bytes: Vec<u8>) -> Self {
        AuthorizationState(bytes)
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
}

impl From<Vec<u8>> for AuthorizationState {
    fn from(bytes: Vec<u8>) -> Self {
        AuthorizationState(bytes)
    }
}
