//! Group membership layout stored in the cache

use ptloader_core::{AuthorizationState, PtsError, Result};
use serde::{Deserialize, Serialize};

/// Resolved memberships for one identity, as written by this workspace's
/// modules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupState {
    /// Identity the state was resolved for
    pub userid: String,

    /// Unix time of the resolution, for readers that age records out
    pub mark: i64,

    /// Group identifiers, prefixed, sorted and de-duplicated
    pub groups: Vec<String>,
}

impl GroupState {
    /// Build a state stamped with the current time
    pub fn new<I, S>(userid: impl Into<String>, prefix: &str, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut groups: Vec<String> = groups
            .into_iter()
            .map(|g| format!("{}{}", prefix, g.as_ref()))
            .collect();
        groups.sort();
        groups.dedup();

        Self {
            userid: userid.into(),
            mark: chrono::Utc::now().timestamp(),
            groups,
        }
    }

    pub fn encode(&self) -> Result<AuthorizationState> {
        bincode::serialize(self)
            .map(AuthorizationState::new)
            .map_err(|e| PtsError::serialization(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| PtsError::serialization(e.to_string()))
    }

    pub fn is_member(&self, group: &str) -> bool {
        self.groups.binary_search_by(|g| g.as_str().cmp(group)).is_ok()
    }
}
