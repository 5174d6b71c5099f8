//! Module resolving memberships from the configuration file

use crate::config::StaticConfig;
use crate::state::GroupState;
use crate::NO_SUCH_PRINCIPAL;
use async_trait::async_trait;
use ptloader_core::{Identity, PtsError, PtsModule, Resolution, Result};
use tracing::{debug, error};

/// Fixed identity-to-groups table from `[modules.static.members]`
pub struct StaticModule {
    config: StaticConfig,
}

impl StaticModule {
    pub fn new(config: StaticConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PtsModule for StaticModule {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn init(&mut self) -> Result<()> {
        if self.config.members.is_empty() {
            return Err(PtsError::module_init(self.name(), "no members configured"));
        }

        for (identity, groups) in &self.config.members {
            if identity.is_empty() {
                return Err(PtsError::module_init(self.name(), "empty identity in members table"));
            }
            if groups.iter().any(|g| g.trim().is_empty()) {
                return Err(PtsError::module_init(
                    self.name(),
                    format!("empty group name for {}", identity),
                ));
            }
        }

        debug!(identities = self.config.members.len(), "static membership table loaded");
        Ok(())
    }

    async fn make_authstate(&self, identity: &Identity) -> Resolution {
        let Some(groups) = identity
            .as_str()
            .and_then(|name| self.config.members.get(name))
        else {
            return Resolution::failed(NO_SUCH_PRINCIPAL);
        };

        let state = GroupState::new(identity.to_string(), &self.config.group_prefix, groups);
        match state.encode() {
            Ok(encoded) => Resolution::Resolved(encoded),
            Err(e) => {
                error!(identity = %identity, error = %e, "failed to encode auth state");
                Resolution::failed("Error: could not encode group state")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn config(members: Vec<(&str, Vec<&str>)>) -> StaticConfig {
        StaticConfig {
            group_prefix: "group:".to_string(),
            members: members
                .into_iter()
                .map(|(id, groups)| {
                    (id.to_string(), groups.iter().map(|g| g.to_string()).collect())
                })
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[tokio::test]
    async fn test_resolves_known_identity() {
        let mut module = StaticModule::new(config(vec![("alice", vec!["staff", "wheel"])]));
        module.init().await.unwrap();

        let resolution = module.make_authstate(&Identity::new("alice").unwrap()).await;
        let Resolution::Resolved(encoded) = resolution else {
            panic!("expected alice to resolve");
        };

        let state = GroupState::decode(encoded.as_bytes()).unwrap();
        assert_eq!(state.userid, "alice");
        assert_eq!(state.groups, vec!["group:staff", "group:wheel"]);
    }

    #[tokio::test]
    async fn test_unknown_identity() {
        let mut module = StaticModule::new(config(vec![("alice", vec!["staff"])]));
        module.init().await.unwrap();

        let resolution = module.make_authstate(&Identity::new("ghost").unwrap()).await;
        assert_eq!(resolution, Resolution::failed(NO_SUCH_PRINCIPAL));
    }

    #[tokio::test]
    async fn test_identity_without_groups_resolves() {
        let mut module = StaticModule::new(config(vec![("alice", vec!["staff"]), ("bob", vec![])]));
        module.init().await.unwrap();

        let resolution = module.make_authstate(&Identity::new("bob").unwrap()).await;
        assert!(resolution.is_resolved());
    }

    #[tokio::test]
    async fn test_init_rejects_empty_table() {
        let mut module = StaticModule::new(StaticConfig::default());
        assert!(matches!(module.init().await, Err(PtsError::ModuleInit { .. })));
    }

    #[tokio::test]
    async fn test_init_rejects_blank_group() {
        let mut module = StaticModule::new(config(vec![("alice", vec!["staff", " "])]));
        assert!(matches!(module.init().await, Err(PtsError::ModuleInit { .. })));
    }
}
