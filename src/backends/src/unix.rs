//! Module resolving memberships through the system user database

use crate::config::UnixConfig;
use crate::state::GroupState;
use crate::NO_SUCH_PRINCIPAL;
use async_trait::async_trait;
use ptloader_core::{Identity, PtsModule, Resolution, Result};
use tracing::{error, info};

/// Looks identities up with getpwnam/getgrouplist, so it follows whatever
/// the host's NSS configuration points at (files, LDAP via sssd, ...)
pub struct UnixModule {
    config: UnixConfig,
}

impl UnixModule {
    pub fn new(config: UnixConfig) -> Self {
        Self { config }
    }
}

/// Group names for `name`, or `None` when the account does not exist
fn lookup_groups(name: &str) -> Option<Vec<String>> {
    let user = users::get_user_by_name(name)?;
    let groups = users::get_user_groups(name, user.primary_group_id()).unwrap_or_default();

    Some(
        groups
            .iter()
            .map(|group| group.name().to_string_lossy().into_owned())
            .collect(),
    )
}

#[async_trait]
impl PtsModule for UnixModule {
    fn name(&self) -> &'static str {
        "unix"
    }

    async fn init(&mut self) -> Result<()> {
        info!(uid = users::get_current_uid(), "using system user database");
        Ok(())
    }

    async fn make_authstate(&self, identity: &Identity) -> Resolution {
        let Some(name) = identity.as_str().map(str::to_owned) else {
            return Resolution::failed(NO_SUCH_PRINCIPAL);
        };

        let lookup_name = name.clone();
        let groups = match tokio::task::spawn_blocking(move || lookup_groups(&lookup_name)).await {
            Ok(Some(groups)) => groups,
            Ok(None) => return Resolution::failed(NO_SUCH_PRINCIPAL),
            Err(e) => {
                error!(identity = %name, error = %e, "group lookup task failed");
                return Resolution::failed("Error: group lookup failed");
            }
        };

        match GroupState::new(name, &self.config.group_prefix, groups).encode() {
            Ok(encoded) => Resolution::Resolved(encoded),
            Err(e) => {
                error!(identity = %identity, error = %e, "failed to encode auth state");
                Resolution::failed("Error: could not encode group state")
            }
        }
    }
}
