//! `[modules]` configuration section

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModulesConfig {
    #[serde(default)]
    pub unix: UnixConfig,

    #[serde(default, rename = "static")]
    pub static_map: StaticConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UnixConfig {
    #[serde(default = "default_group_prefix")]
    pub group_prefix: String,
}

impl Default for UnixConfig {
    fn default() -> Self {
        Self {
            group_prefix: default_group_prefix(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticConfig {
    #[serde(default = "default_group_prefix")]
    pub group_prefix: String,

    /// Identity to group names
    #[serde(default)]
    pub members: BTreeMap<String, Vec<String>>,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            group_prefix: default_group_prefix(),
            members: BTreeMap::new(),
        }
    }
}

fn default_group_prefix() -> String { "group:".to_string() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modules_section() {
        let config: ModulesConfig = toml::from_str(
            r#"
            [unix]
            group_prefix = "unix:"

            [static.members]
            alice = ["staff", "wheel"]
            bob = []
            "#,
        )
        .unwrap();

        assert_eq!(config.unix.group_prefix, "unix:");
        assert_eq!(config.static_map.group_prefix, "group:");
        assert_eq!(config.static_map.members["alice"], vec!["staff", "wheel"]);
        assert!(config.static_map.members["bob"].is_empty());
    }
}
