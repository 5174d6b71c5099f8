//! # ptloader backends
//!
//! Group resolution modules compiled into the loader, and the
//! authorization-state layout they produce.
//!
//! | Module   | Source of group memberships            |
//! |----------|----------------------------------------|
//! | `unix`   | system user and group database (NSS)   |
//! | `static` | `[modules.static.members]` config table |

pub mod config;
pub mod state;
pub mod static_map;
pub mod unix;

pub use config::{ModulesConfig, StaticConfig, UnixConfig};
pub use state::GroupState;
pub use static_map::StaticModule;
pub use unix::UnixModule;

use ptloader_core::ModuleRegistry;

/// Reply for identities a module does not know
pub const NO_SUCH_PRINCIPAL: &str = "no such principal";

/// Registry holding every compiled-in module, configured from `config`
pub fn builtin_registry(config: &ModulesConfig) -> ModuleRegistry {
    ModuleRegistry::new()
        .with(Box::new(UnixModule::new(config.unix.clone())))
        .with(Box::new(StaticModule::new(config.static_map.clone())))
}
