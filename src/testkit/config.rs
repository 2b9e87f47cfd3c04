//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.
//! Avoids each test module defining its own slightly-different defaults.

use std::path::Path;

use crate::adapter::outbound::filesystem::StorageConfig;
use crate::infrastructure::config::settings::Config;

/// Default configuration with storage rooted at `root` and no secrets.
pub fn rooted_at(root: &Path) -> Config {
    Config {
        storage: StorageConfig::rooted_at(root),
        ..Config::default()
    }
}

/// Minimal TOML file content pointing storage at `root`.
pub fn toml_rooted_at(root: &Path) -> String {
    format!(
        "[logging]\nlevel = \"warn\"\n\n[storage]\nroot = {:?}\n",
        root.display().to_string()
    )
}
