//! Path utilities for repopulse.
//!
//! The user configuration lives under `~/.repopulse/config.toml`. Artifacts
//! are written relative to `[storage] root`, not here.

use std::path::PathBuf;

/// Returns the repopulse home directory (`~/.repopulse/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".repopulse")
}

/// Returns the default config file path (`~/.repopulse/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_lives_under_repopulse_home() {
        let config = default_config();
        assert!(config.starts_with(home_dir()));
        assert!(config.to_string_lossy().contains(".repopulse"));
        assert!(config.ends_with("config.toml"));
    }
}
