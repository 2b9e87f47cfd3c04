//! Scoring configuration.

use serde::Deserialize;

/// Scoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Days between a prediction and its scoring (default: 7).
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
}

const fn default_horizon_days() -> u32 {
    7
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            horizon_days: default_horizon_days(),
        }
    }
}
