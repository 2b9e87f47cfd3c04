//! Flat-file storage layout.

use std::path::PathBuf;

use serde::Deserialize;

/// Where dated artifacts and the ledger live.
///
/// Relative subdirectories are resolved against `root`.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Snapshots, summaries and the outcome ledger.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_predictions_dir")]
    pub predictions_dir: PathBuf,
    #[serde(default = "default_posts_dir")]
    pub posts_dir: PathBuf,
    /// Ledger file name inside `data_dir`.
    #[serde(default = "default_ledger_file")]
    pub ledger_file: String,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_predictions_dir() -> PathBuf {
    PathBuf::from("predictions")
}

fn default_posts_dir() -> PathBuf {
    PathBuf::from("posts")
}

fn default_ledger_file() -> String {
    "outcomes.csv".into()
}

impl StorageConfig {
    /// Layout rooted at `root` with the default subdirectories.
    #[must_use]
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        self.root.join(&self.data_dir)
    }

    #[must_use]
    pub fn predictions_path(&self) -> PathBuf {
        self.root.join(&self.predictions_dir)
    }

    #[must_use]
    pub fn posts_path(&self) -> PathBuf {
        self.root.join(&self.posts_dir)
    }

    #[must_use]
    pub fn ledger_path(&self) -> PathBuf {
        self.data_path().join(&self.ledger_file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            data_dir: default_data_dir(),
            predictions_dir: default_predictions_dir(),
            posts_dir: default_posts_dir(),
            ledger_file: default_ledger_file(),
        }
    }
}
