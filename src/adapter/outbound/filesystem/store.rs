//! Dated JSON artifacts on the local filesystem.
//!
//! Layout (relative to the storage root):
//! - `data/snapshots_{date}.json` - raw telemetry per run
//! - `predictions/predictions_{date}.json` - prediction batch
//! - `posts/post_{date}.json` - digest payload
//! - `data/summary_{date}.json` - scoring summary, keyed by prediction date
//!
//! Files are written to a temporary sibling and renamed into place so a
//! crashed run never leaves a half-written batch behind.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use super::settings::StorageConfig;
use crate::domain::{
    digest::Post, outcome::ScoreSummary, prediction::Prediction, prediction::PredictionBatch,
    telemetry::Snapshot,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::{ArtifactKind, ArtifactStore};

const TMP_SUFFIX: &str = ".tmp";

/// Artifact store backed by dated JSON files.
#[derive(Debug, Clone)]
pub struct FileStore {
    config: StorageConfig,
}

impl FileStore {
    #[must_use]
    pub const fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Path of an artifact for a given date.
    #[must_use]
    pub fn path_for(&self, kind: ArtifactKind, date: NaiveDate) -> PathBuf {
        match kind {
            ArtifactKind::Snapshots => self
                .config
                .data_path()
                .join(format!("snapshots_{date}.json")),
            ArtifactKind::Predictions => self
                .config
                .predictions_path()
                .join(format!("predictions_{date}.json")),
            ArtifactKind::Post => self.config.posts_path().join(format!("post_{date}.json")),
            ArtifactKind::Summary => self.config.data_path().join(format!("summary_{date}.json")),
        }
    }

    fn write_json<T: Serialize + ?Sized>(
        &self,
        kind: ArtifactKind,
        date: NaiveDate,
        value: &T,
    ) -> Result<()> {
        let path = self.path_for(kind, date);
        write_atomic(&path, &serde_json::to_vec_pretty(value)?)?;
        info!(artifact = %kind, path = %path.display(), "Wrote artifact");
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(
        &self,
        kind: ArtifactKind,
        date: NaiveDate,
    ) -> Result<Option<T>> {
        let path = self.path_for(kind, date);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(TMP_SUFFIX);
    let tmp_path = PathBuf::from(tmp_path);

    let mut tmp = File::create(&tmp_path)?;
    tmp.write_all(bytes)?;
    tmp.sync_all()?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

impl ArtifactStore for FileStore {
    fn save_snapshots(&self, date: NaiveDate, snapshots: &[Snapshot]) -> Result<()> {
        self.write_json(ArtifactKind::Snapshots, date, snapshots)
    }

    fn save_predictions(&self, batch: &PredictionBatch) -> Result<()> {
        self.write_json(ArtifactKind::Predictions, batch.date_utc(), batch.predictions())
    }

    fn load_predictions(&self, date: NaiveDate) -> Result<Option<PredictionBatch>> {
        let Some(predictions) =
            self.read_json::<Vec<Prediction>>(ArtifactKind::Predictions, date)?
        else {
            return Ok(None);
        };
        if let Some(stray) = predictions.iter().find(|p| p.date_utc != date) {
            return Err(Error::Storage(format!(
                "{} holds a prediction dated {} for {}",
                self.locate(ArtifactKind::Predictions, date),
                stray.date_utc,
                stray.full_name
            )));
        }
        Ok(Some(PredictionBatch::new(date, predictions)))
    }

    fn save_post(&self, post: &Post) -> Result<()> {
        self.write_json(ArtifactKind::Post, post.date_utc, post)
    }

    fn load_post(&self, date: NaiveDate) -> Result<Option<Post>> {
        self.read_json(ArtifactKind::Post, date)
    }

    fn save_summary(&self, summary: &ScoreSummary) -> Result<()> {
        self.write_json(ArtifactKind::Summary, summary.prediction_date_utc, summary)
    }

    fn locate(&self, kind: ArtifactKind, date: NaiveDate) -> String {
        self.path_for(kind, date).display().to_string()
    }
}
