//! Append-only CSV outcome ledger.
//!
//! Readers take a shared lock and writers an exclusive lock on a sibling
//! `.lock` file, so two scoring runs cannot interleave their check-then-append.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use fs2::FileExt;
use tracing::{debug, info};

use super::codec::{self, COLUMNS};
use super::settings::StorageConfig;
use crate::domain::outcome::{Outcome, OutcomeKey};
use crate::error::Result;
use crate::port::outbound::store::OutcomeLedger;

/// Outcome ledger stored as a single CSV file.
#[derive(Debug, Clone)]
pub struct CsvLedger {
    path: PathBuf,
}

/// Holds the advisory lock until dropped.
struct LedgerLock {
    file: File,
}

impl Drop for LedgerLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

impl CsvLedger {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.ledger_path())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut path = self.path.as_os_str().to_owned();
        path.push(".lock");
        PathBuf::from(path)
    }

    fn lock(&self, exclusive: bool) -> Result<LedgerLock> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())?;
        if exclusive {
            FileExt::lock_exclusive(&file)?;
        } else {
            FileExt::lock_shared(&file)?;
        }
        Ok(LedgerLock { file })
    }

    fn read_text(&self) -> Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn read_all(&self) -> Result<Vec<Outcome>> {
        let _lock = self.lock(false)?;
        let (_, outcomes) = codec::decode_ledger(&self.read_text()?)?;
        Ok(outcomes)
    }
}

impl OutcomeLedger for CsvLedger {
    fn outcomes_for(&self, date: NaiveDate) -> Result<Vec<Outcome>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|o| o.prediction_date_utc == date)
            .collect())
    }

    fn all_outcomes(&self) -> Result<Vec<Outcome>> {
        self.read_all()
    }

    fn append(&self, outcomes: &[Outcome]) -> Result<usize> {
        if outcomes.is_empty() {
            return Ok(0);
        }

        let _lock = self.lock(true)?;
        let text = self.read_text()?;
        let (header, existing) = codec::decode_ledger(&text)?;
        let mut seen: HashSet<OutcomeKey> = existing.iter().map(Outcome::key).collect();

        let mut buf = String::new();
        let columns: Vec<String> = match &header {
            Some(header) => header.names().to_vec(),
            None => {
                buf.push_str(&codec::encode_line(&COLUMNS[..]));
                COLUMNS.iter().map(|c| (*c).to_string()).collect()
            }
        };
        if header.is_some() && !text.ends_with('\n') {
            buf.insert(0, '\n');
        }

        let mut appended = 0;
        for outcome in outcomes {
            if !seen.insert(outcome.key()) {
                debug!(
                    repo = %outcome.full_name,
                    date = %outcome.prediction_date_utc,
                    "Outcome already on ledger, skipping"
                );
                continue;
            }
            buf.push_str(&codec::encode_outcome(&columns, outcome));
            appended += 1;
        }

        if appended == 0 {
            return Ok(0);
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(buf.as_bytes())?;
        file.sync_all()?;

        info!(appended, path = %self.path.display(), "Appended outcomes to ledger");
        Ok(appended)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::RepoName;
    use tempfile::TempDir;

    fn outcome(name: &str, day: u32) -> Outcome {
        Outcome {
            prediction_date_utc: NaiveDate::from_ymd_opt(2026, 10, day).unwrap(),
            scored_date_utc: NaiveDate::from_ymd_opt(2026, 10, day + 7).unwrap(),
            full_name: RepoName::new(name),
            html_url: format!("https://github.com/{name}"),
            stars_at_prediction: 100,
            stars_after_7d: 400,
            delta_stars: 300,
            breakout_threshold: 200,
            breakout_actual: true,
            p_breakout_7d: 0.5,
            brier_score: 0.25,
            stars_pred_7d: 350,
            stars_pred_low_7d: 300,
            stars_pred_high_7d: 400,
            within_band: true,
            abs_error_stars: 50,
            model_tag: "heuristic_logistic_v1".into(),
        }
    }

    fn ledger() -> (CsvLedger, TempDir) {
        let dir = TempDir::new().expect("create temp dir");
        (CsvLedger::new(dir.path().join("data/outcomes.csv")), dir)
    }

    #[test]
    fn empty_ledger_reads_nothing() {
        let (ledger, _dir) = ledger();
        assert!(ledger.all_outcomes().unwrap().is_empty());
    }

    #[test]
    fn first_append_writes_header_once() {
        let (ledger, _dir) = ledger();
        assert_eq!(ledger.append(&[outcome("a/one", 5)]).unwrap(), 1);
        assert_eq!(ledger.append(&[outcome("a/two", 5)]).unwrap(), 1);

        let text = fs::read_to_string(ledger.path()).unwrap();
        assert_eq!(text.matches("prediction_date_utc").count(), 1);
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn duplicate_keys_are_not_appended() {
        let (ledger, _dir) = ledger();
        ledger.append(&[outcome("a/one", 5)]).unwrap();

        let appended = ledger
            .append(&[outcome("a/one", 5), outcome("a/one", 6), outcome("a/one", 6)])
            .unwrap();
        assert_eq!(appended, 1);
        assert_eq!(ledger.all_outcomes().unwrap().len(), 2);
    }

    #[test]
    fn outcomes_for_filters_by_prediction_date() {
        let (ledger, _dir) = ledger();
        ledger
            .append(&[outcome("a/one", 5), outcome("a/two", 5), outcome("a/one", 6)])
            .unwrap();

        let day5 = ledger
            .outcomes_for(NaiveDate::from_ymd_opt(2026, 10, 5).unwrap())
            .unwrap();
        assert_eq!(day5.len(), 2);
        assert!(day5.iter().all(|o| o.prediction_date_utc.to_string() == "2026-10-05"));
    }

    #[test]
    fn append_follows_existing_header_order() {
        let (ledger, _dir) = ledger();
        fs::create_dir_all(ledger.path().parent().unwrap()).unwrap();
        fs::write(
            ledger.path(),
            "full_name,prediction_date_utc,scored_date_utc,stars_at_prediction,stars_after_7d,\
delta_stars,breakout_threshold,breakout_actual,p_breakout_7d,brier_score,stars_pred_7d,abs_error_stars",
        )
        .unwrap();

        ledger.append(&[outcome("a/one", 5)]).unwrap();

        let text = fs::read_to_string(ledger.path()).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.starts_with("a/one,2026-10-05,2026-10-12,100,400,"));

        let read = ledger.all_outcomes().unwrap();
        assert_eq!(read[0].stars_pred_low_7d, 350);
        assert_eq!(read[0].model_tag, "unknown");
    }

    #[test]
    fn lock_file_sits_beside_ledger() {
        let (ledger, dir) = ledger();
        ledger.append(&[outcome("a/one", 5)]).unwrap();
        assert!(dir.path().join("data/outcomes.csv.lock").exists());
        assert_eq!(ledger.location(), ledger.path().display().to_string());
    }
}
