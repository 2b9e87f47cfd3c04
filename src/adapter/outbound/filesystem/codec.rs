//! CSV encoding for the outcome ledger.
//!
//! Columns are matched by header name, so ledgers written with fewer or
//! reordered columns stay readable. Rows written before the forecast
//! interval was recorded fall back to the point forecast for both bounds.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::domain::{id::RepoName, outcome::Outcome};
use crate::error::{Error, Result};

/// Columns written to a fresh ledger, in order.
pub const COLUMNS: [&str; 17] = [
    "prediction_date_utc",
    "scored_date_utc",
    "full_name",
    "html_url",
    "stars_at_prediction",
    "stars_after_7d",
    "delta_stars",
    "breakout_threshold",
    "breakout_actual",
    "p_breakout_7d",
    "brier_score",
    "stars_pred_7d",
    "stars_pred_low_7d",
    "stars_pred_high_7d",
    "within_band",
    "abs_error_stars",
    "model",
];

const REQUIRED: [&str; 12] = [
    "prediction_date_utc",
    "scored_date_utc",
    "full_name",
    "stars_at_prediction",
    "stars_after_7d",
    "delta_stars",
    "breakout_threshold",
    "breakout_actual",
    "p_breakout_7d",
    "brier_score",
    "stars_pred_7d",
    "abs_error_stars",
];

const UNKNOWN_MODEL: &str = "unknown";

/// Split CSV text into records. Quoted fields may contain separators,
/// doubled quotes and line breaks.
pub fn parse_records(text: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(Error::Storage("unterminated quoted field in ledger".into()));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records.retain(|r| !(r.len() == 1 && r[0].is_empty()));
    Ok(records)
}

/// Quote a field when it contains a separator, quote or line break.
#[must_use]
pub fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render one line (with trailing newline) from raw fields.
#[must_use]
pub fn encode_line<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = fields
        .iter()
        .map(|f| escape(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

/// Value of a named column for an outcome.
fn column_value(outcome: &Outcome, column: &str) -> String {
    match column {
        "prediction_date_utc" => outcome.prediction_date_utc.to_string(),
        "scored_date_utc" => outcome.scored_date_utc.to_string(),
        "full_name" => outcome.full_name.to_string(),
        "html_url" => outcome.html_url.clone(),
        "stars_at_prediction" => outcome.stars_at_prediction.to_string(),
        "stars_after_7d" => outcome.stars_after_7d.to_string(),
        "delta_stars" => outcome.delta_stars.to_string(),
        "breakout_threshold" => outcome.breakout_threshold.to_string(),
        "breakout_actual" => flag(outcome.breakout_actual),
        "p_breakout_7d" => outcome.p_breakout_7d.to_string(),
        "brier_score" => outcome.brier_score.to_string(),
        "stars_pred_7d" => outcome.stars_pred_7d.to_string(),
        "stars_pred_low_7d" => outcome.stars_pred_low_7d.to_string(),
        "stars_pred_high_7d" => outcome.stars_pred_high_7d.to_string(),
        "within_band" => flag(outcome.within_band),
        "abs_error_stars" => outcome.abs_error_stars.to_string(),
        "model" => outcome.model_tag.clone(),
        _ => String::new(),
    }
}

/// Render an outcome as a line following `header` order.
///
/// Unknown header columns are left empty.
#[must_use]
pub fn encode_outcome<S: AsRef<str>>(header: &[S], outcome: &Outcome) -> String {
    let fields: Vec<String> = header
        .iter()
        .map(|c| column_value(outcome, c.as_ref()))
        .collect();
    encode_line(&fields)
}

/// Ledger header row mapped to column positions.
#[derive(Debug)]
pub struct Header {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Header {
    /// Validate a header row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] when a required column is absent.
    pub fn new(names: Vec<String>) -> Result<Self> {
        let index: HashMap<String, usize> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.trim().to_string(), i))
            .collect();
        if let Some(missing) = REQUIRED.iter().find(|c| !index.contains_key(**c)) {
            return Err(Error::Storage(format!("ledger is missing column {missing}")));
        }
        Ok(Self { names, index })
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    fn get<'a>(&self, record: &'a [String], column: &str) -> Option<&'a str> {
        self.index
            .get(column)
            .and_then(|&i| record.get(i))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    fn require<'a>(&self, record: &'a [String], column: &str, line: usize) -> Result<&'a str> {
        self.get(record, column)
            .ok_or_else(|| Error::Storage(format!("ledger line {line}: empty {column}")))
    }

    fn parse<T: FromStr>(&self, record: &[String], column: &str, line: usize) -> Result<T> {
        let raw = self.require(record, column, line)?;
        raw.parse()
            .map_err(|_| Error::Storage(format!("ledger line {line}: bad {column} {raw:?}")))
    }

    fn parse_opt<T: FromStr>(
        &self,
        record: &[String],
        column: &str,
        line: usize,
    ) -> Result<Option<T>> {
        match self.get(record, column) {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| Error::Storage(format!("ledger line {line}: bad {column} {raw:?}"))),
        }
    }

    fn parse_flag(&self, record: &[String], column: &str, line: usize) -> Result<Option<bool>> {
        match self.get(record, column) {
            None => Ok(None),
            Some("1" | "true" | "True") => Ok(Some(true)),
            Some("0" | "false" | "False") => Ok(Some(false)),
            Some(raw) => Err(Error::Storage(format!(
                "ledger line {line}: bad {column} {raw:?}"
            ))),
        }
    }

    /// Decode one data record. `line` is 1-based, for messages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] for empty or malformed required values.
    pub fn decode(&self, record: &[String], line: usize) -> Result<Outcome> {
        let stars_pred_7d: u64 = self.parse(record, "stars_pred_7d", line)?;
        let stars_after_7d: u64 = self.parse(record, "stars_after_7d", line)?;
        let low = self
            .parse_opt(record, "stars_pred_low_7d", line)?
            .unwrap_or(stars_pred_7d);
        let high = self
            .parse_opt(record, "stars_pred_high_7d", line)?
            .unwrap_or(stars_pred_7d);
        let within_band = self
            .parse_flag(record, "within_band", line)?
            .unwrap_or_else(|| (low..=high).contains(&stars_after_7d));
        let breakout_actual = self
            .parse_flag(record, "breakout_actual", line)?
            .ok_or_else(|| Error::Storage(format!("ledger line {line}: empty breakout_actual")))?;

        Ok(Outcome {
            prediction_date_utc: self.parse::<NaiveDate>(record, "prediction_date_utc", line)?,
            scored_date_utc: self.parse::<NaiveDate>(record, "scored_date_utc", line)?,
            full_name: RepoName::parse(self.require(record, "full_name", line)?)?,
            html_url: self.get(record, "html_url").unwrap_or_default().to_string(),
            stars_at_prediction: self.parse(record, "stars_at_prediction", line)?,
            stars_after_7d,
            delta_stars: self.parse(record, "delta_stars", line)?,
            breakout_threshold: self.parse(record, "breakout_threshold", line)?,
            breakout_actual,
            p_breakout_7d: self.parse(record, "p_breakout_7d", line)?,
            brier_score: self.parse(record, "brier_score", line)?,
            stars_pred_7d,
            stars_pred_low_7d: low,
            stars_pred_high_7d: high,
            within_band,
            abs_error_stars: self.parse(record, "abs_error_stars", line)?,
            model_tag: self.get(record, "model").unwrap_or(UNKNOWN_MODEL).to_string(),
        })
    }
}

/// Decode a whole ledger file. Empty text is an empty ledger.
///
/// # Errors
///
/// Returns [`Error::Storage`] for malformed rows or a bad header.
pub fn decode_ledger(text: &str) -> Result<(Option<Header>, Vec<Outcome>)> {
    let mut records = parse_records(text)?.into_iter();
    let Some(first) = records.next() else {
        return Ok((None, Vec::new()));
    };
    let header = Header::new(first)?;
    let outcomes = records
        .enumerate()
        .map(|(i, record)| header.decode(&record, i + 2))
        .collect::<Result<Vec<_>>>()?;
    Ok((Some(header), outcomes))
}
