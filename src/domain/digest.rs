//! Human-readable digest of a prediction batch.
//!
//! The digest is the optional notification payload: a ranked watchlist of the
//! top-N repositories by breakout probability, one entry per repository with
//! the probability, the point and interval forecast, and a link.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::prediction::{Prediction, PredictionBatch};

/// Text surrounding the ranked entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestTemplate {
    pub top_n: usize,
    pub title: String,
    pub intro: Vec<String>,
    pub footer: String,
    pub hashtags: Vec<String>,
}

impl Default for DigestTemplate {
    fn default() -> Self {
        Self {
            top_n: 5,
            title: "RepoPulse forecast (7-day breakout watchlist)".into(),
            intro: vec![
                "Method: reproducible baseline model using public GitHub signals (no LLM).".into(),
                "Breakout = +max(200 stars, +50%) within 7 days.".into(),
            ],
            footer: "Daily forecasts are logged publicly, then scored 7 days later (hits, misses, calibration).".into(),
            hashtags: ["opensource", "software", "datascience", "forecasting", "github"]
                .iter()
                .map(|t| (*t).to_string())
                .collect(),
        }
    }
}

/// A dated post ready for delivery to a notification sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub post_id: String,
    pub date_utc: NaiveDate,
    pub text: String,
}

impl Post {
    /// Identifier used for the post of a given run date.
    #[must_use]
    pub fn id_for(date: NaiveDate) -> String {
        format!("repopulse-{date}")
    }

    /// Compose the digest for a batch.
    #[must_use]
    pub fn compose(batch: &PredictionBatch, template: &DigestTemplate) -> Self {
        let mut lines = vec![template.title.clone(), String::new()];
        lines.extend(template.intro.iter().cloned());
        lines.push(String::new());

        for (i, prediction) in batch.top_by_probability(template.top_n).iter().enumerate() {
            lines.push(entry_line(i + 1, prediction));
            lines.push(format!("   {}", prediction.html_url));
        }

        lines.push(String::new());
        lines.push(template.footer.clone());
        if !template.hashtags.is_empty() {
            let tags: Vec<String> = template.hashtags.iter().map(|t| format!("#{t}")).collect();
            lines.push(tags.join(" "));
        }

        Self {
            post_id: Self::id_for(batch.date_utc()),
            date_utc: batch.date_utc(),
            text: lines.join("\n").trim().to_string(),
        }
    }
}

fn entry_line(rank: usize, p: &Prediction) -> String {
    format!(
        "{rank}) {} | {}% | stars now {} → est {} (range {}-{})",
        p.full_name,
        p.probability_percent(),
        p.stars_now,
        p.stars_pred_7d,
        p.stars_pred_low_7d,
        p.stars_pred_high_7d
    )
}
