//! Handler for the `show` command: render a recorded prediction batch.

use chrono::Utc;
use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::ShowArgs;
use crate::adapter::inbound::cli::output;
use crate::domain::prediction::{Prediction, PredictionBatch};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::store::ArtifactKind;

#[derive(Tabled)]
struct PredictionRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Repository")]
    name: String,
    #[tabled(rename = "P(breakout)")]
    probability: String,
    #[tabled(rename = "Stars")]
    stars_now: u64,
    #[tabled(rename = "Threshold")]
    threshold: u64,
    #[tabled(rename = "Est. 7d")]
    point: u64,
    #[tabled(rename = "Range")]
    range: String,
}

#[derive(Tabled)]
struct FeatureRow {
    #[tabled(rename = "Repository")]
    name: String,
    #[tabled(rename = "Age (d)")]
    age_days: String,
    #[tabled(rename = "Since push (d)")]
    since_push_days: String,
    #[tabled(rename = "Stars/day")]
    stars_per_day: String,
    #[tabled(rename = "Forks")]
    forks: u64,
    #[tabled(rename = "Issues")]
    issues: u64,
    #[tabled(rename = "Language")]
    language: String,
}

/// Predictions to display, most probable first, capped at `limit`.
fn ranked(batch: &PredictionBatch, limit: Option<usize>) -> Vec<&Prediction> {
    batch.top_by_probability(limit.unwrap_or(batch.len()))
}

fn prediction_rows(ranked: &[&Prediction]) -> Vec<PredictionRow> {
    ranked
        .iter()
        .enumerate()
        .map(|(i, p)| PredictionRow {
            rank: i + 1,
            name: p.full_name.to_string(),
            probability: format!("{:.1}%", p.p_breakout_7d * 100.0),
            stars_now: p.stars_now,
            threshold: p.breakout_threshold_7d,
            point: p.stars_pred_7d,
            range: format!("{}-{}", p.stars_pred_low_7d, p.stars_pred_high_7d),
        })
        .collect()
}

fn feature_rows(ranked: &[&Prediction]) -> Vec<FeatureRow> {
    ranked
        .iter()
        .map(|p| FeatureRow {
            name: p.full_name.to_string(),
            age_days: format!("{:.2}", p.features.age_days),
            since_push_days: format!("{:.2}", p.features.since_push_days),
            stars_per_day: format!("{:.1}", p.features.stars_per_day),
            forks: p.features.forks_now,
            issues: p.features.open_issues_now,
            language: p.features.language.clone(),
        })
        .collect()
}

/// Execute the show command.
pub fn execute(config: &Config, args: &ShowArgs) -> Result<()> {
    let date = args.date.unwrap_or_else(|| Utc::now().date_naive());
    let store = bootstrap::build_store(config);

    let Some(batch) = store.load_predictions(date)? else {
        let expected = store.locate(ArtifactKind::Predictions, date);
        if output::is_json() {
            output::json_output(json!({
                "command": "show",
                "date_utc": date,
                "status": "no_batch",
                "expected": expected,
            }));
        } else {
            output::warning(&format!("No predictions recorded for {date}"));
            output::field("Expected", expected);
        }
        return Ok(());
    };

    let ranked = ranked(&batch, args.limit);

    if output::is_json() {
        output::json_output(json!({
            "command": "show",
            "date_utc": date,
            "total": batch.len(),
            "predictions": ranked,
        }));
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::section(&format!("Predictions for {date}"));
    output::field("Total", batch.len());
    if let Some(first) = batch.predictions().first() {
        output::field("Model", &first.model_tag);
    }
    if ranked.is_empty() {
        output::note("The batch is empty");
        return Ok(());
    }
    output::lines(&Table::new(prediction_rows(&ranked)).to_string());

    if output::verbosity() > 0 {
        output::section("Features");
        output::lines(&Table::new(feature_rows(&ranked)).to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::{prediction, prediction_date};

    fn batch() -> PredictionBatch {
        let mut low = prediction("acme/low", 60);
        low.p_breakout_7d = 0.12;
        let mut high = prediction("acme/high", 900);
        high.p_breakout_7d = 0.87;
        let mut mid = prediction("acme/mid", 300);
        mid.p_breakout_7d = 0.5;
        PredictionBatch::new(prediction_date(), vec![low, high, mid])
    }

    #[test]
    fn rows_rank_by_probability() {
        let batch = batch();
        let rows = prediction_rows(&ranked(&batch, None));
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["acme/high", "acme/mid", "acme/low"]);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].probability, "87.0%");
    }

    #[test]
    fn limit_caps_rows() {
        let batch = batch();
        assert_eq!(ranked(&batch, Some(2)).len(), 2);
        assert_eq!(ranked(&batch, Some(10)).len(), 3);
    }

    #[test]
    fn table_renders_headers_and_range() {
        let batch = batch();
        let ranked = ranked(&batch, Some(1));
        let table = Table::new(prediction_rows(&ranked)).to_string();
        assert!(table.contains("P(breakout)"));
        assert!(table.contains("acme/high"));
        let p = ranked[0];
        assert!(table.contains(&format!("{}-{}", p.stars_pred_low_7d, p.stars_pred_high_7d)));

        let features = Table::new(feature_rows(&ranked)).to_string();
        assert!(features.contains("Rust"));
    }
}
