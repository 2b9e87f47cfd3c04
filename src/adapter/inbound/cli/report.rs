//! Handler for the `report` command: calibration over the whole ledger.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::ReportArgs;
use crate::adapter::inbound::cli::output;
use crate::domain::calibration::{CalibrationReport, ModelCalibration, ReliabilityBin};
use crate::domain::outcome::Outcome;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;

#[derive(Tabled)]
struct BinRow {
    #[tabled(rename = "Predicted p")]
    range: String,
    #[tabled(rename = "N")]
    count: usize,
    #[tabled(rename = "Mean p")]
    mean_predicted: String,
    #[tabled(rename = "Observed")]
    observed_rate: String,
}

#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "Model")]
    tag: String,
    #[tabled(rename = "N")]
    n: usize,
    #[tabled(rename = "Brier")]
    brier: String,
    #[tabled(rename = "MAE (stars)")]
    mae: String,
    #[tabled(rename = "Coverage")]
    coverage: String,
}

impl From<&ReliabilityBin> for BinRow {
    fn from(bin: &ReliabilityBin) -> Self {
        let (mean_predicted, observed_rate) = if bin.count == 0 {
            ("-".to_string(), "-".to_string())
        } else {
            (
                format!("{:.3}", bin.mean_predicted),
                format!("{:.3}", bin.observed_rate),
            )
        };
        Self {
            range: format!("{:.1}-{:.1}", bin.lower, bin.upper),
            count: bin.count,
            mean_predicted,
            observed_rate,
        }
    }
}

impl From<&ModelCalibration> for ModelRow {
    fn from(model: &ModelCalibration) -> Self {
        Self {
            tag: model.model_tag.clone(),
            n: model.n,
            brier: format!("{:.6}", model.mean_brier),
            mae: format!("{:.3}", model.mean_mae_stars),
            coverage: format!("{:.1}%", model.band_coverage * 100.0),
        }
    }
}

/// Ledger rows recorded under `model`, or all rows.
fn select(outcomes: Vec<Outcome>, model: Option<&str>) -> Vec<Outcome> {
    match model {
        Some(tag) => outcomes.into_iter().filter(|o| o.model_tag == tag).collect(),
        None => outcomes,
    }
}

/// Execute the report command.
pub fn execute(config: &Config, args: &ReportArgs) -> Result<()> {
    let ledger = bootstrap::build_ledger(config);
    let outcomes = select(ledger.all_outcomes()?, args.model.as_deref());
    let report = CalibrationReport::from_outcomes(&outcomes);

    if output::is_json() {
        output::json_output(json!({
            "command": "report",
            "ledger": ledger.location(),
            "model": args.model,
            "report": report,
        }));
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Calibration");
    output::field("Ledger", ledger.location());
    if let Some(tag) = &args.model {
        output::field("Model", tag);
    }
    if report.n == 0 {
        output::note("No scored outcomes yet");
        output::hint("run `repopulse score` once a batch is a horizon old");
        return Ok(());
    }

    output::field("Outcomes", report.n);
    output::field("Dates", report.prediction_dates);
    output::field("Mean Brier", output::highlight(format!("{:.6}", report.mean_brier)));
    output::field("Mean MAE", format!("{:.3} stars", report.mean_mae_stars));
    output::field("Mean p", format!("{:.4}", report.mean_p_breakout));
    output::field("Breakout rate", format!("{:.4}", report.breakout_rate));
    output::field("Band coverage", format!("{:.1}%", report.band_coverage * 100.0));

    output::section("Reliability");
    let bins: Vec<BinRow> = report.bins.iter().map(BinRow::from).collect();
    output::lines(&Table::new(bins).to_string());

    if report.by_model.len() > 1 || args.model.is_none() {
        output::section("By model");
        let models: Vec<ModelRow> = report.by_model.iter().map(ModelRow::from).collect();
        output::lines(&Table::new(models).to_string());
    }
    Ok(())
}
