//! Handler for the `score` command.

use chrono::Utc;
use serde_json::json;

use crate::adapter::inbound::cli::command::ScoreArgs;
use crate::adapter::inbound::cli::output;
use crate::application::ScoringReport;
use crate::domain::outcome::ScoreSummary;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;

/// Execute the score command.
pub async fn execute(config: &Config, args: &ScoreArgs) -> Result<()> {
    let service = bootstrap::build_scoring_service(config);

    let pb = output::spinner("Scoring prediction batch");
    let report = match service.run(Utc::now(), args.prediction_date).await {
        Ok(report) => {
            output::spinner_success(&pb, "Scoring finished");
            report
        }
        Err(e) => {
            output::spinner_fail(&pb, "Scoring failed");
            return Err(e);
        }
    };

    match report {
        ScoringReport::NoBatch {
            prediction_date,
            expected,
        } => {
            if output::is_json() {
                output::json_output(json!({
                    "command": "score",
                    "prediction_date_utc": prediction_date,
                    "status": "no_batch",
                    "expected": expected,
                }));
            } else {
                output::warning(&format!("No predictions recorded for {prediction_date}"));
                output::field("Expected", expected);
            }
        }
        ScoringReport::Scored {
            summary,
            scored,
            already_scored,
            skipped,
        } => {
            if output::is_json() {
                output::json_output(json!({
                    "command": "score",
                    "status": "scored",
                    "summary": summary,
                    "already_scored": already_scored,
                    "skipped": skipped.iter().map(|row| json!({
                        "full_name": row.full_name,
                        "not_found": row.not_found,
                        "reason": row.reason,
                    })).collect::<Vec<_>>(),
                }));
                return Ok(());
            }

            print_summary(&summary, already_scored);
            output::field("Ledger", config.storage.ledger_path().display());
            if !skipped.is_empty() {
                output::section("Skipped");
                for row in &skipped {
                    let kind = if row.not_found { "gone" } else { "unreachable" };
                    output::warning(&format!("{} ({kind}): {}", row.full_name, row.reason));
                }
            }
            if scored.is_empty() && already_scored > 0 {
                output::note("Every prediction for this date was already on the ledger");
            }
        }
    }

    Ok(())
}

fn print_summary(summary: &ScoreSummary, already_scored: usize) {
    output::section("Scored");
    output::field("Predicted on", summary.prediction_date_utc);
    output::field("Scored on", summary.scored_date_utc);
    output::field("Outcomes", summary.n);
    output::field("New", summary.newly_scored);
    output::field("Already", already_scored);
    output::field("Skipped", summary.skipped);

    output::section("Calibration");
    output::field("Mean Brier", output::highlight(format!("{:.6}", summary.mean_brier)));
    output::field("Mean MAE", format!("{:.3} stars", summary.mean_mae_stars));
    output::field("Breakouts", summary.breakouts_actual);
    output::field("Mean p", format!("{:.4}", summary.mean_p_breakout));
    output::field(
        "Band coverage",
        format!("{:.1}%", summary.band_coverage * 100.0),
    );
}
