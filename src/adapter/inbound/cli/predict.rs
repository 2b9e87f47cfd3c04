//! Handler for the `predict` command.

use chrono::Utc;
use serde_json::json;

use crate::adapter::inbound::cli::command::PredictArgs;
use crate::adapter::inbound::cli::output;
use crate::application::{ForecastReport, ForecastService};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::store::ArtifactKind;

/// Execute the predict command.
pub async fn execute(config: &Config, args: &PredictArgs) -> Result<()> {
    let service = bootstrap::build_forecast_service(config, args.dry_run);

    let pb = output::spinner("Forecasting new repositories");
    let report = match service.run(Utc::now()).await {
        Ok(report) => {
            output::spinner_success(
                &pb,
                &format!("Forecast {} repositories", report.batch.len()),
            );
            report
        }
        Err(e) => {
            output::spinner_fail(&pb, "Forecast failed");
            return Err(e);
        }
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "predict",
            "date_utc": report.date_utc,
            "dry_run": args.dry_run,
            "model": config.model.tag,
            "predictions": report.batch.predictions(),
            "post": report.post,
        }));
        return Ok(());
    }

    print_summary(config, &service, &report, args.dry_run);
    Ok(())
}

fn print_summary(
    config: &Config,
    service: &ForecastService,
    report: &ForecastReport,
    dry_run: bool,
) {
    output::section("Forecast");
    output::field("Date", report.date_utc);
    output::field("Model", &config.model.tag);
    output::field("Candidates", report.snapshots.len());

    if report.batch.is_empty() {
        output::note("No repositories matched the discovery window");
    }

    output::section("Digest");
    output::lines(&report.post.text);

    if dry_run {
        output::section("Dry run");
        output::note("Nothing was written");
    } else {
        output::section("Recorded");
        let date = report.date_utc;
        output::field("Predictions", service.locate(ArtifactKind::Predictions, date));
        output::field("Snapshots", service.locate(ArtifactKind::Snapshots, date));
        output::field("Post", service.locate(ArtifactKind::Post, date));
        output::hint(&format!(
            "score this batch on or after {} with `repopulse score`",
            report.date_utc + chrono::Duration::days(i64::from(config.scoring.horizon_days))
        ));
    }
}
