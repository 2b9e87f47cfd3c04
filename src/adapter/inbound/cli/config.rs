//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::Config;

/// Default config template with documentation.
const CONFIG_TEMPLATE: &str = include_str!("../../../../config.toml.example");

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, CONFIG_TEMPLATE)?;
    output::section("Config Initialized");
    output::success("Created configuration file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note(&format!("1. Edit {} with your settings", path.display()));
    output::note("2. Optionally export GH_TOKEN and MAKE_WEBHOOK_URL");
    output::note(&format!(
        "3. Run: repopulse config validate -c {}",
        path.display()
    ));
    output::note(&format!("4. Run: repopulse predict -c {}", path.display()));
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(path: &Path) -> Result<()> {
    let config = Config::load_or_default(path)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "path": path.display().to_string(),
            "file_exists": path.exists(),
            "model": config.model,
            "digest": config.digest,
            "github_token_loaded": config.github.token.is_some(),
            "webhook_url_loaded": config.webhook.url.is_some(),
        }));
        return Ok(());
    }

    output::section("Effective Configuration");
    output::field("Path", path.display());
    if !path.exists() {
        output::note("(file not found, defaults apply)");
    }
    output::field("Log level", &config.logging.level);
    output::field("Log format", &config.logging.format);

    output::section("GitHub");
    output::field("API", &config.github.api_url);
    output::field(
        "Window",
        format!("{} days", config.github.search.created_within_days),
    );
    output::field("Min stars", config.github.search.min_stars);
    output::field("Per run", config.github.search.per_page);
    if config.github.token.is_some() {
        output::success("Token loaded from GH_TOKEN");
    } else {
        output::warning("GH_TOKEN not set (unauthenticated rate limits)");
    }

    output::section("Storage");
    output::field("Predictions", config.storage.predictions_path().display());
    output::field("Posts", config.storage.posts_path().display());
    output::field("Ledger", config.storage.ledger_path().display());

    output::section("Model");
    output::field("Tag", &config.model.tag);
    output::field("Horizon", format!("{} days", config.scoring.horizon_days));
    output::field(
        "Threshold",
        format!(
            "max({}, {:.0}% of stars)",
            config.model.coefficients.threshold_floor,
            config.model.coefficients.threshold_fraction * 100.0
        ),
    );

    output::section("Notifications");
    output::field("Top N", config.digest.top_n);
    if !config.webhook.enabled {
        output::field("Webhook", "disabled");
    } else if config.webhook.url.is_some() {
        output::success("Webhook URL loaded from MAKE_WEBHOOK_URL");
    } else {
        output::warning("MAKE_WEBHOOK_URL not set (notify will fail)");
    }

    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    output::section("Config Validation");
    output::field("Path", path.display());
    let config = Config::load(path)?;
    output::success("Config file is valid");

    let mut warnings = Vec::new();
    if config.github.token.is_none() {
        warnings.push("GH_TOKEN not set; GitHub allows 60 unauthenticated requests per hour");
    }
    if config.webhook.enabled && config.webhook.url.is_none() {
        warnings.push("webhook enabled but MAKE_WEBHOOK_URL not set");
    }
    if !warnings.is_empty() {
        output::section("Warnings");
        for warning in warnings {
            output::warning(warning);
        }
    }

    output::field(
        "Next",
        format!("repopulse config show -c {}", path.display()),
    );

    Ok(())
}
