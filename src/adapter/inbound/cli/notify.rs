//! Handler for the `notify` command.

use chrono::Utc;
use serde_json::json;

use crate::adapter::inbound::cli::command::NotifyArgs;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;

/// Execute the notify command.
pub async fn execute(config: &Config, args: &NotifyArgs) -> Result<()> {
    let date = args.date.unwrap_or_else(|| Utc::now().date_naive());
    let service = bootstrap::build_publish_service(config)?;

    let pb = output::spinner(&format!("Delivering post for {date}"));
    let delivery = match service.publish(date).await {
        Ok(delivery) => {
            output::spinner_success(&pb, "Post delivered");
            delivery
        }
        Err(e) => {
            output::spinner_fail(&pb, "Delivery failed");
            return Err(e);
        }
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "notify",
            "post_id": delivery.post.post_id,
            "date_utc": delivery.post.date_utc,
            "sinks": delivery.sinks,
        }));
        return Ok(());
    }

    output::section("Delivered");
    output::field("Post", &delivery.post.post_id);
    output::field("Sinks", delivery.sinks.join(", "));
    if !config.webhook.enabled {
        output::hint("webhook delivery is disabled in [webhook]");
    }
    Ok(())
}
