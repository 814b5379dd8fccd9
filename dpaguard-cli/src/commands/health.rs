//! Health command handler

use anyhow::{Result, bail};
use colored::*;
use dpaguard_client::{ReviewClient, format_error};
use serde_json::Value as JsonValue;

use crate::config::Config;

/// Probe liveness and readiness of the review API
pub async fn handle_health_command(config: &Config) -> Result<()> {
    let client = ReviewClient::new(config.api_url.as_str());
    println!("{} {}", "Review API:".bold(), client.base_url().dimmed());

    let live = report_probe("live", client.health_live().await);
    let ready = report_probe("ready", client.health_ready().await);

    if !(live && ready) {
        bail!("Review API at {} is not healthy", client.base_url());
    }
    Ok(())
}

fn report_probe(name: &str, result: dpaguard_client::Result<JsonValue>) -> bool {
    match result {
        Ok(body) => {
            println!("  {} {}", "✓".green(), name);
            if let Some(checks) = body.get("checks").and_then(JsonValue::as_object) {
                for (check, status) in checks {
                    let status = status
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| status.to_string());
                    println!("      {} {}", format!("{}:", check).dimmed(), status);
                }
            }
            true
        }
        Err(e) => {
            println!("  {} {} {}", "✗".red(), name, format_error(&e).red());
            false
        }
    }
}
