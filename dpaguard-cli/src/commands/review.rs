//! Review command handlers
//!
//! Handles creating reviews, uploading documents, following analysis and
//! printing results.

use anyhow::{Context, Result, anyhow, bail};
use clap::Subcommand;
use colored::*;
use dpaguard_client::{ClientError, ReviewClient, format_error};
use dpaguard_core::domain::review::ReviewId;
use dpaguard_core::intake::{self, ReviewContext};
use dpaguard_core::report::{ReviewReport, build_copy_table};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use super::watch::{WatchOutcome, watch_review};
use crate::config::{Config, PollArgs};
use crate::render::{colorize_review_status, print_report, print_review_details};
use crate::types::{RegionArg, RoleArg, VendorArg, parse_review_id};

/// Review subcommands
#[derive(Subcommand)]
pub enum ReviewCommands {
    /// Create an empty review
    Create {
        #[command(flatten)]
        context: ContextArgs,
    },
    /// Get review details
    Get {
        /// Review ID
        #[arg(value_parser = parse_review_id)]
        id: ReviewId,
    },
    /// Validate, upload and analyse a document, then print its results
    Submit {
        /// PDF or DOCX document
        file: PathBuf,

        #[command(flatten)]
        context: ContextArgs,

        /// Start the analysis without waiting for it
        #[arg(long)]
        no_watch: bool,

        #[command(flatten)]
        poll: PollArgs,
    },
    /// Follow the analysis of a review
    Watch {
        /// Review ID
        #[arg(value_parser = parse_review_id)]
        id: ReviewId,

        /// Job ID, if already known
        #[arg(long)]
        job_id: Option<String>,

        #[command(flatten)]
        poll: PollArgs,
    },
    /// Print the results of a completed review
    Results {
        /// Review ID
        #[arg(value_parser = parse_review_id)]
        id: ReviewId,

        /// Print the raw results document
        #[arg(long, conflicts_with = "table")]
        raw: bool,

        /// Print a tab-separated table of findings
        #[arg(long)]
        table: bool,

        /// Include passed clauses in the table
        #[arg(long, requires = "table")]
        include_passed: bool,
    },
}

/// Review context flags
#[derive(Debug, Clone, clap::Args)]
pub struct ContextArgs {
    /// Role of your company under the DPA
    #[arg(long, value_enum, default_value = "controller")]
    role: RoleArg,

    /// Region where personal data is processed
    #[arg(long, value_enum, default_value = "eu")]
    region: RegionArg,

    /// Kind of vendor the DPA is signed with
    #[arg(long, value_enum)]
    vendor: Option<VendorArg>,
}

impl ContextArgs {
    fn to_context(&self) -> ReviewContext {
        ReviewContext::new(
            self.role.into(),
            self.region.into(),
            self.vendor.map(Into::into),
        )
    }
}

/// Handle review commands
///
/// Routes review subcommands to their respective handlers.
///
/// # Arguments
/// * `command` - The review command to execute
/// * `config` - The CLI configuration
pub async fn handle_review_command(command: ReviewCommands, config: &Config) -> Result<()> {
    let client = Arc::new(ReviewClient::new(config.api_url.as_str()));

    match command {
        ReviewCommands::Create { context } => create_review(&client, &context).await,
        ReviewCommands::Get { id } => get_review(&client, &id).await,
        ReviewCommands::Submit {
            file,
            context,
            no_watch,
            poll,
        } => submit(client, &file, &context, no_watch, &poll).await,
        ReviewCommands::Watch { id, job_id, poll } => {
            match watch_review(Arc::clone(&client), id.clone(), job_id, &poll).await? {
                WatchOutcome::Completed => show_results(&client, &id, None).await,
                WatchOutcome::Quit => Ok(()),
            }
        }
        ReviewCommands::Results {
            id,
            raw,
            table,
            include_passed,
        } => {
            if raw {
                print_raw_results(&client, &id).await
            } else if table {
                print_table(&client, &id, include_passed).await
            } else {
                show_results(&client, &id, None).await
            }
        }
    }
}

/// Create an empty review
async fn create_review(client: &ReviewClient, context: &ContextArgs) -> Result<()> {
    let context = context.to_context();
    let review = client
        .create_review(Some(context.to_json()))
        .await
        .map_err(|e| anyhow!(format_error(&e)))
        .context("Failed to create review")?;

    println!("{}", "✓ Review created".green().bold());
    println!("  ID:      {}", review.review_id.to_string().cyan());
    println!("  Status:  {}", colorize_review_status(review.status));
    println!("  Context: {}", context.to_string().dimmed());

    Ok(())
}

/// Get and display a single review
async fn get_review(client: &ReviewClient, id: &ReviewId) -> Result<()> {
    let review = client
        .get_review(id)
        .await
        .map_err(|e| anyhow!(format_error(&e)))?;

    print_review_details(&review);

    Ok(())
}

/// Validate, create, upload, start and (unless told otherwise) follow a review
async fn submit(
    client: Arc<ReviewClient>,
    file: &Path,
    context: &ContextArgs,
    no_watch: bool,
    poll: &PollArgs,
) -> Result<()> {
    let metadata = std::fs::metadata(file)
        .with_context(|| format!("Cannot read {}", file.display()))?;
    let mime = intake::validate_upload(file, metadata.len())?;
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or(intake::IntakeError::MissingFile)?;
    let bytes = std::fs::read(file).with_context(|| format!("Cannot read {}", file.display()))?;

    let context = context.to_context();
    let review = client
        .create_review(Some(context.to_json()))
        .await
        .map_err(|e| anyhow!(format_error(&e)))
        .context("Failed to create review")?;
    let review_id = review.review_id;
    println!(
        "{} {}",
        "✓ Review created".green(),
        review_id.to_string().cyan()
    );

    let uploaded = client
        .upload_document(&review_id, &file_name, mime, bytes)
        .await
        .map_err(|e| anyhow!(upload_failure(&e)))?;
    info!("Uploaded {} to review {}", file_name, review_id);
    println!(
        "{} {} ({})",
        "✓ Uploaded".green(),
        file_name,
        colorize_review_status(uploaded.status)
    );

    let started = client
        .start_review(&review_id)
        .await
        .map_err(|e| anyhow!(format_error(&e)))
        .context("Failed to start processing")?;
    println!(
        "{} {}",
        "✓ Processing started".green(),
        started
            .job_id
            .as_deref()
            .map(|job_id| format!("(job {})", job_id))
            .unwrap_or_default()
            .dimmed()
    );

    if no_watch {
        println!(
            "{}",
            format!("Follow it with: dpaguard review watch {}", review_id).dimmed()
        );
        return Ok(());
    }

    match watch_review(Arc::clone(&client), review_id.clone(), started.job_id, poll).await? {
        WatchOutcome::Completed => show_results(&client, &review_id, Some(&file_name)).await,
        WatchOutcome::Quit => Ok(()),
    }
}

/// User-facing message for a failed upload
fn upload_failure(err: &ClientError) -> String {
    let message = match err {
        ClientError::ApiError { message, .. } => message.clone(),
        other => other.to_string(),
    };
    intake::upload_failure_message(err.status(), &message)
}

/// Fetch, normalize and print the findings of a review
async fn show_results(
    client: &ReviewClient,
    id: &ReviewId,
    file_name: Option<&str>,
) -> Result<()> {
    let explain = client
        .get_explain(id)
        .await
        .map_err(|e| anyhow!(format_error(&e)))
        .context("Failed to load results")?;

    let report = ReviewReport::from_explain(&explain, file_name);
    if report.clauses.is_empty() {
        bail!("No findings available for review {} yet", id);
    }

    println!();
    print_report(&report);
    Ok(())
}

async fn print_raw_results(client: &ReviewClient, id: &ReviewId) -> Result<()> {
    let results = client
        .get_results(id)
        .await
        .map_err(|e| anyhow!(format_error(&e)))
        .context("Failed to load results")?;

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

async fn print_table(client: &ReviewClient, id: &ReviewId, include_passed: bool) -> Result<()> {
    let explain = client
        .get_explain(id)
        .await
        .map_err(|e| anyhow!(format_error(&e)))
        .context("Failed to load results")?;

    let report = ReviewReport::from_explain(&explain, None);
    println!("{}", build_copy_table(&report.clauses, include_passed));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_failure_uses_friendly_message() {
        let err = ClientError::api_error(413, "Payload Too Large", r#"{"detail":"too big"}"#);
        assert_eq!(upload_failure(&err), intake::upload_failure_message(Some(413), "too big"));

        let err = ClientError::api_error(400, "Bad Request", r#"{"detail":"Corrupt file"}"#);
        assert_eq!(upload_failure(&err), "Corrupt file");
    }

    #[test]
    fn test_context_defaults() {
        let args = ContextArgs {
            role: RoleArg::Processor,
            region: RegionArg::Uk,
            vendor: Some(VendorArg::Saas),
        };
        let context = args.to_context().to_json();
        assert_eq!(context["company_role"], "processor");
        assert_eq!(context["region"], "UK");
        assert_eq!(context["vendor_type"], "SaaS");
    }
}
