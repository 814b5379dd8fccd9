//! Terminal rendering of reviews, tracker views and reports

use colored::*;
use dpaguard_core::domain::job::JobStage;
use dpaguard_core::domain::review::{Review, ReviewStatus};
use dpaguard_core::report::{ReviewReport, RiskSeverity, RiskStatus};
use dpaguard_tracker::{Fault, MilestoneStatus, TrackerView};

/// Print detailed review information
pub fn print_review_details(review: &Review) {
    println!("{}", "Review Details:".bold());
    println!("  ID:       {}", review.review_id.to_string().cyan());
    println!("  Status:   {}", colorize_review_status(review.status));
    println!(
        "  Created:  {}",
        review.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "  Updated:  {}",
        review.updated_at.format("%Y-%m-%d %H:%M:%S")
    );

    if let Some(doc) = &review.doc {
        println!("\n{}", "Document:".bold());
        if let Some(filename) = &doc.filename {
            println!("  File:     {}", filename);
        }
        if let Some(mime) = &doc.mime {
            println!("  Type:     {}", mime.dimmed());
        }
        if let Some(size) = doc.size_bytes {
            println!("  Size:     {}", format_size(size));
        }
    }

    if let Some(context) = &review.context_json {
        println!("\n{}", "Context:".bold());
        if let Some(fields) = context.as_object() {
            for (key, value) in fields {
                let value = value
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| value.to_string());
                println!("  {} = {}", key.cyan(), value);
            }
        }
    }
}

/// Colorize review status for display
pub fn colorize_review_status(status: ReviewStatus) -> ColoredString {
    let status_str = status.to_string();
    match status {
        ReviewStatus::Created => status_str.dimmed(),
        ReviewStatus::Uploaded => status_str.yellow(),
        ReviewStatus::Processing => status_str.cyan(),
        ReviewStatus::Completed => status_str.green(),
        ReviewStatus::Failed => status_str.red(),
    }
}

fn colorize_stage(stage: JobStage) -> ColoredString {
    let stage_str = stage.to_string();
    match stage {
        JobStage::Pending => stage_str.yellow(),
        JobStage::Started => stage_str.cyan(),
        JobStage::Success => stage_str.green(),
        JobStage::Failure => stage_str.red(),
    }
}

fn format_size(bytes: u64) -> String {
    const MB: u64 = 1024 * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}

/// Print the processing checklist, banners and available controls
pub fn print_tracker_view(view: &TrackerView) {
    println!();
    println!(
        "{} {}  {}",
        "Review".bold(),
        view.review_id.to_string().cyan(),
        colorize_stage(view.job_state)
    );

    for (milestone, status) in view.checklist.items() {
        let (icon, label) = match status {
            MilestoneStatus::Done => ("✓".green(), milestone.label().normal()),
            MilestoneStatus::Active => ("▸".cyan(), milestone.label().cyan()),
            MilestoneStatus::Pending => ("·".dimmed(), milestone.label().dimmed()),
            MilestoneStatus::Error => ("✗".red(), milestone.label().red()),
        };
        println!("  {} {}", icon, label);
    }

    if let (Some(fault), Some(message)) = (view.fault, view.error_message.as_deref()) {
        let heading = match fault {
            Fault::Transport => "Connection problem",
            Fault::Job => "Processing failed",
            Fault::Restart => "Restart failed",
        };
        println!("  {} {}: {}", "⚠".red(), heading.red().bold(), message);
    }

    if view.restarting {
        println!("  {}", "Restarting...".dimmed());
    }

    let mut controls = Vec::new();
    if view.show_retry {
        controls.push("[r] retry");
    }
    if view.show_restart {
        controls.push("[s] restart");
    }
    controls.push("[c] copy diagnostics");
    controls.push("[q] quit");
    println!("  {}", controls.join("  ").dimmed());

    if let Some(notice) = &view.notice {
        println!("  {}", notice.yellow());
    }
}

/// Whether two views differ in anything shown to the user
pub fn view_changed(previous: Option<&TrackerView>, next: &TrackerView) -> bool {
    let Some(previous) = previous else {
        return true;
    };
    previous.job_state != next.job_state
        || previous.checklist != next.checklist
        || previous.paused != next.paused
        || previous.restarting != next.restarting
        || previous.fault != next.fault
        || previous.error_message != next.error_message
        || previous.notice != next.notice
        || previous.job_id != next.job_id
}

fn colorize_risk(status: RiskStatus) -> ColoredString {
    match status {
        RiskStatus::Green => status.label().green(),
        RiskStatus::Yellow => status.label().yellow(),
        RiskStatus::Red => status.label().red(),
    }
}

/// Print a normalized review report
pub fn print_report(report: &ReviewReport) {
    println!("{}", report.doc_title.bold());
    if let Some(file_name) = &report.doc_file_name {
        println!("  {}", file_name.dimmed());
    }
    println!();
    println!("{} {}", "Recommendation:".bold(), report.recommendation);

    if !report.top_risks.is_empty() {
        println!("\n{}", "Top risks:".bold());
        for risk in &report.top_risks {
            let bullet = match risk.severity {
                RiskSeverity::Fail => "●".red(),
                RiskSeverity::Warn => "●".yellow(),
            };
            println!("  {} {}", bullet, risk.text);
        }
    }

    println!(
        "\n{}",
        format!("Clauses ({}):", report.total_clauses()).bold()
    );
    println!("{}", "─".repeat(80).dimmed());
    for clause in &report.clauses {
        println!("{} {}", colorize_risk(clause.status), clause.title.bold());
        if !clause.analysis.is_empty() {
            println!("  {}", clause.analysis);
        }
        if !clause.suggested_change.is_empty() {
            println!("  {} {}", "Suggested:".cyan(), clause.suggested_change);
        }
        for evidence in &clause.evidence {
            if let Some(quote) = &evidence.quote {
                match &evidence.label {
                    Some(label) => println!("  {} \"{}\"", format!("{}:", label).dimmed(), quote),
                    None => println!("  \"{}\"", quote.dimmed()),
                }
            }
        }
        println!();
    }
}
