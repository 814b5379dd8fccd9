//! Review report normalization
//!
//! The explain/results payload has changed shape over time and different
//! backends name the same field differently (`evaluations` vs `findings`,
//! `risk_label` vs `status`, ...). This module folds all known variants into
//! one display-ready [`ReviewReport`].

use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;

/// Traffic-light rating of a single clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskStatus {
    Green,
    Yellow,
    Red,
}

impl RiskStatus {
    /// Normalizes any rating the backend may use; unknown ratings are `Yellow`
    pub fn normalize(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return RiskStatus::Yellow;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "green" | "pass" | "ok" => RiskStatus::Green,
            "red" | "fail" | "failed" => RiskStatus::Red,
            _ => RiskStatus::Yellow,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskStatus::Green => "GREEN",
            RiskStatus::Yellow => "YELLOW",
            RiskStatus::Red => "RED",
        }
    }

    fn severity_rank(&self) -> u8 {
        match self {
            RiskStatus::Red => 0,
            RiskStatus::Yellow => 1,
            RiskStatus::Green => 2,
        }
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Severity of a headline risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskSeverity {
    Fail,
    Warn,
}

/// A quoted passage supporting a finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evidence {
    pub label: Option<String>,
    pub quote: Option<String>,
}

/// One evaluated clause
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClauseFinding {
    pub id: String,
    pub title: String,
    pub status: RiskStatus,
    pub analysis: String,
    pub suggested_change: String,
    pub evidence: Vec<Evidence>,
}

/// Headline risk shown above the clause list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopRisk {
    pub text: String,
    pub severity: RiskSeverity,
}

/// Display-ready review outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewReport {
    pub doc_title: String,
    pub doc_file_name: Option<String>,
    pub recommendation: String,
    pub top_risks: Vec<TopRisk>,
    pub clauses: Vec<ClauseFinding>,
}

impl ReviewReport {
    /// Builds a report from a raw explain/results payload
    ///
    /// # Arguments
    /// * `data` - The JSON payload returned by the review API
    /// * `uploaded_file_name` - Local file name, used when the payload has none
    pub fn from_explain(data: &JsonValue, uploaded_file_name: Option<&str>) -> Self {
        let doc_file_name = first_str(&data["document"], &["original_filename"])
            .or_else(|| first_str(data, &["file_name"]))
            .or_else(|| first_str(&data["document"], &["filename"]))
            .or_else(|| first_str(data, &["filename"]))
            .or_else(|| uploaded_file_name.filter(|s| !s.is_empty()).map(str::to_string));

        let base_title = doc_file_name
            .as_deref()
            .map(strip_extension)
            .unwrap_or_else(|| "DPA Review".to_string());
        let doc_title = first_str(&data["document"], &["name"]).unwrap_or(base_title);

        let recommendation =
            recommendation_text(first_str(data, &["decision", "recommendation"]).as_deref());

        let clauses: Vec<ClauseFinding> = ["evaluations", "findings"]
            .iter()
            .find_map(|key| data[key].as_array())
            .map(|items| items.iter().map(normalize_clause).collect())
            .unwrap_or_default();

        let top_risks = extract_top_risks(&clauses, 5)
            .into_iter()
            .map(|clause| TopRisk {
                text: humanize_check_id(Some(clause.title.as_str())),
                severity: if clause.status == RiskStatus::Red {
                    RiskSeverity::Fail
                } else {
                    RiskSeverity::Warn
                },
            })
            .collect();

        Self {
            doc_title,
            doc_file_name,
            recommendation,
            top_risks,
            clauses,
        }
    }

    pub fn total_clauses(&self) -> usize {
        self.clauses.len()
    }
}

/// Maps a backend decision onto the recommendation shown to the user
pub fn recommendation_text(decision: Option<&str>) -> String {
    let Some(decision) = decision.filter(|d| !d.is_empty()) else {
        return "Review".to_string();
    };
    match decision.to_ascii_lowercase().as_str() {
        "approve" | "approved" | "sign" | "ok" => "Sign".to_string(),
        "needs_changes" | "sign_with_changes" | "changes" | "review" => {
            "Sign with changes".to_string()
        }
        "reject" | "denied" => "Do not sign (request major changes)".to_string(),
        _ => decision.to_string(),
    }
}

/// Turns a check identifier into a readable risk description
pub fn humanize_check_id(value: Option<&str>) -> String {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return "Review issue".to_string();
    };
    let raw = value.to_ascii_uppercase();
    let known = match raw.as_str() {
        "BREACH_NOTIFICATION" => Some("Missing specific breach notification timeline"),
        "TRANSFERS" => Some("International transfer terms may be insufficient"),
        "SECURITY_TOMS" => Some("Security measures appear incomplete or vague"),
        "SUBPROCESSORS" => Some("Subprocessor controls may be missing or too permissive"),
        "DELETION_RETURN" => Some("Deletion/return obligations are unclear"),
        "AUDIT_RIGHTS" => Some("Audit rights are limited or missing"),
        "LIABILITY" => Some("Liability allocation is unclear or missing"),
        "GOVERNING_LAW" => Some("Governing law may not align with GDPR protections"),
        _ => None,
    };
    if let Some(text) = known {
        return text.to_string();
    }

    raw.replace('_', " ")
        .to_lowercase()
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Non-green findings, most severe first, at most `max_items`
pub fn extract_top_risks(clauses: &[ClauseFinding], max_items: usize) -> Vec<&ClauseFinding> {
    let mut scored: Vec<&ClauseFinding> = clauses
        .iter()
        .filter(|clause| clause.status != RiskStatus::Green)
        .collect();
    scored.sort_by_key(|clause| clause.status.severity_rank());
    scored.truncate(max_items);
    scored
}

/// Tab-separated summary suitable for pasting into a spreadsheet
pub fn build_copy_table(clauses: &[ClauseFinding], include_passed: bool) -> String {
    let mut lines = vec!["Title\tStatus\tAnalysis\tSuggested Change".to_string()];
    lines.extend(
        clauses
            .iter()
            .filter(|clause| include_passed || clause.status != RiskStatus::Green)
            .map(|clause| {
                format!(
                    "{}\t{}\t{}\t{}",
                    clause.title,
                    clause.status.label(),
                    collapse_whitespace(&clause.analysis),
                    collapse_whitespace(&clause.suggested_change)
                )
            }),
    );
    lines.join("\n")
}

fn normalize_clause(item: &JsonValue) -> ClauseFinding {
    let title = first_str(item, &["title", "clause_title", "check_id", "clause_type", "id"])
        .unwrap_or_else(|| "Clause".to_string());
    let status = RiskStatus::normalize(
        first_str(item, &["status", "risk_label", "risk", "severity"]).as_deref(),
    );
    let analysis =
        first_str(item, &["analysis", "rationale", "notes", "short_reason"]).unwrap_or_default();
    let suggested_change =
        first_str(item, &["suggested_change", "suggestion", "ask"]).unwrap_or_default();

    let evidence_source = if truthy(&item["evidence"]) {
        &item["evidence"]
    } else {
        &item["evidence_spans"]
    };

    ClauseFinding {
        id: first_str(item, &["check_id", "id", "key"]).unwrap_or_else(|| title.clone()),
        title: title.to_uppercase(),
        status,
        analysis,
        suggested_change,
        evidence: normalize_evidence(evidence_source),
    }
}

fn normalize_evidence(input: &JsonValue) -> Vec<Evidence> {
    match input {
        JsonValue::String(quote) if !quote.is_empty() => vec![Evidence {
            label: None,
            quote: Some(quote.clone()),
        }],
        JsonValue::Array(items) => items.iter().map(evidence_item).collect(),
        JsonValue::Object(_) => vec![evidence_item(input)],
        _ => Vec::new(),
    }
}

fn evidence_item(item: &JsonValue) -> Evidence {
    match item {
        JsonValue::String(quote) => Evidence {
            label: None,
            quote: Some(quote.clone()),
        },
        _ => Evidence {
            label: first_str(item, &["label", "section"]),
            quote: first_str(item, &["quote", "snippet", "text"]),
        },
    }
}

/// First non-empty string among `keys`
fn first_str(value: &JsonValue, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find_map(|field| match field {
            JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
            JsonValue::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

fn truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn strip_extension(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file_name.to_string(),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_status() {
        assert_eq!(RiskStatus::normalize(Some("pass")), RiskStatus::Green);
        assert_eq!(RiskStatus::normalize(Some("FAILED")), RiskStatus::Red);
        assert_eq!(RiskStatus::normalize(Some("warning")), RiskStatus::Yellow);
        assert_eq!(RiskStatus::normalize(Some("bogus")), RiskStatus::Yellow);
        assert_eq!(RiskStatus::normalize(None), RiskStatus::Yellow);
    }

    #[test]
    fn test_recommendation_text() {
        assert_eq!(recommendation_text(Some("approved")), "Sign");
        assert_eq!(recommendation_text(Some("NEEDS_CHANGES")), "Sign with changes");
        assert_eq!(
            recommendation_text(Some("reject")),
            "Do not sign (request major changes)"
        );
        assert_eq!(recommendation_text(Some("escalate")), "escalate");
        assert_eq!(recommendation_text(None), "Review");
    }

    #[test]
    fn test_humanize_check_id() {
        assert_eq!(
            humanize_check_id(Some("audit_rights")),
            "Audit rights are limited or missing"
        );
        assert_eq!(humanize_check_id(Some("DATA_SCOPE")), "Data Scope");
        assert_eq!(humanize_check_id(None), "Review issue");
    }

    #[test]
    fn test_report_from_backend_explain_payload() {
        let payload = json!({
            "review_id": "r-1",
            "status": "COMPLETED",
            "decision": "needs_changes",
            "document": {"original_filename": "Acme DPA.v2.pdf"},
            "evaluations": [
                {
                    "clause_type": "GOVERNING_LAW",
                    "risk_label": "green",
                    "short_reason": "EU law applies."
                },
                {
                    "clause_type": "TRANSFERS",
                    "risk_label": "yellow",
                    "short_reason": "SCCs referenced\n but not attached.",
                    "evidence_spans": [{"quote": "Standard Contractual Clauses"}]
                },
                {
                    "clause_type": "BREACH_NOTIFICATION",
                    "risk_label": "red",
                    "short_reason": "No deadline.",
                    "suggested_change": "Notify within 48 hours."
                }
            ]
        });

        let report = ReviewReport::from_explain(&payload, None);

        assert_eq!(report.doc_title, "Acme DPA.v2");
        assert_eq!(report.doc_file_name.as_deref(), Some("Acme DPA.v2.pdf"));
        assert_eq!(report.recommendation, "Sign with changes");
        assert_eq!(report.total_clauses(), 3);
        assert_eq!(report.clauses[1].title, "TRANSFERS");
        assert_eq!(
            report.clauses[1].evidence,
            vec![Evidence {
                label: None,
                quote: Some("Standard Contractual Clauses".to_string())
            }]
        );

        assert_eq!(
            report.top_risks,
            vec![
                TopRisk {
                    text: "Missing specific breach notification timeline".to_string(),
                    severity: RiskSeverity::Fail,
                },
                TopRisk {
                    text: "International transfer terms may be insufficient".to_string(),
                    severity: RiskSeverity::Warn,
                },
            ]
        );
    }

    #[test]
    fn test_report_falls_back_to_uploaded_name() {
        let report = ReviewReport::from_explain(&json!({}), Some("vendor.docx"));
        assert_eq!(report.doc_title, "vendor");
        assert_eq!(report.recommendation, "Review");
        assert!(report.clauses.is_empty());

        let report = ReviewReport::from_explain(&json!({}), None);
        assert_eq!(report.doc_title, "DPA Review");
    }

    #[test]
    fn test_evidence_shapes() {
        assert_eq!(normalize_evidence(&json!("quoted")).len(), 1);
        assert_eq!(
            normalize_evidence(&json!({"section": "4.2", "snippet": "within 72 hours"})),
            vec![Evidence {
                label: Some("4.2".to_string()),
                quote: Some("within 72 hours".to_string())
            }]
        );
        assert!(normalize_evidence(&json!(null)).is_empty());
    }

    #[test]
    fn test_copy_table() {
        let report = ReviewReport::from_explain(
            &json!({"findings": [
                {"title": "liability", "status": "fail", "analysis": "Capped  at\tfees."},
                {"title": "audit", "status": "pass"}
            ]}),
            None,
        );

        assert_eq!(
            build_copy_table(&report.clauses, false),
            "Title\tStatus\tAnalysis\tSuggested Change\nLIABILITY\tRED\tCapped at fees.\t"
        );
        assert_eq!(build_copy_table(&report.clauses, true).lines().count(), 3);
    }
}
