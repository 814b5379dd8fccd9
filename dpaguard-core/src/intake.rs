//! Review intake rules
//!
//! Everything that has to hold before a document is sent for analysis:
//! the review context captured alongside the upload, and the file type
//! and size limits enforced by the backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Largest document the backend accepts (25 MiB)
pub const MAX_FILE_SIZE_BYTES: u64 = 25 * 1024 * 1024;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Document types accepted for analysis
pub const ALLOWED_MIME_TYPES: [&str; 2] = [PDF_MIME, DOCX_MIME];

/// Reasons a document is rejected before upload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error("Please select a PDF or DOCX file.")]
    MissingFile,

    #[error("Unsupported file type. Please upload PDF or DOCX.")]
    UnsupportedType,

    #[error("File is too large. Maximum size is {}MB.", MAX_FILE_SIZE_BYTES / (1024 * 1024))]
    TooLarge { size_bytes: u64 },
}

/// Role of the reviewing company under the DPA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyRole {
    Controller,
    Processor,
}

/// Region where personal data is processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "EU")]
    Eu,
    #[serde(rename = "UK")]
    Uk,
    #[serde(rename = "US")]
    Us,
    Other,
}

/// Kind of vendor the DPA is signed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VendorType {
    #[serde(rename = "SaaS")]
    Saas,
    Cloud,
    Marketing,
    #[serde(rename = "HR")]
    Hr,
    Payments,
    Other,
}

/// Context sent with a new review as `context_json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewContext {
    pub company_role: CompanyRole,
    pub region: Region,
    pub vendor_type: Option<VendorType>,
}

impl ReviewContext {
    pub fn new(company_role: CompanyRole, region: Region, vendor_type: Option<VendorType>) -> Self {
        Self {
            company_role,
            region,
            vendor_type,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        // Plain enums and an Option cannot fail to serialize.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Display for ReviewContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.to_json();
        write!(
            f,
            "role={} region={}",
            value["company_role"].as_str().unwrap_or("?"),
            value["region"].as_str().unwrap_or("?")
        )?;
        if let Some(vendor) = value["vendor_type"].as_str() {
            write!(f, " vendor={}", vendor)?;
        }
        Ok(())
    }
}

/// Resolves the MIME type of a document from its extension
///
/// Returns `None` for anything that is not a PDF or DOCX file.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "pdf" => Some(PDF_MIME),
        "docx" => Some(DOCX_MIME),
        _ => None,
    }
}

pub fn is_allowed_mime(mime: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime)
}

/// Validates a document before upload
///
/// # Arguments
/// * `path` - Path of the document, used for type detection
/// * `size_bytes` - Size of the document on disk
///
/// # Returns
/// The MIME type the document should be uploaded with
pub fn validate_upload(path: &Path, size_bytes: u64) -> Result<&'static str, IntakeError> {
    if path.as_os_str().is_empty() {
        return Err(IntakeError::MissingFile);
    }

    let mime = mime_for_path(path).ok_or(IntakeError::UnsupportedType)?;

    if size_bytes > MAX_FILE_SIZE_BYTES {
        return Err(IntakeError::TooLarge { size_bytes });
    }

    Ok(mime)
}

/// User-facing explanation for a rejected upload request
///
/// # Arguments
/// * `status` - HTTP status of the failed request, if any
/// * `message` - Message carried by the failure
pub fn upload_failure_message(status: Option<u16>, message: &str) -> String {
    match status {
        Some(415) => IntakeError::UnsupportedType.to_string(),
        Some(413) => "File too large. Max 25MB.".to_string(),
        Some(409) => format!("Review is not in a state that allows upload. {}", message)
            .trim()
            .to_string(),
        _ if message.trim().is_empty() => "Something went wrong. Please try again.".to_string(),
        _ => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_detection() {
        assert_eq!(mime_for_path(Path::new("dpa.pdf")), Some(PDF_MIME));
        assert_eq!(mime_for_path(Path::new("DPA.PDF")), Some(PDF_MIME));
        assert_eq!(mime_for_path(Path::new("dpa.docx")), Some(DOCX_MIME));
        assert_eq!(mime_for_path(Path::new("dpa.doc")), None);
        assert_eq!(mime_for_path(Path::new("dpa")), None);
        assert!(is_allowed_mime(DOCX_MIME));
        assert!(!is_allowed_mime("text/plain"));
    }

    #[test]
    fn test_validate_upload() {
        assert_eq!(validate_upload(Path::new("a.pdf"), 1024), Ok(PDF_MIME));
        assert_eq!(
            validate_upload(Path::new("a.pdf"), MAX_FILE_SIZE_BYTES),
            Ok(PDF_MIME)
        );
        assert_eq!(
            validate_upload(Path::new(""), 0),
            Err(IntakeError::MissingFile)
        );
        assert_eq!(
            validate_upload(Path::new("a.txt"), 10),
            Err(IntakeError::UnsupportedType)
        );
        assert_eq!(
            validate_upload(Path::new("a.docx"), MAX_FILE_SIZE_BYTES + 1),
            Err(IntakeError::TooLarge {
                size_bytes: MAX_FILE_SIZE_BYTES + 1
            })
        );
    }

    #[test]
    fn test_intake_error_messages() {
        assert_eq!(
            IntakeError::TooLarge { size_bytes: 0 }.to_string(),
            "File is too large. Maximum size is 25MB."
        );
        assert_eq!(
            IntakeError::UnsupportedType.to_string(),
            "Unsupported file type. Please upload PDF or DOCX."
        );
    }

    #[test]
    fn test_context_json_shape() {
        let context = ReviewContext::new(CompanyRole::Controller, Region::Eu, Some(VendorType::Saas));
        assert_eq!(
            context.to_json(),
            serde_json::json!({
                "company_role": "controller",
                "region": "EU",
                "vendor_type": "SaaS"
            })
        );

        let context = ReviewContext::new(CompanyRole::Processor, Region::Other, None);
        assert_eq!(context.to_json()["vendor_type"], serde_json::Value::Null);
        assert_eq!(context.to_string(), "role=processor region=Other");
    }

    #[test]
    fn test_upload_failure_message() {
        assert_eq!(
            upload_failure_message(Some(415), "nope"),
            "Unsupported file type. Please upload PDF or DOCX."
        );
        assert_eq!(upload_failure_message(Some(413), ""), "File too large. Max 25MB.");
        assert_eq!(
            upload_failure_message(Some(409), ""),
            "Review is not in a state that allows upload."
        );
        assert_eq!(upload_failure_message(Some(500), "boom"), "boom");
        assert_eq!(
            upload_failure_message(None, ""),
            "Something went wrong. Please try again."
        );
    }
}
