//! Clipboard capability
//!
//! Diagnostics are handed to whatever clipboard the host has. The tracker
//! only needs to write text; reading is never required.

use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors a clipboard may report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// No clipboard is available to this host
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    /// The clipboard refused the write
    #[error("clipboard write failed: {0}")]
    WriteFailed(String),
}

/// Write access to a clipboard
pub trait Clipboard: Send + Sync {
    /// Replaces the clipboard contents with `text`
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard used when the host provides none
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable(
            "no clipboard configured".to_string(),
        ))
    }
}

/// In-process clipboard
///
/// Clones share the same contents, which makes it usable both as a host
/// clipboard for headless runs and as a probe in tests.
#[derive(Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last text written, if any
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .map(|contents| contents.clone())
            .unwrap_or(None)
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut contents = self
            .contents
            .lock()
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))?;
        *contents = Some(text.to_string());
        Ok(())
    }
}
