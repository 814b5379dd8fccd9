//! System clipboard
//!
//! Writes through whichever clipboard utility the platform provides.

use dpaguard_tracker::{Clipboard, ClipboardError};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

/// Clipboard utilities tried in order, with their arguments
fn candidates() -> Vec<(&'static str, Vec<&'static str>)> {
    if cfg!(target_os = "macos") {
        vec![("pbcopy", vec![])]
    } else if cfg!(target_os = "windows") {
        vec![("clip", vec![])]
    } else {
        vec![
            ("wl-copy", vec![]),
            ("xclip", vec!["-selection", "clipboard"]),
            ("xsel", vec!["--clipboard", "--input"]),
        ]
    }
}

/// Clipboard backed by the host's clipboard utility
pub struct SystemClipboard;

impl SystemClipboard {
    fn pipe_to(program: &str, args: &[&str], text: &str) -> std::io::Result<bool> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        // Closing stdin before waiting lets the utility see end of input.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };
        let status = child.wait()?;
        written?;
        Ok(status.success())
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        for (program, args) in candidates() {
            match Self::pipe_to(program, &args, text) {
                Ok(true) => return Ok(()),
                Ok(false) => {
                    return Err(ClipboardError::WriteFailed(format!(
                        "{} exited with an error",
                        program
                    )));
                }
                Err(e) => debug!("Clipboard utility {} unavailable: {}", program, e),
            }
        }

        Err(ClipboardError::Unavailable(
            "no clipboard utility found".to_string(),
        ))
    }
}
