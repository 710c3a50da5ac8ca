//! System clipboard access behind a trait so the controller can be tested
//! without touching the real pasteboard.

use crate::shared::error::{AppError, AppResult};

pub trait ClipboardAccess: Send + Sync {
    fn copy(&self, text: &str) -> AppResult<()>;
    fn paste(&self) -> AppResult<Option<String>>;
}

/// The real clipboard. cli-clipboard talks to the platform pasteboard
/// directly, so this works before any window has ever been shown.
pub struct SystemClipboard;

impl ClipboardAccess for SystemClipboard {
    fn copy(&self, text: &str) -> AppResult<()> {
        cli_clipboard::set_contents(text.to_string())
            .map_err(|e| AppError::Clipboard(format!("Failed to write clipboard: {}", e)))
    }

    fn paste(&self) -> AppResult<Option<String>> {
        match cli_clipboard::get_contents() {
            Ok(content) if !content.is_empty() => Ok(Some(content)),
            // An empty or non-text pasteboard is not an error
            Ok(_) => Ok(None),
            Err(_) => Ok(None),
        }
    }
}
