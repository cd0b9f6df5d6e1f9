//! Clipboard access.

use std::any::Any;

use thiserror::Error;

/// Errors from the asynchronous clipboard API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard write denied")]
    Denied,

    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// System clipboard as seen by page scripts.
pub trait Clipboard: Any {
    /// Permission-gated write (`navigator.clipboard.writeText`).
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;

    /// Legacy copy of a selected text field (`document.execCommand('copy')`).
    /// Returns false when the host refuses.
    fn copy_selection(&mut self, text: &str) -> bool;

    fn read_text(&self) -> Option<&str>;

    fn as_any(&self) -> &dyn Any;
}

/// In-process clipboard.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
    /// Returned by every `write_text` when set.
    write_error: Option<ClipboardError>,
    refuse_selection: bool,
    fallback_copies: usize,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose permission-gated write always fails.
    pub fn denying() -> Self {
        Self {
            write_error: Some(ClipboardError::Denied),
            ..Default::default()
        }
    }

    /// No clipboard at all: the async API is missing and legacy copies are
    /// refused, as on an insecure origin.
    pub fn unavailable() -> Self {
        Self {
            write_error: Some(ClipboardError::Unavailable("insecure context".to_string())),
            refuse_selection: true,
            ..Default::default()
        }
    }

    /// Number of successful legacy copies.
    pub fn fallback_copies(&self) -> usize {
        self.fallback_copies
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if let Some(err) = &self.write_error {
            return Err(err.clone());
        }
        self.contents = Some(text.to_string());
        Ok(())
    }

    fn copy_selection(&mut self, text: &str) -> bool {
        if self.refuse_selection {
            return false;
        }
        self.contents = Some(text.to_string());
        self.fallback_copies += 1;
        true
    }

    fn read_text(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
