// Clipboard adapter. Copying is best effort: callers get a `Result` back and
// decide what to tell the user when no clipboard backend is available.

use thiserror::Error;

#[cfg(test)]
use mockall::automock;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("no clipboard available: {0}")]
    Unavailable(String),
    #[error("could not write to clipboard: {0}")]
    Write(String),
}

#[cfg_attr(test, automock)]
pub trait Clipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The system clipboard, opened lazily on first copy.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.inner.is_none() {
            let cb = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.inner = Some(cb);
        }
        match self.inner.as_mut() {
            Some(cb) => cb
                .set_text(text.to_string())
                .map_err(|e| ClipboardError::Write(e.to_string())),
            None => Err(ClipboardError::Unavailable("clipboard not initialised".into())),
        }
    }
}

/// Printed when copying fails, so the user knows what is missing.
pub const NO_CLIPBOARD_HINT: &str =
    "There is no copy/paste environment (an X11 or Wayland session is required), copy the link above by hand";
