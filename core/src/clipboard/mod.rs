//! Clipboard capability abstraction

use arboard::Clipboard as ArboardClipboard;

use crate::{Error, Result};

/// Read/write access to a local clipboard.
///
/// Both session roles treat the clipboard as a synchronous capability: a
/// call completes before the next protocol step proceeds, so no locking is
/// needed around it.
pub trait Clipboard: Send {
    /// Current clipboard text. An empty or non-text clipboard reads as the
    /// empty string.
    fn get(&mut self) -> Result<String>;

    /// Overwrite the clipboard with `text`.
    fn set(&mut self, text: &str) -> Result<()>;
}

/// OS clipboard backed by arboard
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for SystemClipboard {
    fn get(&mut self) -> Result<String> {
        let mut clipboard =
            ArboardClipboard::new().map_err(|e| Error::Clipboard(e.to_string()))?;

        match clipboard.get_text() {
            Ok(text) => Ok(text),
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(Error::Clipboard(e.to_string())),
        }
    }

    fn set(&mut self, text: &str) -> Result<()> {
        let mut clipboard =
            ArboardClipboard::new().map_err(|e| Error::Clipboard(e.to_string()))?;

        clipboard
            .set_text(text)
            .map_err(|e| Error::Clipboard(e.to_string()))
    }
}
