use std::sync::{Arc, Mutex};

use arboard::Clipboard;
use async_trait::async_trait;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::app::AppMessage;
use crate::commands::Command;

/// System clipboard shared by every copy.
///
/// On Linux the clipboard is held by the application, so the text remains
/// available until the next copy or app exit. Clone is cheap.
#[derive(Clone, Default)]
pub struct SharedClipboard {
    inner: Arc<Mutex<Option<Clipboard>>>,
}

impl SharedClipboard {
    pub fn set_text(&self, text: &str) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| eyre!("Failed to lock clipboard: {e}"))?;

        // Created on first use
        if guard.is_none() {
            *guard = Some(Clipboard::new()?);
        }
        if let Some(clipboard) = guard.as_mut() {
            clipboard.set_text(text)?;
        }
        Ok(())
    }
}

/// Copies a string to the system clipboard and confirms with an info dialog.
pub struct CopyToClipboardCmd {
    clipboard: SharedClipboard,
    text: String,
}

impl CopyToClipboardCmd {
    pub fn new(clipboard: SharedClipboard, text: impl Into<String>) -> Self {
        Self {
            clipboard,
            text: text.into(),
        }
    }
}

#[async_trait]
impl Command for CopyToClipboardCmd {
    fn name(&self) -> String {
        format!("Copying {} bytes", self.text.len())
    }

    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()> {
        self.clipboard.set_text(&self.text)?;
        debug!("Clipboard updated");
        action_tx.send(AppMessage::ShowInfo("Copied to clipboard!".to_string()))?;
        Ok(())
    }
}
