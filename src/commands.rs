//! Async commands pattern for side effects.
//!
//! Commands represent async operations that run outside the main event loop.
//! The router returns commands, and the App spawns them. Results come back
//! as [`AppMessage`]s; a command that returns an error is reported to the
//! user by the App.

mod clipboard;
mod external;
mod fetch;
mod find;
mod regions;

use crate::app::AppMessage;
use async_trait::async_trait;
pub use clipboard::{CopyToClipboardCmd, SharedClipboard};
use color_eyre::Result;
pub use external::run_external;
pub use fetch::FetchPageCmd;
pub use find::FindCmd;
pub use regions::RegionsCmd;
use tokio::sync::mpsc::UnboundedSender;

/// Async commands that perform side effects.
#[async_trait]
pub trait Command: Send + 'static {
    /// Human-readable name for logs.
    fn name(&self) -> String;

    /// Execute the command.
    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()>;
}
