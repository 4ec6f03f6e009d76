//! Notification sinks.
//!
//! The watcher only needs to hand text to a chat channel. Everything the
//! hosting platform does beyond that stays behind [`NotificationSink`].

pub mod discord;
pub mod logging;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use self::discord::DiscordSink;
pub use self::logging::LogSink;

/// Destination for outbound messages.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one message.
    async fn send(&self, text: &str) -> Result<()>;
}
