//! Sink that writes messages to the log instead of a chat channel.

use async_trait::async_trait;

use crate::error::Result;
use crate::sink::NotificationSink;

/// Logs every message at info level. Used for dry runs.
#[derive(Debug, Clone, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn send(&self, text: &str) -> Result<()> {
        log::info!("[dry-run] {text}");
        Ok(())
    }
}
