// src/commands.rs

//! Interactive commands.
//!
//! Each command maps onto the same cycle operations the scheduler uses and
//! replies through the notification sink. Lines are read from any async
//! reader; the CLI feeds it stdin.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::Mutex;

use crate::error::Result;
use crate::pipeline::{Monitor, notify, render_message};
use crate::sink::NotificationSink;

pub const HEALTH_REPLY: &str = "Hello! I am working correctly.";
pub const FORCE_CHECK_START: &str = "Forcing a check for new posts...";
pub const FORCE_CHECK_DONE: &str = "Check complete.";
pub const LATEST_START: &str = "Fetching the latest post...";
pub const LATEST_NONE: &str =
    "No posts found. This could indicate an issue with the website structure or the scraping process.";

/// A recognised command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    /// Reply with a fixed acknowledgement
    Test,
    /// Run detect + notify immediately
    ForceCheck,
    /// Send the first post currently on the page
    Latest,
}

impl BotCommand {
    /// Parse `line` if it starts with `prefix` and names a known command.
    pub fn parse(line: &str, prefix: &str) -> Option<Self> {
        let name = line.trim().strip_prefix(prefix)?;
        match name.split_whitespace().next()?.to_ascii_lowercase().as_str() {
            "test" => Some(Self::Test),
            "forcecheckposts" => Some(Self::ForceCheck),
            "latest" => Some(Self::Latest),
            _ => None,
        }
    }
}

/// Executes commands against a shared monitor.
pub struct Dispatcher {
    monitor: Arc<Mutex<Monitor>>,
    sink: Arc<dyn NotificationSink>,
}

impl Dispatcher {
    pub fn new(monitor: Arc<Mutex<Monitor>>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { monitor, sink }
    }

    /// Run a command. Errors only come from sending replies.
    pub async fn dispatch(&self, command: BotCommand) -> Result<()> {
        log::info!("Handling command {command:?}");
        match command {
            BotCommand::Test => self.sink.send(HEALTH_REPLY).await,
            BotCommand::ForceCheck => self.force_check().await,
            BotCommand::Latest => self.latest().await,
        }
    }

    async fn force_check(&self) -> Result<()> {
        self.sink.send(FORCE_CHECK_START).await?;

        let mut monitor = self.monitor.lock().await;
        match monitor.check_for_new_posts().await {
            Ok(check) => {
                notify(&check.new_posts, self.sink.as_ref(), monitor.notifier()).await;
            }
            Err(e) => {
                log::warn!("Forced check failed: {e}");
                self.sink
                    .send(&format!("An error occurred while checking for new posts: {e}"))
                    .await?;
            }
        }
        drop(monitor);

        self.sink.send(FORCE_CHECK_DONE).await
    }

    async fn latest(&self) -> Result<()> {
        self.sink.send(LATEST_START).await?;

        let monitor = self.monitor.lock().await;
        let reply = match monitor.latest().await {
            Ok(Some(post)) => render_message(&post, monitor.notifier()),
            Ok(None) => LATEST_NONE.to_string(),
            Err(e) => format!("An error occurred while fetching the latest post: {e}"),
        };
        drop(monitor);

        self.sink.send(&reply).await
    }

    /// Read commands line by line until the reader is exhausted.
    pub async fn run_console<R>(&self, mut reader: R, prefix: &str) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            // Undecodable bytes must not end the console.
            let line = String::from_utf8_lossy(&buf);
            match BotCommand::parse(&line, prefix) {
                Some(command) => {
                    if let Err(e) = self.dispatch(command).await {
                        log::warn!("Command {command:?} failed: {e}");
                    }
                }
                None if line.trim().is_empty() => {}
                None => log::debug!("Ignoring unknown command: {}", line.trim()),
            }
        }
        log::info!("Command input closed");
        Ok(())
    }
}
