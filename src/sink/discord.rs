//! Discord channel sink.
//!
//! Posts each message through the REST API:
//! `POST {api_base}/channels/{channel_id}/messages` with a bot token.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{Credentials, NotifierConfig};
use crate::sink::NotificationSink;
use crate::utils::http::create_sink_client;

#[derive(Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
}

/// Sends messages to one Discord channel.
pub struct DiscordSink {
    client: Client,
    endpoint: String,
    token: String,
}

impl DiscordSink {
    /// Create a sink for the channel named in `credentials`.
    pub fn new(config: &NotifierConfig, credentials: &Credentials) -> Result<Self> {
        Ok(Self {
            client: create_sink_client(config.send_timeout_secs)?,
            endpoint: Self::endpoint(&config.api_base, credentials.channel_id),
            token: credentials.token.clone(),
        })
    }

    fn endpoint(api_base: &str, channel_id: u64) -> String {
        format!(
            "{}/channels/{}/messages",
            api_base.trim_end_matches('/'),
            channel_id
        )
    }
}

#[async_trait]
impl NotificationSink for DiscordSink {
    async fn send(&self, text: &str) -> Result<()> {
        let body = serde_json::to_vec(&CreateMessage { content: text })?;
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::delivery(None, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::delivery(Some(status.as_u16()), body.trim()));
        }
        Ok(())
    }
}
