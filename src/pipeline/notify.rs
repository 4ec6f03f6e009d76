// src/pipeline/notify.rs

//! Message rendering and fan-out to the sink.

use crate::models::{NotifierConfig, Post};
use crate::sink::NotificationSink;
use crate::utils::{is_on_domain, truncate_chars};

/// Outcome of one notification batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyReport {
    pub sent: usize,
    pub failed: usize,
}

/// Render the chat message for a post.
///
/// Posts hosted on the primary domain are sent as the bare link. Others get
/// the discussion link appended in angle brackets, which keeps chat clients
/// from previewing it.
///
/// The result never exceeds `max_message_length` chars. The discussion
/// suffix is dropped whole when it does not fit; only a link that is too
/// long by itself gets cut.
pub fn render_message(post: &Post, config: &NotifierConfig) -> String {
    let max = config.max_message_length;
    match &post.discussion_link {
        Some(discussion) if !is_on_domain(&post.link, &config.primary_domain) => {
            let message = format!("{} (<{}>)", post.link, discussion);
            if message.chars().count() <= max {
                return message;
            }
            log::debug!("Dropping discussion link for {}: message too long", post.id);
        }
        _ => {}
    }
    truncate_chars(&post.link, max)
}

/// Send one message per post, in order.
///
/// A failed send is logged and counted; later posts are still attempted.
pub async fn notify(
    posts: &[Post],
    sink: &dyn NotificationSink,
    config: &NotifierConfig,
) -> NotifyReport {
    let mut report = NotifyReport::default();

    for post in posts {
        let message = render_message(post, config);
        match sink.send(&message).await {
            Ok(()) => report.sent += 1,
            Err(e) => {
                report.failed += 1;
                log::warn!("Failed to send post {}: {}", post.id, e);
            }
        }
    }

    if posts.is_empty() {
        log::info!("No new posts to send.");
    } else {
        log::info!(
            "Sent {} post(s) to the channel ({} failed).",
            report.sent,
            report.failed
        );
    }
    report
}
