//! Test doubles for the fetcher and sink seams.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::services::PageFetcher;
use crate::sink::NotificationSink;

pub const TEST_URL: &str = "https://histre.com/hn/?tags=+ai";

/// Records every delivered message; can fail selected sends.
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
    attempts: Mutex<usize>,
    fail_on: Vec<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the sends at the given zero-based attempt indices.
    pub fn failing_on(indices: &[usize]) -> Self {
        Self {
            fail_on: indices.to_vec(),
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, text: &str) -> Result<()> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            let current = *attempts;
            *attempts += 1;
            current
        };
        if self.fail_on.contains(&attempt) {
            return Err(AppError::delivery(Some(500), "scripted failure"));
        }
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// One scripted fetch result.
pub enum Step {
    Page(String),
    Status(u16),
}

/// Replays scripted pages, one per fetch.
pub struct ScriptedFetcher {
    steps: Mutex<VecDeque<Step>>,
}

impl ScriptedFetcher {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
        }
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self) -> Result<String> {
        match self.steps.lock().unwrap().pop_front() {
            Some(Step::Page(html)) => Ok(html),
            Some(Step::Status(status)) => Err(AppError::Status {
                url: TEST_URL.to_string(),
                status,
            }),
            None => Err(AppError::structure("script exhausted")),
        }
    }

    fn url(&self) -> &str {
        TEST_URL
    }
}

/// Build a source page with one card per id, in order.
pub fn page(ids: &[&str]) -> String {
    let cards: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<div class="card"><div class="card-body">
  <a class="fs-3" href="https://example.com/{id}">Story {id}</a>
  <div class="text-muted">10 points <span>|</span> 1 hour ago | <a href="https://news.ycombinator.com/item?id={id}">3 comments</a></div>
</div></div>"#
            )
        })
        .collect();
    format!(
        r#"<html><body><div class="text-muted">Provide comma separated tags</div>{cards}</body></html>"#
    )
}

/// A page whose layout no longer has the anchor.
pub fn page_without_anchor() -> String {
    r#"<html><body><div class="card"><a class="fs-3" href="https://example.com/z">Z</a></div></body></html>"#
        .to_string()
}
