// src/pipeline/cycle.rs

//! One fetch → extract → detect → notify cycle.
//!
//! [`Monitor`] is the only owner of the seen-set. Callers that share it
//! across tasks wrap it in a `tokio::sync::Mutex`, which keeps cycles from
//! overlapping.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Config, NotifierConfig, Post, SeenSet};
use crate::pipeline::diff::{DetectOutcome, detect};
use crate::pipeline::notify::{NotifyReport, notify};
use crate::services::{HttpFetcher, PageFetcher, PostExtractor};
use crate::sink::NotificationSink;

/// Summary of a single cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Posts extracted from the page
    pub total_posts: usize,
    /// Posts not seen in the previous cycle
    pub new_posts: usize,
    pub delivery: NotifyReport,
    /// `None` when the fetch failed
    pub outcome: Option<DetectOutcome>,
    pub error: Option<String>,
}

impl CycleReport {
    fn log(&self) {
        let elapsed = (self.end_time - self.start_time).num_milliseconds();
        match &self.error {
            Some(e) => log::warn!("Cycle failed after {elapsed}ms: {e}"),
            None => log::info!(
                "Cycle finished in {}ms: {} total, {} new, {} sent, {} failed ({:?})",
                elapsed,
                self.total_posts,
                self.new_posts,
                self.delivery.sent,
                self.delivery.failed,
                self.outcome
            ),
        }
    }
}

/// Posts found by a detection pass.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub total_posts: usize,
    pub new_posts: Vec<Post>,
    pub outcome: DetectOutcome,
}

/// Watches the source page and remembers what it has already seen.
pub struct Monitor {
    fetcher: Box<dyn PageFetcher>,
    extractor: PostExtractor,
    notifier: NotifierConfig,
    seen: SeenSet,
}

impl Monitor {
    /// Create a monitor around an arbitrary fetcher.
    pub fn new(
        fetcher: Box<dyn PageFetcher>,
        extractor: PostExtractor,
        notifier: NotifierConfig,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            notifier,
            seen: SeenSet::new(),
        }
    }

    /// Create a monitor that fetches the configured page over HTTP.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.source)?;
        let extractor = PostExtractor::new(&config.extractor, fetcher.url())?;
        Ok(Self::new(
            Box::new(fetcher),
            extractor,
            config.notifier.clone(),
        ))
    }

    /// Ids carried into the next cycle.
    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    pub fn notifier(&self) -> &NotifierConfig {
        &self.notifier
    }

    /// Fetch and extract the current posts.
    pub async fn fetch_posts(&self) -> Result<Vec<Post>> {
        let html = self.fetcher.fetch().await?;
        Ok(self.extractor.extract(&html))
    }

    /// The first post on the page, without touching the seen-set.
    pub async fn latest(&self) -> Result<Option<Post>> {
        Ok(self.fetch_posts().await?.into_iter().next())
    }

    /// Fetch, extract and diff against the seen-set, then update it.
    ///
    /// On a fetch error the seen-set is left as it was.
    pub async fn check_for_new_posts(&mut self) -> Result<CheckResult> {
        let current = self.fetch_posts().await?;
        let detection = detect(&current, &self.seen);

        match detection.outcome {
            DetectOutcome::NoSignal => log::info!("No posts found."),
            DetectOutcome::Bootstrap => {
                log::info!("Initializing seen posts with {} id(s)", detection.seen.len())
            }
            DetectOutcome::Compared if detection.has_changes() => log::info!(
                "Total posts: {}, new posts: {}",
                current.len(),
                detection.new_posts.len()
            ),
            DetectOutcome::Compared => log::info!("Total posts: {}, nothing new", current.len()),
        }

        let outcome = detection.outcome;
        let (new_posts, seen) = detection.into_parts();
        self.seen = seen;

        Ok(CheckResult {
            total_posts: current.len(),
            new_posts,
            outcome,
        })
    }

    /// Run a full cycle, delivering new posts through `sink`.
    ///
    /// Never fails: fetch errors are logged and count as an empty cycle.
    pub async fn run_cycle(&mut self, sink: &dyn NotificationSink) -> CycleReport {
        let start_time = Utc::now();

        let report = match self.check_for_new_posts().await {
            Ok(check) => {
                let delivery = notify(&check.new_posts, sink, &self.notifier).await;
                CycleReport {
                    start_time,
                    end_time: Utc::now(),
                    total_posts: check.total_posts,
                    new_posts: check.new_posts.len(),
                    delivery,
                    outcome: Some(check.outcome),
                    error: None,
                }
            }
            Err(e) => CycleReport {
                start_time,
                end_time: Utc::now(),
                total_posts: 0,
                new_posts: 0,
                delivery: NotifyReport::default(),
                outcome: None,
                error: Some(e.to_string()),
            },
        };

        report.log();
        report
    }
}
