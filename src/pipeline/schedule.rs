// src/pipeline/schedule.rs

//! Periodic cycle loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::pipeline::cycle::{CycleReport, Monitor};
use crate::sink::NotificationSink;

/// Run one cycle while holding the monitor lock.
pub async fn tick(monitor: &Mutex<Monitor>, sink: &dyn NotificationSink) -> CycleReport {
    log::info!("Running scheduled check...");
    let mut guard = monitor.lock().await;
    guard.run_cycle(sink).await
}

/// Run cycles forever, sleeping `interval` after each one.
///
/// Failed cycles are already isolated inside [`Monitor::run_cycle`], so the
/// loop only ends when the process does.
pub async fn run_scheduler(
    monitor: Arc<Mutex<Monitor>>,
    sink: Arc<dyn NotificationSink>,
    interval: Duration,
) {
    log::info!(
        "Scheduler started, checking every {}s",
        interval.as_secs()
    );
    loop {
        tick(&monitor, sink.as_ref()).await;
        tokio::time::sleep(interval).await;
    }
}
