//! Pipeline entry points for the watcher.
//!
//! - `detect`: diff the current posts against the seen-set
//! - `notify`: render and deliver new posts
//! - `Monitor::run_cycle`: one fetch → extract → detect → notify pass
//! - `run_scheduler`: run cycles forever on a fixed interval

pub mod cycle;
pub mod diff;
pub mod notify;
pub mod schedule;

pub use cycle::{CheckResult, CycleReport, Monitor};
pub use diff::{DetectOutcome, Detection, detect};
pub use notify::{NotifyReport, notify, render_message};
pub use schedule::{run_scheduler, tick};
