// src/models/mod.rs

//! Domain models for the watcher.

mod config;
mod post;

// Re-export all public types
pub use config::{
    Config, Credentials, ExtractorConfig, LoggingConfig, NotifierConfig, SchedulerConfig,
    SourceConfig,
};
pub use post::{NO_COMMENTS, Post, SeenSet};
