//! postwatch CLI
//!
//! Local execution entry point: runs the polling loop or a single command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use postwatch::{
    commands::{BotCommand, Dispatcher},
    error::Result,
    models::{Config, Credentials},
    pipeline::{self, Monitor},
    sink::{DiscordSink, LogSink, NotificationSink},
};
use tokio::sync::Mutex;

/// postwatch - forwards new posts from a curated link page
#[derive(Parser, Debug)]
#[command(
    name = "postwatch",
    version,
    about = "Watches a curated link page and forwards new posts to a chat channel"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log messages instead of sending them (no credentials needed)
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check for new posts forever, accepting commands on stdin
    Run {
        /// Do not read commands from stdin
        #[arg(long)]
        no_console: bool,
    },

    /// Send the most recent post once
    Latest,

    /// Send a test message
    Test,

    /// Validate configuration and credentials
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, default_level: &str) {
    let level = if verbose { "debug" } else { default_level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Build the outbound sink. Missing credentials are fatal unless dry-running.
fn build_sink(config: &Config, dry_run: bool) -> Result<Arc<dyn NotificationSink>> {
    if dry_run {
        log::info!("Dry run: messages will be logged, not sent");
        return Ok(Arc::new(LogSink));
    }
    let credentials = Credentials::from_env()?;
    log::info!("Sending to channel {}", credentials.channel_id);
    Ok(Arc::new(DiscordSink::new(&config.notifier, &credentials)?))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Logging level comes from the config, so load it before the logger exists.
    let loaded = Config::load_or_default(&cli.config);
    let level = loaded
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| Config::default().logging.level);
    init_logging(cli.verbose, &level);

    log::info!("postwatch starting...");
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            log::error!("Config load failed from {}: {}", cli.config.display(), e);
            return Err(e);
        }
    };
    if cli.config.exists() {
        log::info!("Loaded configuration from {}", cli.config.display());
    } else {
        log::warn!("Config file {} not found. Using defaults.", cli.config.display());
    }

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    if let Command::Validate = cli.command {
        if !cli.dry_run {
            let credentials = Credentials::from_env()?;
            log::info!("✓ Credentials OK (channel {})", credentials.channel_id);
        }
        log::info!("✓ Config OK (source {})", config.source.url);
        return Ok(());
    }

    let sink = build_sink(&config, cli.dry_run)?;
    let monitor = Arc::new(Mutex::new(Monitor::from_config(&config)?));
    let dispatcher = Dispatcher::new(Arc::clone(&monitor), Arc::clone(&sink));

    match cli.command {
        Command::Run { no_console } => {
            let interval = Duration::from_secs(config.scheduler.interval_secs);
            let scheduler = tokio::spawn(pipeline::run_scheduler(
                Arc::clone(&monitor),
                Arc::clone(&sink),
                interval,
            ));

            if !no_console {
                let prefix = config.notifier.command_prefix.clone();
                log::info!("Accepting commands on stdin ({prefix}test, {prefix}forcecheckposts, {prefix}latest)");
                let stdin = tokio::io::BufReader::new(tokio::io::stdin());
                if let Err(e) = dispatcher.run_console(stdin, &prefix).await {
                    log::error!("Command console stopped: {}", e);
                }
            }

            // The scheduler never returns; wait on it so the process stays up.
            if let Err(e) = scheduler.await {
                log::error!("Scheduler task stopped: {}", e);
            }
        }
        Command::Latest => dispatcher.dispatch(BotCommand::Latest).await?,
        Command::Test => dispatcher.dispatch(BotCommand::Test).await?,
        Command::Validate => {}
    }

    Ok(())
}
