use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use engine_logging::LogDestination;
use log::LevelFilter;

/// Generate one article per secondary keyword of a batch request.
#[derive(Debug, Parser)]
#[command(name = "articler", version)]
pub struct Cli {
    /// JSON file with `main_keyword`, `main_link`, `secondary_keywords`,
    /// `link_pool` and `title_pool`.
    pub request: PathBuf,

    /// Write the final job snapshot here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overrides MAX_CONCURRENCY.
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// How often to poll job progress, in milliseconds.
    #[arg(long, default_value_t = 500)]
    pub poll_ms: u64,

    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
