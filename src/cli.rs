use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};

/// Command line interface definition for termwatch.
#[derive(Parser, Debug)]
#[command(name = "termwatch")]
#[command(about = "Wait for a termination signal and report which one arrived")]
#[command(version)]
pub struct Cli {
    /// How often to check for a delivered signal, in milliseconds
    #[arg(
        long,
        env = "TERMWATCH_INTERVAL_MS",
        default_value_t = 100,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_ms: u64,

    /// Stop waiting after this many seconds (default: wait forever)
    #[arg(long, env = "TERMWATCH_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Output format for the final report
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long = "verbose", action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbosity: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// How the final report is printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `key: value` line per field
    Text,
    /// A single JSON object
    Json,
}
