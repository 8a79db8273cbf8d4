//! Command-line arguments for the Quote Client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use quote_common::net::{SERVER_PORT, quote_url};

use crate::poller::PollerConfig;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Full URL of the quote endpoint.
    #[clap(long, env = "QUOTE_SERVER_URL", default_value_t = quote_url("localhost", SERVER_PORT))]
    pub server_url: String,

    /// File that receives the quote; overwritten on success.
    #[clap(long, env = "QUOTE_OUTPUT", default_value = "cotacao.txt")]
    pub output: PathBuf,

    /// Deadline for each request, in milliseconds.
    #[clap(long, env = "QUOTE_TIMEOUT_MS", default_value_t = 300)]
    pub timeout_ms: u64,

    /// Pause between attempts, in seconds.
    #[clap(long, env = "QUOTE_RETRY_SECS", default_value_t = 5)]
    pub retry_secs: u64,
}

impl Args {
    /// Retry loop timing derived from the flags.
    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            request_timeout: Duration::from_millis(self.timeout_ms),
            retry_interval: Duration::from_secs(self.retry_secs),
        }
    }
}
