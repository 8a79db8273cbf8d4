//! Client-side retry loop.
//!
//! The poller keeps asking the server for the quote until one attempt both returns
//! a quote and gets it written to the sink. Every failure, whatever its kind, costs
//! one fixed backoff and a full new attempt. A failed write therefore triggers a
//! fresh request to the server instead of rewriting the value already in hand.
use std::time::Duration;

use log::{error, info, warn};
use quote_common::Deadline;

use crate::endpoint::QuoteEndpoint;
use crate::sink::QuoteSink;

/// Default budget for one round trip to the server.
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(300);
/// Default pause between attempts.
pub const RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// Timing of the retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    /// Deadline for each request.
    pub request_timeout: Duration,
    /// Sleep after each failed attempt.
    pub retry_interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            request_timeout: REQUEST_TIMEOUT,
            retry_interval: RETRY_INTERVAL,
        }
    }
}

/// Outcome of a finished poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    /// Attempts made, including the successful one.
    pub attempts: u32,
    /// Value that was written.
    pub value: String,
}

/// Sequential retry loop around a [`QuoteEndpoint`] and a [`QuoteSink`].
#[derive(Debug, Clone, Default)]
pub struct Poller {
    config: PollerConfig,
}

impl Poller {
    /// Poller with the given timing.
    pub fn new(config: PollerConfig) -> Self {
        Self { config }
    }

    /// Loop until one attempt succeeds end to end. Attempts are unbounded.
    pub async fn run(&self, endpoint: &dyn QuoteEndpoint, sink: &dyn QuoteSink) -> PollReport {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let deadline = Deadline::after(self.config.request_timeout);
            match endpoint.request(deadline).await {
                Ok(value) => {
                    info!("Dollar quote: {}", value);
                    match sink.write(&value).await {
                        Ok(()) => {
                            info!("Quote file written after {} attempt(s)", attempts);
                            return PollReport { attempts, value };
                        }
                        Err(e) => error!("Could not write the quote file: {}", e),
                    }
                }
                Err(e) => warn!("Attempt {} failed: {} ({})", attempts, e, e.kind()),
            }

            info!("Retrying in {:?}...", self.config.retry_interval);
            tokio::time::sleep(self.config.retry_interval).await;
        }
    }
}
