//! Quote client library.
//!
//! Polls the quote server until it answers with a quote, then writes the quote to a
//! text file:
//! - `endpoint`: `QuoteEndpoint` and the reqwest-backed `HttpEndpoint`.
//! - `sink`: `QuoteSink` and the file-backed `FileSink`.
//! - `poller`: the fixed-backoff retry loop.
//! - `args`: command-line and environment configuration.
#![warn(missing_docs)]
pub mod args;
pub mod endpoint;
pub mod poller;
pub mod sink;

pub use endpoint::{HttpEndpoint, QuoteEndpoint};
pub use poller::{PollReport, Poller, PollerConfig};
pub use sink::{FileSink, QuoteSink};
