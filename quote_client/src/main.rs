//! Quote Client: asks the quote server for the current dollar quote, retrying every
//! few seconds until it gets one, then writes `Dólar: <value>` to a text file and
//! exits.
//!
//! Usage example (CLI):
//! ```bash
//! quote_client --server-url http://localhost:8080/cotacao --output ./cotacao.txt
//! ```
#![warn(missing_docs)]
use clap::Parser;
use log::info;
use quote_client::args::Args;
use quote_client::{FileSink, HttpEndpoint, Poller};
use quote_common::{QuoteError, Result};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), QuoteError> {
    init_logger();
    let args = Args::parse();

    let endpoint = HttpEndpoint::new(args.server_url.trim());
    let sink = FileSink::new(args.output.clone());
    let poller = Poller::new(args.poller_config());

    info!(
        "Polling {} (timeout {:?}, retry every {:?})",
        endpoint.url(),
        args.poller_config().request_timeout,
        args.poller_config().retry_interval
    );
    let report = poller.run(&endpoint, &sink).await;
    info!(
        "Wrote quote {} to {} after {} attempt(s)",
        report.value,
        sink.path().display(),
        report.attempts
    );
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
