//! Dollar quote HTTP server.
//!
//! Binds `GET /cotacao`, which fetches the current USD-BRL bid from the upstream API
//! (200 ms budget), records it in SQLite (10 ms budget) and replies with
//! `{"dolar": "<bid>"}`. Any failure is answered with HTTP 500.
//!
//! Usage example (CLI):
//! ```bash
//! quote_server --listen 0.0.0.0:8080 --database-url sqlite://client-server-api.db
//! ```
#![warn(missing_docs)]
use std::sync::Arc;

use clap::Parser;
use log::info;
use quote_common::{QuoteError, Result};
use quote_server::args::Args;
use quote_server::{AppState, SqliteQuoteStore, UpstreamFetcher, router, shutdown};

#[tokio::main]
async fn main() -> Result<(), QuoteError> {
    init_logger();
    let args = Args::parse();

    let store = SqliteQuoteStore::connect(&args.database_url).await?;
    store.bootstrap().await?;

    let fetcher = UpstreamFetcher::new(&args.upstream_url, args.pair);
    info!("Upstream endpoint: {}", fetcher.url());

    let budgets = args.budgets();
    info!("Budgets: {:?}", budgets);
    let state = Arc::new(AppState::new(Arc::new(fetcher), Arc::new(store), budgets));

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    info!("Quote server listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown::ctrl_c())
        .await?;

    info!("Quote server stopped");
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
