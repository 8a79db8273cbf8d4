//! Quote server library.
//!
//! Serves the current dollar quote over HTTP. Each `GET /cotacao` request fetches a
//! fresh bid from the upstream rate API, records it in the quote history store, and
//! only then answers with `{"dolar": "<bid>"}`:
//!
//! - `fetcher`: `QuoteSource` and the reqwest-backed `UpstreamFetcher`.
//! - `persister`: `QuoteStore` and the sqlx/SQLite-backed `SqliteQuoteStore`.
//! - `responder`: axum router sequencing fetch and persist under a deadline chain.
//! - `args`: command-line and environment configuration.
//! - `shutdown`: graceful shutdown trigger.
#![warn(missing_docs)]
pub mod args;
pub mod fetcher;
pub mod persister;
pub mod responder;
pub mod shutdown;

pub use fetcher::{QuoteSource, UpstreamFetcher};
pub use persister::{QuoteStore, SqliteQuoteStore, StoredQuoteRecord};
pub use responder::{AppState, Budgets, router};
