//! Command-line arguments for the quote server.
//!
//! Every flag can also be supplied through the environment variable named next to it.
use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use quote_common::CurrencyPair;
use quote_common::net::SERVER_PORT;

use crate::fetcher::DEFAULT_UPSTREAM_URL;
use crate::persister::DEFAULT_DATABASE_URL;
use crate::responder::Budgets;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Address the HTTP server binds to.
    #[clap(long, env = "QUOTE_LISTEN_ADDR", default_value_t = default_listen_addr())]
    pub listen: SocketAddr,

    /// SQLite connection string for the quote history.
    #[clap(long, env = "QUOTE_DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Base URL of the upstream quote API; the pair is appended as the last segment.
    #[clap(long, env = "QUOTE_UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    pub upstream_url: String,

    /// Currency pair to quote, as BASE-QUOTE.
    #[clap(long, env = "QUOTE_PAIR", default_value = "USD-BRL")]
    pub pair: CurrencyPair,

    /// Deadline for the upstream call, in milliseconds.
    #[clap(long, env = "QUOTE_FETCH_TIMEOUT_MS", default_value_t = 200)]
    pub fetch_timeout_ms: u64,

    /// Deadline for the insert, in milliseconds.
    #[clap(long, env = "QUOTE_PERSIST_TIMEOUT_MS", default_value_t = 10)]
    pub persist_timeout_ms: u64,

    /// Optional outer deadline for the whole request, in milliseconds.
    #[clap(long, env = "QUOTE_REQUEST_TIMEOUT_MS")]
    pub request_timeout_ms: Option<u64>,
}

/// `0.0.0.0:<SERVER_PORT>`.
fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], SERVER_PORT))
}

impl Args {
    /// Deadline budgets derived from the timeout flags.
    pub fn budgets(&self) -> Budgets {
        Budgets {
            request: self.request_timeout_ms.map(Duration::from_millis),
            fetch: Duration::from_millis(self.fetch_timeout_ms),
            persist: Duration::from_millis(self.persist_timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_common::net::addr;

    #[test]
    fn defaults_match_documented_budgets() {
        let args = Args::try_parse_from(["quote_server"]).unwrap();
        assert_eq!(args.budgets(), Budgets::default());
        assert_eq!(args.pair, CurrencyPair::default());
        assert_eq!(args.listen.to_string(), addr("0.0.0.0", SERVER_PORT));
    }

    #[test]
    fn parses_overrides() {
        let args = Args::try_parse_from([
            "quote_server",
            "--pair",
            "eur-brl",
            "--persist-timeout-ms",
            "50",
            "--request-timeout-ms",
            "1000",
        ])
        .unwrap();
        assert_eq!(args.pair.code(), "EURBRL");
        assert_eq!(args.budgets().persist, Duration::from_millis(50));
        assert_eq!(args.budgets().request, Some(Duration::from_secs(1)));
    }
}
