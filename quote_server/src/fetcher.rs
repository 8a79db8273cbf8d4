//! Fetching a single quote from the upstream rate API.
//!
//! One call to [`QuoteSource::fetch`] is one outbound GET bounded by the caller's
//! deadline. There is no retry here; the poller owns retries.
use async_trait::async_trait;
use log::{debug, info};
use quote_common::{CurrencyPair, Deadline, Quote, QuoteError, Result, Stage};
use reqwest::StatusCode;
use serde_json::Value;

/// Default base URL of the public quote API.
pub const DEFAULT_UPSTREAM_URL: &str = "https://economia.awesomeapi.com.br/json/last";

/// Anything that can produce one quote under a deadline.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch the current quote, failing once `deadline` elapses.
    async fn fetch(&self, deadline: Deadline) -> Result<Quote>;
}

/// HTTP client for the upstream `/json/last/<PAIR>` endpoint.
#[derive(Debug, Clone)]
pub struct UpstreamFetcher {
    http: reqwest::Client,
    url: String,
    pair: CurrencyPair,
}

impl UpstreamFetcher {
    /// Targets `<base_url>/<PAIR>`, e.g. `.../json/last/USD-BRL`.
    pub fn new(base_url: &str, pair: CurrencyPair) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, pair)
    }

    /// Same as [`UpstreamFetcher::new`] with a caller-provided client.
    pub fn with_client(http: reqwest::Client, base_url: &str, pair: CurrencyPair) -> Self {
        Self {
            http,
            url: format!("{}/{}", base_url.trim_end_matches('/'), pair),
            pair,
        }
    }

    /// Full endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request(&self) -> Result<Vec<u8>> {
        let request = self
            .http
            .get(&self.url)
            .build()
            .map_err(|e| QuoteError::RequestConstruction(e.to_string()))?;

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| QuoteError::Network(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(QuoteError::UpstreamStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| QuoteError::Network(e.to_string()))?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl QuoteSource for UpstreamFetcher {
    async fn fetch(&self, deadline: Deadline) -> Result<Quote> {
        debug!("GET {} (remaining {:?})", self.url, deadline.remaining());
        let budget = deadline.budget().unwrap_or_default();
        let body = deadline
            .run(self.request())
            .await
            .map_err(|_| QuoteError::Timeout {
                stage: Stage::Fetch,
                budget,
            })??;

        let quote = extract_bid(&body, &self.pair.code())?;
        info!("Fetched {} bid: {}", self.pair, quote.value());
        Ok(quote)
    }
}

/// Pull `<code>.bid` out of an upstream body such as `{"USDBRL":{"bid":"5.42"}}`.
///
/// String bids are returned untouched; numeric bids keep their JSON text.
pub fn extract_bid(body: &[u8], code: &str) -> Result<Quote> {
    let json: Value = serde_json::from_slice(body)?;
    let bid = json
        .get(code)
        .ok_or_else(|| QuoteError::FieldMissing(format!("{} object", code)))?
        .get("bid")
        .ok_or_else(|| QuoteError::FieldMissing(format!("{}.bid", code)))?;

    match bid {
        Value::String(s) => Ok(Quote::new(s.as_str())),
        Value::Number(n) => Ok(Quote::new(n.to_string())),
        other => Err(QuoteError::FieldMissing(format!(
            "{}.bid has unexpected type: {}",
            code, other
        ))),
    }
}
