//! Requesting the quote from the quote server over HTTP.
use async_trait::async_trait;
use log::debug;
use quote_common::{Deadline, QuoteError, QuoteReply, Result, Stage};
use reqwest::StatusCode;

/// One round trip to something that answers with a quote.
#[async_trait]
pub trait QuoteEndpoint: Send + Sync {
    /// Request the quote value, failing once `deadline` elapses.
    async fn request(&self, deadline: Deadline) -> Result<String>;
}

/// `GET <url>` against the quote server.
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    http: reqwest::Client,
    url: String,
}

impl HttpEndpoint {
    /// Endpoint at `url`, e.g. `http://localhost:8080/cotacao`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Target URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn get(&self) -> Result<String> {
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
        let reply: QuoteReply = serde_json::from_slice(&body)?;
        Ok(reply.dolar)
    }
}

#[async_trait]
impl QuoteEndpoint for HttpEndpoint {
    async fn request(&self, deadline: Deadline) -> Result<String> {
        debug!("GET {}", self.url);
        let budget = deadline.budget().unwrap_or_default();
        deadline
            .run(self.get())
            .await
            .map_err(|_| QuoteError::Timeout {
                stage: Stage::Poll,
                budget,
            })?
    }
}
