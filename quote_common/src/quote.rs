//! Quote payloads exchanged between the upstream API, the server and the client.
use serde::{Deserialize, Serialize};

/// Key of the quote value in the server's JSON reply.
pub const REPLY_KEY: &str = "dolar";

/// A fetched exchange rate, kept exactly as the upstream formatted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    value: String,
}

impl Quote {
    /// Wraps an upstream bid string.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The bid as received.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes the quote and returns the bid.
    pub fn into_value(self) -> String {
        self.value
    }
}

/// Body of a successful `GET /cotacao` reply: `{"dolar": "<value>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteReply {
    /// Quote value as a decimal string.
    pub dolar: String,
}

impl From<Quote> for QuoteReply {
    fn from(quote: Quote) -> Self {
        Self {
            dolar: quote.into_value(),
        }
    }
}

/// Text written to the client's output file for `value`.
pub fn render_output_line(value: &str) -> String {
    format!("Dólar: {}", value)
}
