//! Error types shared between client and server.
//!
//! The `QuoteError` enum names every failure the fetch, persist and poll stages can
//! produce. Each variant also falls into one coarse [`ErrorKind`], which is what
//! callers branch on when they only care about the class of failure.
use std::io;
use std::time::Duration;

use strum_macros::Display;
use thiserror::Error;

/// Which I/O stage a deadline belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    /// Outbound call to the upstream quote API.
    Fetch,
    /// Single-row insert into the quote history store.
    Persist,
    /// Client round trip to the quote server.
    Poll,
}

/// Coarse classification of a [`QuoteError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    /// DNS, connect, request building or deadline failures on the wire.
    Transport,
    /// The peer answered with a non-success status.
    Protocol,
    /// Undecodable or schema-mismatched payload.
    Format,
    /// Prepare, exec or deadline failures against the store.
    Persistence,
    /// Local file system failures.
    Io,
    /// Invalid configuration values.
    Config,
}

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// The outbound request could not be built (bad URL, bad header...).
    #[error("Request construction error: {0}")]
    RequestConstruction(String),

    /// Connect, DNS or body transfer failure.
    #[error("Network error: {0}")]
    Network(String),

    /// A deadline elapsed before the stage finished.
    #[error("{stage} deadline of {budget:?} exceeded")]
    Timeout {
        /// Stage that ran out of time.
        stage: Stage,
        /// Budget the stage was given.
        budget: Duration,
    },

    /// The peer answered with a status other than 200.
    #[error("Unexpected status code: {0}")]
    UpstreamStatus(u16),

    /// The body was not valid JSON for the expected shape.
    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The JSON decoded but the expected field is absent or has the wrong type.
    #[error("Field missing: {0}")]
    FieldMissing(String),

    /// The store could not start the statement (pool closed, busy, ...).
    #[error("Prepare error: {0}")]
    Prepare(String),

    /// The statement failed while executing or committing.
    #[error("Exec error: {0}")]
    Exec(String),

    /// I/O error originating from the standard library or files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration value.
    #[error("Config error: {0}")]
    Config(String),
}

impl QuoteError {
    /// Coarse classification used for propagation decisions and tests.
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuoteError::RequestConstruction(_) | QuoteError::Network(_) => ErrorKind::Transport,
            QuoteError::Timeout { stage: Stage::Persist, .. } => ErrorKind::Persistence,
            QuoteError::Timeout { .. } => ErrorKind::Transport,
            QuoteError::UpstreamStatus(_) => ErrorKind::Protocol,
            QuoteError::Decode(_) | QuoteError::FieldMissing(_) => ErrorKind::Format,
            QuoteError::Prepare(_) | QuoteError::Exec(_) => ErrorKind::Persistence,
            QuoteError::Io(_) => ErrorKind::Io,
            QuoteError::Config(_) => ErrorKind::Config,
        }
    }

    /// `true` if this error came from a deadline elapsing.
    pub fn is_timeout(&self) -> bool {
        matches!(self, QuoteError::Timeout { .. })
    }
}
