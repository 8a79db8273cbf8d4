//!
//! Common types and utilities shared by the quote server and client.
//!
//! This crate aggregates:
//! - `error`: unified error type `QuoteError` and its coarse `ErrorKind`.
//! - `result`: handy `Result<T, QuoteError>` alias.
//! - `deadline`: deadline chain bounding every I/O call.
//! - `pair`: currency pairs understood by the upstream API.
//! - `quote`: quote payloads exchanged between the processes.
//! - `net`: networking constants and small helpers.
#![warn(missing_docs)]
pub mod deadline;
pub mod error;
pub mod net;
pub mod pair;
pub mod quote;
pub mod result;

pub use deadline::{Deadline, DeadlineExceeded};
pub use error::{ErrorKind, QuoteError, Stage};
pub use pair::{Currency, CurrencyPair};
pub use quote::{Quote, QuoteReply};
pub use result::Result;
