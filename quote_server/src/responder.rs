//! `GET /cotacao`: fetch, persist, reply.
//!
//! A request walks the states in [`RequestState`] exactly once. The reply is fail-closed:
//! the client only ever sees a quote that was durably recorded. Any failure is
//! answered with a bare 500 and the detail goes to the log.
//!
//! Deadlines: the request root comes from [`Budgets::request`] (unbounded when not
//! configured); the fetch and the insert each get a child of that root. When the
//! client disconnects, hyper drops the handler future and with it whatever fetch or
//! transaction is in flight.
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{debug, error, info};
use quote_common::net::QUOTE_PATH;
use quote_common::{Deadline, QuoteError, QuoteReply};
use strum_macros::Display;

use crate::fetcher::QuoteSource;
use crate::persister::QuoteStore;

/// Default budget for the upstream call.
pub const FETCH_BUDGET: Duration = Duration::from_millis(200);
/// Default budget for the insert. Tighter than a loaded store usually needs.
pub const PERSIST_BUDGET: Duration = Duration::from_millis(10);

/// Deadline budgets for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budgets {
    /// Outer bound for the whole request; `None` leaves it unbounded.
    pub request: Option<Duration>,
    /// Bound for the upstream call.
    pub fetch: Duration,
    /// Bound for the insert.
    pub persist: Duration,
}

impl Default for Budgets {
    fn default() -> Self {
        Self {
            request: None,
            fetch: FETCH_BUDGET,
            persist: PERSIST_BUDGET,
        }
    }
}

/// Steps of one request.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RequestState {
    Received,
    Fetching,
    Fetched,
    FetchFailed,
    Persisting,
    Persisted,
    PersistFailed,
    Responded,
}

/// Dependencies shared by all requests.
pub struct AppState {
    source: Arc<dyn QuoteSource>,
    store: Arc<dyn QuoteStore>,
    budgets: Budgets,
}

impl AppState {
    /// Wire a source and a store together with the request budgets.
    pub fn new(source: Arc<dyn QuoteSource>, store: Arc<dyn QuoteStore>, budgets: Budgets) -> Self {
        Self {
            source,
            store,
            budgets,
        }
    }

    /// Budgets applied to every request.
    pub fn budgets(&self) -> Budgets {
        self.budgets
    }
}

/// A failed request. Renders as a generic 500; never leaks `source`.
#[derive(Debug)]
pub struct ReplyError {
    /// State the request ended in.
    pub state: RequestState,
    /// What went wrong.
    pub source: QuoteError,
}

impl IntoResponse for ReplyError {
    fn into_response(self) -> Response {
        let message = match self.state {
            RequestState::FetchFailed => "Failed to fetch the dollar quote",
            RequestState::PersistFailed => "Failed to record the dollar quote",
            _ => "Internal server error",
        };
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}

/// Router exposing `GET /cotacao`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(QUOTE_PATH, get(get_quote))
        .with_state(state)
}

async fn get_quote(State(state): State<Arc<AppState>>) -> Result<Json<QuoteReply>, ReplyError> {
    let reply = serve_quote(&state).await?;
    debug!("-> {}", RequestState::Responded);
    Ok(Json(reply))
}

/// Run one fetch-then-persist traversal.
pub async fn serve_quote(state: &AppState) -> Result<QuoteReply, ReplyError> {
    let root = Deadline::from_budget(state.budgets.request);
    debug!("-> {} (deadline {:?})", RequestState::Received, root.remaining());

    debug!("-> {}", RequestState::Fetching);
    let quote = match state.source.fetch(root.child(state.budgets.fetch)).await {
        Ok(quote) => quote,
        Err(e) => return Err(fail(RequestState::FetchFailed, e)),
    };
    debug!("-> {} ({})", RequestState::Fetched, quote.value());

    debug!("-> {}", RequestState::Persisting);
    match state
        .store
        .record(&quote, root.child(state.budgets.persist))
        .await
    {
        Ok(id) => debug!("-> {} (row {})", RequestState::Persisted, id),
        Err(e) => return Err(fail(RequestState::PersistFailed, e)),
    }

    info!("Dollar quote: {}", quote.value());
    Ok(QuoteReply::from(quote))
}

fn fail(state: RequestState, source: QuoteError) -> ReplyError {
    error!("{}: {} ({})", state, source, source.kind());
    ReplyError { state, source }
}
