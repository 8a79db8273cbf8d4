//! Deadline chain used to bound every suspension point.
//!
//! A request builds one root [`Deadline`] and derives a child for each I/O call it
//! makes. A child expires at the earlier of its own budget and its parent's expiry,
//! so no downstream call can outlive the request that issued it.
//!
//! Cancellation flows top-down by drop: the futures passed to [`Deadline::run`] are
//! owned by the caller's future, so dropping the request future (client disconnect,
//! outer deadline) drops every in-flight child with it.
//!
//! Time is read from the tokio clock, which lets tests pause and advance it.
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

/// Returned by [`Deadline::run`] when the deadline elapses first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline exceeded")]
pub struct DeadlineExceeded;

/// A point in time after which work is abandoned, or no limit at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    expires_at: Option<Instant>,
    budget: Option<Duration>,
}

impl Deadline {
    /// Root deadline without an expiry.
    pub fn unbounded() -> Self {
        Self {
            expires_at: None,
            budget: None,
        }
    }

    /// Root deadline expiring `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            expires_at: Some(Instant::now() + budget),
            budget: Some(budget),
        }
    }

    /// Root deadline from an optional budget.
    pub fn from_budget(budget: Option<Duration>) -> Self {
        budget.map_or_else(Self::unbounded, Self::after)
    }

    /// Derive a child expiring `budget` from now, capped by this deadline.
    pub fn child(&self, budget: Duration) -> Self {
        let own = Instant::now() + budget;
        let expires_at = match self.expires_at {
            Some(parent) => parent.min(own),
            None => own,
        };
        Self {
            expires_at: Some(expires_at),
            budget: Some(budget),
        }
    }

    /// Budget this deadline was created with, even when a parent caps it.
    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }

    /// Instant at which this deadline elapses, if any.
    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    /// Time left before expiry; `None` for an unbounded deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Whether the deadline has already elapsed.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Instant::now())
    }

    /// Drive `fut` to completion or until the deadline elapses.
    ///
    /// An expired deadline returns immediately without polling `fut`, so no work is
    /// started on behalf of a caller that has already given up.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, DeadlineExceeded> {
        match self.expires_at {
            None => Ok(fut.await),
            Some(at) => {
                if at <= Instant::now() {
                    return Err(DeadlineExceeded);
                }
                tokio::time::timeout_at(at, fut)
                    .await
                    .map_err(|_| DeadlineExceeded)
            }
        }
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test(start_paused = true)]
    async fn child_never_outlives_parent() {
        let parent = Deadline::after(Duration::from_millis(50));
        let child = parent.child(Duration::from_millis(200));
        assert_eq!(child.expires_at(), parent.expires_at());

        let tighter = parent.child(Duration::from_millis(10));
        assert!(tighter.expires_at() < parent.expires_at());
    }

    #[tokio::test(start_paused = true)]
    async fn capped_child_keeps_its_own_budget() {
        let parent = Deadline::after(Duration::from_millis(50));
        tokio::time::advance(Duration::from_millis(20)).await;
        let child = parent.child(Duration::from_millis(200));

        assert_eq!(child.budget(), Some(Duration::from_millis(200)));
        assert_eq!(child.remaining(), Some(Duration::from_millis(30)));
        assert_eq!(Deadline::unbounded().budget(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn unbounded_parent_yields_child_budget() {
        let parent = Deadline::unbounded();
        assert_eq!(parent.remaining(), None);
        let child = parent.child(Duration::from_millis(300));
        assert_eq!(child.remaining(), Some(Duration::from_millis(300)));
    }

    #[tokio::test(start_paused = true)]
    async fn run_cuts_off_slow_work() {
        let deadline = Deadline::after(Duration::from_millis(10));
        let result = deadline
            .run(tokio::time::sleep(Duration::from_secs(1)))
            .await;
        assert_eq!(result, Err(DeadlineExceeded));
        assert!(deadline.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn run_returns_output_within_budget() {
        let deadline = Deadline::after(Duration::from_millis(200));
        let result = deadline
            .run(async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                42
            })
            .await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test(start_paused = true)]
    async fn expired_deadline_never_polls_the_future() {
        let deadline = Deadline::after(Duration::ZERO);
        let started = Arc::new(AtomicBool::new(false));
        let flag = started.clone();
        let result = deadline
            .run(async move {
                flag.store(true, Ordering::SeqCst);
            })
            .await;
        assert_eq!(result, Err(DeadlineExceeded));
        assert!(!started.load(Ordering::SeqCst));
    }
}
