use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::query::PingQuery;

/// Why a send did not happen. Every variant is absorbed by the caller as
/// "report not sent"; the distinction exists for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    /// The version string is the non-release sentinel; nothing was sent.
    #[error("refusing to report from a developer build")]
    DeveloperBuild,

    /// The request URL could not be constructed.
    #[error("malformed report url: {message}")]
    MalformedUrl { message: String },

    /// Transport-level failure (connect, DNS, read, ...).
    #[error("report transport failure: {message}")]
    Io { message: String },

    /// The endpoint answered with a non-200 status.
    #[error("report rejected with status {code}")]
    Status { code: u16 },
}

/// Performs the one outbound GET for a usage ping.
///
/// Contract: exactly one request per call, HTTP 200 is the only success,
/// no retry and no backoff at this layer.
#[async_trait]
pub trait Reporter: Send + Sync {
    async fn send(&self, query: &PingQuery) -> Result<(), SendError>;
}

/// A reporter with a fixed outcome and a call counter.
///
/// Useful for testing orchestration: configure success or a specific
/// `SendError`, then assert how many sends actually happened.
#[derive(Default)]
pub struct StaticReporter {
    fail_with: Mutex<Option<SendError>>,
    calls: AtomicUsize,
    last_query: Mutex<Option<PingQuery>>,
}

impl StaticReporter {
    /// A reporter whose every send succeeds.
    pub fn succeeding() -> Self {
        Self::default()
    }

    /// A reporter whose every send fails with `error`.
    pub fn failing(error: SendError) -> Self {
        Self {
            fail_with: Mutex::new(Some(error)),
            ..Self::default()
        }
    }

    /// Change the outcome of subsequent sends.
    pub fn set_outcome(&self, outcome: Result<(), SendError>) {
        let mut guard = match self.fail_with.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = outcome.err();
    }

    /// Number of sends attempted so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recently attempted query, if any send has happened.
    pub fn last_query(&self) -> Option<PingQuery> {
        match self.last_query.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl Reporter for StaticReporter {
    async fn send(&self, query: &PingQuery) -> Result<(), SendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.last_query.lock() {
            Ok(mut guard) => *guard = Some(query.clone()),
            Err(poisoned) => *poisoned.into_inner() = Some(query.clone()),
        }
        let guard = match self.fail_with.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match guard.clone() {
            None => Ok(()),
            Some(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> PingQuery {
        PingQuery {
            daily: true,
            weekly: true,
            monthly: true,
            first_run: true,
            version: "1.0.0".to_string(),
            week_of_installation: "2026-08-24".to_string(),
            referral: "others".to_string(),
        }
    }

    #[tokio::test]
    async fn succeeding_reporter_counts_calls() {
        let reporter = StaticReporter::succeeding();
        assert!(reporter.send(&query()).await.is_ok());
        assert!(reporter.send(&query()).await.is_ok());
        assert_eq!(reporter.calls(), 2);
    }

    #[tokio::test]
    async fn failing_reporter_returns_the_configured_error() {
        let reporter = StaticReporter::failing(SendError::Status { code: 503 });
        assert_eq!(
            reporter.send(&query()).await,
            Err(SendError::Status { code: 503 })
        );
        reporter.set_outcome(Ok(()));
        assert!(reporter.send(&query()).await.is_ok());
    }

    #[test]
    fn error_display() {
        let err = SendError::Status { code: 500 };
        assert_eq!(err.to_string(), "report rejected with status 500");
    }
}
