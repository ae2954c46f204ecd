//! Run context: the deadline and cancellation signal for one pipeline pass.
//!
//! Engines call [`RunContext::checkpoint`] before fetching each page, so a
//! pass stops at a batch boundary rather than mid-item. Stopping early is
//! always safe because every pass is idempotent and can simply be re-run.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::result::AppResult;

/// Deadline and cancellation state carried through a single run.
#[derive(Debug, Clone)]
pub struct RunContext {
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl RunContext {
    /// A context with no deadline and a fresh cancellation token.
    pub fn unbounded() -> Self {
        Self {
            deadline: None,
            cancel: CancellationToken::new(),
        }
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            cancel: CancellationToken::new(),
        }
    }

    /// A context with an optional timeout, bound to a parent token.
    ///
    /// Cancelling `parent` (e.g. on process shutdown) cancels this run.
    pub fn child_of(parent: &CancellationToken, timeout: Option<Duration>) -> Self {
        Self {
            deadline: timeout.map(|t| Instant::now() + t),
            cancel: parent.child_token(),
        }
    }

    /// The token observed by this run.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Time left before the deadline, if one is set.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Fail if the run was cancelled or its deadline passed.
    pub fn checkpoint(&self, stage: &str) -> AppResult<()> {
        if self.cancel.is_cancelled() {
            return Err(AppError::cancelled(format!("Run cancelled before {stage}")));
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(AppError::deadline_exceeded(format!(
                    "Run deadline exceeded before {stage}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::unbounded()
    }
}
