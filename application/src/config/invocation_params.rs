//! Invocation parameters: how turns are invoked and retried.
//!
//! [`InvocationParams`] groups the knobs the
//! [`DebateController`](crate::use_cases::run_debate::DebateController)
//! applies to every model call. These are application-layer concerns,
//! not part of the debate config contract.

use debate_domain::ContextWindow;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest a `Retry-After` hint is honoured
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationParams {
    /// Extra attempts after a failed invocation before the turn is recorded as failed.
    pub max_retries: u32,
    /// Consecutive failed turns that escalate the session to `failed`.
    pub failure_threshold: usize,
    /// How much of the transcript each invocation sees.
    pub context_window: ContextWindow,
    /// Per-call limit; `None` waits for the gateway's own timeout.
    pub call_timeout: Option<Duration>,
    /// Pause between attempts.
    pub retry_delay: Duration,
    /// Run the summarizer for cancelled sessions too.
    pub summarize_on_cancel: bool,
}

impl Default for InvocationParams {
    fn default() -> Self {
        Self {
            max_retries: 1,
            failure_threshold: 3,
            context_window: ContextWindow::Full,
            call_timeout: None,
            retry_delay: Duration::ZERO,
            summarize_on_cancel: false,
        }
    }
}

impl InvocationParams {
    // ==================== Builder Methods ====================

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_failure_threshold(mut self, threshold: usize) -> Self {
        self.failure_threshold = threshold.max(1);
        self
    }

    pub fn with_context_window(mut self, window: ContextWindow) -> Self {
        self.context_window = window;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_summarize_on_cancel(mut self, enabled: bool) -> Self {
        self.summarize_on_cancel = enabled;
        self
    }

    /// Delay before the next attempt, honouring a capped `Retry-After` hint
    pub fn backoff(&self, retry_after: Option<Duration>) -> Duration {
        match retry_after {
            Some(hint) => hint.min(MAX_RETRY_AFTER).max(self.retry_delay),
            None => self.retry_delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = InvocationParams::default();
        assert_eq!(params.max_retries, 1);
        assert_eq!(params.failure_threshold, 3);
        assert_eq!(params.context_window, ContextWindow::Full);
        assert!(params.call_timeout.is_none());
        assert!(params.retry_delay.is_zero());
        assert!(!params.summarize_on_cancel);
    }

    #[test]
    fn test_builder() {
        let params = InvocationParams::default()
            .with_max_retries(3)
            .with_failure_threshold(0)
            .with_context_window(ContextWindow::LastTurns(4))
            .with_call_timeout(Some(Duration::from_secs(20)));

        assert_eq!(params.max_retries, 3);
        assert_eq!(params.failure_threshold, 1);
        assert_eq!(params.context_window, ContextWindow::LastTurns(4));
        assert_eq!(params.call_timeout, Some(Duration::from_secs(20)));
    }

    #[test]
    fn test_backoff_caps_retry_after() {
        let params = InvocationParams::default().with_retry_delay(Duration::from_millis(500));
        assert_eq!(params.backoff(None), Duration::from_millis(500));
        assert_eq!(params.backoff(Some(Duration::from_secs(2))), Duration::from_secs(2));
        assert_eq!(params.backoff(Some(Duration::from_secs(600))), MAX_RETRY_AFTER);
        assert_eq!(params.backoff(Some(Duration::ZERO)), Duration::from_millis(500));
    }
}
