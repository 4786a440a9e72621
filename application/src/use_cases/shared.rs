//! Shared utilities for use cases.
//!
//! Cancellation checking and the retrying invocation helper used by both
//! the debate loop and the summarizer.

use crate::config::InvocationParams;
use crate::ports::turn_invoker::{InvocationError, InvocationRequest, TurnInvoker, Utterance};
use debate_domain::DomainError;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Check if cancellation has been requested.
///
/// Returns `Err(DomainError::Cancelled)` if the token is cancelled.
pub(crate) fn check_cancelled(token: &CancellationToken) -> Result<(), DomainError> {
    if token.is_cancelled() {
        return Err(DomainError::Cancelled);
    }
    Ok(())
}

/// Invoke with the configured per-call timeout and retry budget.
///
/// `on_retry` is called with the 1-based retry number and the error that
/// caused it, before the backoff sleep.
///
/// A call already in flight when `token` is cancelled is allowed to
/// settle, but no new call starts afterwards: the last error is returned
/// instead of retrying, and a pending backoff is cut short.
pub(crate) async fn invoke_with_retry<I, F>(
    invoker: &I,
    request: &InvocationRequest,
    params: &InvocationParams,
    token: &CancellationToken,
    mut on_retry: F,
) -> Result<Utterance, InvocationError>
where
    I: TurnInvoker + ?Sized,
    F: FnMut(u32, &InvocationError),
{
    let mut retries = 0;
    loop {
        let result = match params.call_timeout {
            Some(limit) => tokio::time::timeout(limit, invoker.invoke(request))
                .await
                .unwrap_or(Err(InvocationError::Timeout)),
            None => invoker.invoke(request).await,
        };

        let error = match result {
            Ok(utterance) => return Ok(utterance),
            Err(e) if retries >= params.max_retries => return Err(e),
            Err(e) if token.is_cancelled() => {
                debug!(error = %e, "Not retrying after cancellation");
                return Err(e);
            }
            Err(e) => e,
        };

        retries += 1;
        on_retry(retries, &error);

        let retry_after = match &error {
            InvocationError::RateLimited { retry_after } => *retry_after,
            _ => None,
        };
        let delay = params.backoff(retry_after);
        if !delay.is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = token.cancelled() => {
                    debug!(error = %error, "Backoff interrupted by cancellation");
                    return Err(error);
                }
            }
        }
    }
}
