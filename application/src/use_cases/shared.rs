//! Shared utilities for use cases.

use crate::use_cases::run_agent::AgentErrorKind;
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), AgentErrorKind> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(AgentErrorKind::Cancelled);
    }
    Ok(())
}

/// Run `fut` unless the token fires first.
pub(crate) async fn cancellable<F, T>(
    token: &Option<CancellationToken>,
    fut: F,
) -> Result<T, AgentErrorKind>
where
    F: std::future::Future<Output = T>,
{
    match token {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(AgentErrorKind::Cancelled),
            out = fut => Ok(out),
        },
        None => Ok(fut.await),
    }
}
