//! Run parameters — orchestration loop control.
//!
//! [`RunParams`] groups the static knobs of
//! [`AgentOrchestrator`](crate::use_cases::run_agent::AgentOrchestrator):
//! budgets, timeouts and retry policies. These are application-layer
//! concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunParams {
    /// Maximum reasoning steps per run.
    pub max_steps: usize,
    /// Timeout for a single reasoning call.
    pub step_timeout: Duration,
    /// Timeout for a single tool call.
    pub tool_timeout: Duration,
    /// Retries after a reasoning timeout or transport failure.
    pub reasoning_retries: u32,
    /// Base delay between reasoning retries; doubles on each retry.
    pub reasoning_backoff: Duration,
    /// Corrective retries after a malformed reasoning reply.
    pub malformed_retries: u32,
    /// Records folded into the conversation per run.
    pub max_context_records: usize,
    /// Attempts per audit record before the run fails.
    pub audit_max_attempts: u32,
    /// Delay between audit attempts; grows linearly.
    pub audit_backoff: Duration,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            max_steps: 10,
            step_timeout: Duration::from_secs(60),
            tool_timeout: Duration::from_secs(30),
            reasoning_retries: 2,
            reasoning_backoff: Duration::from_millis(250),
            malformed_retries: 1,
            max_context_records: 40,
            audit_max_attempts: 3,
            audit_backoff: Duration::from_millis(100),
        }
    }
}

impl RunParams {
    // ==================== Builder Methods ====================

    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }

    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = timeout;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn with_reasoning_retries(mut self, retries: u32, backoff: Duration) -> Self {
        self.reasoning_retries = retries;
        self.reasoning_backoff = backoff;
        self
    }

    pub fn with_malformed_retries(mut self, retries: u32) -> Self {
        self.malformed_retries = retries;
        self
    }

    pub fn with_max_context_records(mut self, max: usize) -> Self {
        self.max_context_records = max;
        self
    }

    pub fn with_audit_retry(mut self, max_attempts: u32, backoff: Duration) -> Self {
        self.audit_max_attempts = max_attempts;
        self.audit_backoff = backoff;
        self
    }

    /// Backoff before reasoning retry number `retry` (1-based).
    pub fn reasoning_delay(&self, retry: u32) -> Duration {
        self.reasoning_backoff
            .saturating_mul(2u32.saturating_pow(retry.saturating_sub(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = RunParams::default();
        assert_eq!(params.max_steps, 10);
        assert_eq!(params.reasoning_retries, 2);
        assert_eq!(params.malformed_retries, 1);
        assert_eq!(params.audit_max_attempts, 3);
        assert_eq!(params.max_context_records, 40);
    }

    #[test]
    fn test_builder() {
        let params = RunParams::default()
            .with_max_steps(3)
            .with_step_timeout(Duration::from_secs(5))
            .with_audit_retry(1, Duration::ZERO);

        assert_eq!(params.max_steps, 3);
        assert_eq!(params.step_timeout, Duration::from_secs(5));
        assert_eq!(params.audit_max_attempts, 1);
    }

    #[test]
    fn test_reasoning_delay_doubles() {
        let params =
            RunParams::default().with_reasoning_retries(3, Duration::from_millis(100));
        assert_eq!(params.reasoning_delay(1), Duration::from_millis(100));
        assert_eq!(params.reasoning_delay(2), Duration::from_millis(200));
        assert_eq!(params.reasoning_delay(3), Duration::from_millis(400));
    }
}
