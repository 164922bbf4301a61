//! Agent configuration from TOML (`[agent]` section)

use archivist_application::RunParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw agent loop configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// max_steps = 10
/// step_timeout_secs = 60
/// tool_timeout_secs = 30
/// reasoning_retries = 2
/// reasoning_backoff_ms = 250
/// malformed_retries = 1
/// max_context_records = 40
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Maximum reasoning steps per run
    pub max_steps: usize,
    /// Timeout for one reasoning call, in seconds
    pub step_timeout_secs: u64,
    /// Timeout for one tool call, in seconds
    pub tool_timeout_secs: u64,
    /// Retries after a reasoning timeout or transport failure
    pub reasoning_retries: u32,
    /// Base backoff between reasoning retries (doubles each retry)
    pub reasoning_backoff_ms: u64,
    /// Corrective retries after a malformed reasoning reply
    pub malformed_retries: u32,
    /// Records folded into the conversation per run
    pub max_context_records: usize,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            max_steps: 10,
            step_timeout_secs: 60,
            tool_timeout_secs: 30,
            reasoning_retries: 2,
            reasoning_backoff_ms: 250,
            malformed_retries: 1,
            max_context_records: 40,
        }
    }
}

impl FileAgentConfig {
    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.step_timeout_secs)
    }

    /// Loop parameters without the audit retry policy
    pub fn to_run_params(&self) -> RunParams {
        RunParams::default()
            .with_max_steps(self.max_steps)
            .with_step_timeout(self.step_timeout())
            .with_tool_timeout(Duration::from_secs(self.tool_timeout_secs))
            .with_reasoning_retries(
                self.reasoning_retries,
                Duration::from_millis(self.reasoning_backoff_ms),
            )
            .with_malformed_retries(self.malformed_retries)
            .with_max_context_records(self.max_context_records)
    }
}
