//! Run entities

use crate::citation::Citation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of the orchestration loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Reasoning,
    Dispatching,
    Folding,
    Terminated,
}

impl RunPhase {
    pub fn as_str(&self) -> &str {
        match self {
            RunPhase::Reasoning => "reasoning",
            RunPhase::Dispatching => "dispatching",
            RunPhase::Folding => "folding",
            RunPhase::Terminated => "terminated",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The model replied with text and no tool requests
    FinalAnswer,
    /// The step budget ran out before a final answer
    BudgetExceeded,
}

impl TerminationReason {
    pub fn as_str(&self) -> &str {
        match self {
            TerminationReason::FinalAnswer => "final_answer",
            TerminationReason::BudgetExceeded => "budget_exceeded",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a completed run.
///
/// Fatal runs do not produce a `RunResult`; they surface as an error carrying
/// the partial state instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub run_id: String,
    /// Absent only when the budget ran out before the model wrote any text
    pub answer: Option<String>,
    pub citations: Vec<Citation>,
    /// Audit records acknowledged during the run, in emission order
    pub audit_ids: Vec<String>,
    pub steps: usize,
    pub tool_calls: usize,
    pub termination: TerminationReason,
}

impl RunResult {
    pub fn is_complete(&self) -> bool {
        self.termination == TerminationReason::FinalAnswer
    }
}
