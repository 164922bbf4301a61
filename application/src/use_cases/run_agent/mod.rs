//! Agent orchestrator use case
//!
//! Drives one run through a bounded loop:
//!
//! ```text
//! Reasoning ──tool calls──▶ Dispatching ──▶ Folding ──┐
//!     ▲                                                │
//!     └────────────────────────────────────────────────┘
//!     │
//!     └──final text──▶ Terminated (citations + audit summary)
//! ```
//!
//! Folding is a hard gate: every restricted record admitted into the
//! conversation is durably audited before the next reasoning call.

mod dispatch;
mod reasoning;
mod types;

pub use types::{AgentDeps, AgentError, AgentErrorKind, FailingComponent};

use crate::config::RunParams;
use crate::ports::clock::IdGenerator;
use crate::ports::run_progress::{NoRunProgress, RunProgressNotifier};
use crate::ports::tool_executor::DispatchContext;
use crate::use_cases::audit_ledger::{AuditLedger, AuditRetryPolicy};
use crate::use_cases::shared::check_cancelled;
use archivist_domain::{
    AnswerPromptTemplate, Citation, CitationExtractor, ContextBudget, ContextMark,
    ConversationState, Query, RunPhase, RunResult, SensitivityPolicy, TerminationReason, ToolCall,
    ToolResult,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Use case answering one query per run
pub struct AgentOrchestrator {
    pub(super) deps: AgentDeps,
    pub(super) params: RunParams,
    pub(super) policy: SensitivityPolicy,
    pub(super) cancellation_token: Option<CancellationToken>,
}

/// Mutable state owned by a single run
pub(super) struct RunState {
    run_id: String,
    step: usize,
    conversation: ConversationState,
    ledger: Arc<AuditLedger>,
    budget: ContextBudget,
    validation_strikes: HashMap<String, u32>,
    seen_correlation_ids: HashSet<String>,
    /// Successful results as first folded, keyed by `ToolCall::dedup_key`
    completed: HashMap<String, ToolResult>,
    /// Tool tasks that outlived their timeout
    stragglers: Vec<JoinHandle<ToolResult>>,
    /// Mark of the reasoning call that produced the latest assistant text
    partial_mark: Option<ContextMark>,
}

impl RunState {
    /// Replace missing or already-used correlation ids.
    fn assign_correlation_ids(
        &mut self,
        calls: Vec<ToolCall>,
        ids: &dyn IdGenerator,
    ) -> Vec<ToolCall> {
        calls
            .into_iter()
            .map(|mut call| {
                if call.correlation_id.is_empty()
                    || self.seen_correlation_ids.contains(&call.correlation_id)
                {
                    let fresh = ids.correlation_id();
                    debug!(
                        tool = %call.tool_name,
                        original = %call.correlation_id,
                        assigned = %fresh,
                        "reassigning correlation id"
                    );
                    call.correlation_id = fresh;
                }
                self.seen_correlation_ids.insert(call.correlation_id.clone());
                call
            })
            .collect()
    }

    async fn finish(
        &self,
        answer: Option<String>,
        citations: Vec<Citation>,
        termination: TerminationReason,
    ) -> RunResult {
        RunResult {
            run_id: self.run_id.clone(),
            answer,
            citations,
            audit_ids: self.ledger.emitted_ids().await,
            steps: self.step,
            tool_calls: self.conversation.tool_call_count(),
            termination,
        }
    }
}

impl AgentOrchestrator {
    pub fn new(deps: AgentDeps) -> Self {
        Self {
            deps,
            params: RunParams::default(),
            policy: SensitivityPolicy::default(),
            cancellation_token: None,
        }
    }

    pub fn with_params(mut self, params: RunParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_sensitivity_policy(mut self, policy: SensitivityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn params(&self) -> &RunParams {
        &self.params
    }

    pub async fn run(
        &self,
        query: Query,
        max_steps: usize,
        step_timeout: Duration,
    ) -> Result<RunResult, AgentError> {
        self.run_with_progress(query, max_steps, step_timeout, &NoRunProgress)
            .await
    }

    pub async fn run_with_progress(
        &self,
        query: Query,
        max_steps: usize,
        step_timeout: Duration,
        progress: &dyn RunProgressNotifier,
    ) -> Result<RunResult, AgentError> {
        let run_id = self.deps.ids.run_id();
        let ledger = Arc::new(AuditLedger::new(
            run_id.clone(),
            Arc::clone(&self.deps.audit_sink),
            Arc::clone(&self.deps.clock),
            Arc::clone(&self.deps.ids),
            AuditRetryPolicy {
                max_attempts: self.params.audit_max_attempts,
                backoff: self.params.audit_backoff,
            },
        ));
        let tool_definitions = self.deps.tools.definitions();
        let system_prompt = AnswerPromptTemplate::system(self.deps.tools.tool_spec());

        let mut run = RunState {
            run_id: run_id.clone(),
            step: 0,
            conversation: ConversationState::seeded(system_prompt, query.text()),
            ledger: Arc::clone(&ledger),
            budget: ContextBudget::new(self.params.max_context_records),
            validation_strikes: HashMap::new(),
            seen_correlation_ids: HashSet::new(),
            completed: HashMap::new(),
            stragglers: Vec::new(),
            partial_mark: None,
        };
        let ctx = DispatchContext {
            run_id,
            actor: query.actor().to_string(),
            clearance: query.clearance().cloned(),
            ledger,
        };

        info!(
            run_id = %run.run_id,
            actor = %ctx.actor,
            max_steps,
            tools = tool_definitions.len(),
            "starting run"
        );

        if max_steps == 0 {
            return Err(self
                .fail(&mut run, AgentErrorKind::InvalidParams("max_steps must be at least 1".into()))
                .await);
        }
        if step_timeout.is_zero() {
            return Err(self
                .fail(&mut run, AgentErrorKind::InvalidParams("step timeout must be positive".into()))
                .await);
        }

        while run.step < max_steps {
            if let Err(kind) = check_cancelled(&self.cancellation_token) {
                return Err(self.fail(&mut run, kind).await);
            }
            run.step += 1;

            // === Reasoning ===
            progress.on_phase_change(run.step, RunPhase::Reasoning);
            let (reply, mark) = match self
                .reason(&mut run.conversation, &tool_definitions, step_timeout, progress)
                .await
            {
                Ok(reply) => reply,
                Err(kind) => return Err(self.fail(&mut run, kind).await),
            };

            let text = reply.text_content();
            let calls = reply.tool_calls();

            if calls.is_empty() {
                // === Terminated ===
                run.conversation.push_assistant(text.clone(), Vec::new());
                progress.on_phase_change(run.step, RunPhase::Terminated);
                let citations =
                    CitationExtractor::extract(run.conversation.records_visible_at(mark), &text);
                self.settle(&mut run).await;
                let result = run
                    .finish(Some(text), citations, TerminationReason::FinalAnswer)
                    .await;
                info!(
                    run_id = %result.run_id,
                    steps = result.steps,
                    citations = result.citations.len(),
                    audits = result.audit_ids.len(),
                    "run completed"
                );
                progress.on_complete(&result);
                return Ok(result);
            }

            let calls = run.assign_correlation_ids(calls, self.deps.ids.as_ref());
            if !text.trim().is_empty() {
                run.partial_mark = Some(mark);
            }
            run.conversation.push_assistant(text, calls.clone());

            // === Dispatching ===
            progress.on_phase_change(run.step, RunPhase::Dispatching);
            debug!(run_id = %run.run_id, step = run.step, calls = calls.len(), "dispatching tool calls");
            let (results, stragglers) = self.dispatch(&calls, &ctx, &run.completed, progress).await;
            run.stragglers.extend(stragglers);

            // === Folding ===
            progress.on_phase_change(run.step, RunPhase::Folding);
            if let Err(kind) = self.fold(&mut run, &ctx, &calls, results, progress).await {
                return Err(self.fail(&mut run, kind).await);
            }
        }

        warn!(run_id = %run.run_id, max_steps, "step budget exhausted before a final answer");
        progress.on_phase_change(run.step, RunPhase::Terminated);
        let answer = run.conversation.last_assistant_text().map(str::to_string);
        let citations = match (&answer, run.partial_mark) {
            (Some(text), Some(mark)) => {
                CitationExtractor::extract(run.conversation.records_visible_at(mark), text)
            }
            _ => Vec::new(),
        };
        self.settle(&mut run).await;
        let result = run
            .finish(answer, citations, TerminationReason::BudgetExceeded)
            .await;
        progress.on_complete(&result);
        Ok(result)
    }

    async fn fail(&self, run: &mut RunState, kind: AgentErrorKind) -> AgentError {
        self.settle(run).await;
        let component = kind.component();
        warn!(
            run_id = %run.run_id,
            step = run.step,
            component = %component,
            error = %kind,
            "run failed"
        );
        AgentError {
            kind,
            run_id: run.run_id.clone(),
            step: run.step,
            component,
            conversation: run.conversation.clone(),
            audit_ids: run.ledger.emitted_ids().await,
        }
    }
}
