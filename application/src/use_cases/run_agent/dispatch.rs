//! Dispatching and folding phases.

use super::{AgentErrorKind, AgentOrchestrator, RunState};
use crate::ports::audit_sink::AuditError;
use crate::ports::run_progress::RunProgressNotifier;
use crate::ports::tool_executor::DispatchContext;
use archivist_domain::{AnswerPromptTemplate, AuditAction, ToolCall, ToolError, ToolPayload, ToolResult};
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

impl AgentOrchestrator {
    /// Execute a step's tool calls concurrently.
    ///
    /// Requests with the same tool and identical arguments execute once per
    /// run: within a step the result fans out to each correlation id, and a
    /// request already answered successfully in an earlier step is served
    /// from `completed` without calling the tool again. Results come back in
    /// request order. Each call runs as its own task under `tool_timeout`;
    /// a call that times out is reported as an error result but is not
    /// aborted, so an audit write it started still completes. The handles
    /// of such calls are returned so the run can settle them before it
    /// reports its audit ids.
    pub(super) async fn dispatch(
        &self,
        calls: &[ToolCall],
        ctx: &DispatchContext,
        completed: &HashMap<String, ToolResult>,
        progress: &dyn RunProgressNotifier,
    ) -> (Vec<ToolResult>, Vec<JoinHandle<ToolResult>>) {
        let mut unique: Vec<&ToolCall> = Vec::new();
        let mut by_key: HashMap<String, usize> = HashMap::new();
        let mut slots = Vec::with_capacity(calls.len());

        for call in calls {
            let key = call.dedup_key();
            let slot = match by_key.get(&key) {
                Some(&slot) => {
                    debug!(
                        tool = %call.tool_name,
                        correlation_id = %call.correlation_id,
                        "identical request in step, sharing result"
                    );
                    slot
                }
                None => {
                    unique.push(call);
                    by_key.insert(key, unique.len() - 1);
                    unique.len() - 1
                }
            };
            slots.push(slot);
        }

        let tool_timeout = self.params.tool_timeout;
        let futures = unique.iter().map(|call| {
            progress.on_tool_call(call);
            let cached = completed.get(&call.dedup_key()).cloned();
            let tools = Arc::clone(&self.deps.tools);
            let ctx = ctx.clone();
            let call = (*call).clone();
            async move {
                if let Some(result) = cached {
                    debug!(
                        tool = %call.tool_name,
                        correlation_id = %call.correlation_id,
                        "request already answered in this run, reusing result"
                    );
                    return (result, None);
                }
                let started = Instant::now();
                let tool_name = call.tool_name.clone();
                let mut handle = tokio::spawn(async move { tools.execute(&call, &ctx).await });
                let (result, straggler) = match tokio::time::timeout(tool_timeout, &mut handle).await {
                    Ok(Ok(result)) => (result, None),
                    Ok(Err(e)) => (
                        ToolResult::failure(
                            &tool_name,
                            ToolError::execution_failed(format!("tool task failed: {e}")),
                        ),
                        None,
                    ),
                    Err(_) => {
                        warn!(tool = %tool_name, timeout_ms = tool_timeout.as_millis() as u64, "tool call timed out");
                        (
                            ToolResult::failure(&tool_name, ToolError::timeout(&tool_name)),
                            Some(handle),
                        )
                    }
                };
                let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                (result.with_duration(elapsed), straggler)
            }
        });
        let (results, stragglers): (Vec<ToolResult>, Vec<Option<JoinHandle<ToolResult>>>) =
            join_all(futures).await.into_iter().unzip();

        let results = calls
            .iter()
            .zip(slots)
            .map(|(call, slot)| {
                results[slot]
                    .clone()
                    .with_correlation_id(&call.correlation_id)
            })
            .collect();
        (results, stragglers.into_iter().flatten().collect())
    }

    /// Wait for timed-out tool tasks so their audit writes are acknowledged
    /// before the run reports its audit ids.
    ///
    /// Each task gets one more `tool_timeout`; a task still running after
    /// that is left detached.
    pub(super) async fn settle(&self, run: &mut RunState) {
        for handle in run.stragglers.drain(..) {
            if tokio::time::timeout(self.params.tool_timeout, handle)
                .await
                .is_err()
            {
                warn!(run_id = %run.run_id, "timed-out tool call still running at end of run");
            }
        }
    }

    /// Fold results into the conversation, in request order.
    ///
    /// Records beyond the context budget are dropped first. Every remaining
    /// restricted record is audited through the run's ledger before its
    /// result is appended, so nothing restricted reaches the model
    /// unrecorded.
    pub(super) async fn fold(
        &self,
        run: &mut RunState,
        ctx: &DispatchContext,
        calls: &[ToolCall],
        results: Vec<ToolResult>,
        progress: &dyn RunProgressNotifier,
    ) -> Result<(), AgentErrorKind> {
        let mut rejected: Vec<(String, String)> = Vec::new();
        let mut succeeded: HashSet<String> = HashSet::new();

        for (call, mut result) in calls.iter().zip(results) {
            let key = call.dedup_key();
            if let Some(err) = result.error()
                && err.is_audit_failure()
            {
                return Err(AgentErrorKind::AuditWriteFailed(AuditError::Write(
                    err.message.clone(),
                )));
            }
            match result.error() {
                Some(err) if err.is_validation() => {
                    if !rejected.iter().any(|(tool, _)| *tool == result.tool_name) {
                        rejected.push((result.tool_name.clone(), err.message.clone()));
                    }
                }
                None => {
                    succeeded.insert(result.tool_name.clone());
                }
                Some(_) => {}
            }

            // A reused result was charged against the budget when first folded
            let reused = result.is_success() && run.completed.contains_key(&key);
            if reused {
                if let Some(first) = run.completed.get(&key) {
                    result.payload = first.payload.clone();
                    result.metadata.dropped_records = first.metadata.dropped_records;
                }
            } else if let ToolPayload::Records(records) = std::mem::take(&mut result.payload) {
                let (kept, dropped) = run.budget.admit(records);
                if dropped > 0 {
                    warn!(
                        tool = %result.tool_name,
                        correlation_id = %result.correlation_id,
                        dropped,
                        "context budget spent, dropping records"
                    );
                    result.metadata.dropped_records = Some(dropped);
                    progress.on_records_dropped(&result.tool_name, dropped);
                }
                result.payload = ToolPayload::Records(kept);
            }

            for record in result.records() {
                if !self.policy.is_restricted(&record.sensitivity_label) {
                    continue;
                }
                let receipt = ctx
                    .ledger
                    .ensure_recorded(
                        &ctx.actor,
                        &record.source_id,
                        &record.sensitivity_label,
                        AuditAction::DocumentAccess,
                    )
                    .await?;
                if receipt.newly_recorded {
                    progress.on_audit_recorded(&receipt);
                }
            }
            if let ToolPayload::Receipt(receipt) = &result.payload
                && receipt.newly_recorded
                && !reused
            {
                progress.on_audit_recorded(receipt);
            }
            if result.is_success() && !reused {
                run.completed.insert(key, result.clone());
            }

            progress.on_tool_result(&result);
            run.conversation.push_tool_result(result);
        }

        for tool in &succeeded {
            if !rejected.iter().any(|(t, _)| t == tool) {
                run.validation_strikes.remove(tool);
            }
        }
        for (tool, message) in rejected {
            let strikes = run.validation_strikes.entry(tool.clone()).or_insert(0);
            *strikes += 1;
            if *strikes >= 2 {
                return Err(AgentErrorKind::InvalidToolArguments { tool, message });
            }
            run.conversation
                .push_note(AnswerPromptTemplate::invalid_arguments(&tool, &message));
        }

        Ok(())
    }
}
