//! End-to-end runs through the real registry, handlers and audit ledger.
//!
//! Only the reasoning model is scripted.

use crate::audit::{InMemoryAuditSink, JsonlAuditSink};
use crate::config::FileConfig;
use crate::retrieval::{CorpusEntry, CorpusRetrievalGateway};
use crate::system::{SystemClock, UuidIdGenerator};
use crate::tools::build_registry;
use archivist_application::{
    AgentDeps, AgentError, AgentErrorKind, AgentOrchestrator, AuditError, AuditSink,
    FailingComponent, ReasoningClient, ReasoningError, RetrievalError, RetrievalGateway,
    RunParams,
};
use archivist_domain::{
    AuditAction, AuditFilter, AuditRecord, ConversationState, Query, ReasoningReply,
    RetrievedRecord, SearchFilters, TerminationReason, ToolCall, ToolDefinition, Turn,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const ACTOR: &str = "analyst-7";

/// Replays canned replies; once exhausted, repeats `fallback` if set
struct ScriptedReasoning {
    replies: Mutex<VecDeque<ReasoningReply>>,
    fallback: Option<ReasoningReply>,
}

impl ScriptedReasoning {
    fn new(replies: Vec<ReasoningReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            fallback: None,
        }
    }

    fn always(reply: ReasoningReply) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: Some(reply),
        }
    }
}

#[async_trait]
impl ReasoningClient for ScriptedReasoning {
    async fn complete(
        &self,
        _conversation: &ConversationState,
        _tools: &[ToolDefinition],
    ) -> Result<ReasoningReply, ReasoningError> {
        let next = self.replies.lock().unwrap().pop_front();
        next.or_else(|| self.fallback.clone())
            .ok_or_else(|| ReasoningError::Malformed("script exhausted".to_string()))
    }
}

/// Counts searches before delegating to the corpus
struct CountingGateway {
    inner: CorpusRetrievalGateway,
    searches: AtomicUsize,
}

#[async_trait]
impl RetrievalGateway for CountingGateway {
    async fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
        top_k: usize,
    ) -> Result<Vec<RetrievedRecord>, RetrievalError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.inner.search(query, filters, top_k).await
    }
}

struct UnavailableSink;

#[async_trait]
impl AuditSink for UnavailableSink {
    async fn record(&self, _record: &AuditRecord) -> Result<(), AuditError> {
        Err(AuditError::Unavailable("audit store offline".to_string()))
    }

    async fn query(&self, _filter: &AuditFilter) -> Result<Vec<AuditRecord>, AuditError> {
        Ok(vec![])
    }
}

fn entry(source_id: &str, label: &str, text: &str) -> CorpusEntry {
    CorpusEntry {
        source_id: source_id.to_string(),
        location: None,
        page: Some(12),
        section: Some("3.2".to_string()),
        sensitivity_label: label.into(),
        source_kind: "manual".to_string(),
        category: Some("maintenance".to_string()),
        text: text.to_string(),
    }
}

fn search(id: &str, query: &str) -> ToolCall {
    ToolCall::new("search_manuals")
        .with_id(id)
        .with_arg("query", query)
}

fn answer(text: &str) -> ReasoningReply {
    ReasoningReply::from_text(text)
}

struct World {
    gateway: Arc<CountingGateway>,
    sink: Arc<dyn AuditSink>,
}

impl World {
    fn new(entries: Vec<CorpusEntry>) -> Self {
        Self {
            gateway: Arc::new(CountingGateway {
                inner: CorpusRetrievalGateway::new(entries),
                searches: AtomicUsize::new(0),
            }),
            sink: Arc::new(InMemoryAuditSink::new()),
        }
    }

    fn with_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.sink = sink;
        self
    }

    async fn run(
        &self,
        reasoning: ScriptedReasoning,
        max_steps: usize,
    ) -> Result<archivist_domain::RunResult, AgentError> {
        let config = FileConfig::default();
        let registry = build_registry(&config, self.gateway.clone()).unwrap();
        let orchestrator = AgentOrchestrator::new(AgentDeps {
            reasoning: Arc::new(reasoning),
            tools: Arc::new(registry),
            audit_sink: Arc::clone(&self.sink),
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidIdGenerator),
        })
        .with_params(RunParams::default().with_audit_retry(3, Duration::ZERO));

        let query = Query::new("What torque do the wheel lug nuts need?", ACTOR).unwrap();
        orchestrator
            .run(query, max_steps, Duration::from_secs(5))
            .await
    }

    async fn audits(&self) -> Vec<AuditRecord> {
        self.sink.query(&AuditFilter::new()).await.unwrap()
    }
}

#[tokio::test]
async fn test_unrestricted_sources_are_cited_without_audit() {
    let world = World::new(vec![entry(
        "TM-9-2320",
        "unclassified",
        "Torque wheel lug nuts to 55 ft-lb.",
    )]);
    let script = ScriptedReasoning::new(vec![
        ReasoningReply::with_tool_calls("", vec![search("c1", "wheel lug nuts torque")]),
        answer("Torque to 55 ft-lb [TM-9-2320]."),
    ]);

    let result = world.run(script, 5).await.unwrap();

    assert_eq!(result.termination, TerminationReason::FinalAnswer);
    assert_eq!(result.citations.len(), 1);
    assert_eq!(result.citations[0].source_id, "TM-9-2320");
    assert!(result.audit_ids.is_empty());
    assert!(world.audits().await.is_empty());
}

#[tokio::test]
async fn test_restricted_source_is_audited_before_return() {
    let world = World::new(vec![entry(
        "FM-4-30",
        "restricted",
        "Wheel lug nuts torque sequence for armored vehicles.",
    )]);
    let script = ScriptedReasoning::new(vec![
        ReasoningReply::with_tool_calls("", vec![search("c1", "wheel lug nuts torque")]),
        answer("Follow the star sequence [FM-4-30]."),
    ]);

    let result = world.run(script, 5).await.unwrap();

    let audits = world.audits().await;
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].source_id, "FM-4-30");
    assert_eq!(audits[0].actor, ACTOR);
    assert_eq!(audits[0].sensitivity_label.as_str(), "restricted");
    assert_eq!(audits[0].action, AuditAction::DocumentAccess);
    assert_eq!(audits[0].run_id, result.run_id);
    assert_eq!(result.audit_ids, vec![audits[0].id.clone()]);
    assert_eq!(result.citations[0].source_id, "FM-4-30");
}

#[tokio::test]
async fn test_unknown_tool_is_folded_not_fatal() {
    let world = World::new(vec![]);
    let script = ScriptedReasoning::new(vec![
        ReasoningReply::with_tool_calls(
            "",
            vec![ToolCall::new("search_unknown")
                .with_id("c1")
                .with_arg("query", "x")],
        ),
        answer("I could not find that."),
    ]);

    let result = world.run(script, 5).await.unwrap();

    assert_eq!(result.termination, TerminationReason::FinalAnswer);
    assert_eq!(result.answer.as_deref(), Some("I could not find that."));
    assert_eq!(result.steps, 2);
    assert!(result.citations.is_empty());
}

#[tokio::test]
async fn test_failing_audit_sink_is_fatal() {
    let world = World::new(vec![entry(
        "FM-4-30",
        "secret",
        "Wheel lug nuts torque sequence.",
    )])
    .with_sink(Arc::new(UnavailableSink));
    let script = ScriptedReasoning::new(vec![
        ReasoningReply::with_tool_calls("", vec![search("c1", "wheel lug nuts torque")]),
        answer("Should never be returned."),
    ]);

    let err = world.run(script, 5).await.unwrap_err();

    assert!(matches!(err.kind, AgentErrorKind::AuditWriteFailed(_)));
    assert_eq!(err.component, FailingComponent::AuditSink);
    assert_eq!(err.step, 1);
    assert!(err.audit_ids.is_empty());
    // The restricted record never reached the transcript
    assert!(!err
        .conversation
        .turns()
        .iter()
        .any(|t| matches!(t, Turn::Tool { .. })));
}

#[tokio::test]
async fn test_tool_loop_ends_at_step_budget() {
    let world = World::new(vec![entry(
        "TM-9-2320",
        "unclassified",
        "Torque wheel lug nuts to 55 ft-lb.",
    )]);
    let script = ScriptedReasoning::always(ReasoningReply::with_tool_calls(
        "Still looking.",
        vec![search("", "wheel lug nuts torque")],
    ));

    let result = world.run(script, 3).await.unwrap();

    assert_eq!(result.termination, TerminationReason::BudgetExceeded);
    assert_eq!(result.steps, 3);
    assert!(!result.is_complete());
}

#[tokio::test]
async fn test_identical_requests_share_one_search_and_audit() {
    let world = World::new(vec![entry(
        "FM-4-30",
        "confidential",
        "Wheel lug nuts torque sequence.",
    )]);
    let script = ScriptedReasoning::new(vec![
        ReasoningReply::with_tool_calls(
            "",
            vec![
                search("c1", "wheel lug nuts torque"),
                search("c2", "wheel lug nuts torque"),
            ],
        ),
        ReasoningReply::with_tool_calls(
            "",
            vec![ToolCall::new("log_access")
                .with_id("c3")
                .with_arg("document_id", "FM-4-30")
                .with_arg("classification_level", "confidential")],
        ),
        answer("Use the star sequence [FM-4-30]."),
    ]);

    let result = world.run(script, 5).await.unwrap();

    assert_eq!(world.gateway.searches.load(Ordering::SeqCst), 1);
    assert_eq!(world.audits().await.len(), 1);
    assert_eq!(result.audit_ids.len(), 1);
    assert_eq!(result.tool_calls, 3);
}

#[tokio::test]
async fn test_identical_search_in_later_step_is_not_repeated() {
    let world = World::new(vec![entry(
        "FM-4-30",
        "confidential",
        "Wheel lug nuts torque sequence.",
    )]);
    let script = ScriptedReasoning::new(vec![
        ReasoningReply::with_tool_calls("", vec![search("c1", "wheel lug nuts torque")]),
        ReasoningReply::with_tool_calls("", vec![search("c2", "wheel lug nuts torque")]),
        answer("Use the star sequence [FM-4-30]."),
    ]);

    let result = world.run(script, 5).await.unwrap();

    assert_eq!(world.gateway.searches.load(Ordering::SeqCst), 1);
    assert_eq!(world.audits().await.len(), 1);
    assert_eq!(result.audit_ids.len(), 1);
    assert_eq!(result.tool_calls, 2);
    assert_eq!(result.citations.len(), 1);
}

#[tokio::test]
async fn test_jsonl_trail_survives_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let sink: Arc<dyn AuditSink> = Arc::new(JsonlAuditSink::new(dir.path()).unwrap());
    let world = World::new(vec![entry(
        "FM-4-30",
        "top_secret",
        "Wheel lug nuts torque sequence.",
    )])
    .with_sink(sink);
    let script = ScriptedReasoning::new(vec![
        ReasoningReply::with_tool_calls("", vec![search("c1", "wheel lug nuts torque")]),
        answer("See FM-4-30."),
    ]);

    let result = world.run(script, 5).await.unwrap();

    let reopened = JsonlAuditSink::new(dir.path()).unwrap();
    let persisted = reopened
        .query(&AuditFilter::new().with_run(&result.run_id))
        .await
        .unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].id, result.audit_ids[0]);
}
