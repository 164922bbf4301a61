//! Search tool handler
//!
//! Turns a search call into a retrieval request. The source kind is fixed
//! per tool; the category comes from the tool's optional category argument
//! and the sensitivity ceiling from the run's clearance, never from the model.

use archivist_application::{DispatchContext, RetrievalGateway};
use archivist_domain::core::string::truncate;
use archivist_domain::{SearchFilters, ToolCall, ToolError, ToolPayload, ToolResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct SearchTool {
    gateway: Arc<dyn RetrievalGateway>,
    source_kind: String,
    category_param: Option<String>,
    top_k: usize,
    max_excerpt_chars: usize,
    transport_retries: u32,
    backoff: Duration,
}

impl SearchTool {
    pub fn new(gateway: Arc<dyn RetrievalGateway>, source_kind: impl Into<String>) -> Self {
        Self {
            gateway,
            source_kind: source_kind.into(),
            category_param: None,
            top_k: 5,
            max_excerpt_chars: 500,
            transport_retries: 1,
            backoff: Duration::from_millis(200),
        }
    }

    pub fn with_category_param(mut self, param: Option<String>) -> Self {
        self.category_param = param;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_max_excerpt_chars(mut self, max: usize) -> Self {
        self.max_excerpt_chars = max;
        self
    }

    pub fn with_retries(mut self, retries: u32, backoff: Duration) -> Self {
        self.transport_retries = retries;
        self.backoff = backoff;
        self
    }

    pub fn source_kind(&self) -> &str {
        &self.source_kind
    }

    fn filters(&self, call: &ToolCall, ctx: &DispatchContext) -> SearchFilters {
        let mut filters = SearchFilters::new()
            .with_source_kind(&self.source_kind)
            .with_ceiling(ctx.clearance.clone());
        if let Some(param) = &self.category_param
            && let Some(category) = call.get_string(param)
        {
            filters = filters.with_category(category.to_lowercase());
        }
        filters
    }

    pub async fn run(&self, call: &ToolCall, ctx: &DispatchContext) -> ToolResult {
        let query = match call.require_string("query") {
            Ok(q) => q,
            Err(e) => return ToolResult::failure(&call.tool_name, ToolError::invalid_argument(e)),
        };
        let filters = self.filters(call, ctx);

        let max_attempts = self.transport_retries + 1;
        let mut attempt = 1;
        loop {
            match self.gateway.search(query, &filters, self.top_k).await {
                Ok(mut records) => {
                    for record in &mut records {
                        record.excerpt = truncate(&record.excerpt, self.max_excerpt_chars);
                    }
                    debug!(
                        tool = %call.tool_name,
                        source_kind = %self.source_kind,
                        found = records.len(),
                        "search completed"
                    );
                    return ToolResult::success(&call.tool_name, ToolPayload::Records(records))
                        .with_attempts(attempt);
                }
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    warn!(
                        tool = %call.tool_name,
                        attempt,
                        max_attempts,
                        error = %e,
                        "retrieval failed, retrying"
                    );
                    tokio::time::sleep(self.backoff * attempt).await;
                    attempt += 1;
                }
                Err(e) => {
                    let error = if e.is_transient() {
                        ToolError::transport(e.to_string())
                    } else {
                        ToolError::execution_failed(e.to_string())
                    };
                    return ToolResult::failure(&call.tool_name, error).with_attempts(attempt);
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use archivist_application::{AuditLedger, AuditRetryPolicy, RetrievalError};
    use archivist_domain::{RetrievedRecord, SensitivityLabel};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::audit::InMemoryAuditSink;
    use crate::system::{SystemClock, UuidIdGenerator};

    /// Gateway that fails `failures` times, then returns its records
    #[derive(Default)]
    pub(crate) struct StubGateway {
        pub records: Vec<RetrievedRecord>,
        pub failures: AtomicU32,
        pub permanent: bool,
        pub calls: AtomicU32,
        pub last_filters: Mutex<Option<SearchFilters>>,
    }

    impl StubGateway {
        pub fn with_records(records: Vec<RetrievedRecord>) -> Self {
            Self {
                records,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl RetrievalGateway for StubGateway {
        async fn search(
            &self,
            _query: &str,
            filters: &SearchFilters,
            top_k: usize,
        ) -> Result<Vec<RetrievedRecord>, RetrievalError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_filters.lock().unwrap() = Some(filters.clone());
            if self.permanent {
                return Err(RetrievalError::Backend("index missing".to_string()));
            }
            if self
                .failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(RetrievalError::Transport("connection reset".to_string()));
            }
            Ok(self.records.iter().take(top_k).cloned().collect())
        }
    }

    pub(crate) fn context(clearance: Option<&str>) -> DispatchContext {
        let ledger = AuditLedger::new(
            "run-test",
            Arc::new(InMemoryAuditSink::new()),
            Arc::new(SystemClock),
            Arc::new(UuidIdGenerator),
            AuditRetryPolicy::default(),
        );
        DispatchContext {
            run_id: "run-test".to_string(),
            actor: "analyst-7".to_string(),
            clearance: clearance.map(SensitivityLabel::new),
            ledger: Arc::new(ledger),
        }
    }

    fn record(source: &str, excerpt: &str) -> RetrievedRecord {
        RetrievedRecord::new(source, "p. 1", "unclassified", 0.9, excerpt)
    }

    #[tokio::test]
    async fn test_filters_carry_kind_category_and_ceiling() {
        let gateway = Arc::new(StubGateway::with_records(vec![record("TM-9", "text")]));
        let tool = SearchTool::new(gateway.clone(), "manual")
            .with_category_param(Some("manual_type".to_string()));
        let call = ToolCall::new("search_manuals")
            .with_arg("query", "torque")
            .with_arg("manual_type", "Maintenance");

        let result = tool.run(&call, &context(Some("secret"))).await;

        assert!(result.is_success());
        let filters = gateway.last_filters.lock().unwrap().clone().unwrap();
        assert_eq!(filters.source_kind.as_deref(), Some("manual"));
        assert_eq!(filters.category.as_deref(), Some("maintenance"));
        assert_eq!(filters.sensitivity_ceiling, Some(SensitivityLabel::new("secret")));
    }

    #[tokio::test]
    async fn test_excerpts_are_truncated() {
        let long = "x".repeat(40);
        let gateway = Arc::new(StubGateway::with_records(vec![record("TM-9", &long)]));
        let tool = SearchTool::new(gateway, "manual").with_max_excerpt_chars(10);
        let call = ToolCall::new("search_manuals").with_arg("query", "torque");

        let result = tool.run(&call, &context(None)).await;

        let records = result.records();
        assert_eq!(records[0].excerpt, format!("{}...", "x".repeat(10)));
        assert_eq!(records[0].source_id, "TM-9");
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let gateway = Arc::new(StubGateway {
            records: vec![record("TM-9", "text")],
            failures: AtomicU32::new(1),
            ..Default::default()
        });
        let tool = SearchTool::new(gateway.clone(), "manual").with_retries(1, Duration::ZERO);
        let call = ToolCall::new("search_manuals").with_arg("query", "torque");

        let result = tool.run(&call, &context(None)).await;

        assert!(result.is_success());
        assert_eq!(result.metadata.attempts, Some(2));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_transport_error_after_retries() {
        let gateway = Arc::new(StubGateway {
            failures: AtomicU32::new(10),
            ..Default::default()
        });
        let tool = SearchTool::new(gateway.clone(), "manual").with_retries(2, Duration::ZERO);
        let call = ToolCall::new("search_manuals").with_arg("query", "torque");

        let result = tool.run(&call, &context(None)).await;

        assert_eq!(result.error().unwrap().code, ToolError::TRANSPORT);
        assert_eq!(result.metadata.attempts, Some(3));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_backend_error_is_not_retried() {
        let gateway = Arc::new(StubGateway {
            permanent: true,
            ..Default::default()
        });
        let tool = SearchTool::new(gateway.clone(), "manual").with_retries(3, Duration::ZERO);
        let call = ToolCall::new("search_manuals").with_arg("query", "torque");

        let result = tool.run(&call, &context(None)).await;

        assert_eq!(result.error().unwrap().code, ToolError::EXECUTION_FAILED);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }
}
