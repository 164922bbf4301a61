//! Context budget for retrieved records.

use crate::retrieval::entities::RetrievedRecord;

/// Caps how many retrieved records a run folds into the conversation.
///
/// Records beyond the cap are dropped before folding: the model never sees
/// them, so they are neither cited nor audited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextBudget {
    max_records: usize,
    used: usize,
}

impl ContextBudget {
    pub fn new(max_records: usize) -> Self {
        Self {
            max_records,
            used: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.max_records.saturating_sub(self.used)
    }

    /// Keep records in retrieval order until the budget runs out.
    ///
    /// Returns the kept records and how many were dropped.
    pub fn admit(&mut self, mut records: Vec<RetrievedRecord>) -> (Vec<RetrievedRecord>, usize) {
        let keep = records.len().min(self.remaining());
        let dropped = records.len() - keep;
        records.truncate(keep);
        self.used += keep;
        (records, dropped)
    }
}
