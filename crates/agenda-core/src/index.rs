//! Completion index: O(1) membership over `{taskId}_{YYYY-MM-DD}` keys.

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::model::completion::{CompletionRecord, completion_key};

/// Set of completion keys for fast per-occurrence lookup.
///
/// Rebuilding from records is O(n); incremental add/remove is O(1)
/// amortized. The index is derived state: it must always be recomputable
/// from the completion record collection it mirrors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionIndex {
    keys: HashSet<String>,
}

impl CompletionIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from a record set.
    #[must_use]
    pub fn from_records(records: &[CompletionRecord]) -> Self {
        Self {
            keys: records.iter().map(CompletionRecord::key).collect(),
        }
    }

    /// Record one completed occurrence. Idempotent.
    pub fn insert(&mut self, task_id: &str, date: NaiveDate) {
        self.keys.insert(completion_key(task_id, date));
    }

    /// Forget one completed occurrence. Removing an absent key is a no-op.
    pub fn remove(&mut self, task_id: &str, date: NaiveDate) {
        self.keys.remove(&completion_key(task_id, date));
    }

    #[must_use]
    pub fn is_completed(&self, task_id: &str, date: NaiveDate) -> bool {
        self.keys.contains(&completion_key(task_id, date))
    }

    /// Membership test on an already-formatted completion key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
