use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// A stored per-occurrence completion row.
///
/// The store enforces at most one record per `(task_id, completed_date)`
/// pair; a violating insert means the occurrence is already completed and
/// is recovered by returning the existing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// Opaque id assigned by the store.
    pub id: String,
    pub task_id: String,
    pub owner_id: String,
    /// Calendar date of the completed occurrence, no time component.
    pub completed_date: NaiveDate,
    pub created_at: DateTime<FixedOffset>,
}

impl CompletionRecord {
    /// The `{taskId}_{YYYY-MM-DD}` key this record contributes to the
    /// completion index.
    #[must_use]
    pub fn key(&self) -> String {
        completion_key(&self.task_id, self.completed_date)
    }
}

/// Format a date-time's calendar day as `YYYY-MM-DD`.
///
/// Uses the calendar day in the date-time's own offset, never the
/// UTC-shifted day, so a 23:00-05:00 occurrence keys on its local date.
#[must_use]
pub fn date_key(dt: DateTime<FixedOffset>) -> String {
    dt.date_naive().format("%Y-%m-%d").to_string()
}

/// Build the completion key `{taskId}_{YYYY-MM-DD}` for a calendar date.
///
/// This must stay in lockstep with the instance id format produced by the
/// expander; the expander's recurring-instance ids are completion keys.
#[must_use]
pub fn completion_key(task_id: &str, date: NaiveDate) -> String {
    format!("{}_{}", task_id, date.format("%Y-%m-%d"))
}
