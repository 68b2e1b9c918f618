use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::model::completion::date_key;
use crate::model::task::Priority;

/// One concrete calendar appearance of a task within a window.
///
/// Derived, never persisted: rebuilt from scratch on every expansion call.
/// The id is the parent task id for a one-off task, or
/// `{taskId}_{YYYY-MM-DD}` for a recurring occurrence, which makes
/// recurring instance ids valid completion keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInstance {
    pub id: String,
    pub parent_task_id: String,
    pub title: String,
    pub priority: Option<Priority>,
    pub instance_date: DateTime<FixedOffset>,
    pub recurring: bool,
    pub recurrence_rule: Option<String>,
    pub completed: bool,
}

impl TaskInstance {
    /// Id for a recurring occurrence on a concrete date.
    #[must_use]
    pub fn occurrence_id(task_id: &str, date: DateTime<FixedOffset>) -> String {
        format!("{}_{}", task_id, date_key(date))
    }

    /// Display ordering: ascending instance date-time, ties broken by
    /// priority rank with unset priority after all three levels.
    #[must_use]
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        self.instance_date
            .cmp(&other.instance_date)
            .then_with(|| Priority::rank(self.priority).cmp(&Priority::rank(other.priority)))
    }
}
