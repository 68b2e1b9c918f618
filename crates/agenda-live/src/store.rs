//! Storage collaborator seams.
//!
//! The real store lives on the other side of the network; these traits are
//! the contract the core depends on. Store failures propagate unchanged —
//! no retry happens at this layer. [`MemoryStore`] is a faithful in-process
//! implementation (including the completion uniqueness constraint) used by
//! tests and the CLI snapshot.

use agenda_core::{CompletionRecord, ErrorCode, Priority, Task, TaskStatus, Window};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Failures surfaced by a storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The `(task_id, completed_date)` uniqueness constraint fired.
    #[error("completion already exists for task {task_id} on {date}")]
    Conflict { task_id: String, date: NaiveDate },

    /// The referenced row does not exist.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// The backend itself failed; surfaced to the caller unchanged.
    #[error("storage backend failed: {0}")]
    Backend(String),
}

impl StoreError {
    /// Machine-readable code for this failure.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Conflict { .. } => ErrorCode::CompletionConflict,
            Self::NotFound { entity, .. } => {
                if *entity == "completion" {
                    ErrorCode::CompletionNotFound
                } else {
                    ErrorCode::TaskNotFound
                }
            }
            Self::Backend(_) => ErrorCode::StoreFailed,
        }
    }
}

/// Fields for creating a task; the store assigns id and creation time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<FixedOffset>>,
    pub recurrence_rule: Option<String>,
}

/// Partial update for a task. `None` leaves a field untouched; the inner
/// `Option` distinguishes clearing an optional field from skipping it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub priority: Option<Option<Priority>>,
    pub due_date: Option<Option<DateTime<FixedOffset>>>,
    pub recurrence_rule: Option<Option<String>>,
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Patch that marks a task completed.
    #[must_use]
    pub fn completed() -> Self {
        Self {
            status: Some(TaskStatus::Completed),
            ..Self::default()
        }
    }

    fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(rule) = &self.recurrence_rule {
            task.recurrence_rule.clone_from(rule);
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

/// Task-table operations the core needs from the store.
pub trait TaskStore {
    /// Active tasks that have a due date or a recurrence rule, due date
    /// ascending with undated tasks last.
    fn list_scheduled_tasks(&self, owner_id: &str) -> Result<Vec<Task>, StoreError>;

    fn insert_task(&mut self, owner_id: &str, draft: TaskDraft) -> Result<Task, StoreError>;

    fn update_task(&mut self, id: &str, patch: &TaskPatch) -> Result<Task, StoreError>;

    fn delete_task(&mut self, id: &str) -> Result<(), StoreError>;
}

/// Completion-table operations the core needs from the store.
pub trait CompletionStore {
    /// Completions for the owner whose date falls inside the window,
    /// date ascending.
    fn list_completions(
        &self,
        owner_id: &str,
        range: &Window,
    ) -> Result<Vec<CompletionRecord>, StoreError>;

    /// Lookup miss is an absence value, never an error.
    fn get_completion(
        &self,
        task_id: &str,
        date: NaiveDate,
    ) -> Result<Option<CompletionRecord>, StoreError>;

    /// Fails with [`StoreError::Conflict`] when the `(task_id, date)` pair
    /// already has a record.
    fn insert_completion(
        &mut self,
        task_id: &str,
        owner_id: &str,
        date: NaiveDate,
    ) -> Result<CompletionRecord, StoreError>;

    /// Delete by pair; deleting an absent pair is a no-op.
    fn delete_completion(&mut self, task_id: &str, date: NaiveDate) -> Result<(), StoreError>;
}

/// In-process store with the same constraints the backend enforces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    tasks: HashMap<String, Task>,
    completions: Vec<CompletionRecord>,
    #[serde(default)]
    next_id: u64,
    /// Wall clock stamped onto created rows; tests set this explicitly.
    #[serde(default)]
    pub now: Option<DateTime<FixedOffset>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing task row, keeping its id.
    pub fn seed_task(&mut self, task: Task) {
        self.tasks.insert(task.id.clone(), task);
    }

    #[must_use]
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    #[must_use]
    pub fn completion_count(&self) -> usize {
        self.completions.len()
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn now(&self) -> DateTime<FixedOffset> {
        self.now
            .unwrap_or_else(|| chrono::Utc::now().fixed_offset())
    }
}

impl TaskStore for MemoryStore {
    fn list_scheduled_tasks(&self, owner_id: &str) -> Result<Vec<Task>, StoreError> {
        let mut tasks: Vec<Task> = self
            .tasks
            .values()
            .filter(|t| {
                t.owner_id == owner_id
                    && t.status == TaskStatus::Active
                    && (t.due_date.is_some() || t.recurrence_rule.is_some())
            })
            .cloned()
            .collect();
        tasks.sort_by(|a, b| match (a.due_date, b.due_date) {
            (Some(da), Some(db)) => da.cmp(&db),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.id.cmp(&b.id),
        });
        Ok(tasks)
    }

    fn insert_task(&mut self, owner_id: &str, draft: TaskDraft) -> Result<Task, StoreError> {
        let task = Task {
            id: self.next_id("task"),
            owner_id: owner_id.to_string(),
            title: draft.title,
            priority: draft.priority,
            due_date: draft.due_date,
            recurrence_rule: draft.recurrence_rule,
            status: TaskStatus::Active,
            created_at: self.now(),
        };
        self.tasks.insert(task.id.clone(), task.clone());
        Ok(task)
    }

    fn update_task(&mut self, id: &str, patch: &TaskPatch) -> Result<Task, StoreError> {
        let task = self.tasks.get_mut(id).ok_or_else(|| StoreError::NotFound {
            entity: "task",
            id: id.to_string(),
        })?;
        patch.apply_to(task);
        Ok(task.clone())
    }

    fn delete_task(&mut self, id: &str) -> Result<(), StoreError> {
        self.tasks.remove(id).ok_or_else(|| StoreError::NotFound {
            entity: "task",
            id: id.to_string(),
        })?;
        Ok(())
    }
}

impl CompletionStore for MemoryStore {
    fn list_completions(
        &self,
        owner_id: &str,
        range: &Window,
    ) -> Result<Vec<CompletionRecord>, StoreError> {
        let first = range.start.date_naive();
        let last = range.end.date_naive();
        let mut records: Vec<CompletionRecord> = self
            .completions
            .iter()
            .filter(|r| {
                r.owner_id == owner_id && r.completed_date >= first && r.completed_date <= last
            })
            .cloned()
            .collect();
        records.sort_by_key(|r| r.completed_date);
        Ok(records)
    }

    fn get_completion(
        &self,
        task_id: &str,
        date: NaiveDate,
    ) -> Result<Option<CompletionRecord>, StoreError> {
        Ok(self
            .completions
            .iter()
            .find(|r| r.task_id == task_id && r.completed_date == date)
            .cloned())
    }

    fn insert_completion(
        &mut self,
        task_id: &str,
        owner_id: &str,
        date: NaiveDate,
    ) -> Result<CompletionRecord, StoreError> {
        if self
            .completions
            .iter()
            .any(|r| r.task_id == task_id && r.completed_date == date)
        {
            return Err(StoreError::Conflict {
                task_id: task_id.to_string(),
                date,
            });
        }
        let record = CompletionRecord {
            id: self.next_id("completion"),
            task_id: task_id.to_string(),
            owner_id: owner_id.to_string(),
            completed_date: date,
            created_at: self.now(),
        };
        self.completions.push(record.clone());
        Ok(record)
    }

    fn delete_completion(&mut self, task_id: &str, date: NaiveDate) -> Result<(), StoreError> {
        self.completions
            .retain(|r| !(r.task_id == task_id && r.completed_date == date));
        Ok(())
    }
}
