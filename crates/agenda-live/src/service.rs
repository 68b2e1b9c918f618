//! Thin services over the storage seams.
//!
//! These are the operations the UI calls: task CRUD pass-throughs,
//! per-occurrence completion with conflict recovery, and the calendar
//! fetch-and-expand that produces a window's instance list.

use agenda_core::{
    CompletionIndex, CompletionRecord, Task, TaskInstance, Window, date_key, expand_tasks,
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use tracing::debug;

use crate::store::{CompletionStore, StoreError, TaskDraft, TaskPatch, TaskStore};

/// Create a task owned by `owner_id`.
pub fn create_task<S: TaskStore>(
    store: &mut S,
    owner_id: &str,
    draft: TaskDraft,
) -> Result<Task, StoreError> {
    store.insert_task(owner_id, draft)
}

/// Apply a partial update to a task.
pub fn update_task<S: TaskStore>(
    store: &mut S,
    id: &str,
    patch: &TaskPatch,
) -> Result<Task, StoreError> {
    store.update_task(id, patch)
}

/// Mark a one-off task completed through its lifecycle status.
pub fn complete_task<S: TaskStore>(store: &mut S, id: &str) -> Result<Task, StoreError> {
    store.update_task(id, &TaskPatch::completed())
}

pub fn delete_task<S: TaskStore>(store: &mut S, id: &str) -> Result<(), StoreError> {
    store.delete_task(id)
}

/// Mark one occurrence of a recurring task completed.
///
/// A duplicate insert (another writer completed the same occurrence first)
/// is success: the existing record is fetched and returned instead of the
/// conflict propagating.
pub fn complete_instance<S: CompletionStore>(
    store: &mut S,
    task_id: &str,
    owner_id: &str,
    instance_date: DateTime<FixedOffset>,
) -> Result<CompletionRecord, StoreError> {
    let date = instance_date.date_naive();
    match store.insert_completion(task_id, owner_id, date) {
        Ok(record) => Ok(record),
        Err(conflict @ StoreError::Conflict { .. }) => {
            debug!(task_id, date = %date_key(instance_date), "occurrence already completed; returning existing record");
            match store.get_completion(task_id, date)? {
                Some(existing) => Ok(existing),
                None => Err(conflict),
            }
        }
        Err(err) => Err(err),
    }
}

/// Unmark one occurrence (delete its completion record by pair).
pub fn uncomplete_instance<S: CompletionStore>(
    store: &mut S,
    task_id: &str,
    instance_date: DateTime<FixedOffset>,
) -> Result<(), StoreError> {
    store.delete_completion(task_id, instance_date.date_naive())
}

/// Whether one occurrence has a completion record.
pub fn is_instance_completed<S: CompletionStore>(
    store: &S,
    task_id: &str,
    instance_date: DateTime<FixedOffset>,
) -> Result<bool, StoreError> {
    Ok(store
        .get_completion(task_id, instance_date.date_naive())?
        .is_some())
}

/// Get one completion record; a miss is `Ok(None)`.
pub fn get_completion<S: CompletionStore>(
    store: &S,
    task_id: &str,
    date: NaiveDate,
) -> Result<Option<CompletionRecord>, StoreError> {
    store.get_completion(task_id, date)
}

/// Fetch scheduled tasks and window completions, then expand.
///
/// This is the whole calendar pipeline: store rows in, ordered instance
/// list out. Store failures propagate unchanged.
pub fn instances_in_window<S: TaskStore + CompletionStore>(
    store: &S,
    owner_id: &str,
    window: &Window,
    hide_completed: bool,
) -> Result<Vec<TaskInstance>, StoreError> {
    let tasks = store.list_scheduled_tasks(owner_id)?;
    let completions = store.list_completions(owner_id, window)?;
    let index = CompletionIndex::from_records(&completions);
    Ok(expand_tasks(&tasks, window, &index, hide_completed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use agenda_core::{Priority, TaskStatus};
    use chrono::TimeZone;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).expect("valid offset")
    }

    fn at(d: u32, h: u32) -> DateTime<FixedOffset> {
        utc()
            .with_ymd_and_hms(2024, 3, d, h, 0, 0)
            .single()
            .expect("valid datetime")
    }

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.now = Some(at(1, 0));
        store
    }

    #[test]
    fn duplicate_complete_instance_returns_the_existing_record() {
        let mut store = store();
        let first = complete_instance(&mut store, "t1", "u1", at(5, 9)).expect("first");
        let second = complete_instance(&mut store, "t1", "u1", at(5, 9)).expect("second");
        assert_eq!(first, second);
        assert_eq!(store.completion_count(), 1);
    }

    #[test]
    fn instance_completion_toggles() {
        let mut store = store();
        assert!(!is_instance_completed(&store, "t1", at(5, 9)).expect("check"));

        complete_instance(&mut store, "t1", "u1", at(5, 9)).expect("complete");
        assert!(is_instance_completed(&store, "t1", at(5, 9)).expect("check"));

        uncomplete_instance(&mut store, "t1", at(5, 9)).expect("uncomplete");
        assert!(!is_instance_completed(&store, "t1", at(5, 9)).expect("check"));
    }

    #[test]
    fn complete_task_flips_status_and_hides_it_from_schedules() {
        let mut store = store();
        let task = create_task(
            &mut store,
            "u1",
            TaskDraft {
                title: "one-off".to_string(),
                due_date: Some(at(6, 10)),
                ..TaskDraft::default()
            },
        )
        .expect("create");

        let done = complete_task(&mut store, &task.id).expect("complete");
        assert_eq!(done.status, TaskStatus::Completed);
        assert!(store.list_scheduled_tasks("u1").expect("list").is_empty());
    }

    #[test]
    fn calendar_pipeline_expands_and_hides_completed_occurrences() {
        let mut store = store();
        let habit = create_task(
            &mut store,
            "u1",
            TaskDraft {
                title: "run".to_string(),
                priority: Some(Priority::High),
                due_date: Some(at(4, 7)),
                recurrence_rule: Some("FREQ=DAILY".to_string()),
            },
        )
        .expect("create");
        complete_instance(&mut store, &habit.id, "u1", at(5, 7)).expect("complete");

        let window = Window::week(NaiveDate::from_ymd_opt(2024, 3, 4).expect("valid date"), utc());
        let visible = instances_in_window(&store, "u1", &window, true).expect("expand");
        assert_eq!(visible.len(), 6);
        assert!(visible.iter().all(|i| !i.completed));

        let all = instances_in_window(&store, "u1", &window, false).expect("expand");
        assert_eq!(all.len(), 7);
        assert_eq!(all.iter().filter(|i| i.completed).count(), 1);
    }
}
