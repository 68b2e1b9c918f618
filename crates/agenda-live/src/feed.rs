//! Change-feed event model.
//!
//! The external feed delivers row-level mutations as loosely-typed
//! payloads; here they are a tagged union over insert/update/delete so the
//! sync layer never inspects an untyped record. Delete events carry only
//! the key the deleting client knows, not the full row.

use std::sync::mpsc;

use agenda_core::{CompletionRecord, Task};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row-level mutation from the change feed.
///
/// `New` is the full row after the mutation; `Key` is what identifies the
/// row in a delete, where the feed only echoes the old key columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "UPPERCASE")]
pub enum Change<New, Key> {
    Insert { new: New },
    Update { new: New },
    Delete { old: Key },
}

/// Key columns echoed for a deleted task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskKey {
    pub id: String,
}

/// Key columns echoed for a deleted completion.
///
/// Deletion is keyed by `(task_id, completed_date)` rather than the
/// record's generated id: the deleting client may never have seen the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionKey {
    pub task_id: String,
    pub completed_date: NaiveDate,
}

pub type TaskChange = Change<Task, TaskKey>;
pub type CompletionChange = Change<CompletionRecord, CompletionKey>;

/// The owner-scoped receiver pair handed out by a feed subscription.
///
/// Dropping the channels is the teardown: the feed side observes the
/// disconnect and stops delivering.
#[derive(Debug)]
pub struct FeedChannels {
    pub tasks: mpsc::Receiver<TaskChange>,
    pub completions: mpsc::Receiver<CompletionChange>,
}
