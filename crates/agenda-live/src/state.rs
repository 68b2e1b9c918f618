//! Observable in-memory mirrors of the stored rows.
//!
//! [`Observable`] is a single-writer container: mutation goes through
//! [`Observable::update`], which replaces the backing `Arc` and then
//! notifies every subscriber synchronously. Readers take `Arc` snapshots,
//! so a snapshot taken before an update stays internally consistent while
//! the writer swaps in the next value.
//!
//! Derived views ([`TaskSet::sorted_active`], [`CompletionSet::index`]) are
//! pure recomputations over the current snapshot — nothing cached that
//! could drift from the source collections.

use std::sync::Arc;

use agenda_core::{CompletionIndex, CompletionRecord, Priority, Task, TaskStatus};
use chrono::NaiveDate;

type Subscriber<T> = Box<dyn Fn(&T)>;

/// Single-writer observable container.
pub struct Observable<T> {
    value: Arc<T>,
    subscribers: Vec<(u64, Subscriber<T>)>,
    next_id: u64,
}

/// Token returned by [`Observable::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(u64);

impl<T> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Arc::new(value),
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Cheap snapshot of the current value.
    #[must_use]
    pub fn get(&self) -> Arc<T> {
        Arc::clone(&self.value)
    }

    /// Apply `mutate` to a copy of the current value, swap it in, and
    /// notify all subscribers with the new value before returning.
    pub fn update(&mut self, mutate: impl FnOnce(&mut T))
    where
        T: Clone,
    {
        let mut next = (*self.value).clone();
        mutate(&mut next);
        self.value = Arc::new(next);
        for (_, subscriber) in &self.subscribers {
            subscriber(&self.value);
        }
    }

    /// Register a read-only subscriber, called synchronously after every
    /// update. It is not called with the current value at registration.
    pub fn subscribe(&mut self, subscriber: impl Fn(&T) + 'static) -> SubscriberId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        SubscriberId(id)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|(sid, _)| *sid != id.0);
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// The in-memory task mirror.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    /// Replace the whole mirror, e.g. after an initial fetch or a rebuild.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Add a task unless its id is already present. The guard makes
    /// duplicate delivery after an optimistic local insert a no-op.
    pub fn insert(&mut self, task: Task) {
        if self.tasks.iter().any(|t| t.id == task.id) {
            return;
        }
        self.tasks.insert(0, task);
    }

    /// Merge the updated row into the existing entry by id. Unknown ids
    /// are ignored.
    pub fn merge(&mut self, task: Task) {
        if let Some(existing) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *existing = task;
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.tasks.retain(|t| t.id != id);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Derived view: active tasks sorted by priority (unset last), then
    /// due date (unset last), then creation time, newest first.
    #[must_use]
    pub fn sorted_active(&self) -> Vec<Task> {
        let mut active: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Active)
            .cloned()
            .collect();
        active.sort_by(|a, b| {
            Priority::rank(a.priority)
                .cmp(&Priority::rank(b.priority))
                .then_with(|| match (a.due_date, b.due_date) {
                    (Some(da), Some(db)) => da.cmp(&db),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        active
    }
}

impl<'a> IntoIterator for &'a TaskSet {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

/// The in-memory completion mirror.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionSet {
    records: Vec<CompletionRecord>,
}

impl CompletionSet {
    pub fn replace_all(&mut self, records: Vec<CompletionRecord>) {
        self.records = records;
    }

    /// Add a record unless its id is already present.
    pub fn insert(&mut self, record: CompletionRecord) {
        if self.records.iter().any(|r| r.id == record.id) {
            return;
        }
        self.records.push(record);
    }

    /// Remove by the `(task_id, completed_date)` pair.
    pub fn remove(&mut self, task_id: &str, date: NaiveDate) {
        self.records
            .retain(|r| !(r.task_id == task_id && r.completed_date == date));
    }

    pub fn remove_by_id(&mut self, id: &str) {
        self.records.retain(|r| r.id != id);
    }

    #[must_use]
    pub fn as_slice(&self) -> &[CompletionRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Derived view: the O(1) lookup index over the current records.
    #[must_use]
    pub fn index(&self) -> CompletionIndex {
        CompletionIndex::from_records(&self.records)
    }
}
