//! Live synchronization: applies change-feed events to the observable
//! mirrors.
//!
//! One [`SyncManager`] per client session. Subscribing opens the two
//! owner-scoped streams (tasks, completions); each delivered event is
//! applied fully before the next is read, so handlers never overlap for
//! the same subscription. A dropped feed surfaces as
//! [`SubscriptionError`]: the mirrors keep their last state but are stale
//! until the caller re-subscribes — there is no auto-retry here.

use std::sync::mpsc::TryRecvError;

use agenda_core::{ErrorCode, TaskStatus};
use tracing::{debug, warn};

use crate::feed::{Change, CompletionChange, FeedChannels, TaskChange};
use crate::state::{CompletionSet, Observable, TaskSet};

/// Change-feed delivery failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubscriptionError {
    /// Opening the owner-scoped streams failed.
    #[error("subscribing to change feed failed: {0}")]
    SubscribeFailed(String),

    /// A stream disconnected mid-delivery; local state is stale until
    /// re-subscription.
    #[error("change feed interrupted: {0}")]
    Interrupted(&'static str),
}

impl SubscriptionError {
    /// Machine-readable code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::SubscriptionInterrupted
    }
}

/// Source of owner-scoped change streams.
///
/// The production implementation wraps the backend's realtime channel API;
/// tests drive an in-process channel pair.
pub trait ChangeFeed {
    fn open(&mut self, owner_id: &str) -> Result<FeedChannels, SubscriptionError>;
}

/// Applies feed events to the in-memory mirrors.
#[derive(Debug)]
pub struct SyncManager {
    owner_id: String,
    pub tasks: Observable<TaskSet>,
    pub completions: Observable<CompletionSet>,
    channels: Option<FeedChannels>,
}

impl SyncManager {
    #[must_use]
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            tasks: Observable::default(),
            completions: Observable::default(),
            channels: None,
        }
    }

    #[must_use]
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    #[must_use]
    pub const fn is_subscribed(&self) -> bool {
        self.channels.is_some()
    }

    /// Open the two owner-scoped streams. An already-active subscription
    /// is torn down first so no duplicate listener survives.
    pub fn subscribe(&mut self, feed: &mut dyn ChangeFeed) -> Result<(), SubscriptionError> {
        if self.channels.take().is_some() {
            debug!(owner = %self.owner_id, "tearing down previous feed subscription");
        }
        self.channels = Some(feed.open(&self.owner_id)?);
        Ok(())
    }

    /// Tear down the active subscription, if any.
    pub fn unsubscribe(&mut self) {
        self.channels = None;
    }

    /// Drain all pending events from both streams, applying each one
    /// synchronously. Returns the number of events applied.
    ///
    /// A disconnected stream drops the subscription and surfaces
    /// [`SubscriptionError::Interrupted`]; events already applied stay
    /// applied.
    pub fn pump(&mut self) -> Result<usize, SubscriptionError> {
        let mut applied = 0;
        loop {
            let Some(channels) = &self.channels else {
                return Ok(applied);
            };
            match channels.tasks.try_recv() {
                Ok(change) => {
                    self.apply_task_change(change);
                    applied += 1;
                    continue;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.channels = None;
                    return Err(SubscriptionError::Interrupted("tasks"));
                }
            }
            match channels.completions.try_recv() {
                Ok(change) => {
                    self.apply_completion_change(change);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => return Ok(applied),
                Err(TryRecvError::Disconnected) => {
                    self.channels = None;
                    return Err(SubscriptionError::Interrupted("completions"));
                }
            }
        }
    }

    /// Apply one task mutation to the task mirror.
    pub fn apply_task_change(&mut self, change: TaskChange) {
        match change {
            Change::Insert { new } => {
                self.tasks.update(move |set| set.insert(new));
            }
            Change::Update { new } => {
                if new.status == TaskStatus::Completed {
                    // Completed one-off tasks disappear from active views.
                    self.tasks.update(|set| set.remove(&new.id));
                } else {
                    self.tasks.update(move |set| set.merge(new));
                }
            }
            Change::Delete { old } => {
                self.tasks.update(|set| set.remove(&old.id));
            }
        }
    }

    /// Apply one completion mutation to the completion mirror.
    ///
    /// Completion rows are immutable once created; an UPDATE from the feed
    /// is unexpected and ignored.
    pub fn apply_completion_change(&mut self, change: CompletionChange) {
        match change {
            Change::Insert { new } => {
                self.completions.update(move |set| set.insert(new));
            }
            Change::Update { new } => {
                warn!(record = %new.id, "ignoring UPDATE for immutable completion record");
            }
            Change::Delete { old } => {
                self.completions
                    .update(|set| set.remove(&old.task_id, old.completed_date));
            }
        }
    }
}
