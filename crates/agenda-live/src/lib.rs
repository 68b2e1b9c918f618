#![forbid(unsafe_code)]
//! agenda-live library.
//!
//! Everything that keeps a client session's view of the task data alive:
//! the storage collaborator seams, the change-feed event model, observable
//! in-memory mirrors of the stored rows, the sync manager that applies feed
//! events to them, and the thin services the UI calls.
//!
//! The mirrors are a cache, not a source of truth: they are fully
//! rebuildable from the store at any time.
//!
//! # Conventions
//!
//! - **Errors**: per-module error enums; store errors propagate unchanged.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod feed;
pub mod manager;
pub mod service;
pub mod state;
pub mod store;

pub use feed::{Change, CompletionChange, CompletionKey, FeedChannels, TaskChange, TaskKey};
pub use manager::{ChangeFeed, SubscriptionError, SyncManager};
pub use state::{CompletionSet, Observable, TaskSet};
pub use store::{CompletionStore, MemoryStore, StoreError, TaskDraft, TaskPatch, TaskStore};
