#![forbid(unsafe_code)]
//! agenda-core library.
//!
//! Pure domain logic for the agenda task manager: the stored task and
//! completion model, the recurrence rule engine, calendar window
//! arithmetic, the completion index, and the instance expander that turns
//! all of them into an ordered occurrence list for a date window.
//!
//! # Conventions
//!
//! - **Errors**: per-module error enums; `anyhow::Result` at app seams.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod expand;
pub mod index;
pub mod model;
pub mod rule;
pub mod window;

pub use error::ErrorCode;
pub use expand::{expand_tasks, group_by_date};
pub use index::CompletionIndex;
pub use model::completion::{CompletionRecord, completion_key, date_key};
pub use model::instance::TaskInstance;
pub use model::task::{Priority, Task, TaskStatus};
pub use rule::{Frequency, Locale, Rule, RuleParseError, Weekday};
pub use window::Window;
