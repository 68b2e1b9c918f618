//! Stored and derived data model.
//!
//! [`task`] and [`completion`] mirror rows owned by the external store;
//! [`instance`] is the derived occurrence type produced by expansion and
//! never persisted.

pub mod completion;
pub mod instance;
pub mod task;
