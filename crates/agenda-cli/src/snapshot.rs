//! JSON snapshot persistence for the in-process store.
//!
//! The CLI keeps its rows in a [`MemoryStore`] serialized next to the
//! project config. Mutating commands load, mutate, and save the whole
//! snapshot; there is no partial write.

use agenda_core::config::ProjectConfig;
use agenda_live::MemoryStore;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Resolve the snapshot path from the project config.
pub fn store_path(root: &Path, config: &ProjectConfig) -> PathBuf {
    root.join(&config.sync.store_path)
}

/// Load the snapshot, starting empty when the file does not exist yet.
pub fn load(path: &Path) -> Result<MemoryStore> {
    if !path.exists() {
        return Ok(MemoryStore::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Save the snapshot, replacing the previous file.
pub fn save(path: &Path, store: &MemoryStore) -> Result<()> {
    let content = serde_json::to_string_pretty(store)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
