use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Project configuration, loaded from `agenda.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Display locale for recurrence phrases: "es" or "en".
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Drop completed instances from expanded views.
    #[serde(default = "default_true")]
    pub hide_completed: bool,
    /// IANA timezone name used to interpret extracted date-times.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            hide_completed: default_true(),
            timezone: default_timezone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Path of the JSON snapshot the CLI reads and writes.
    #[serde(default = "default_store_path")]
    pub store_path: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_locale() -> String {
    "es".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_store_path() -> String {
    "agenda.json".to_string()
}

/// Load `agenda.toml` from `root`, falling back to defaults when absent.
pub fn load_project_config(root: &Path) -> Result<ProjectConfig> {
    let path = root.join("agenda.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

impl DisplayConfig {
    /// Resolve the configured locale, defaulting unknown values to Spanish.
    #[must_use]
    pub fn resolved_locale(&self) -> crate::rule::Locale {
        match self.locale.trim().to_ascii_lowercase().as_str() {
            "en" => crate::rule::Locale::En,
            _ => crate::rule::Locale::Es,
        }
    }
}
