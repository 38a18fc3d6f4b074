use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Editor session behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Period of the autosave re-broadcast (valid range: 250-60000).
    pub autosave_interval_ms: u64,
    /// Language key selected when a session starts.
    pub default_language: String,
    /// Maximum number of toasts kept at once (valid range: 1-64).
    pub notification_capacity: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_interval_ms: 2000,
            default_language: "Javascript".into(),
            notification_capacity: 8,
        }
    }
}

/// Problem catalog source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemsConfig {
    /// TOML file replacing the built-in catalog. `None` uses the built-in list.
    pub catalog_path: Option<PathBuf>,
}
