//! Coderoom configuration system.
//!
//! TOML-based configuration with full validation. Every section uses serde
//! defaults so partial configs work out of the box; the channel URL can be
//! overridden from the environment.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use coderoom_config::load_config;
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config.channel.url);
//! ```

pub mod env;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use env::{apply_overrides_from, BACKEND_URL_ENV};
pub use schema::{
    ChannelConfig, CoderoomConfig, EditorConfig, ExecutionConfig, LogLevel, LoggingConfig,
    ProblemsConfig, CONFIG_SCHEMA_VERSION,
};

use std::path::Path;

use coderoom_common::ConfigError;

/// Load config from `path` when given, otherwise from the platform default
/// location (creating a commented default file if none exists), then apply
/// environment overrides.
///
/// The file is validated on load and each override is validated before it
/// is applied, so neither step can discard the other's values.
pub fn load_config(path: Option<&Path>) -> Result<CoderoomConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<CoderoomConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };

    env::apply_overrides_from(&mut config, lookup);
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &CoderoomConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
