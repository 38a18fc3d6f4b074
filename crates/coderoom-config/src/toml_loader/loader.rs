//! Reading a config file into the schema.

use std::io::ErrorKind;
use std::path::Path;

use coderoom_common::ConfigError;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};
use crate::schema::CoderoomConfig;
use crate::validation;

/// Load config from a TOML file. Missing keys take their defaults.
///
/// A file that parses but fails validation is replaced by the defaults
/// wholesale, with a warning.
pub fn load_from_path(path: &Path) -> Result<CoderoomConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "failed to read {}: {e}",
                path.display()
            )));
        }
    };

    let config: CoderoomConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

    match validation::validate(&config) {
        Ok(()) => {
            info!(path = %path.display(), "Loaded config");
            Ok(config)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Invalid config, using defaults");
            Ok(CoderoomConfig::default())
        }
    }
}

/// Load from the platform default path, writing a commented default file
/// there first if none exists.
pub fn load_default() -> Result<CoderoomConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(&path)?;
            Ok(CoderoomConfig::default())
        }
        other => other,
    }
}
