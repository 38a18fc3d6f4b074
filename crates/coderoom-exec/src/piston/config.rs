//! Piston client configuration.

use std::time::Duration;

use coderoom_config::ExecutionConfig;

/// Piston API client configuration.
#[derive(Debug, Clone)]
pub struct PistonConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for PistonConfig {
    fn default() -> Self {
        Self::from(&ExecutionConfig::default())
    }
}

impl From<&ExecutionConfig> for PistonConfig {
    fn from(config: &ExecutionConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

impl PistonConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn execute_url(&self) -> String {
        format!("{}/execute", self.base_url)
    }

    pub(crate) fn runtimes_url(&self) -> String {
        format!("{}/runtimes", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_joined_without_double_slash() {
        let config = PistonConfig::new("https://emkc.org/api/v2/piston/");
        assert_eq!(config.execute_url(), "https://emkc.org/api/v2/piston/execute");
        assert_eq!(config.runtimes_url(), "https://emkc.org/api/v2/piston/runtimes");
    }

    #[test]
    fn from_execution_config_copies_timeouts() {
        let exec = ExecutionConfig {
            base_url: "http://localhost:2000/api/v2".into(),
            connect_timeout_secs: 3,
            request_timeout_secs: 42,
        };
        let config = PistonConfig::from(&exec);
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.request_timeout, Duration::from_secs(42));
        assert_eq!(config.base_url, "http://localhost:2000/api/v2");
    }
}
