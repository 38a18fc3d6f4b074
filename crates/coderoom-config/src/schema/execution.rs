use serde::{Deserialize, Serialize};

/// Hosted code-execution service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Base URL; requests go to `{base_url}/execute`.
    pub base_url: String,
    pub connect_timeout_secs: u64,
    /// Whole-request timeout, including the remote run.
    pub request_timeout_secs: u64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://emkc.org/api/v2/piston".into(),
            connect_timeout_secs: 10,
            request_timeout_secs: 60,
        }
    }
}
