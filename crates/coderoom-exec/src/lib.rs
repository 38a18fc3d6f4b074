//! Remote code execution for Coderoom.
//!
//! Wraps a hosted multi-language execution service behind the [`Executor`]
//! trait. A request that reaches the service and comes back with a populated
//! `stderr` is a successful call; only transport, HTTP and decoding problems
//! surface as [`ExecError`].

pub mod piston;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use piston::{PistonClient, PistonConfig};

/// Version selector meaning "latest available".
pub const ANY_VERSION: &str = "*";

#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, request: ExecuteRequest) -> Result<ExecuteResponse, ExecError>;
}

/// One source file submitted for execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

/// Body of `POST /execute`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub language: String,
    pub version: String,
    pub files: Vec<SourceFile>,
}

impl ExecuteRequest {
    /// Single-file request against the latest version of `language`.
    ///
    /// The entry file is `main.cpp` for C++ (the service picks the compiler
    /// from the extension) and `main` for everything else.
    pub fn single_file(language: impl Into<String>, content: impl Into<String>) -> Self {
        let language = language.into();
        let name = entry_filename(&language).to_string();
        Self {
            language,
            version: ANY_VERSION.to_string(),
            files: vec![SourceFile {
                name,
                content: content.into(),
            }],
        }
    }
}

/// Entry filename for an execution-service language id.
pub fn entry_filename(language: &str) -> &'static str {
    if language == "cpp" {
        "main.cpp"
    } else {
        "main"
    }
}

/// Run stage of an execution response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunResult {
    /// Combined stdout and stderr, in emission order.
    pub output: String,
    pub stderr: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecuteResponse {
    pub run: RunResult,
}

impl ExecuteResponse {
    /// Text to show the user: the combined output, or stderr when the
    /// service returned no combined output.
    pub fn display_output(&self) -> &str {
        if self.run.output.is_empty() {
            &self.run.stderr
        } else {
            &self.run.output
        }
    }

    /// `true` when the program wrote to stderr (compile or runtime error).
    pub fn is_error(&self) -> bool {
        !self.run.stderr.is_empty()
    }
}

/// A language/version pair the service can run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runtime {
    pub language: String,
    pub version: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
}
