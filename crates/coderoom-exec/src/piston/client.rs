//! Piston client struct and response parsing.

use crate::{ExecError, ExecuteResponse};

use super::config::PistonConfig;

/// Piston API client.
pub struct PistonClient {
    pub(crate) config: PistonConfig,
    pub(crate) http: reqwest::Client,
}

impl PistonClient {
    pub fn new(config: PistonConfig) -> Result<Self, ExecError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ExecError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &PistonConfig {
        &self.config
    }
}

/// Map a non-success HTTP status and body to an `ExecError`.
pub(crate) fn status_error(status: reqwest::StatusCode, body: &str) -> ExecError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return ExecError::RateLimited;
    }
    // Piston reports bad requests as {"message": "..."}.
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.chars().take(200).collect());
    ExecError::ApiError(format!("HTTP {status}: {message}"))
}

/// Parse the body of a successful `/execute` call.
///
/// The `run` stage must be present; a body without it is malformed even if
/// it is valid JSON.
pub(crate) fn parse_execute_body(body: &str) -> Result<ExecuteResponse, ExecError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ExecError::ParseError(e.to_string()))?;

    if !json.get("run").is_some_and(|r| r.is_object()) {
        if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
            return Err(ExecError::ApiError(message.to_string()));
        }
        return Err(ExecError::ParseError("response has no run stage".into()));
    }

    serde_json::from_value(json).map_err(|e| ExecError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_successful_run() {
        let resp = parse_execute_body(
            r#"{"language":"python","version":"3.10.0","run":{"stdout":"hi\n","stderr":"","output":"hi\n","code":0}}"#,
        )
        .unwrap();
        assert_eq!(resp.run.output, "hi\n");
        assert!(!resp.is_error());
    }

    #[test]
    fn parse_runtime_error_is_not_a_failure() {
        let resp = parse_execute_body(
            r#"{"run":{"output":"Traceback...","stderr":"Traceback..."}}"#,
        )
        .unwrap();
        assert!(resp.is_error());
    }

    #[test]
    fn parse_rejects_missing_run_stage() {
        let err = parse_execute_body(r#"{"language":"python"}"#).unwrap_err();
        assert!(matches!(err, ExecError::ParseError(_)));
    }

    #[test]
    fn parse_surfaces_service_message() {
        let err = parse_execute_body(r#"{"message":"cobol-* runtime is unknown"}"#).unwrap_err();
        assert_eq!(err.to_string(), "API error: cobol-* runtime is unknown");
    }

    #[test]
    fn parse_rejects_non_json() {
        let err = parse_execute_body("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, ExecError::ParseError(_)));
    }

    #[test]
    fn status_error_rate_limited() {
        let err = status_error(reqwest::StatusCode::TOO_MANY_REQUESTS, "");
        assert!(matches!(err, ExecError::RateLimited));
    }

    #[test]
    fn status_error_uses_message_field() {
        let err = status_error(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"message":"Unknown language"}"#,
        );
        assert_eq!(err.to_string(), "API error: HTTP 400 Bad Request: Unknown language");
    }

    #[test]
    fn status_error_truncates_raw_body() {
        let body = "x".repeat(500);
        let err = status_error(reqwest::StatusCode::BAD_GATEWAY, &body);
        let ExecError::ApiError(message) = err else {
            panic!("expected ApiError");
        };
        assert!(message.len() < 250);
    }
}
