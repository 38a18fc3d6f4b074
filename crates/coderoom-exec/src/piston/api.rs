//! Executor trait implementation for PistonClient, plus runtime listing.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{ExecError, ExecuteRequest, ExecuteResponse, Executor, Runtime};

use super::client::{parse_execute_body, status_error, PistonClient};

#[async_trait]
impl Executor for PistonClient {
    async fn execute(&self, request: ExecuteRequest) -> Result<ExecuteResponse, ExecError> {
        debug!(
            language = %request.language,
            files = request.files.len(),
            "Piston execute request"
        );

        let response = self
            .http
            .post(self.config.execute_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| ExecError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExecError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            warn!(status = %status, "Piston execute failed");
            return Err(status_error(status, &body));
        }

        let parsed = parse_execute_body(&body)?;
        debug!(
            language = %request.language,
            is_error = parsed.is_error(),
            "Piston execute finished"
        );
        Ok(parsed)
    }
}

impl PistonClient {
    /// List the runtimes installed on the service.
    pub async fn runtimes(&self) -> Result<Vec<Runtime>, ExecError> {
        let response = self
            .http
            .get(self.config.runtimes_url())
            .send()
            .await
            .map_err(|e| ExecError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        response
            .json::<Vec<Runtime>>()
            .await
            .map_err(|e| ExecError::ParseError(e.to_string()))
    }
}
