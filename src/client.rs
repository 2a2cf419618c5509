use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::{GatewayError, GatewayResult};

/// Default per-call timeout applied when the deployment does not override it.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Generic transport primitive shared by all adapters.
///
/// Every backend call is one HTTP POST with a JSON body and a bounded
/// timeout. Failures surface as distinguishable [`GatewayError`] variants;
/// there is no retry here, resilience belongs to the caller. The inner
/// `reqwest::Client` may pool connections, which is invisible to callers.
pub struct BackendClient {
    base_url: String,
    timeout: Duration,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn join_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let p = path.trim_start_matches('/');
        format!("{}/{}", base, p)
    }

    /// Issues one POST round-trip and returns the parsed JSON body.
    pub async fn call(&self, path: &str, payload: &Value) -> GatewayResult<Value> {
        let url = self.join_url(path);
        let resp = self
            .http
            .post(&url)
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GatewayError::BackendHttp {
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| self.classify_transport_error(e))?;
        let parsed = serde_json::from_slice::<Value>(&body)?;
        debug!(path, status = status.as_u16(), "backend call completed");
        Ok(parsed)
    }

    fn classify_transport_error(&self, e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::BackendTimeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            GatewayError::BackendUnreachable {
                message: e.to_string(),
            }
        }
    }
}
