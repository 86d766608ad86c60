//! Single-shot JSON transport shared by the completion client.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::{CallFailure, ConfigError, ResponseBody};

/// Configuration for the underlying HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Total time allowed for one request, connect through body read.
    pub timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
        }
    }
}

pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: HttpClientConfig, user_agent: Option<&str>) -> Result<Self, ConfigError> {
        let default_ua = format!("openrouter-playground/{}", env!("CARGO_PKG_VERSION"));
        let ua = user_agent.unwrap_or(&default_ua);

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(ua)
            .build()
            .map_err(|e| ConfigError::HttpClient {
                message: e.to_string(),
            })?;

        Ok(Self { client })
    }

    /// POST `body` as JSON and return the parsed JSON response.
    ///
    /// Exactly one request is sent. Non-2xx statuses come back as
    /// [`CallFailure::Http`], network faults as [`CallFailure::Transport`] and
    /// a 2xx body that is not JSON as [`CallFailure::MalformedResponse`].
    #[tracing::instrument(
        name = "http_post_json",
        skip(self, headers, body),
        fields(url = %url),
        err
    )]
    pub async fn post_json<Req>(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Req,
    ) -> Result<Value, CallFailure>
    where
        Req: Serialize,
    {
        let mut req_builder = self.client.post(url).json(body);
        for (name, value) in headers {
            req_builder = req_builder.header(name, value);
        }

        let res = req_builder.send().await.inspect_err(|e| {
            warn!(error = %e, "HTTP request failed");
        })?;

        let status = res.status();
        let response_text = res.text().await?;

        if !status.is_success() {
            warn!(status = %status, "API returned error status");
            return Err(CallFailure::Http {
                status_code: status.as_u16(),
                body: ResponseBody::from_text(response_text),
            });
        }

        debug!(status = %status, bytes = response_text.len(), "HTTP request successful");

        serde_json::from_str(&response_text).map_err(|e| {
            CallFailure::malformed(format!("response body is not valid JSON: {e}"))
        })
    }
}
