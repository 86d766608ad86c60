//! OpenRouter chat-completions client.
//!
//! One call to [`CompletionClient::complete`] sends exactly one
//! `POST /chat/completions` request and turns the answer into either a
//! [`GenerationResult`] or a classified [`CallFailure`].

use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::core::{
    CallFailure, ConfigError, GenerationRequest, GenerationResult, HttpClient, HttpClientConfig,
    Message, Usage,
};
use crate::provider::constants::openrouter;

/// Connection settings for the OpenRouter API.
///
/// Built once at startup and handed to [`CompletionClient::new`]; the key is
/// never re-read afterwards.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: String,
    pub base_url: String,
    pub http_referer: Option<String>,
    pub x_title: Option<String>,
    pub http_config: HttpClientConfig,
}

impl OpenRouterConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: openrouter::API_BASE.to_string(),
            http_referer: Some(openrouter::DEFAULT_HTTP_REFERER.to_string()),
            x_title: Some(openrouter::DEFAULT_X_TITLE.to_string()),
            http_config: HttpClientConfig::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    pub fn with_http_referer(mut self, http_referer: impl Into<String>) -> Self {
        self.http_referer = Some(http_referer.into());
        self
    }

    pub fn with_x_title(mut self, x_title: impl Into<String>) -> Self {
        self.x_title = Some(x_title.into());
        self
    }

    fn url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            openrouter::CHAT_COMPLETIONS_ENDPOINT
        )
    }

    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![(
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key),
        )];

        if let Some(referer) = &self.http_referer {
            headers.push(("HTTP-Referer".to_string(), referer.clone()));
        }

        if let Some(title) = &self.x_title {
            headers.push(("X-Title".to_string(), title.clone()));
        }

        headers
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl<'a> From<&'a GenerationRequest> for ChatCompletionRequest<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        Self {
            model: &request.model,
            messages: request.messages(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Option<Vec<Choice>>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct CompletionClient {
    config: OpenRouterConfig,
    http: HttpClient,
}

impl CompletionClient {
    pub fn new(config: OpenRouterConfig) -> Result<Self, ConfigError> {
        let http = HttpClient::new(config.http_config.clone(), None)?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }

    /// Send one chat-completion request and normalize the answer.
    #[tracing::instrument(
        name = "chat_completion",
        skip(self, request),
        fields(model = %request.model, max_tokens = request.max_tokens),
        err
    )]
    pub async fn complete(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, CallFailure> {
        let body = ChatCompletionRequest::from(request);

        let started = Instant::now();
        let raw_payload = self
            .http
            .post_json(&self.config.url(), &self.config.headers(), &body)
            .await?;
        let elapsed = started.elapsed();

        let (text, usage) = extract_completion(&raw_payload)?;
        debug!(
            elapsed_ms = elapsed.as_millis() as u64,
            total_tokens = ?usage.total_tokens,
            "completion received"
        );

        Ok(GenerationResult {
            text,
            usage,
            elapsed,
            raw_payload,
        })
    }
}

/// Pull `choices[0].message.content` and `usage` out of a success payload.
fn extract_completion(payload: &Value) -> Result<(String, Usage), CallFailure> {
    let response: ChatCompletionResponse = serde_json::from_value(payload.clone())
        .map_err(|e| CallFailure::malformed(format!("unexpected response shape: {e}")))?;

    let Some(choices) = response.choices else {
        // OpenRouter occasionally reports upstream failures in a 200 body.
        return Err(match payload.get("error") {
            Some(error) => CallFailure::malformed(format!("response has no choices: {error}")),
            None => CallFailure::malformed("response has no `choices` field"),
        });
    };

    let first = choices
        .into_iter()
        .next()
        .ok_or_else(|| CallFailure::malformed("`choices` is empty"))?;

    let text = first
        .message
        .and_then(|message| message.content)
        .ok_or_else(|| CallFailure::malformed("`choices[0].message.content` is missing"))?;

    Ok((text, response.usage.unwrap_or_default()))
}
