use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Body of a non-success HTTP response.
///
/// The provider's error payload is kept as JSON when it parses, otherwise
/// the raw text is preserved untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub(crate) fn from_text(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Json(value) => write!(f, "{value}"),
            ResponseBody::Text(text) if text.is_empty() => write!(f, "<empty body>"),
            ResponseBody::Text(text) => write!(f, "{text}"),
        }
    }
}

/// Classified failure of a single completion call.
///
/// Every variant is terminal for the call. Nothing is retried internally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CallFailure {
    /// The API answered with a status outside the 2xx range.
    #[error("HTTP error {status_code}: {body}")]
    Http { status_code: u16, body: ResponseBody },

    /// The request never produced a response (DNS, refused connection, timeout).
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The response was a success but lacked the expected shape.
    #[error("Malformed response: {detail}")]
    MalformedResponse { detail: String },
}

impl CallFailure {
    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        CallFailure::MalformedResponse {
            detail: detail.into(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            CallFailure::Http { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CallFailure {
    fn from(error: reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            format!("request timed out: {error}")
        } else if error.is_connect() {
            format!("connection failed: {error}")
        } else {
            error.to_string()
        };
        CallFailure::Transport { message }
    }
}

/// Errors raised while setting up a client, before any call is made.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{env_var} not set. Add it to the environment or a .env file.")]
    MissingApiKey { env_var: String },

    #[error("Failed to build HTTP client: {message}")]
    HttpClient { message: String },
}
