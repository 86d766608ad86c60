//! # openrouter-playground
//!
//! Send a prompt to a model behind the OpenRouter chat-completions API and
//! get back the generated text, token usage and timing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use openrouter_playground::{ApiKey, CompletionClient, GenerationRequest, OpenRouterConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_key = ApiKey::Default.resolve()?;
//!     let client = CompletionClient::new(OpenRouterConfig::new(api_key))?;
//!
//!     let request = GenerationRequest::new("openai/gpt-4o-mini", "Summarize the Rust book in one line.")
//!         .with_temperature(0.2)
//!         .with_max_tokens(800);
//!
//!     let result = client.complete(&request).await?;
//!     println!("{} ({:.2}s)", result.text, result.elapsed_seconds());
//!     Ok(())
//! }
//! ```
//!
//! Every failure of a call is a [`CallFailure`]: an HTTP error status, a
//! transport fault, or a success response without the expected shape.

pub mod core;
pub mod models;
pub mod provider;

pub use crate::core::{
    ApiKey, CallFailure, ChatRole, ConfigError, GenerationRequest, GenerationResult,
    HttpClientConfig, Message, ResponseBody, Usage,
};
pub use models::{DEFAULT_SYSTEM_MESSAGE, KNOWN_MODELS, ModelTier};
pub use provider::{CompletionClient, OpenRouterConfig};
