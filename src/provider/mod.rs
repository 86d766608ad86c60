pub(crate) mod constants;
pub(crate) mod openrouter;

pub use constants::openrouter::{API_BASE, API_KEY_ENV_VAR};
pub use openrouter::{CompletionClient, OpenRouterConfig};
