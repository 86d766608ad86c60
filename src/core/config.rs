use crate::provider::constants::openrouter;

use super::error::ConfigError;

/// Value shipped in `.env` templates; treated the same as an unset key.
const PLACEHOLDER_API_KEY: &str = "your-key-here";

/// Where the OpenRouter API key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKey {
    /// Read `OPENROUTER_API_KEY` from the process environment.
    Default,
    /// Use the given key.
    Custom(String),
}

impl ApiKey {
    pub fn resolve(&self) -> Result<String, ConfigError> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve the key, reading environment variables through `lookup`.
    pub fn resolve_with<F>(&self, lookup: F) -> Result<String, ConfigError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let raw = match self {
            ApiKey::Default => lookup(openrouter::API_KEY_ENV_VAR),
            ApiKey::Custom(key) => Some(key.clone()),
        };

        raw.map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && key != PLACEHOLDER_API_KEY)
            .ok_or_else(|| ConfigError::MissingApiKey {
                env_var: openrouter::API_KEY_ENV_VAR.to_string(),
            })
    }
}
