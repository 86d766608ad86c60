//! Models offered by the playground.

use std::fmt;
use std::str::FromStr;

/// System prompt sent unless the caller overrides or disables it.
pub const DEFAULT_SYSTEM_MESSAGE: &str =
    "You are a helpful assistant for a startup VA. Be concise and accurate.";

/// Model ids offered for direct selection.
pub const KNOWN_MODELS: &[&str] = &[
    "anthropic/claude-3-haiku",
    "anthropic/claude-3.5-sonnet",
    "anthropic/claude-3-opus",
    "openai/gpt-4o-mini",
    "openai/gpt-4o",
    "meta-llama/llama-3-70b-instruct",
];

/// Price/quality tier, each mapped to one model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModelTier {
    #[default]
    Cheap,
    TopTier,
}

impl ModelTier {
    pub const ALL: [ModelTier; 2] = [ModelTier::Cheap, ModelTier::TopTier];

    pub fn model(&self) -> &'static str {
        match self {
            ModelTier::Cheap => "openai/gpt-4o-mini",
            ModelTier::TopTier => "anthropic/claude-3.5-sonnet",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModelTier::Cheap => "Cheap (good enough)",
            ModelTier::TopTier => "Top-tier (expensive)",
        }
    }

    pub fn notes(&self) -> &'static str {
        match self {
            ModelTier::Cheap => "Best for summaries, rewrites, extraction, quick drafts.",
            ModelTier::TopTier => {
                "Best for complex reasoning, high-stakes deliverables, tricky debugging."
            }
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelTier::Cheap => write!(f, "cheap"),
            ModelTier::TopTier => write!(f, "top-tier"),
        }
    }
}

impl FromStr for ModelTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cheap" => Ok(ModelTier::Cheap),
            "top-tier" | "top" | "toptier" => Ok(ModelTier::TopTier),
            other => Err(format!(
                "unknown model tier `{other}` (expected `cheap` or `top-tier`)"
            )),
        }
    }
}
