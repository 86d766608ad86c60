pub mod openrouter {
    pub const API_BASE: &str = "https://openrouter.ai/api/v1";
    pub const CHAT_COMPLETIONS_ENDPOINT: &str = "/chat/completions";
    pub const API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";
    pub const DEFAULT_HTTP_REFERER: &str = "http://localhost:8501";
    pub const DEFAULT_X_TITLE: &str = "OpenRouter Playground";
}
