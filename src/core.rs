pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use config::ApiKey;
pub use error::{CallFailure, ConfigError, ResponseBody};
pub use http::{HttpClient, HttpClientConfig};
pub use types::{ChatRole, GenerationRequest, GenerationResult, Message, Usage};
