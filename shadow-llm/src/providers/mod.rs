pub mod trait_impl;
pub mod wire;
pub mod openai;
pub mod gigachat;

pub use trait_impl::Provider as ProviderTrait;
pub use crate::config::Provider;
pub use openai::OpenAIProvider;
pub use gigachat::GigaChatProvider;

use crate::error::{LLMError, Result};

/// Only HTTPS endpoints are accepted, plus plain HTTP on loopback for local
/// gateways.
pub fn validate_base_url(url: &str) -> Result<()> {
    if url.len() > 2048 {
        return Err(LLMError::Config("Base URL too long".to_string()));
    }
    if url.starts_with("https://")
        || url.starts_with("http://127.0.0.1")
        || url.starts_with("http://localhost")
    {
        return Ok(());
    }
    Err(LLMError::Config(format!("Invalid base URL: {}", url)))
}
