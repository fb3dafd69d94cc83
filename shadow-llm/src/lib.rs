pub mod config;
pub mod error;
pub mod manager;
pub mod providers;

#[cfg(test)]
mod providers_tests;

pub use config::*;
pub use error::*;
pub use manager::{LLMManager, MAX_MESSAGES, MAX_MESSAGE_BYTES, MAX_TOTAL_BYTES};
pub use providers::{GigaChatProvider, OpenAIProvider, ProviderTrait};
