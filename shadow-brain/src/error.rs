//! Error types for shadow-brain

use thiserror::Error;

/// Errors surfaced to callers of the brain and session layers.
///
/// Completion backend failures never appear here: the orchestrator absorbs
/// them into a spoken fallback reply.
#[derive(Error, Debug)]
pub enum BrainError {
    #[error("Input cannot be empty")]
    EmptyInput,

    #[error("Input too large ({0} chars, max {1})")]
    InputTooLarge(usize, usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("LLM error: {0}")]
    Llm(#[from] shadow_llm::LLMError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, BrainError>;
