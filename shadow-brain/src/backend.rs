//! Chat-completion capability consumed by the orchestrator

use async_trait::async_trait;
use shadow_llm::{ChatRequest, ChatResponse, LLMManager, ProviderTrait, Result};
use std::sync::Arc;

/// Prompt in, reply out. Implementations are shared across sessions.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse>;
}

/// Routes through the manager's default provider
#[async_trait]
impl CompletionBackend for LLMManager {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        LLMManager::complete(self, request, None).await
    }
}

/// Adapter exposing a single provider as a backend
#[derive(Clone)]
pub struct ProviderBackend(Arc<dyn ProviderTrait>);

impl ProviderBackend {
    pub fn new(provider: Arc<dyn ProviderTrait>) -> Self {
        Self(provider)
    }
}

#[async_trait]
impl CompletionBackend for ProviderBackend {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.0.chat(request).await
    }
}
