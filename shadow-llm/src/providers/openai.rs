use async_trait::async_trait;
use crate::config::*;
use crate::error::{LLMError, Result};
use crate::providers::trait_impl::Provider as ProviderTrait;
use crate::providers::validate_base_url;
use crate::providers::wire::{post_completion, CompletionBody};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use parking_lot::RwLock;

pub struct OpenAIProvider {
    api_key: Arc<RwLock<Option<String>>>,
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl OpenAIProvider {
    pub fn new() -> Self {
        Self::with_config(&LLMConfig::default())
    }

    pub fn with_config(config: &LLMConfig) -> Self {
        Self {
            api_key: Arc::new(RwLock::new(None)),
            client: Client::new(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    pub fn with_api_key(api_key: String) -> Self {
        let mut provider = Self::new();
        provider.set_api_key(api_key);
        provider
    }

    fn get_api_key(&self) -> Result<String> {
        self.api_key
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| LLMError::MissingApiKey("OpenAI".to_string()))
    }
}

impl Default for OpenAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderTrait for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn has_api_key(&self) -> bool {
        self.api_key.read().is_some()
    }

    fn set_api_key(&mut self, key: String) {
        *self.api_key.write() = Some(key);
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let api_key = self.get_api_key()?;
        validate_base_url(&self.base_url)?;

        let body = CompletionBody::from_request(&request, Provider::OpenAI.default_model());

        // Never log the full key
        let api_key_prefix = if api_key.len() > 8 { api_key.get(..8).unwrap_or("***") } else { "***" };
        tracing::debug!(
            "Making request to OpenAI with key {}... (model={}, messages={})",
            api_key_prefix,
            body.model,
            body.messages.len()
        );

        let url = format!("{}/chat/completions", self.base_url);
        post_completion(&self.client, &url, &api_key, &body, self.timeout).await
    }

    fn available_models(&self) -> Vec<String> {
        vec![
            "gpt-4o".to_string(),
            "gpt-4o-mini".to_string(),
            "gpt-4-turbo".to_string(),
            "gpt-3.5-turbo".to_string(),
        ]
    }
}
