use crate::config::*;
use crate::error::{LLMError, Result};
use crate::providers::trait_impl::Provider as ProviderTrait;
use crate::providers::{gigachat::GigaChatProvider, openai::OpenAIProvider};
use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use std::env;

/// Upper bound on messages in one request
pub const MAX_MESSAGES: usize = 100;
/// Upper bound on one message's content, in bytes
pub const MAX_MESSAGE_BYTES: usize = 100_000;
/// Upper bound on the summed content of one request, in bytes
pub const MAX_TOTAL_BYTES: usize = 1_000_000;
const MAX_API_KEY_LEN: usize = 1000;

/// Routes chat completions to the configured vendor providers.
///
/// Built once at startup and shared by reference; it owns the provider
/// clients and therefore their cached credentials.
pub struct LLMManager {
    providers: Arc<RwLock<HashMap<Provider, Arc<dyn ProviderTrait>>>>,
    default_provider: Arc<RwLock<Option<Provider>>>,
    config: Arc<RwLock<LLMConfig>>,
}

impl LLMManager {
    pub fn new(config: LLMConfig) -> Self {
        Self {
            providers: Arc::new(RwLock::new(HashMap::new())),
            default_provider: Arc::new(RwLock::new(config.default_provider)),
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// Create a manager and register every provider whose key is present in
    /// the environment.
    pub fn from_env(config: LLMConfig) -> Self {
        let manager = Self::new(config);
        for provider in Provider::ALL {
            if let Ok(key) = env::var(provider.env_var_name()) {
                manager.set_api_key(provider, key);
            }
        }
        manager
    }

    /// Set API key for a provider
    pub fn set_api_key(&self, provider: Provider, key: String) {
        let key = key.trim().to_string();
        if key.is_empty() {
            tracing::warn!("Empty API key provided for {:?}", provider);
            return;
        }

        if key.len() > MAX_API_KEY_LEN {
            tracing::warn!("API key too long for {:?}", provider);
            return;
        }

        if key.chars().any(|c| c.is_control()) {
            tracing::warn!("API key for {:?} contains control characters", provider);
            return;
        }

        match provider {
            Provider::OpenAI => {
                if !key.starts_with("sk-") {
                    tracing::debug!("API key format may be invalid for {:?}", provider);
                }
            }
            Provider::GigaChat => {
                // Authorization keys are base64 of client_id:client_secret
                if key.len() < 20 {
                    tracing::warn!("GigaChat authorization key seems too short");
                }
            }
        }

        let config = self.config.read().clone();
        let boxed: Arc<dyn ProviderTrait> = match provider {
            Provider::OpenAI => {
                let mut p = OpenAIProvider::with_config(&config);
                p.set_api_key(key);
                Arc::new(p)
            }
            Provider::GigaChat => {
                let mut p = GigaChatProvider::with_config(&config);
                p.set_api_key(key);
                Arc::new(p)
            }
        };

        self.register(provider, boxed);
    }

    /// Register a ready-made provider client under `provider`.
    pub fn register(&self, provider: Provider, client: Arc<dyn ProviderTrait>) {
        self.providers.write().insert(provider, client);
        tracing::info!("Registered LLM provider: {}", provider.as_str());

        let mut default = self.default_provider.write();
        if default.is_none() {
            *default = Some(provider);
        }
    }

    pub fn default_provider(&self) -> Option<Provider> {
        *self.default_provider.read()
    }

    pub fn set_default_provider(&self, provider: Provider) {
        *self.default_provider.write() = Some(provider);
    }

    pub fn configured_providers(&self) -> Vec<Provider> {
        let providers = self.providers.read();
        Provider::ALL
            .into_iter()
            .filter(|p| providers.contains_key(p))
            .collect()
    }

    pub fn config(&self) -> LLMConfig {
        self.config.read().clone()
    }

    /// Get the provider to use (default or specified)
    fn get_provider(&self, provider: Option<Provider>) -> Result<(Provider, Arc<dyn ProviderTrait>)> {
        let provider = provider
            .or_else(|| *self.default_provider.read())
            .ok_or_else(|| LLMError::MissingApiKey("No provider configured".to_string()))?;

        let client = self
            .providers
            .read()
            .get(&provider)
            .map(Arc::clone)
            .ok_or_else(|| LLMError::MissingApiKey(format!("Provider {:?} not configured", provider)))?;

        Ok((provider, client))
    }

    /// Chat completion returning only the reply text
    pub async fn chat(&self, messages: Vec<Message>, provider: Option<Provider>) -> Result<String> {
        let response = self.complete(ChatRequest::new(messages), provider).await?;
        Ok(response.content)
    }

    /// Chat completion; unset request parameters are taken from the config.
    pub async fn complete(
        &self,
        mut request: ChatRequest,
        provider: Option<Provider>,
    ) -> Result<ChatResponse> {
        validate_messages(&request.messages)?;

        let (provider, client) = self.get_provider(provider)?;

        {
            let config = self.config.read();
            if request.model.is_none() {
                request.model = config.default_model.clone();
            }
            if request.temperature.is_none() {
                request.temperature = Some(config.temperature);
            }
            if request.max_tokens.is_none() {
                request.max_tokens = config.max_tokens;
            }
        }

        tracing::debug!(
            "Dispatching chat completion to {} ({} messages)",
            provider.as_str(),
            request.messages.len()
        );

        client.chat(request).await
    }
}

fn validate_messages(messages: &[Message]) -> Result<()> {
    if messages.is_empty() {
        return Err(LLMError::InvalidResponse("Messages cannot be empty".to_string()));
    }

    if messages.len() > MAX_MESSAGES {
        return Err(LLMError::InvalidResponse(format!(
            "Too many messages (max {})",
            MAX_MESSAGES
        )));
    }

    let mut total_size = 0usize;
    for msg in messages {
        if msg.content.len() > MAX_MESSAGE_BYTES {
            return Err(LLMError::InvalidResponse(
                "Individual message too large (max 100KB)".to_string(),
            ));
        }
        total_size = total_size.saturating_add(msg.content.len());
    }

    if total_size > MAX_TOTAL_BYTES {
        return Err(LLMError::InvalidResponse(
            "Total message content too large (max 1MB)".to_string(),
        ));
    }

    Ok(())
}
