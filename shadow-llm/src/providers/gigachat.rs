use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::config::*;
use crate::error::{LLMError, Result};
use crate::providers::trait_impl::Provider as ProviderTrait;
use crate::providers::validate_base_url;
use crate::providers::wire::{post_completion, CompletionBody};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

/// Tokens are refreshed this long before the server-side expiry.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - chrono::Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) > now
    }
}

#[derive(Debug, Deserialize)]
struct TokenPayload {
    access_token: String,
    /// Unix epoch milliseconds
    expires_at: i64,
}

/// Sber GigaChat provider.
///
/// Authenticates with the OAuth client-credentials key and caches the
/// short-lived access token inside this instance.
pub struct GigaChatProvider {
    auth_key: Arc<RwLock<Option<String>>>,
    token: Arc<RwLock<Option<AccessToken>>>,
    client: Client,
    base_url: String,
    auth_url: String,
    scope: String,
    timeout: Duration,
}

impl GigaChatProvider {
    pub fn new() -> Self {
        Self::with_config(&LLMConfig::default())
    }

    pub fn with_config(config: &LLMConfig) -> Self {
        let client = Client::builder()
            .danger_accept_invalid_certs(config.gigachat_accept_invalid_certs)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build GigaChat HTTP client ({}), using defaults", e);
                Client::new()
            });

        Self {
            auth_key: Arc::new(RwLock::new(None)),
            token: Arc::new(RwLock::new(None)),
            client,
            base_url: config.gigachat_base_url.trim_end_matches('/').to_string(),
            auth_url: config.gigachat_auth_url.clone(),
            scope: config.gigachat_scope.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    pub fn with_api_key(auth_key: String) -> Self {
        let mut provider = Self::new();
        provider.set_api_key(auth_key);
        provider
    }

    fn get_auth_key(&self) -> Result<String> {
        self.auth_key
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| LLMError::MissingApiKey("GigaChat".to_string()))
    }

    fn cached_token(&self) -> Option<String> {
        let now = Utc::now();
        self.token
            .read()
            .as_ref()
            .filter(|t| t.is_fresh(now))
            .map(|t| t.value.clone())
    }

    fn invalidate_token(&self) {
        *self.token.write() = None;
    }

    /// Return a valid access token, fetching a new one when the cached token
    /// is missing or about to expire.
    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        let auth_key = self.get_auth_key()?;
        validate_base_url(&self.auth_url)?;

        let request_id = uuid::Uuid::new_v4().to_string();
        debug!("Requesting GigaChat access token (RqUID={})", request_id);

        let response = self
            .client
            .post(&self.auth_url)
            .header("Authorization", format!("Basic {}", auth_key))
            .header("RqUID", request_id)
            .header("Accept", "application/json")
            .form(&[("scope", self.scope.as_str())])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LLMError::from_transport(e, self.timeout.as_secs()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(LLMError::AuthenticationFailed);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LLMError::Provider(format!(
                "GigaChat token request failed: HTTP {}: {}",
                status,
                text.chars().take(500).collect::<String>()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LLMError::from_transport(e, self.timeout.as_secs()))?;
        let payload: TokenPayload = serde_json::from_slice(&bytes)?;

        if payload.access_token.is_empty() {
            return Err(LLMError::InvalidResponse("Empty GigaChat access token".to_string()));
        }

        let expires_at = DateTime::<Utc>::from_timestamp_millis(payload.expires_at)
            .ok_or_else(|| LLMError::InvalidResponse("Invalid token expiry".to_string()))?;

        info!("GigaChat access token acquired, expires at {}", expires_at);
        *self.token.write() = Some(AccessToken {
            value: payload.access_token.clone(),
            expires_at,
        });

        Ok(payload.access_token)
    }
}

impl Default for GigaChatProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderTrait for GigaChatProvider {
    fn name(&self) -> &'static str {
        "gigachat"
    }

    fn has_api_key(&self) -> bool {
        self.auth_key.read().is_some()
    }

    fn set_api_key(&mut self, key: String) {
        *self.auth_key.write() = Some(key);
        self.invalidate_token();
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        validate_base_url(&self.base_url)?;
        let token = self.access_token().await?;

        let body = CompletionBody::from_request(&request, Provider::GigaChat.default_model());
        debug!(
            "Making request to GigaChat (model={}, messages={})",
            body.model,
            body.messages.len()
        );

        let url = format!("{}/chat/completions", self.base_url);
        let result = post_completion(&self.client, &url, &token, &body, self.timeout).await;

        if matches!(result, Err(LLMError::AuthenticationFailed)) {
            // Token revoked early; the next call re-authenticates.
            self.invalidate_token();
        }

        result
    }

    fn available_models(&self) -> Vec<String> {
        vec![
            "GigaChat".to_string(),
            "GigaChat-Pro".to_string(),
            "GigaChat-Max".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_freshness_margin() {
        let now = Utc::now();
        let fresh = AccessToken {
            value: "t".to_string(),
            expires_at: now + chrono::Duration::seconds(300),
        };
        let expiring = AccessToken {
            value: "t".to_string(),
            expires_at: now + chrono::Duration::seconds(30),
        };
        assert!(fresh.is_fresh(now));
        assert!(!expiring.is_fresh(now));
    }

    #[test]
    fn test_set_api_key_drops_cached_token() {
        let mut provider = GigaChatProvider::new();
        *provider.token.write() = Some(AccessToken {
            value: "old".to_string(),
            expires_at: Utc::now() + chrono::Duration::seconds(600),
        });
        assert_eq!(provider.cached_token().as_deref(), Some("old"));

        provider.set_api_key("new-key".to_string());
        assert!(provider.cached_token().is_none());
        assert!(provider.has_api_key());
    }
}
