use serde::{Deserialize, Serialize};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GIGACHAT_BASE_URL: &str = "https://gigachat.devices.sberbank.ru/api/v1";
pub const GIGACHAT_AUTH_URL: &str = "https://ngw.devices.sberbank.ru:9443/api/v2/oauth";
pub const GIGACHAT_SCOPE: &str = "GIGACHAT_API_PERS";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    pub default_provider: Option<Provider>,
    pub default_model: Option<String>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// Per-request timeout applied by every provider client
    pub request_timeout_secs: u64,
    pub openai_base_url: String,
    pub gigachat_base_url: String,
    pub gigachat_auth_url: String,
    pub gigachat_scope: String,
    /// Sber endpoints are signed by the Russian Trusted Root CA, which most
    /// system stores do not carry.
    pub gigachat_accept_invalid_certs: bool,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            default_provider: None,
            default_model: None,
            temperature: 0.7,
            max_tokens: Some(2000),
            request_timeout_secs: 30,
            openai_base_url: OPENAI_BASE_URL.to_string(),
            gigachat_base_url: GIGACHAT_BASE_URL.to_string(),
            gigachat_auth_url: GIGACHAT_AUTH_URL.to_string(),
            gigachat_scope: GIGACHAT_SCOPE.to_string(),
            gigachat_accept_invalid_certs: false,
        }
    }
}

impl LLMConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("temperature must be between 0.0 and 2.0".to_string());
        }
        if let Some(max_tokens) = self.max_tokens {
            if max_tokens == 0 || max_tokens > 4096 {
                return Err("max_tokens must be between 1 and 4096".to_string());
            }
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 120 {
            return Err("request_timeout_secs must be between 1 and 120".to_string());
        }
        for (name, url) in [
            ("openai_base_url", &self.openai_base_url),
            ("gigachat_base_url", &self.gigachat_base_url),
            ("gigachat_auth_url", &self.gigachat_auth_url),
        ] {
            if crate::providers::validate_base_url(url).is_err() {
                return Err(format!("{} must use https:// (got '{}')", name, url));
            }
        }
        if self.gigachat_scope.is_empty() {
            return Err("gigachat_scope cannot be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    GigaChat,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::GigaChat, Provider::OpenAI];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::GigaChat => "gigachat",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Some(Provider::OpenAI),
            "gigachat" | "sber" => Some(Provider::GigaChat),
            _ => None,
        }
    }

    pub fn env_var_name(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::GigaChat => "GIGACHAT_AUTH_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAI => "gpt-4o-mini",
            Provider::GigaChat => "GigaChat",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
    pub model: String,
    pub usage: Option<Usage>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}
