//! OpenAI-compatible `/chat/completions` wire format.
//!
//! GigaChat speaks the same shape, so both providers go through here. Vendor
//! JSON is decoded into the typed structs below and nothing untyped leaves
//! this module.

use crate::config::{ChatRequest, ChatResponse, Message, Usage};
use crate::error::{LLMError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const MAX_COMPLETION_TOKENS: u32 = 4096;
const DEFAULT_MAX_TOKENS: u32 = 2000;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const MAX_ERROR_BODY: usize = 500;

#[derive(Debug, Serialize)]
pub struct CompletionBody<'a> {
    pub model: String,
    pub messages: Vec<WireMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct WireMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct CompletionPayload {
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Keep only alphanumerics, dash, underscore and dot; fall back to
/// `default_model` when nothing is left.
pub fn sanitize_model(model: Option<&str>, default_model: &str) -> String {
    model
        .map(|m| {
            m.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_' || *c == '.')
                .take(100)
                .collect::<String>()
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| default_model.to_string())
}

impl<'a> CompletionBody<'a> {
    pub fn from_request(request: &'a ChatRequest, default_model: &str) -> Self {
        Self {
            model: sanitize_model(request.model.as_deref(), default_model),
            messages: request.messages.iter().map(WireMessage::from).collect(),
            temperature: request
                .temperature
                .unwrap_or(DEFAULT_TEMPERATURE)
                .clamp(0.0, 2.0),
            max_tokens: request
                .max_tokens
                .unwrap_or(DEFAULT_MAX_TOKENS)
                .clamp(1, MAX_COMPLETION_TOKENS),
        }
    }
}

impl<'a> From<&'a Message> for WireMessage<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: &message.content,
        }
    }
}

impl CompletionPayload {
    pub fn into_response(self, requested_model: &str) -> Result<ChatResponse> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::InvalidResponse("No choices in response".to_string()))?;

        let content = choice
            .message
            .content
            .ok_or_else(|| LLMError::InvalidResponse("No content in first choice".to_string()))?;

        Ok(ChatResponse {
            content,
            model: self.model.unwrap_or_else(|| requested_model.to_string()),
            usage: self.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason,
        })
    }
}

/// POST a completion body and decode the reply.
pub async fn post_completion(
    client: &Client,
    url: &str,
    bearer: &str,
    body: &CompletionBody<'_>,
    timeout: Duration,
) -> Result<ChatResponse> {
    let response = client
        .post(url)
        .header("Authorization", format!("Bearer {}", bearer))
        .header("Content-Type", "application/json")
        .header("Accept", "application/json")
        .timeout(timeout)
        .json(body)
        .send()
        .await
        .map_err(|e| LLMError::from_transport(e, timeout.as_secs()))?;

    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(LLMError::RateLimit);
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(LLMError::AuthenticationFailed);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(LLMError::ModelNotAvailable(body.model.clone()));
    }

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(LLMError::InvalidResponse(format!(
            "HTTP {}: {}",
            status,
            truncate(&text, MAX_ERROR_BODY)
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| LLMError::from_transport(e, timeout.as_secs()))?;
    let payload: CompletionPayload = serde_json::from_slice(&bytes)?;
    payload.into_response(&body.model)
}

fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_model() {
        assert_eq!(sanitize_model(Some("gpt-4o"), "x"), "gpt-4o");
        assert_eq!(sanitize_model(Some("Giga Chat/../Pro"), "x"), "GigaChat..Pro");
        assert_eq!(sanitize_model(Some("!!!"), "GigaChat"), "GigaChat");
        assert_eq!(sanitize_model(None, "GigaChat"), "GigaChat");
    }

    #[test]
    fn test_body_clamps_parameters() {
        let request = ChatRequest::new(vec![Message::user("hi")])
            .temperature(5.0)
            .max_tokens(100_000);
        let body = CompletionBody::from_request(&request, "GigaChat");
        assert_eq!(body.temperature, 2.0);
        assert_eq!(body.max_tokens, MAX_COMPLETION_TOKENS);
        assert_eq!(body.messages[0].role, "user");
    }

    #[test]
    fn test_payload_without_choices_is_invalid() {
        let payload: CompletionPayload = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            payload.into_response("m"),
            Err(LLMError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_payload_into_response() {
        let payload: CompletionPayload = serde_json::from_str(
            r#"{
                "model": "GigaChat:1.0",
                "choices": [{"message": {"role": "assistant", "content": "Привет"}, "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12}
            }"#,
        )
        .unwrap();
        let response = payload.into_response("GigaChat").unwrap();
        assert_eq!(response.content, "Привет");
        assert_eq!(response.model, "GigaChat:1.0");
        assert_eq!(response.usage.unwrap().total_tokens, 12);
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "ошибка".repeat(100);
        let cut = truncate(&text, 7);
        assert!(cut.len() <= 7);
        assert!(text.starts_with(cut));
    }
}
