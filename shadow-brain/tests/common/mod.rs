//! Completion backend stubs shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use shadow_brain::CompletionBackend;
use shadow_llm::{ChatRequest, ChatResponse, LLMError, Result};
use std::collections::VecDeque;
use std::time::Duration;

/// Replies with queued texts (then a fixed text) and records every request
pub struct RecordingBackend {
    replies: Mutex<VecDeque<String>>,
    default_reply: String,
    delay: Option<Duration>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl RecordingBackend {
    pub fn new(default_reply: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            default_reply: default_reply.to_string(),
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_replies(replies: &[&str]) -> Self {
        let backend = Self::new("ok");
        backend
            .replies
            .lock()
            .extend(replies.iter().map(|r| r.to_string()));
        backend
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn last_request(&self) -> ChatRequest {
        self.requests.lock().last().cloned().expect("no request recorded")
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl CompletionBackend for RecordingBackend {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        let model = request.model.clone().unwrap_or_default();
        self.requests.lock().push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let content = self
            .replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone());
        Ok(ChatResponse {
            content,
            model,
            usage: None,
            finish_reason: Some("stop".to_string()),
        })
    }
}

/// Always rejects
pub struct FailingBackend;

#[async_trait]
impl CompletionBackend for FailingBackend {
    async fn complete(&self, _request: ChatRequest) -> Result<ChatResponse> {
        Err(LLMError::Provider("backend unavailable".to_string()))
    }
}

/// Never answers within any reasonable timeout
pub struct HangingBackend;

#[async_trait]
impl CompletionBackend for HangingBackend {
    async fn complete(&self, _request: ChatRequest) -> Result<ChatResponse> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(LLMError::Provider("unreachable".to_string()))
    }
}
