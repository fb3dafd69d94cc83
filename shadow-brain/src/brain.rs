//! Avatar dialogue orchestrator

use crate::analysis::{self, AvatarAction, AvatarCue, Emotion, ResponseAnalysis};
use crate::backend::CompletionBackend;
use crate::config::{BrainConfig, BrainOptions};
use crate::history::{ConversationHistory, ConversationTurn};
use crate::prompt;
use serde::{Deserialize, Serialize};
use shadow_llm::{ChatRequest, LLMError, Message, MAX_MESSAGE_BYTES, MAX_TOTAL_BYTES};
use std::sync::Arc;
use std::time::Duration;

/// Reply for one user turn, always speakable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrainReply {
    pub response: String,
    pub should_speak: bool,
    pub emotion: Emotion,
    pub action: AvatarAction,
}

impl BrainReply {
    pub fn analysis(&self) -> ResponseAnalysis {
        ResponseAnalysis {
            emotion: self.emotion,
            action: self.action,
        }
    }

    pub fn cue(&self) -> AvatarCue {
        self.analysis().cue()
    }
}

/// Builds persona prompts, calls the completion backend and keeps the
/// conversation memory of one session.
///
/// Backend failures are never returned to the caller. They are logged and
/// replaced by a localized fallback reply.
pub struct AvatarBrain {
    config: BrainConfig,
    options: BrainOptions,
    backend: Arc<dyn CompletionBackend>,
    history: ConversationHistory,
}

impl AvatarBrain {
    pub fn new(config: BrainConfig, backend: Arc<dyn CompletionBackend>) -> Self {
        Self::with_options(config, BrainOptions::default(), backend)
    }

    pub fn with_options(
        config: BrainConfig,
        options: BrainOptions,
        backend: Arc<dyn CompletionBackend>,
    ) -> Self {
        tracing::debug!(
            "Avatar brain created: personality={}, meeting_type={}, language={}",
            config.personality,
            config.meeting_type,
            config.language
        );
        Self {
            config,
            options,
            backend,
            history: ConversationHistory::new(),
        }
    }

    pub fn config(&self) -> &BrainConfig {
        &self.config
    }

    pub fn options(&self) -> &BrainOptions {
        &self.options
    }

    pub fn build_system_prompt(&self) -> String {
        prompt::build_system_prompt(&self.config)
    }

    pub fn analyze_response(text: &str) -> ResponseAnalysis {
        analysis::analyze_response(text)
    }

    /// Handle one user utterance.
    ///
    /// The user turn is recorded before the backend call and stays recorded
    /// when the call fails. The assistant turn is appended only on success.
    pub async fn process_user_input(&mut self, input: &str, context: Option<&str>) -> BrainReply {
        self.history
            .push(ConversationTurn::user(prompt::with_context(input, context)));

        let messages = self.dialogue_messages();

        let request = ChatRequest::new(messages)
            .model(self.options.model.clone())
            .max_tokens(self.options.max_tokens)
            .temperature(self.options.temperature);

        match self.request_completion(request).await {
            Ok(content) => {
                self.history.push(ConversationTurn::assistant(content.clone()));
                let analysis = analysis::analyze_response(&content);
                tracing::debug!(
                    "Reply classified: emotion={}, action={}",
                    analysis.emotion,
                    analysis.action
                );
                BrainReply {
                    response: content,
                    should_speak: true,
                    emotion: analysis.emotion,
                    action: analysis.action,
                }
            }
            Err(e) => {
                tracing::error!("Error processing user input: {}", e);
                BrainReply {
                    response: prompt::fallback_reply(self.config.language).to_string(),
                    should_speak: true,
                    emotion: Emotion::Neutral,
                    action: AvatarAction::Listen,
                }
            }
        }
    }

    /// Summarize the full conversation. Never fails; returns a localized
    /// notice when the backend cannot produce a summary.
    pub async fn generate_meeting_summary(&self) -> String {
        let request = ChatRequest::new(self.summary_messages())
            .model(self.options.model.clone())
            .max_tokens(self.options.summary_max_tokens)
            .temperature(self.options.summary_temperature);

        match self.request_completion(request).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!("Error generating meeting summary: {}", e);
                prompt::summary_fallback(self.config.language).to_string()
            }
        }
    }

    pub fn conversation_history(&self) -> Vec<ConversationTurn> {
        self.history.snapshot()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        tracing::debug!("Conversation history cleared");
    }

    /// System prompt plus the history window, newest turns first to claim
    /// the request byte budget.
    fn dialogue_messages(&self) -> Vec<Message> {
        let system = self.build_system_prompt();
        let window = self.history.window(self.options.history_window);

        let mut budget = MAX_TOTAL_BYTES.saturating_sub(system.len());
        let mut kept = 0;
        for turn in window.iter().rev() {
            let size = turn.content.len().min(MAX_MESSAGE_BYTES);
            if size > budget {
                break;
            }
            budget -= size;
            kept += 1;
        }
        if kept < window.len() {
            tracing::warn!(
                "Request over {} bytes, sending {} of {} windowed turns",
                MAX_TOTAL_BYTES,
                kept,
                window.len()
            );
        }

        let mut messages = Vec::with_capacity(kept + 1);
        messages.push(Message::system(system));
        for turn in &window[window.len() - kept..] {
            let mut message = turn.to_message();
            if message.content.len() > MAX_MESSAGE_BYTES {
                tracing::warn!("Clipping a {} byte turn", message.content.len());
                clip_to_bytes(&mut message.content, MAX_MESSAGE_BYTES);
            }
            messages.push(message);
        }
        messages
    }

    /// Summary instruction followed by the full transcript, split across
    /// as many user messages as the per-message limit requires.
    ///
    /// Oldest turns are dropped only when the whole transcript would exceed
    /// the request byte limit.
    fn summary_messages(&self) -> Vec<Message> {
        let instruction = prompt::summary_instruction(self.config.language);
        let mut lines: Vec<String> = self
            .history
            .turns()
            .iter()
            .map(ConversationTurn::transcript_line)
            .collect();
        for line in &mut lines {
            clip_to_bytes(line, MAX_MESSAGE_BYTES);
        }

        let mut budget = MAX_TOTAL_BYTES.saturating_sub(instruction.len() + 1);
        let mut start = lines.len();
        while start > 0 && lines[start - 1].len() + 1 <= budget {
            budget -= lines[start - 1].len() + 1;
            start -= 1;
        }
        if start > 0 {
            tracing::warn!(
                "Transcript over {} bytes, summarizing the last {} of {} turns",
                MAX_TOTAL_BYTES,
                lines.len() - start,
                lines.len()
            );
        }

        let mut chunks = Vec::new();
        let mut current = format!("{}\n", instruction);
        let mut separator = false;
        for line in &lines[start..] {
            let extra = usize::from(separator);
            if current.len() + extra + line.len() > MAX_MESSAGE_BYTES {
                chunks.push(std::mem::take(&mut current));
            } else if separator {
                current.push('\n');
            }
            current.push_str(line);
            separator = true;
        }
        chunks.push(current);

        chunks.into_iter().map(Message::user).collect()
    }

    /// One bounded backend call. A blank reply counts as a failure.
    async fn request_completion(&self, request: ChatRequest) -> shadow_llm::Result<String> {
        let timeout_secs = self.options.completion_timeout_secs;
        let response = tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            self.backend.complete(request),
        )
        .await
        .map_err(|_| LLMError::Timeout(timeout_secs))??;

        if response.content.trim().is_empty() {
            return Err(LLMError::InvalidResponse("Empty completion".to_string()));
        }
        Ok(response.content)
    }
}

/// Truncate to at most `max` bytes on a char boundary
fn clip_to_bytes(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_to_bytes_respects_char_boundaries() {
        let mut text = "привет".to_string();
        clip_to_bytes(&mut text, 5);
        assert_eq!(text, "пр");

        let mut short = "ok".to_string();
        clip_to_bytes(&mut short, 5);
        assert_eq!(short, "ok");
    }
}
