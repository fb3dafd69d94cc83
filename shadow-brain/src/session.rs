//! Meeting sessions wrapping one orchestrator each

use crate::backend::CompletionBackend;
use crate::brain::{AvatarBrain, BrainReply};
use crate::config::{BrainConfig, BrainOptions, Personality};
use crate::error::{BrainError, Result};
use crate::history::ConversationTurn;
use crate::prompt;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Maximum utterance length in characters, context included
pub const MAX_INPUT_CHARS: usize = 10_000;

/// One active avatar in one meeting.
///
/// Calls on the same session are serialized; the orchestrator never sees two
/// turns at once.
pub struct AvatarSession {
    id: Uuid,
    meeting_id: String,
    started_at: DateTime<Utc>,
    backend: Arc<dyn CompletionBackend>,
    options: BrainOptions,
    brain: Mutex<AvatarBrain>,
}

impl AvatarSession {
    pub fn new(
        meeting_id: impl Into<String>,
        config: BrainConfig,
        options: BrainOptions,
        backend: Arc<dyn CompletionBackend>,
    ) -> Result<Self> {
        config.validate()?;
        options.validate()?;

        let meeting_id = meeting_id.into();
        if meeting_id.trim().is_empty() {
            return Err(BrainError::Session("Meeting id cannot be empty".to_string()));
        }

        let brain = AvatarBrain::with_options(config, options.clone(), backend.clone());
        let session = Self {
            id: Uuid::new_v4(),
            meeting_id,
            started_at: Utc::now(),
            backend,
            options,
            brain: Mutex::new(brain),
        };
        tracing::info!(
            "Avatar session {} started for meeting {}",
            session.id,
            session.meeting_id
        );
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn meeting_id(&self) -> &str {
        &self.meeting_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Run one turn. Input is trimmed; blank input, or input that is
    /// oversized once the context is attached, is rejected before the
    /// orchestrator is touched.
    pub async fn respond(&self, input: &str, context: Option<&str>) -> Result<BrainReply> {
        let input = input.trim();
        if input.is_empty() {
            return Err(BrainError::EmptyInput);
        }
        let len = prompt::with_context(input, context).chars().count();
        if len > MAX_INPUT_CHARS {
            return Err(BrainError::InputTooLarge(len, MAX_INPUT_CHARS));
        }

        let mut brain = self.brain.lock().await;
        Ok(brain.process_user_input(input, context).await)
    }

    pub async fn summarize(&self) -> String {
        let brain = self.brain.lock().await;
        brain.generate_meeting_summary().await
    }

    pub async fn history(&self) -> Vec<ConversationTurn> {
        self.brain.lock().await.conversation_history()
    }

    pub async fn reset(&self) {
        self.brain.lock().await.clear_history();
    }

    pub async fn config(&self) -> BrainConfig {
        self.brain.lock().await.config().clone()
    }

    pub async fn system_prompt(&self) -> String {
        self.brain.lock().await.build_system_prompt()
    }

    /// Switch persona. The orchestrator is rebuilt and prior history is dropped.
    pub async fn change_personality(&self, personality: Personality) {
        let mut brain = self.brain.lock().await;
        let config = brain.config().with_personality(personality);
        *brain = AvatarBrain::with_options(config, self.options.clone(), self.backend.clone());
        tracing::info!(
            "Session {} switched personality to {}",
            self.id,
            personality
        );
    }
}

/// Active sessions keyed by meeting id
pub struct SessionRegistry {
    backend: Arc<dyn CompletionBackend>,
    options: BrainOptions,
    sessions: DashMap<String, Arc<AvatarSession>>,
}

impl SessionRegistry {
    pub fn new(backend: Arc<dyn CompletionBackend>, options: BrainOptions) -> Self {
        Self {
            backend,
            options,
            sessions: DashMap::new(),
        }
    }

    /// Open a session for `meeting_id`, or return the one already open.
    pub fn open(&self, meeting_id: &str, config: BrainConfig) -> Result<Arc<AvatarSession>> {
        if let Some(existing) = self.sessions.get(meeting_id) {
            return Ok(existing.value().clone());
        }

        let session = Arc::new(AvatarSession::new(
            meeting_id,
            config,
            self.options.clone(),
            self.backend.clone(),
        )?);
        let entry = self
            .sessions
            .entry(meeting_id.to_string())
            .or_insert(session);
        Ok(entry.value().clone())
    }

    pub fn get(&self, meeting_id: &str) -> Option<Arc<AvatarSession>> {
        self.sessions.get(meeting_id).map(|s| s.value().clone())
    }

    /// Remove the session and hand back its final history
    pub async fn close(&self, meeting_id: &str) -> Option<Vec<ConversationTurn>> {
        let (_, session) = self.sessions.remove(meeting_id)?;
        let history = session.history().await;
        tracing::info!(
            "Avatar session {} closed after {} turns",
            session.id(),
            history.len()
        );
        Some(history)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn meeting_ids(&self) -> Vec<String> {
        self.sessions.iter().map(|e| e.key().clone()).collect()
    }
}
