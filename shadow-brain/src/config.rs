//! Persona and meeting configuration for an avatar session

use crate::error::BrainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MAX_MEETING_CONTEXT_LEN: usize = 512;

/// One request slot is taken by the system prompt
pub const MAX_HISTORY_WINDOW: usize = shadow_llm::MAX_MESSAGES - 1;

/// Stylistic stance of the avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    #[default]
    Professional,
    Friendly,
    #[serde(alias = "helper")]
    Assistant,
    Expert,
}

/// Coarse category of the meeting the avatar takes part in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingType {
    #[default]
    Business,
    Casual,
    Presentation,
    Interview,
}

/// Language the avatar speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ru,
    En,
}

impl Personality {
    pub const ALL: [Personality; 4] = [
        Personality::Professional,
        Personality::Friendly,
        Personality::Assistant,
        Personality::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Personality::Professional => "professional",
            Personality::Friendly => "friendly",
            Personality::Assistant => "assistant",
            Personality::Expert => "expert",
        }
    }
}

impl MeetingType {
    pub const ALL: [MeetingType; 4] = [
        MeetingType::Business,
        MeetingType::Casual,
        MeetingType::Presentation,
        MeetingType::Interview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::Business => "business",
            MeetingType::Casual => "casual",
            MeetingType::Presentation => "presentation",
            MeetingType::Interview => "interview",
        }
    }
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Ru, Language::En];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ru => "ru",
            Language::En => "en",
        }
    }
}

impl FromStr for Personality {
    type Err = BrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "professional" => Ok(Personality::Professional),
            "friendly" => Ok(Personality::Friendly),
            "assistant" | "helper" => Ok(Personality::Assistant),
            "expert" => Ok(Personality::Expert),
            other => Err(BrainError::Config(format!("Unknown personality: {}", other))),
        }
    }
}

impl FromStr for MeetingType {
    type Err = BrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "business" => Ok(MeetingType::Business),
            "casual" => Ok(MeetingType::Casual),
            "presentation" => Ok(MeetingType::Presentation),
            "interview" => Ok(MeetingType::Interview),
            other => Err(BrainError::Config(format!("Unknown meeting type: {}", other))),
        }
    }
}

impl FromStr for Language {
    type Err = BrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ru" | "rus" | "russian" => Ok(Language::Ru),
            "en" | "eng" | "english" => Ok(Language::En),
            other => Err(BrainError::Config(format!("Unsupported language: {}", other))),
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for MeetingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session-scoped brain configuration.
///
/// Fixed for the lifetime of one orchestrator. A persona change builds a new
/// config (see [`BrainConfig::with_personality`]) and a fresh orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrainConfig {
    pub personality: Personality,
    /// Free-text label identifying the meeting
    pub meeting_context: String,
    pub meeting_type: MeetingType,
    pub language: Language,
}

impl BrainConfig {
    pub fn new(
        personality: Personality,
        meeting_context: impl Into<String>,
        meeting_type: MeetingType,
        language: Language,
    ) -> Self {
        Self {
            personality,
            meeting_context: meeting_context.into(),
            meeting_type,
            language,
        }
    }

    pub fn with_personality(&self, personality: Personality) -> Self {
        Self {
            personality,
            ..self.clone()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), BrainError> {
        if self.meeting_context.chars().count() > MAX_MEETING_CONTEXT_LEN {
            return Err(BrainError::Config(format!(
                "Meeting context too long (max {} chars)",
                MAX_MEETING_CONTEXT_LEN
            )));
        }
        if self.meeting_context.chars().any(|c| c.is_control()) {
            return Err(BrainError::Config(
                "Meeting context contains control characters".to_string(),
            ));
        }
        Ok(())
    }
}

/// Completion parameters and limits used by the orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrainOptions {
    pub model: String,
    /// Number of most recent turns submitted with each request
    pub history_window: usize,
    pub max_tokens: u32,
    pub temperature: f32,
    pub summary_max_tokens: u32,
    pub summary_temperature: f32,
    /// Upper bound on a single backend call
    pub completion_timeout_secs: u64,
}

impl Default for BrainOptions {
    fn default() -> Self {
        Self {
            model: "GigaChat".to_string(),
            history_window: 10,
            max_tokens: 150,
            temperature: 0.7,
            summary_max_tokens: 500,
            summary_temperature: 0.3,
            completion_timeout_secs: 30,
        }
    }
}

impl BrainOptions {
    pub fn validate(&self) -> Result<(), BrainError> {
        if self.model.trim().is_empty() {
            return Err(BrainError::Config("Model name cannot be empty".to_string()));
        }
        if !(1..=MAX_HISTORY_WINDOW).contains(&self.history_window) {
            return Err(BrainError::Config(format!(
                "history_window must be between 1 and {}",
                MAX_HISTORY_WINDOW
            )));
        }
        for (name, tokens) in [
            ("max_tokens", self.max_tokens),
            ("summary_max_tokens", self.summary_max_tokens),
        ] {
            if !(1..=4096).contains(&tokens) {
                return Err(BrainError::Config(format!(
                    "{} must be between 1 and 4096",
                    name
                )));
            }
        }
        for (name, temperature) in [
            ("temperature", self.temperature),
            ("summary_temperature", self.summary_temperature),
        ] {
            if !temperature.is_finite() || !(0.0..=2.0).contains(&temperature) {
                return Err(BrainError::Config(format!(
                    "{} must be between 0.0 and 2.0",
                    name
                )));
            }
        }
        if !(1..=120).contains(&self.completion_timeout_secs) {
            return Err(BrainError::Config(
                "completion_timeout_secs must be between 1 and 120".to_string(),
            ));
        }
        Ok(())
    }
}
