//! shadow-brain: dialogue orchestration for the Shadow.AI meeting avatar
//!
//! - Persona and meeting conditioned system prompts (Russian and English)
//! - Bounded conversation window over an injected completion backend
//! - Keyword classification of replies into avatar emotion and action cues
//! - Per-meeting sessions and file/environment settings

pub mod analysis;
pub mod backend;
pub mod brain;
pub mod config;
pub mod error;
pub mod history;
pub mod prompt;
pub mod session;
pub mod settings;

pub use analysis::{
    analyze_response, AvatarAction, AvatarCue, Emotion, Expression, Gesture, ResponseAnalysis,
};
pub use backend::{CompletionBackend, ProviderBackend};
pub use brain::{AvatarBrain, BrainReply};
pub use config::{BrainConfig, BrainOptions, Language, MeetingType, Personality};
pub use error::BrainError;
pub use history::{ConversationHistory, ConversationTurn, TurnRole};
pub use session::{AvatarSession, SessionRegistry, MAX_INPUT_CHARS};
pub use settings::ShadowSettings;
