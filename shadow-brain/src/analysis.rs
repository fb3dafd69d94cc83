//! Keyword classification of replies and the avatar cue vocabulary.
//!
//! Classification is literal substring matching over the lower-cased reply.
//! Categories are checked in a fixed order and the first match wins.

use serde::{Deserialize, Serialize};
use std::fmt;

const HAPPY: &[&str] = &[
    "excellent",
    "great",
    "wonderful",
    "отлично",
    "прекрасно",
    "замечательно",
];
const CONCERNED: &[&str] = &["problem", "error", "issue", "проблем", "ошибк", "трудност"];
const EXCITED: &[&str] = &["important", "urgent", "critical", "важно", "срочно", "критично"];

const NOD: &[&str] = &["yes", "agree", "correct", "да", "согласен", "верно"];
const SHAKE: &[&str] = &["no", "disagree", "incorrect", "нет", "не согласен", "неверно"];
const POINT: &[&str] = &[
    "pay attention",
    "important",
    "look",
    "обратите внимание",
    "важно",
    "смотрите",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    #[default]
    Neutral,
    Concerned,
    Excited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvatarAction {
    Nod,
    Shake,
    Point,
    #[default]
    Listen,
}

/// Facial expression understood by the avatar renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expression {
    Neutral,
    Happy,
    Confused,
    Excited,
}

/// Gesture understood by the avatar renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gesture {
    None,
    Nod,
    Shake,
    Point,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Neutral => "neutral",
            Emotion::Concerned => "concerned",
            Emotion::Excited => "excited",
        }
    }

    pub fn to_expression(self) -> Expression {
        match self {
            Emotion::Happy => Expression::Happy,
            Emotion::Neutral => Expression::Neutral,
            Emotion::Concerned => Expression::Confused,
            Emotion::Excited => Expression::Excited,
        }
    }
}

impl AvatarAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvatarAction::Nod => "nod",
            AvatarAction::Shake => "shake",
            AvatarAction::Point => "point",
            AvatarAction::Listen => "listen",
        }
    }

    pub fn to_gesture(self) -> Gesture {
        match self {
            AvatarAction::Nod => Gesture::Nod,
            AvatarAction::Shake => Gesture::Shake,
            AvatarAction::Point => Gesture::Point,
            AvatarAction::Listen => Gesture::None,
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AvatarAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emotion and action derived from one reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResponseAnalysis {
    pub emotion: Emotion,
    pub action: AvatarAction,
}

/// Animation parameters handed to the avatar renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvatarCue {
    pub expression: Expression,
    pub gesture: Gesture,
    /// 0.0 - 1.0
    pub intensity: f32,
    pub duration_ms: u64,
}

impl ResponseAnalysis {
    pub fn cue(&self) -> AvatarCue {
        let intensity = match self.emotion {
            Emotion::Neutral => 0.5,
            _ => 0.8,
        };
        let duration_ms = match self.action {
            AvatarAction::Listen => 0,
            _ => 1000,
        };
        AvatarCue {
            expression: self.emotion.to_expression(),
            gesture: self.action.to_gesture(),
            intensity,
            duration_ms,
        }
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Classify a reply. Pure and total: every input yields an analysis.
pub fn analyze_response(text: &str) -> ResponseAnalysis {
    let text = text.to_lowercase();

    let emotion = if contains_any(&text, HAPPY) {
        Emotion::Happy
    } else if contains_any(&text, CONCERNED) {
        Emotion::Concerned
    } else if contains_any(&text, EXCITED) {
        Emotion::Excited
    } else {
        Emotion::Neutral
    };

    let action = if contains_any(&text, NOD) {
        AvatarAction::Nod
    } else if contains_any(&text, SHAKE) {
        AvatarAction::Shake
    } else if contains_any(&text, POINT) {
        AvatarAction::Point
    } else {
        AvatarAction::Listen
    };

    ResponseAnalysis { emotion, action }
}
