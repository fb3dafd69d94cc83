//! File and environment settings for a Shadow.AI process

use crate::config::{BrainConfig, BrainOptions};
use crate::error::{BrainError, Result};
use serde::{Deserialize, Serialize};
use shadow_llm::{LLMConfig, Provider};
use std::path::Path;
use std::str::FromStr;

pub const ENV_PROVIDER: &str = "SHADOW_PROVIDER";
pub const ENV_MODEL: &str = "SHADOW_MODEL";
pub const ENV_LANGUAGE: &str = "SHADOW_LANGUAGE";
pub const ENV_PERSONALITY: &str = "SHADOW_PERSONALITY";
pub const ENV_MEETING_TYPE: &str = "SHADOW_MEETING_TYPE";
pub const ENV_HISTORY_WINDOW: &str = "SHADOW_HISTORY_WINDOW";

/// Top-level settings, one section per crate concern.
///
/// ```toml
/// [llm]
/// default_provider = "gigachat"
///
/// [brain]
/// personality = "expert"
/// language = "en"
///
/// [options]
/// history_window = 10
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowSettings {
    pub llm: LLMConfig,
    pub brain: BrainConfig,
    pub options: BrainOptions,
}

impl ShadowSettings {
    /// Load settings from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(BrainError::Config(format!(
                "Path traversal detected: '{}'",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_toml(&content)?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Defaults overridden by `SHADOW_*` environment variables
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    /// Apply `SHADOW_*` environment overrides on top of these settings
    pub fn merge_env(self) -> Self {
        self.merge_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`. Unparseable values are
    /// logged and skipped.
    pub fn merge_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_PROVIDER) {
            match Provider::from_str(&value) {
                Some(provider) => self.llm.default_provider = Some(provider),
                None => tracing::warn!("Ignoring {}: unknown provider '{}'", ENV_PROVIDER, value),
            }
        }

        if let Some(value) = lookup(ENV_MODEL) {
            let model = value.trim();
            if !model.is_empty() {
                self.options.model = model.to_string();
            }
        }

        if let Some(value) = lookup(ENV_LANGUAGE) {
            apply_parsed(ENV_LANGUAGE, &value, &mut self.brain.language);
        }
        if let Some(value) = lookup(ENV_PERSONALITY) {
            apply_parsed(ENV_PERSONALITY, &value, &mut self.brain.personality);
        }
        if let Some(value) = lookup(ENV_MEETING_TYPE) {
            apply_parsed(ENV_MEETING_TYPE, &value, &mut self.brain.meeting_type);
        }

        if let Some(value) = lookup(ENV_HISTORY_WINDOW) {
            match value.trim().parse::<usize>() {
                Ok(window) => self.options.history_window = window,
                Err(_) => tracing::warn!("Ignoring {}: '{}' is not a number", ENV_HISTORY_WINDOW, value),
            }
        }

        self
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.llm.validate().map_err(BrainError::Config)?;
        self.brain.validate()?;
        self.options.validate()?;
        Ok(())
    }
}

fn apply_parsed<T>(key: &str, value: &str, target: &mut T)
where
    T: FromStr<Err = BrainError>,
{
    match value.parse::<T>() {
        Ok(parsed) => *target = parsed,
        Err(e) => tracing::warn!("Ignoring {}: {}", key, e),
    }
}
