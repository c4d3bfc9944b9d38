//! Configuration for the generation pipeline.
//!
//! Loaded from TOML; every section and field has a default, so an empty file
//! is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::quiz_engine::completion::CompletionOptions;
use crate::quiz_engine::error::ConfigError;
use crate::quiz_engine::logging::LoggingConfig;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizConfig {
    #[serde(default)]
    pub completion: CompletionSettings,

    #[serde(default)]
    pub wordle: WordleSettings,

    #[serde(default)]
    pub rhyme: RhymeSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults applied to every text-completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionSettings {
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    100
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl CompletionSettings {
    pub fn options(&self) -> CompletionOptions {
        CompletionOptions {
            model: self.model.clone(),
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
        }
    }
}

/// How a guessed letter is classified against the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// A letter is "present" whenever the answer contains it anywhere.
    #[default]
    Simplified,
    /// Canonical two-pass scoring: each answer letter is consumed once.
    DuplicateAware,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordleSettings {
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Rows the player gets; reported in metadata only.
    #[serde(default = "default_wordle_attempts")]
    pub max_attempts: usize,

    #[serde(default)]
    pub scoring: ScoringMode,
}

fn default_min_length() -> usize {
    4
}

fn default_max_length() -> usize {
    7
}

fn default_wordle_attempts() -> usize {
    6
}

impl Default for WordleSettings {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            max_length: default_max_length(),
            max_attempts: default_wordle_attempts(),
            scoring: ScoringMode::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RhymeSettings {
    /// Generation attempts before falling back to the static pair table.
    #[serde(default = "default_rhyme_attempts")]
    pub max_attempts: usize,
}

fn default_rhyme_attempts() -> usize {
    3
}

impl Default for RhymeSettings {
    fn default() -> Self {
        Self { max_attempts: default_rhyme_attempts() }
    }
}

impl QuizConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: QuizConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Collect every problem rather than stopping at the first.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        let w = &self.wordle;
        if w.min_length < 2 {
            problems.push(format!("wordle.min_length must be at least 2 (got {})", w.min_length));
        }
        if w.max_length > 12 {
            problems.push(format!("wordle.max_length must be at most 12 (got {})", w.max_length));
        }
        if w.min_length > w.max_length {
            problems.push(format!(
                "wordle.min_length ({}) exceeds wordle.max_length ({})",
                w.min_length, w.max_length
            ));
        }
        if w.max_attempts < 4 {
            problems.push("wordle.max_attempts must leave room for the three hint rows".to_string());
        }
        if self.rhyme.max_attempts == 0 {
            problems.push("rhyme.max_attempts must be at least 1".to_string());
        }
        if !(0.0..=2.0).contains(&self.completion.temperature) {
            problems.push(format!(
                "completion.temperature must be within 0.0..=2.0 (got {})",
                self.completion.temperature
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }
}
