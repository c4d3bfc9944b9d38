//! Error types for the generation pipeline and its strategies.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::quiz_engine::models::QuizType;

/// Input-shape violation found before generation. Terminal: retrying with the
/// same context fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {quiz_type} input{}", join_reasons(.errors))]
pub struct ValidationError {
    pub quiz_type: QuizType,
    /// Offending field -> human-readable reasons.
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    pub fn new(quiz_type: QuizType) -> Self {
        Self { quiz_type, errors: BTreeMap::new() }
    }

    pub fn push(&mut self, field: &str, reason: impl Into<String>) {
        self.errors.entry(field.to_string()).or_default().push(reason.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn reasons(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// `; field: reason, reason` for each field, in field order.
fn join_reasons(errors: &BTreeMap<String, Vec<String>>) -> String {
    errors
        .iter()
        .map(|(field, reasons)| format!("; {field}: {}", reasons.join(", ")))
        .collect()
}

/// Errors surfaced to callers of the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no strategy registered for quiz type {0}")]
    UnknownQuizType(String),
}

/// Failures of the text-completion collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompletionError {
    #[error("text completion unavailable: {0}")]
    Unavailable(String),

    #[error("text completion request failed: {0}")]
    RequestFailed(String),

    #[error("text completion returned an empty response")]
    EmptyResponse,
}

/// Failures inside a strategy. These never escape the pipeline; they are
/// folded into `GenerationResult::error`.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("invalid word '{word}': {reason}")]
    InvalidWord { word: String, reason: String },

    #[error("unrecognized number sequence: {0}")]
    UnrecognizedSequence(String),

    #[error("expected 4 distinct concepts, got {found}")]
    DuplicateConcepts { found: usize },

    #[error("malformed content: {0}")]
    MalformedContent(String),

    #[error("no theme available for concept connection")]
    MissingTheme,

    #[error("no fallback rhyme pair for language '{0}'")]
    NoFallbackPair(String),
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter '{0}'")]
    InvalidFilter(String),

    #[error("unknown log format '{0}' (expected text or json)")]
    UnknownFormat(String),

    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
}
