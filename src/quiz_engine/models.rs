use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::quiz_engine::error::PipelineError;

// ---------------------------------------------------------------------------
// Quiz types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuizType {
    Wordle,
    NumberSequence,
    RhymeTime,
    ConceptConnection,
}

impl QuizType {
    pub const ALL: [QuizType; 4] = [
        QuizType::Wordle,
        QuizType::NumberSequence,
        QuizType::RhymeTime,
        QuizType::ConceptConnection,
    ];

    /// Wire name used by callers (`WORDLE`, `NUMBER_SEQUENCE`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            QuizType::Wordle            => "WORDLE",
            QuizType::NumberSequence    => "NUMBER_SEQUENCE",
            QuizType::RhymeTime         => "RHYME_TIME",
            QuizType::ConceptConnection => "CONCEPT_CONNECTION",
        }
    }
}

impl fmt::Display for QuizType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QuizType {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuizType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| PipelineError::UnknownQuizType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Free-form options carried alongside a generation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub variables: BTreeMap<String, Value>,
    /// Pre-chosen theme for concept-connection puzzles.
    #[serde(default)]
    pub theme: Option<String>,
    /// Fixes every random choice made while building the puzzle.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationContext {
    /// Seed text. Empty means "generate from scratch".
    #[serde(default)]
    pub content: String,
    pub language: String,
    pub quiz_type: QuizType,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub options: GenerationOptions,
}

impl GenerationContext {
    /// Minimal constructor: empty seed, no template, default options.
    pub fn new(quiz_type: QuizType, language: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            language: language.into(),
            quiz_type,
            template_id: None,
            options: GenerationOptions::default(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.options.rng_seed = Some(seed);
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.options.theme = Some(theme.into());
        self
    }

    /// Copy of this context with only `content` replaced.
    pub fn replace_content(&self, content: String) -> Self {
        Self { content, ..self.clone() }
    }

    pub fn has_seed_content(&self) -> bool {
        !self.content.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub content: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub variables: BTreeMap<String, Value>,
}

impl GenerationResult {
    /// A populated puzzle. An empty answer is never a success, so it is
    /// turned into a failure here.
    pub fn success(content: impl Into<String>, answer: impl Into<String>) -> Self {
        let answer = answer.into();
        if answer.trim().is_empty() {
            return Self::failure("generation produced an empty answer");
        }
        Self {
            content: content.into(),
            answer,
            ..Self::default()
        }
    }

    /// A failed generation. `content` and `answer` stay empty.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn with_metadata(mut self, key: &str, value: impl ToString) -> Self {
        if self.is_success() {
            self.metadata.insert(key.to_string(), value.to_string());
        }
        self
    }

    pub fn with_variable(mut self, key: &str, value: impl Into<Value>) -> Self {
        if self.is_success() {
            self.variables.insert(key.to_string(), value.into());
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Auxiliary text
// ---------------------------------------------------------------------------

/// Static presentation identity for one quiz type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Branding {
    pub name: &'static str,
    pub tagline: &'static str,
    pub accent_color: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_type_round_trips_through_wire_name() {
        for t in QuizType::ALL {
            assert_eq!(t.as_str().parse::<QuizType>().unwrap(), t);
        }
        assert!(matches!(
            "CROSSWORD".parse::<QuizType>(),
            Err(PipelineError::UnknownQuizType(_))
        ));
    }

    #[test]
    fn quiz_type_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&QuizType::NumberSequence).unwrap();
        assert_eq!(json, "\"NUMBER_SEQUENCE\"");
    }

    #[test]
    fn success_with_empty_answer_becomes_failure() {
        let r = GenerationResult::success("<div></div>", "  ");
        assert!(r.error.is_some());
        assert!(r.content.is_empty());
    }

    #[test]
    fn failure_ignores_metadata_and_variables() {
        let r = GenerationResult::failure("boom")
            .with_metadata("pattern", "arithmetic")
            .with_variable("x", 1);
        assert!(r.metadata.is_empty());
        assert!(r.variables.is_empty());
        assert_eq!(r.answer, "");
    }

    #[test]
    fn replace_content_keeps_everything_else() {
        let ctx = GenerationContext::new(QuizType::RhymeTime, "en")
            .with_content("cat-hat")
            .with_seed(9);
        let next = ctx.replace_content("CAT-HAT".into());
        assert_eq!(next.content, "CAT-HAT");
        assert_eq!(next.options.rng_seed, Some(9));
        assert_eq!(next.language, "en");
    }
}
