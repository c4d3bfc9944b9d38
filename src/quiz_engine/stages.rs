//! Pre-generation stages: input validation, then content normalization.
//!
//! Stages are pure functions of the context. Each returns a new context (or a
//! terminal error); nothing is mutated in place.

use std::sync::Arc;

use tracing::debug;

use crate::quiz_engine::{
    error::{PipelineError, ValidationError},
    helpers::{clean_fragment, format_number},
    language::{LanguageConfig, LanguageProfile},
    models::{GenerationContext, QuizType},
    strategies::{
        concept_connection::{parse_concepts, render_cards, CONCEPT_COUNT},
        number_sequence::parse_terms,
    },
};

const CONTENT: &str = "content";

pub trait PipelineStage: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, ctx: &GenerationContext) -> Result<GenerationContext, PipelineError>;
}

fn resolve_language(languages: &dyn LanguageConfig, code: &str) -> Result<LanguageProfile, PipelineError> {
    languages
        .lookup(code)
        .ok_or_else(|| PipelineError::UnsupportedLanguage(code.to_string()))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Rejects unknown languages and seed content of the wrong shape.
pub struct ValidationStep {
    languages: Arc<dyn LanguageConfig>,
}

impl ValidationStep {
    pub fn new(languages: Arc<dyn LanguageConfig>) -> Self {
        Self { languages }
    }

    fn check_shape(quiz_type: QuizType, content: &str, errors: &mut ValidationError) {
        match quiz_type {
            QuizType::Wordle => {
                if content.trim().is_empty() {
                    errors.push(CONTENT, "must not be blank");
                }
            }

            QuizType::NumberSequence => {
                if content.trim().is_empty() {
                    errors.push(CONTENT, "must not be blank");
                } else if let Err(err) = parse_terms(content) {
                    errors.push(CONTENT, err.to_string());
                }
            }

            QuizType::RhymeTime => {
                let tokens: Vec<&str> = content.split('-').map(str::trim).collect();
                if tokens.len() != 2 {
                    errors.push(CONTENT, format!("expected two hyphen-separated words, got {}", tokens.len()));
                } else if tokens.iter().any(|t| t.is_empty()) {
                    errors.push(CONTENT, "both words must be non-empty");
                }
            }

            QuizType::ConceptConnection => {
                if content.trim_start().starts_with('<') {
                    match parse_concepts(content) {
                        Ok(cards) if cards.len() == CONCEPT_COUNT => {}
                        Ok(cards) => {
                            errors.push(CONTENT, format!("expected {CONCEPT_COUNT} concepts, got {}", cards.len()))
                        }
                        Err(err) => errors.push(CONTENT, err.to_string()),
                    }
                } else {
                    let tokens: Vec<String> = content.trim().split([',', '\n']).map(clean_fragment).collect();
                    if tokens.iter().any(|t| t.is_empty()) {
                        errors.push(CONTENT, "concepts must be non-empty");
                    }
                    if tokens.len() != CONCEPT_COUNT {
                        errors.push(CONTENT, format!("expected {CONCEPT_COUNT} concepts, got {}", tokens.len()));
                    }
                }
            }
        }
    }
}

impl PipelineStage for ValidationStep {
    fn name(&self) -> &'static str {
        "validation"
    }

    fn apply(&self, ctx: &GenerationContext) -> Result<GenerationContext, PipelineError> {
        resolve_language(self.languages.as_ref(), &ctx.language)?;

        // Empty content asks the strategy to generate from scratch.
        if ctx.has_seed_content() {
            let mut errors = ValidationError::new(ctx.quiz_type);
            Self::check_shape(ctx.quiz_type, &ctx.content, &mut errors);
            if !errors.is_empty() {
                debug!(quiz_type = %ctx.quiz_type, error = %errors, "seed content rejected");
                return Err(errors.into());
            }
        }
        Ok(ctx.clone())
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Canonical form of validated seed content. Idempotent.
pub struct FormattingStep {
    languages: Arc<dyn LanguageConfig>,
}

impl FormattingStep {
    pub fn new(languages: Arc<dyn LanguageConfig>) -> Self {
        Self { languages }
    }

    /// `None` leaves the content as it was.
    fn format(quiz_type: QuizType, content: &str, profile: &LanguageProfile) -> Option<String> {
        match quiz_type {
            QuizType::Wordle => Some(content.trim().to_uppercase()),

            QuizType::NumberSequence => {
                let terms = parse_terms(content).ok()?;
                let rendered: Vec<String> = terms
                    .into_iter()
                    .map(|t| profile.numerals.render(&format_number(t)))
                    .collect();
                Some(rendered.join(", "))
            }

            QuizType::RhymeTime => {
                let words: Vec<String> = content.split('-').map(|w| w.trim().to_uppercase()).collect();
                Some(words.join("-"))
            }

            QuizType::ConceptConnection => {
                let concepts: Vec<String> = parse_concepts(content)
                    .ok()?
                    .into_iter()
                    .map(|c| c.to_uppercase())
                    .collect();
                Some(render_cards(&concepts))
            }
        }
    }
}

impl PipelineStage for FormattingStep {
    fn name(&self) -> &'static str {
        "formatting"
    }

    fn apply(&self, ctx: &GenerationContext) -> Result<GenerationContext, PipelineError> {
        if !ctx.has_seed_content() {
            return Ok(ctx.clone());
        }
        let profile = resolve_language(self.languages.as_ref(), &ctx.language)?;
        match Self::format(ctx.quiz_type, &ctx.content, &profile) {
            Some(content) if content != ctx.content => {
                debug!(quiz_type = %ctx.quiz_type, "seed content normalized");
                Ok(ctx.replace_content(content))
            }
            _ => Ok(ctx.clone()),
        }
    }
}
