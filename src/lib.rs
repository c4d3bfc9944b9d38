//! # quiz_content_gen
//!
//! Quiz-content generation for four puzzle types: word guessing (Wordle),
//! number sequences, rhyming pairs and concept connections.
//!
//! Given a quiz type, a target language and optional seed content, the
//! pipeline produces renderable puzzle markup, the correct answer, and the
//! auxiliary text a quiz page needs (title, subtitle, hint, solution,
//! branding).
//!
//! ## How it works
//!
//! 1. Build a [`GenerationContext`] with a [`QuizType`], a language code and,
//!    optionally, seed content. Empty content means "generate from scratch".
//! 2. Call [`GenerationPipeline::process`]. The context passes through
//!    [`ValidationStep`] (unknown language or malformed seed is a terminal
//!    error) and [`FormattingStep`] (canonical upper-case words, localized
//!    numerals, concept cards), then reaches the [`QuizStrategy`] registered
//!    for the quiz type.
//! 3. The returned [`GenerationResult`] holds `content` and `answer`, or only
//!    `error` when generation failed. Metadata and template variables describe
//!    the puzzle for the rendering layer.
//!
//! ## Key features
//!
//! - **Offline fallbacks**: every strategy works against
//!   [`UnavailableCompletion`], substituting fixed titles, hints and rhyme
//!   pairs for model output.
//! - **Deterministic**: set `options.rng_seed` to reproduce hint rows, number
//!   sequences and reveal positions exactly.
//! - **Language-aware**: words are checked against the language's character
//!   set and numbers render in its numeral system.
//!
//! ## Quick start
//!
//! ```rust
//! use quiz_content_gen::{GenerationContext, GenerationPipeline, QuizType, StrategyDeps};
//!
//! let pipeline = GenerationPipeline::new(StrategyDeps::offline());
//! let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//!
//! // Seeded sequence: the rule is detected and the next term is the answer.
//! let ctx = GenerationContext::new(QuizType::NumberSequence, "en").with_content("2, 4, 6, 8, 10");
//! let result = runtime.block_on(pipeline.process(&ctx)).unwrap();
//! assert_eq!(result.answer, "12");
//! assert_eq!(result.metadata["pattern"], "arithmetic");
//!
//! // Auxiliary text comes from the same strategy.
//! let strategy = pipeline.strategy(QuizType::NumberSequence).unwrap();
//! let hint = runtime.block_on(strategy.generate_hint(&ctx, &result.answer));
//! println!("{}: {hint}", strategy.branding().name);
//! ```

pub mod quiz_engine;

// Convenience re-exports so callers can use `quiz_content_gen::GenerationPipeline`
// directly without reaching into `quiz_engine::`.
pub use quiz_engine::{
    init_logging, Branding, BuiltinLanguages, CompletionError, CompletionOptions, ConfigError,
    FormattingStep, GenerationContext, GenerationError, GenerationOptions, GenerationPipeline,
    GenerationResult, LanguageConfig, LanguageProfile, LoggingConfig, LoggingError, PipelineError,
    PipelineStage, QuizConfig, QuizStrategy, QuizType, StrategyDeps, TextCompletion,
    UnavailableCompletion, ValidationError, ValidationStep,
};
