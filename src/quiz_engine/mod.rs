//! Quiz engine: validation, formatting, and per-quiz-type content generation.
//!
//! ## Module overview
//!
//! | Module       | Purpose |
//! |--------------|---------|
//! | `models`     | Quiz types, request context, result shape, branding |
//! | `error`      | Pipeline, validation, generation, config and logging errors |
//! | `language`   | Language profiles: character sets, numeral systems, alphabets |
//! | `completion` | Text-completion collaborator trait and the offline backend |
//! | `config`     | TOML-backed settings with defaults and validation |
//! | `logging`    | `tracing` subscriber setup |
//! | `helpers`    | Markup builders and model-reply cleanup shared by strategies |
//! | `board`      | Wordle scoring and deterministic hint-row construction |
//! | `patterns`   | Number-sequence rule detection, synthesis and explanations |
//! | `stages`     | `ValidationStep` and `FormattingStep` |
//! | `strategies` | One `QuizStrategy` per quiz type |
//! | `pipeline`   | `GenerationPipeline`: stages, then strategy dispatch |

pub mod board;
pub mod completion;
pub mod config;
pub mod error;
pub mod helpers;
pub mod language;
pub mod logging;
pub mod models;
pub mod patterns;
pub mod pipeline;
pub mod stages;
pub mod strategies;

// Re-export the public API surface so callers can use
// `quiz_engine::GenerationPipeline` without reaching into sub-modules.
pub use completion::{CompletionOptions, TextCompletion, UnavailableCompletion};
pub use config::{QuizConfig, ScoringMode};
pub use error::{CompletionError, ConfigError, GenerationError, LoggingError, PipelineError, ValidationError};
pub use language::{BuiltinLanguages, LanguageConfig, LanguageProfile, NumeralSystem, Script};
pub use logging::{init_logging, LoggingConfig};
pub use models::{Branding, GenerationContext, GenerationOptions, GenerationResult, QuizType};
pub use pipeline::GenerationPipeline;
pub use stages::{FormattingStep, PipelineStage, ValidationStep};
pub use strategies::{
    ConceptConnectionStrategy, NumberSequenceStrategy, QuizStrategy, RhymeTimeStrategy, StrategyDeps,
    WordleStrategy,
};
