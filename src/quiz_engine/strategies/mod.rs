//! One strategy per quiz type.
//!
//! Every strategy implements [`QuizStrategy`] and is built from the same
//! [`StrategyDeps`] bundle:
//!
//! ```ignore
//! let deps = StrategyDeps::new(completion, languages, config);
//! let wordle = WordleStrategy::new(deps.clone());
//! let result = wordle.generate_content(&ctx).await;
//! ```
//!
//! The pipeline dispatches to these via `pipeline.rs`.

pub mod base;
/// WORDLE: answer word plus three pre-filled hint rows
pub mod wordle;
/// NUMBER_SEQUENCE: rule detection and five-term puzzles
pub mod number_sequence;
/// RHYME_TIME: rhyming pair with one word masked
pub mod rhyme_time;
/// CONCEPT_CONNECTION: four concept cards and their theme
pub mod concept_connection;

pub use base::{QuizStrategy, StrategyDeps};
pub use concept_connection::ConceptConnectionStrategy;
pub use number_sequence::NumberSequenceStrategy;
pub use rhyme_time::RhymeTimeStrategy;
pub use wordle::WordleStrategy;
