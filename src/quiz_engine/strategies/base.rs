//! Strategy interface and the collaborator bundle every strategy shares.

use std::sync::Arc;

use async_trait::async_trait;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::{info, warn};

use crate::quiz_engine::{
    completion::{TextCompletion, UnavailableCompletion},
    config::QuizConfig,
    error::{CompletionError, GenerationError},
    helpers::{clean_fragment, clean_sentence},
    language::{BuiltinLanguages, LanguageConfig, LanguageProfile},
    models::{Branding, GenerationContext, GenerationResult, QuizType},
};

/// Collaborators injected into every strategy. Built once by the application
/// and cloned cheaply (all fields are `Arc`).
#[derive(Clone)]
pub struct StrategyDeps {
    pub completion: Arc<dyn TextCompletion>,
    pub languages: Arc<dyn LanguageConfig>,
    pub config: Arc<QuizConfig>,
}

impl StrategyDeps {
    pub fn new(
        completion: Arc<dyn TextCompletion>,
        languages: Arc<dyn LanguageConfig>,
        config: QuizConfig,
    ) -> Self {
        Self { completion, languages, config: Arc::new(config) }
    }

    /// No completion backend, built-in languages, default config. Every
    /// strategy runs on its deterministic fallbacks.
    pub fn offline() -> Self {
        Self::new(
            Arc::new(UnavailableCompletion),
            Arc::new(BuiltinLanguages),
            QuizConfig::default(),
        )
    }

    /// One completion call with the configured defaults. Blank replies count
    /// as failures.
    pub async fn ask(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        let options = self.config.completion.options();
        let reply = self.completion.complete(system, user, &options).await?;
        let reply = clean_sentence(&reply);
        if reply.is_empty() {
            return Err(CompletionError::EmptyResponse);
        }
        Ok(reply)
    }

    /// Like [`ask`](Self::ask), but substitutes `fallback` on any failure.
    pub async fn ask_or(&self, system: &str, user: &str, fallback: impl FnOnce() -> String) -> String {
        match self.ask(system, user).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "text completion failed, using fallback text");
                fallback()
            }
        }
    }

    pub fn profile(&self, code: &str) -> Result<LanguageProfile, GenerationError> {
        self.languages.lookup(code).ok_or_else(|| {
            GenerationError::MalformedContent(format!("unsupported language '{code}'"))
        })
    }

    /// Clean a single-word reply and check it against the language.
    /// Returns the upper-cased word.
    pub fn validate_word(&self, raw: &str, profile: &LanguageProfile) -> Result<String, GenerationError> {
        let word = clean_fragment(raw);
        let invalid = |reason: &str| GenerationError::InvalidWord {
            word: word.clone(),
            reason: reason.to_string(),
        };
        if word.is_empty() {
            return Err(invalid("empty"));
        }
        if word.split_whitespace().count() != 1 {
            return Err(invalid("must be a single word"));
        }
        if !word.chars().all(|c| profile.is_letter(c)) {
            return Err(invalid(&format!("contains characters outside {}", profile.display_name)));
        }
        Ok(word.to_uppercase())
    }
}

/// Per-call RNG: deterministic when the request carries a seed.
pub fn seeded_rng(ctx: &GenerationContext) -> StdRng {
    match ctx.options.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None       => StdRng::from_entropy(),
    }
}

/// Pick one entry from a fallback pool.
pub fn pick(pool: &[&'static str], ctx: &GenerationContext) -> String {
    pool.choose(&mut seeded_rng(ctx)).copied().unwrap_or_default().to_string()
}

/// One quiz type's content, validation and auxiliary text.
#[async_trait]
pub trait QuizStrategy: Send + Sync {
    fn quiz_type(&self) -> QuizType;

    fn deps(&self) -> &StrategyDeps;

    /// Build the puzzle. Errors are folded into the result by
    /// [`generate_content`](Self::generate_content).
    async fn try_generate(&self, ctx: &GenerationContext) -> Result<GenerationResult, GenerationError>;

    /// Pipeline entry point. Never fails: any generation error becomes a
    /// result with only `error` set.
    async fn generate_content(&self, ctx: &GenerationContext) -> GenerationResult {
        match self.try_generate(ctx).await {
            Ok(result) if result.is_success() => {
                info!(
                    quiz_type = %self.quiz_type(),
                    language = %ctx.language,
                    answer_len = result.answer.chars().count(),
                    "generated quiz content"
                );
                match &ctx.template_id {
                    Some(id) => result.with_metadata("template_id", id),
                    None => result,
                }
            }
            Ok(result) => result,
            Err(err) => {
                warn!(quiz_type = %self.quiz_type(), language = %ctx.language, error = %err, "quiz generation failed");
                GenerationResult::failure(err.to_string())
            }
        }
    }

    /// Does `content` pass this strategy's own answer rules?
    fn validate_content(&self, content: &str, language: &str) -> bool;

    fn branding(&self) -> Branding;

    fn fallback_titles(&self) -> &'static [&'static str];

    fn fallback_subtitles(&self) -> &'static [&'static str];

    fn fallback_hint(&self) -> &'static str;

    async fn generate_title(&self, ctx: &GenerationContext) -> String {
        let deps = self.deps();
        let language = deps.languages.display_name(&ctx.language);
        let user = format!(
            "Write a catchy title of at most five words for a {} puzzle. Write it in {language}.",
            self.branding().name
        );
        deps.ask_or("You write short puzzle titles.", &user, || pick(self.fallback_titles(), ctx))
            .await
    }

    async fn generate_subtitle(&self, ctx: &GenerationContext) -> String {
        let deps = self.deps();
        let language = deps.languages.display_name(&ctx.language);
        let user = format!(
            "Write a one-line subtitle inviting players to solve a {} puzzle. Write it in {language}.",
            self.branding().name
        );
        deps.ask_or("You write short puzzle subtitles.", &user, || pick(self.fallback_subtitles(), ctx))
            .await
    }

    async fn generate_hint(&self, ctx: &GenerationContext, answer: &str) -> String {
        let deps = self.deps();
        let language = deps.languages.display_name(&ctx.language);
        let user = format!(
            "Give a one-sentence hint for the answer \"{answer}\" without revealing it. Write it in {language}."
        );
        deps.ask_or("You write gentle puzzle hints.", &user, || self.fallback_hint().to_string())
            .await
    }

    async fn generate_solution(&self, ctx: &GenerationContext, answer: &str) -> String;
}
