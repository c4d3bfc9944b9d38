use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::quiz_engine::{
    error::GenerationError,
    helpers::{escape_html, format_number},
    language::{LanguageProfile, NumeralSystem},
    models::{Branding, GenerationContext, GenerationResult, QuizType},
    patterns::{self, choose_kind, detect, synthesize, Sequence, CANONICAL_LENGTH, MIN_TERMS},
    strategies::base::{seeded_rng, QuizStrategy, StrategyDeps},
};

const TITLES: &[&str] = &[
    "What Comes Next?",
    "Number Detective",
    "Crack the Sequence",
    "Pattern Hunter",
];

const SUBTITLES: &[&str] = &[
    "Find the rule, then find the missing number.",
    "Five numbers, one rule, one answer.",
];

const HINT: &str = "Compare each number with the one right before it.";

/// Parse a comma-separated list of numbers in any supported numeral system.
pub fn parse_terms(content: &str) -> Result<Vec<f64>, GenerationError> {
    let normalized = NumeralSystem::normalize(content).replace('\u{2212}', "-");
    normalized
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| GenerationError::MalformedContent(format!("'{t}' is not a number")))
        })
        .collect()
}

/// Detect the rule behind `content` and build the canonical sequence.
pub fn sequence_from_content(content: &str) -> Result<Sequence, GenerationError> {
    let terms = parse_terms(content)?;
    if terms.len() < MIN_TERMS {
        return Err(GenerationError::UnrecognizedSequence(format!(
            "need at least {MIN_TERMS} numbers, got {}",
            terms.len()
        )));
    }
    detect(&terms)
        .and_then(|pattern| Sequence::from_seed(pattern, &terms))
        .ok_or_else(|| GenerationError::UnrecognizedSequence(content.trim().to_string()))
}

/// The puzzle's sequence: from seed content, or in generation mode from the
/// `terms` variable handed back by the caller.
fn known_sequence(ctx: &GenerationContext) -> Option<Sequence> {
    if ctx.has_seed_content() {
        return sequence_from_content(&ctx.content).ok();
    }
    let terms: Vec<String> = ctx
        .options
        .variables
        .get("terms")?
        .as_array()?
        .iter()
        .map(|t| match t {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    sequence_from_content(&terms.join(", ")).ok()
}

/// Formula plus worked explanation.
pub fn derivation(seq: &Sequence) -> String {
    format!("{}\n{}", patterns::formula(seq), patterns::explanation(seq))
}

pub struct NumberSequenceStrategy {
    deps: StrategyDeps,
}

impl NumberSequenceStrategy {
    pub fn new(deps: StrategyDeps) -> Self {
        Self { deps }
    }

    fn render(&self, seq: &Sequence, profile: &LanguageProfile) -> String {
        let number = |v: f64| profile.numerals.render(&format_number(v));
        let mut boxes: Vec<String> = seq
            .terms
            .iter()
            .enumerate()
            .map(|(i, &t)| {
                format!(
                    "<div class=\"sequence-box\" data-index=\"{}\">{}</div>",
                    i + 1,
                    escape_html(&number(t))
                )
            })
            .collect();
        boxes.push(format!(
            "<div class=\"sequence-box missing\" data-index=\"{}\">?</div>",
            CANONICAL_LENGTH + 1
        ));
        format!("<div class=\"number-sequence\">{}</div>", boxes.concat())
    }
}

#[async_trait]
impl QuizStrategy for NumberSequenceStrategy {
    fn quiz_type(&self) -> QuizType {
        QuizType::NumberSequence
    }

    fn deps(&self) -> &StrategyDeps {
        &self.deps
    }

    async fn try_generate(&self, ctx: &GenerationContext) -> Result<GenerationResult, GenerationError> {
        let profile = self.deps.profile(&ctx.language)?;
        let seq = if ctx.has_seed_content() {
            sequence_from_content(&ctx.content)?
        } else {
            let mut rng = seeded_rng(ctx);
            let kind = choose_kind(&mut rng);
            synthesize(kind, &mut rng)
        };
        let kind = seq.pattern.kind();
        debug!(pattern = %kind, "number sequence ready");

        let (min, max) = (format_number(seq.min()), format_number(seq.max()));
        let terms: Vec<String> = seq.terms.iter().map(|&t| format_number(t)).collect();
        Ok(GenerationResult::success(self.render(&seq, &profile), format_number(seq.next))
            .with_metadata("pattern", kind)
            .with_metadata("sequence_length", CANONICAL_LENGTH)
            .with_metadata("range", format!("{min}–{max}"))
            .with_metadata("range_min", min)
            .with_metadata("range_max", max)
            .with_metadata("formula", patterns::formula(&seq))
            .with_variable("terms", json!(terms))
            .with_variable("missing_index", CANONICAL_LENGTH + 1)
            .with_variable("solution", derivation(&seq)))
    }

    fn validate_content(&self, content: &str, language: &str) -> bool {
        self.deps.languages.lookup(language).is_some() && sequence_from_content(content).is_ok()
    }

    fn branding(&self) -> Branding {
        Branding {
            name: "Number Sequence",
            tagline: "Spot the pattern",
            accent_color: "#3b82f6",
        }
    }

    fn fallback_titles(&self) -> &'static [&'static str] {
        TITLES
    }

    fn fallback_subtitles(&self) -> &'static [&'static str] {
        SUBTITLES
    }

    fn fallback_hint(&self) -> &'static str {
        HINT
    }

    /// Deterministic: derived from the detected rule, no model call.
    async fn generate_hint(&self, ctx: &GenerationContext, _answer: &str) -> String {
        match known_sequence(ctx) {
            Some(seq) => patterns::hint(seq.pattern.kind()).to_string(),
            None => HINT.to_string(),
        }
    }

    async fn generate_solution(&self, ctx: &GenerationContext, answer: &str) -> String {
        if let Some(seq) = known_sequence(ctx) {
            return derivation(&seq);
        }
        let language = self.deps.languages.display_name(&ctx.language);
        let user = format!(
            "Explain in two sentences why {answer} is the next number in the sequence {}. Write it in {language}.",
            ctx.content.trim()
        );
        self.deps
            .ask_or("You explain number puzzles to curious players.", &user, || {
                format!("The next number in the sequence is {answer}.")
            })
            .await
    }
}
