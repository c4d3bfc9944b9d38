use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::quiz_engine::{
    board::{score, BoardBuilder, LetterState, HINT_ROWS},
    error::GenerationError,
    helpers::{escape_html, first_word},
    language::LanguageProfile,
    models::{Branding, GenerationContext, GenerationResult, QuizType},
    strategies::base::{seeded_rng, QuizStrategy, StrategyDeps},
};

const TITLES: &[&str] = &[
    "Word of the Day",
    "Crack the Code",
    "Letter by Letter",
    "Guess the Word",
    "Five Tiles to Glory",
];

const SUBTITLES: &[&str] = &[
    "Three rows are already on the board. Can you finish it?",
    "Use the coloured tiles to close in on the hidden word.",
    "Every tile is a clue.",
];

const HINT: &str = "Start with the green tile, then move the yellow letters into new spots.";

/// Labels shown in the legend for the three tile classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintLabels {
    pub correct: String,
    pub present: String,
    pub absent: String,
}

impl HintLabels {
    pub fn english() -> Self {
        Self {
            correct: "Correct letter, correct spot".to_string(),
            present: "Correct letter, wrong spot".to_string(),
            absent: "Letter not in the word".to_string(),
        }
    }

    fn for_state(&self, state: LetterState) -> &str {
        match state {
            LetterState::Correct => &self.correct,
            LetterState::Present => &self.present,
            LetterState::Absent  => &self.absent,
        }
    }

    /// Pull the JSON object out of a model reply.
    fn parse(reply: &str) -> Option<Self> {
        let start = reply.find('{')?;
        let end = reply.rfind('}')?;
        let labels: HintLabels = serde_json::from_str(reply.get(start..=end)?).ok()?;
        let filled = [&labels.correct, &labels.present, &labels.absent]
            .iter()
            .all(|l| !l.trim().is_empty());
        filled.then_some(labels)
    }
}

pub struct WordleStrategy {
    deps: StrategyDeps,
    /// Translated legend labels by language code. Filled lazily, never evicted.
    labels: RwLock<HashMap<String, HintLabels>>,
}

impl WordleStrategy {
    pub fn new(deps: StrategyDeps) -> Self {
        Self { deps, labels: RwLock::new(HashMap::new()) }
    }

    /// Validate a candidate answer: one word, legal letters, length in bounds.
    fn check_word(&self, raw: &str, profile: &LanguageProfile) -> Result<String, GenerationError> {
        let word = self.deps.validate_word(raw, profile)?;
        let settings = &self.deps.config.wordle;
        let len = word.chars().count();
        if len < settings.min_length || len > settings.max_length {
            return Err(GenerationError::InvalidWord {
                word,
                reason: format!(
                    "must be between {} and {} letters (got {len})",
                    settings.min_length, settings.max_length
                ),
            });
        }
        Ok(word)
    }

    /// Ask the model for an answer word. An invalid reply is rejected, not
    /// retried.
    async fn request_word(&self, profile: &LanguageProfile) -> Result<String, GenerationError> {
        let settings = &self.deps.config.wordle;
        let user = format!(
            "Give me a single common {} word between {} and {} letters long. Reply with the word only.",
            profile.display_name, settings.min_length, settings.max_length
        );
        let reply = self
            .deps
            .ask("You pick answer words for a word-guessing game.", &user)
            .await?;
        self.check_word(&first_word(&reply), profile)
    }

    /// Legend labels for `profile`, translated once per language.
    pub async fn hint_labels(&self, profile: &LanguageProfile) -> HintLabels {
        if profile.code == "en" {
            return HintLabels::english();
        }
        let cached = self.labels.read().get(&profile.code).cloned();
        if let Some(labels) = cached {
            return labels;
        }

        let english = HintLabels::english();
        let user = format!(
            "Translate these word-game tile labels into {}. Reply with JSON only, using the keys \
             \"correct\", \"present\" and \"absent\".\n{}",
            profile.display_name,
            json!(english)
        );
        let labels = match self.deps.ask("You translate short UI labels.", &user).await {
            Ok(reply) => HintLabels::parse(&reply).unwrap_or_else(|| {
                warn!(language = %profile.code, "could not parse translated tile labels");
                HintLabels::english()
            }),
            Err(err) => {
                // Not cached: the backend may come back.
                warn!(language = %profile.code, error = %err, "tile label translation unavailable");
                return english;
            }
        };

        // Concurrent first calls may both land here; they insert equivalent values.
        self.labels.write().insert(profile.code.clone(), labels.clone());
        labels
    }

    fn render_row(&self, index: usize, row: &[char], states: &[LetterState], labels: &HintLabels) -> String {
        let tiles: String = row
            .iter()
            .zip(states)
            .map(|(c, state)| {
                format!(
                    "<span class=\"wordle-tile {}\" title=\"{}\">{}</span>",
                    state.css_class(),
                    escape_html(labels.for_state(*state)),
                    escape_html(&c.to_string())
                )
            })
            .collect();
        format!("<div class=\"wordle-row\" data-attempt=\"{index}\">{tiles}</div>")
    }

    fn render_legend(&self, labels: &HintLabels) -> String {
        let entries: String = [LetterState::Correct, LetterState::Present, LetterState::Absent]
            .into_iter()
            .map(|state| {
                format!(
                    "<li><span class=\"wordle-tile {}\"></span>{}</li>",
                    state.css_class(),
                    escape_html(labels.for_state(state))
                )
            })
            .collect();
        format!("<ul class=\"wordle-legend\">{entries}</ul>")
    }
}

#[async_trait]
impl QuizStrategy for WordleStrategy {
    fn quiz_type(&self) -> QuizType {
        QuizType::Wordle
    }

    fn deps(&self) -> &StrategyDeps {
        &self.deps
    }

    async fn try_generate(&self, ctx: &GenerationContext) -> Result<GenerationResult, GenerationError> {
        let profile = self.deps.profile(&ctx.language)?;
        let answer = if ctx.has_seed_content() {
            self.check_word(&ctx.content, &profile)?
        } else {
            self.request_word(&profile).await?
        };
        debug!(length = answer.chars().count(), "building word board");

        let letters: Vec<char> = answer.chars().collect();
        let attempts = {
            let mut rng = seeded_rng(ctx);
            BoardBuilder::new(&letters, &profile, &mut rng)
                .map(|builder| builder.build(&profile))
                .ok_or_else(|| GenerationError::InvalidWord {
                    word: answer.clone(),
                    reason: "uses every letter of the alphabet".to_string(),
                })?
        };
        let labels = self.hint_labels(&profile).await;

        let scoring = self.deps.config.wordle.scoring;
        let mut rows = Vec::with_capacity(HINT_ROWS);
        let mut scores = Vec::with_capacity(HINT_ROWS);
        for (i, row) in attempts.iter().enumerate() {
            let states = score(row, &letters, scoring);
            rows.push(self.render_row(i + 1, row, &states, &labels));
            scores.push(states);
        }
        let legend = self.render_legend(&labels);
        let content = format!(
            "<div class=\"wordle-board\" data-length=\"{}\">{}{}</div>",
            letters.len(),
            rows.concat(),
            legend
        );

        let words: Vec<String> = attempts.iter().map(|row| row.iter().collect()).collect();
        let mut result = GenerationResult::success(content, answer.clone())
            .with_metadata("word_length", letters.len())
            .with_metadata("attempt_count", HINT_ROWS)
            .with_metadata("max_attempts", self.deps.config.wordle.max_attempts)
            .with_variable("attempts", json!(words))
            .with_variable("scores", json!(scores))
            .with_variable("legend", legend)
            .with_variable("word_length", letters.len());
        for (i, row) in rows.into_iter().enumerate() {
            result = result.with_variable(&format!("attempt_{}", i + 1), row);
        }
        Ok(result)
    }

    fn validate_content(&self, content: &str, language: &str) -> bool {
        self.deps
            .languages
            .lookup(language)
            .is_some_and(|profile| self.check_word(content, &profile).is_ok())
    }

    fn branding(&self) -> Branding {
        Branding {
            name: "Wordle",
            tagline: "Guess the hidden word",
            accent_color: "#6aaa64",
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

    async fn generate_solution(&self, _ctx: &GenerationContext, answer: &str) -> String {
        format!(
            "The hidden word is {answer}. Green tiles were already in the right spot, \
             yellow tiles belonged somewhere else in the word, and grey tiles were not in it at all."
        )
    }
}
