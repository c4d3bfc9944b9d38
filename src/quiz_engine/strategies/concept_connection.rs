use async_trait::async_trait;
use tracing::{debug, warn};

use crate::quiz_engine::{
    error::GenerationError,
    helpers::{clean_fragment, container, escape_html},
    language::LanguageProfile,
    models::{Branding, GenerationContext, GenerationResult, QuizType},
    strategies::base::{QuizStrategy, StrategyDeps},
};

/// Every puzzle shows exactly this many cards.
pub const CONCEPT_COUNT: usize = 4;

const CARD_OPEN: &str = "<div class=\"concept-card\"";

const TITLES: &[&str] = &["What's the Link?", "Connect the Dots", "Common Thread", "Four of a Kind"];

const SUBTITLES: &[&str] = &[
    "Four words, one hidden connection.",
    "What do these cards have in common?",
];

const HINT: &str = "Think about where you might find all four of these together.";

fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Card texts in document order, or `None` when a card is not closed.
fn parse_cards(markup: &str) -> Option<Vec<String>> {
    markup
        .split(CARD_OPEN)
        .skip(1)
        .map(|rest| {
            let body = &rest[rest.find('>')? + 1..];
            let text = &body[..body.find("</div>")?];
            Some(unescape_html(text.trim()))
        })
        .collect()
}

/// Split seed content into raw concept tokens. Accepts a comma/newline list
/// or card markup produced by [`render_cards`].
pub fn parse_concepts(content: &str) -> Result<Vec<String>, GenerationError> {
    if content.trim_start().starts_with('<') {
        return parse_cards(content)
            .filter(|cards| !cards.is_empty())
            .ok_or_else(|| GenerationError::MalformedContent("malformed concept markup".to_string()));
    }
    Ok(content
        .split([',', '\n'])
        .map(clean_fragment)
        .filter(|t| !t.is_empty())
        .collect())
}

/// Concept-card grid, one card per concept, in order.
pub fn render_cards(concepts: &[String]) -> String {
    let cards: Vec<String> = concepts
        .iter()
        .enumerate()
        .map(|(i, concept)| format!("{CARD_OPEN} data-index=\"{}\">{}</div>", i + 1, escape_html(concept)))
        .collect();
    container("concept-grid", &cards)
}

pub struct ConceptConnectionStrategy {
    deps: StrategyDeps,
}

impl ConceptConnectionStrategy {
    pub fn new(deps: StrategyDeps) -> Self {
        Self { deps }
    }

    /// Seed content must name exactly four valid, distinct concepts.
    fn seed_concepts(&self, content: &str, profile: &LanguageProfile) -> Result<Vec<String>, GenerationError> {
        let tokens = parse_concepts(content)?;
        if tokens.len() > CONCEPT_COUNT {
            return Err(GenerationError::MalformedContent(format!(
                "expected {CONCEPT_COUNT} concepts, got {}",
                tokens.len()
            )));
        }
        let mut concepts: Vec<String> = Vec::with_capacity(CONCEPT_COUNT);
        for token in &tokens {
            let concept = self.deps.validate_word(token, profile)?;
            if !concepts.contains(&concept) {
                concepts.push(concept);
            }
        }
        if concepts.len() != CONCEPT_COUNT {
            return Err(GenerationError::DuplicateConcepts { found: concepts.len() });
        }
        Ok(concepts)
    }

    /// Ask for four words. Invalid words are dropped; duplicates collapse.
    async fn request_concepts(
        &self,
        profile: &LanguageProfile,
        theme: Option<&str>,
    ) -> Result<Vec<String>, GenerationError> {
        let language = &profile.display_name;
        let user = match theme {
            Some(theme) => format!(
                "List four single {language} words connected to \"{theme}\" in a way that is not obvious. \
                 Separate them with commas."
            ),
            None => format!(
                "List four single {language} words that share a surprising but fair connection. \
                 Separate them with commas."
            ),
        };
        let reply = self
            .deps
            .ask("You design word-association puzzles. Reply with the words only.", &user)
            .await?;

        let mut concepts: Vec<String> = Vec::with_capacity(CONCEPT_COUNT);
        for token in parse_concepts(&reply)? {
            match self.deps.validate_word(&token, profile) {
                Ok(concept) if !concepts.contains(&concept) => concepts.push(concept),
                Ok(_) => {}
                Err(err) => debug!(error = %err, "dropping concept"),
            }
        }
        if concepts.len() < CONCEPT_COUNT {
            return Err(GenerationError::DuplicateConcepts { found: concepts.len() });
        }
        concepts.truncate(CONCEPT_COUNT);
        Ok(concepts)
    }

    async fn request_theme(&self, concepts: &[String], profile: &LanguageProfile) -> Result<String, GenerationError> {
        let user = format!(
            "In at most three words, what connects {}? Reply in {} with the connection only.",
            concepts.join(", "),
            profile.display_name
        );
        match self.deps.ask("You name the link between words.", &user).await {
            Ok(theme) => Ok(theme),
            Err(err) => {
                warn!(error = %err, "theme request failed");
                Err(GenerationError::MissingTheme)
            }
        }
    }
}

fn preset_theme(ctx: &GenerationContext) -> Option<&str> {
    ctx.options.theme.as_deref().map(str::trim).filter(|t| !t.is_empty())
}

#[async_trait]
impl QuizStrategy for ConceptConnectionStrategy {
    fn quiz_type(&self) -> QuizType {
        QuizType::ConceptConnection
    }

    fn deps(&self) -> &StrategyDeps {
        &self.deps
    }

    async fn try_generate(&self, ctx: &GenerationContext) -> Result<GenerationResult, GenerationError> {
        let profile = self.deps.profile(&ctx.language)?;
        let preset = preset_theme(ctx);

        let concepts = if ctx.has_seed_content() {
            self.seed_concepts(&ctx.content, &profile)?
        } else {
            self.request_concepts(&profile, preset).await?
        };
        let theme = match preset {
            Some(theme) => theme.to_string(),
            None => self.request_theme(&concepts, &profile).await?,
        };
        debug!(theme = %theme, "concepts ready");

        let mut result = GenerationResult::success(render_cards(&concepts), theme.as_str())
            .with_metadata("theme", &theme)
            .with_metadata("concept_count", concepts.len());
        for (i, concept) in concepts.iter().enumerate() {
            result = result.with_variable(&format!("concept_{}", i + 1), concept.as_str());
        }
        Ok(result)
    }

    fn validate_content(&self, content: &str, language: &str) -> bool {
        self.deps
            .languages
            .lookup(language)
            .is_some_and(|profile| self.seed_concepts(content, &profile).is_ok())
    }

    fn branding(&self) -> Branding {
        Branding {
            name: "Concept Connection",
            tagline: "Find what links them",
            accent_color: "#8b5cf6",
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

    async fn generate_solution(&self, ctx: &GenerationContext, answer: &str) -> String {
        match parse_concepts(&ctx.content) {
            Ok(concepts) if !concepts.is_empty() => {
                let cards: Vec<String> = concepts.iter().map(|c| c.to_uppercase()).collect();
                format!("{} are all linked by {answer}.", cards.join(", "))
            }
            _ => format!("The connection is {answer}."),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::quiz_engine::{
        completion::testing::ScriptedCompletion, config::QuizConfig, language::BuiltinLanguages,
    };

    fn strategy(llm: ScriptedCompletion) -> ConceptConnectionStrategy {
        ConceptConnectionStrategy::new(StrategyDeps::new(
            Arc::new(llm),
            Arc::new(BuiltinLanguages),
            QuizConfig::default(),
        ))
    }

    fn ctx(content: &str) -> GenerationContext {
        GenerationContext::new(QuizType::ConceptConnection, "en").with_content(content)
    }

    #[test]
    fn cards_round_trip_through_the_parser() {
        let concepts: Vec<String> = ["SALT", "PEPPER", "R&B", "JAZZ"].iter().map(|s| s.to_string()).collect();
        let markup = render_cards(&concepts);
        assert_eq!(markup.matches("concept-card").count(), 4);
        assert!(markup.contains("R&amp;B"));
        assert_eq!(parse_concepts(&markup).unwrap(), concepts);
        assert_eq!(render_cards(&parse_concepts(&markup).unwrap()), markup);
    }

    #[test]
    fn list_parsing_strips_numbering() {
        assert_eq!(
            parse_concepts("1. apple\n2. pear, plum,\n- fig").unwrap(),
            vec!["apple", "pear", "plum", "fig"]
        );
        assert!(matches!(
            parse_concepts("<div class=\"concept-card\">APPLE"),
            Err(GenerationError::MalformedContent(_))
        ));
        assert!(parse_concepts("<p>nothing here</p>").is_err());
    }

    #[tokio::test]
    async fn generated_concepts_get_a_theme() {
        let llm = ScriptedCompletion::new()
            .reply("Separate them with commas", &["Bark, trunk, ring, branch, leaf"])
            .reply("what connects", &["\"Trees\""]);
        let r = strategy(llm).generate_content(&ctx("")).await;
        assert_eq!(r.answer, "Trees");
        assert_eq!(r.metadata["theme"], "Trees");
        assert_eq!(r.metadata["concept_count"], "4");
        assert_eq!(r.variables["concept_1"], "BARK");
        assert_eq!(r.variables["concept_4"], "BRANCH");
        assert!(!r.content.contains("LEAF"));
    }

    #[tokio::test]
    async fn three_distinct_concepts_is_an_error() {
        let llm = ScriptedCompletion::new()
            .reply("Separate them with commas", &["apple, Apple, pear, plum"])
            .reply("what connects", &["Fruit"]);
        let r = strategy(llm).generate_content(&ctx("")).await;
        assert_eq!(r.error.as_deref(), Some("expected 4 distinct concepts, got 3"));
        assert!(r.content.is_empty());
        assert!(r.answer.is_empty());
    }

    #[tokio::test]
    async fn preset_theme_skips_the_theme_request() {
        let llm = Arc::new(ScriptedCompletion::new().reply("Separate them with commas", &["sun, sand, surf, shell"]));
        let s = ConceptConnectionStrategy::new(StrategyDeps::new(
            llm.clone(),
            Arc::new(BuiltinLanguages),
            QuizConfig::default(),
        ));
        let r = s.generate_content(&ctx("").with_theme("Beach")).await;
        assert_eq!(r.answer, "Beach");
        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains("connected to \"Beach\""));
    }

    #[tokio::test]
    async fn seed_list_and_markup_are_both_accepted() {
        let s = ConceptConnectionStrategy::new(StrategyDeps::offline());
        let list = s.generate_content(&ctx("red, green, blue, yellow").with_theme("Colours")).await;
        assert_eq!(list.variables["concept_3"], "BLUE");

        let markup = s.generate_content(&ctx(&list.content).with_theme("Colours")).await;
        assert_eq!(markup.content, list.content);
    }

    #[tokio::test]
    async fn missing_theme_offline_is_an_error() {
        let s = ConceptConnectionStrategy::new(StrategyDeps::offline());
        let r = s.generate_content(&ctx("red, green, blue, yellow")).await;
        assert_eq!(r.error.as_deref(), Some(GenerationError::MissingTheme.to_string().as_str()));
    }

    #[tokio::test]
    async fn solution_lists_cards_and_theme() {
        let s = ConceptConnectionStrategy::new(StrategyDeps::offline());
        assert_eq!(
            s.generate_solution(&ctx("red, green, blue, yellow"), "Colours").await,
            "RED, GREEN, BLUE, YELLOW are all linked by Colours."
        );
        assert_eq!(s.generate_solution(&ctx(""), "Colours").await, "The connection is Colours.");
    }

    #[test]
    fn validate_content_requires_four_distinct_words() {
        let s = ConceptConnectionStrategy::new(StrategyDeps::offline());
        assert!(!s.validate_content("ant, bee, cat, d0g", "en"));
        assert!(s.validate_content("ant, bee, cat, dog", "en"));
        assert!(!s.validate_content("ant, bee, cat", "en"));
        assert!(!s.validate_content("ant, bee, cat, Ant", "en"));
        assert!(!s.validate_content("ant, bee, cat, dog, elk", "en"));
    }
}
