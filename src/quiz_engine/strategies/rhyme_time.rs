use async_trait::async_trait;
use rand::{seq::SliceRandom, Rng};
use tracing::{debug, warn};

use crate::quiz_engine::{
    error::GenerationError,
    helpers::{element, escape_html},
    language::LanguageProfile,
    models::{Branding, GenerationContext, GenerationResult, QuizType},
    strategies::base::{seeded_rng, QuizStrategy, StrategyDeps},
};

const SYSTEM: &str = "You pick simple words for a rhyming word game. Reply with a single word.";

const TITLES: &[&str] = &["Rhyme Time", "Perfect Pair", "Sounds Alike", "Find the Rhyme"];

const SUBTITLES: &[&str] = &[
    "One word is showing. Which word rhymes with it?",
    "Complete the rhyming pair.",
];

const HINT: &str = "Say the visible word out loud and listen to how it ends.";

/// Pairs used when generation keeps failing, by language.
const FALLBACK_PAIRS: &[(&str, &[(&str, &str)])] = &[
    ("en", &[
        ("CAT", "HAT"), ("MOON", "SPOON"), ("LIGHT", "NIGHT"), ("CAKE", "LAKE"),
        ("FROG", "LOG"), ("RAIN", "TRAIN"), ("BOAT", "COAT"), ("BEE", "TREE"),
    ]),
    ("es", &[("CASA", "MASA"), ("GATO", "PATO"), ("LUNA", "CUNA"), ("MANO", "GRANO")]),
    ("fr", &[("CHAT", "RAT"), ("MAISON", "SAISON"), ("BATEAU", "GÂTEAU"), ("FLEUR", "COEUR")]),
    ("de", &[("HAUS", "MAUS"), ("BAUM", "TRAUM"), ("HUND", "MUND"), ("KATZE", "TATZE")]),
    ("it", &[("GATTO", "MATTO"), ("SOLE", "MOLE"), ("LUNA", "CUNA"), ("MARE", "CARE")]),
    ("pt", &[("GATO", "PATO"), ("MÃO", "PÃO"), ("CASA", "ASA"), ("LUA", "RUA")]),
    ("nl", &[("HUIS", "MUIS"), ("BOOM", "DROOM"), ("KAT", "MAT")]),
    ("sv", &[("KATT", "MATT"), ("BIL", "PIL"), ("HUS", "MUS"), ("SOL", "STOL")]),
    ("pl", &[("KOT", "PŁOT"), ("NOS", "KOS"), ("LAS", "PAS")]),
    ("tr", &[("KAR", "YAR"), ("TAŞ", "BAŞ"), ("BAL", "DAL")]),
    ("ru", &[("КОТ", "РОТ"), ("ДОМ", "ГНОМ"), ("МАК", "РАК")]),
    ("uk", &[("МАК", "РАК"), ("ДІМ", "ГРІМ"), ("ЛИС", "РИС")]),
    ("el", &[("ΦΩΣ", "ΠΩΣ"), ("ΜΑΤΙ", "ΚΑΤΙ"), ("ΝΕΡΟ", "ΓΕΡΟ")]),
    ("ar", &[("قمر", "سمر"), ("باب", "ناب"), ("نار", "دار")]),
    ("fa", &[("ماه", "راه"), ("دست", "مست"), ("گل", "دل")]),
    ("he", &[("שיר", "עיר"), ("בית", "זית"), ("ים", "דם")]),
    ("hi", &[("दिल", "मिल"), ("रात", "बात"), ("नाम", "काम")]),
];

/// Where the pair came from; reported in metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairSource {
    Seed,
    Generated,
    Fallback,
}

impl PairSource {
    fn as_str(self) -> &'static str {
        match self {
            PairSource::Seed      => "seed",
            PairSource::Generated => "generated",
            PairSource::Fallback  => "fallback",
        }
    }
}

/// Longest shared ending of two words, in characters.
fn shared_ending(a: &str, b: &str) -> String {
    let mut ending: Vec<char> = a
        .chars()
        .rev()
        .zip(b.chars().rev())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x)
        .collect();
    ending.reverse();
    ending.into_iter().collect()
}

fn split_pair(answer: &str) -> Option<(&str, &str)> {
    let (first, second) = answer.split_once('-')?;
    (!first.is_empty() && !second.is_empty() && !second.contains('-')).then_some((first, second))
}

pub struct RhymeTimeStrategy {
    deps: StrategyDeps,
}

impl RhymeTimeStrategy {
    pub fn new(deps: StrategyDeps) -> Self {
        Self { deps }
    }

    fn check_pair(&self, first: &str, second: &str, profile: &LanguageProfile) -> Result<(String, String), GenerationError> {
        let first = self.deps.validate_word(first, profile)?;
        let second = self.deps.validate_word(second, profile)?;
        // Both are upper-cased already.
        if first == second {
            return Err(GenerationError::InvalidWord {
                word: second,
                reason: "must differ from the first word".to_string(),
            });
        }
        Ok((first, second))
    }

    fn parse_seed(&self, content: &str, profile: &LanguageProfile) -> Result<(String, String), GenerationError> {
        let tokens: Vec<&str> = content.split('-').map(str::trim).collect();
        match tokens.as_slice() {
            [first, second] => self.check_pair(first, second, profile),
            _ => Err(GenerationError::MalformedContent(format!(
                "expected two hyphen-separated words, got '{}'",
                content.trim()
            ))),
        }
    }

    /// One generation attempt: first word, rhyming second word, and for
    /// English a yes/no confirmation.
    async fn attempt_pair(&self, profile: &LanguageProfile) -> Result<(String, String), GenerationError> {
        let language = &profile.display_name;
        let first = self
            .deps
            .ask(SYSTEM, &format!("Give me one short, common {language} word that is easy to rhyme. Reply with the word only."))
            .await?;
        let first = self.deps.validate_word(&first, profile)?;

        let second = self
            .deps
            .ask(SYSTEM, &format!("Give me one common {language} word that rhymes with \"{first}\". Reply with the word only."))
            .await?;
        let (first, second) = self.check_pair(&first, &second, profile)?;

        // Rhyme judgement is only trusted in English.
        if profile.code == "en" {
            let verdict = self
                .deps
                .ask(
                    "You judge whether two English words rhyme. Answer yes or no.",
                    &format!("Do the words \"{first}\" and \"{second}\" rhyme? Answer yes or no."),
                )
                .await?;
            if verdict.trim_start().to_lowercase().starts_with("no") {
                return Err(GenerationError::InvalidWord {
                    word: second,
                    reason: format!("does not rhyme with {first}"),
                });
            }
        }
        Ok((first, second))
    }

    /// A pair from the language's table (English for codes without one),
    /// keeping only pairs that pass the language's word rules.
    fn fallback_pair<R: Rng>(&self, profile: &LanguageProfile, rng: &mut R) -> Result<(String, String), GenerationError> {
        let table = FALLBACK_PAIRS
            .iter()
            .find(|(code, _)| *code == profile.code)
            .or_else(|| FALLBACK_PAIRS.first())
            .map(|(_, pairs)| *pairs)
            .unwrap_or_default();
        let usable: Vec<(String, String)> = table
            .iter()
            .filter_map(|(a, b)| self.check_pair(a, b, profile).ok())
            .collect();
        usable
            .choose(rng)
            .cloned()
            .ok_or_else(|| GenerationError::NoFallbackPair(profile.code.clone()))
    }

    async fn resolve_pair(&self, ctx: &GenerationContext, profile: &LanguageProfile) -> Result<(String, String, PairSource), GenerationError> {
        if ctx.has_seed_content() {
            let (a, b) = self.parse_seed(&ctx.content, profile)?;
            return Ok((a, b, PairSource::Seed));
        }

        let max_attempts = self.deps.config.rhyme.max_attempts;
        for attempt in 1..=max_attempts {
            match self.attempt_pair(profile).await {
                Ok((a, b)) => return Ok((a, b, PairSource::Generated)),
                Err(err) => warn!(attempt, max_attempts, error = %err, "rhyme attempt abandoned"),
            }
        }

        warn!(language = %profile.code, "rhyme generation exhausted, using fallback pair");
        let (a, b) = self.fallback_pair(profile, &mut seeded_rng(ctx))?;
        Ok((a, b, PairSource::Fallback))
    }
}

#[async_trait]
impl QuizStrategy for RhymeTimeStrategy {
    fn quiz_type(&self) -> QuizType {
        QuizType::RhymeTime
    }

    fn deps(&self) -> &StrategyDeps {
        &self.deps
    }

    async fn try_generate(&self, ctx: &GenerationContext) -> Result<GenerationResult, GenerationError> {
        let profile = self.deps.profile(&ctx.language)?;
        let (first, second, source) = self.resolve_pair(ctx, &profile).await?;
        debug!(source = source.as_str(), "rhyme pair ready");

        let revealed_position = if seeded_rng(ctx).gen_bool(0.5) { 0 } else { 1 };
        let words = [&first, &second];
        let revealed = words[revealed_position];
        let masked = words[1 - revealed_position];
        let mask: String = "_".repeat(masked.chars().count());
        let masked_html = format!(
            "<span class=\"rhyme-word masked\" data-length=\"{}\">{}</span>",
            masked.chars().count(),
            escape_html(&mask)
        );
        let revealed_html = element("span", "rhyme-word revealed", revealed);
        let separator = element("span", "rhyme-separator", "-");
        let pair = if revealed_position == 0 {
            [revealed_html, separator, masked_html]
        } else {
            [masked_html, separator, revealed_html]
        };
        let content = format!("<div class=\"rhyme-pair\">{}</div>", pair.concat());

        Ok(GenerationResult::success(content, format!("{first}-{second}"))
            .with_metadata("revealed_position", revealed_position)
            .with_metadata("source", source.as_str())
            .with_variable("revealed_word", revealed.as_str())
            .with_variable("masked_length", masked.chars().count()))
    }

    fn validate_content(&self, content: &str, language: &str) -> bool {
        self.deps
            .languages
            .lookup(language)
            .is_some_and(|profile| self.parse_seed(content, &profile).is_ok())
    }

    fn branding(&self) -> Branding {
        Branding {
            name: "Rhyme Time",
            tagline: "Find the missing rhyme",
            accent_color: "#f59e0b",
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

    /// Names the first letter of the masked word. The masked side is read
    /// from `revealed_position` in the request metadata; without it the
    /// second word is assumed hidden.
    async fn generate_hint(&self, ctx: &GenerationContext, answer: &str) -> String {
        let Some((first, second)) = split_pair(answer) else {
            return HINT.to_string();
        };
        let (shown, hidden) = match ctx.options.metadata.get("revealed_position").map(String::as_str) {
            Some("1") => (second, first),
            _ => (first, second),
        };
        match hidden.chars().next() {
            Some(letter) => format!("The missing word starts with \"{letter}\" and rhymes with {shown}."),
            None => HINT.to_string(),
        }
    }

    async fn generate_solution(&self, _ctx: &GenerationContext, answer: &str) -> String {
        match split_pair(answer) {
            Some((first, second)) => {
                let ending = shared_ending(first, second);
                if ending.is_empty() {
                    format!("{first} and {second} are the rhyming pair.")
                } else {
                    format!("{first} and {second} rhyme: both end with \"{ending}\".")
                }
            }
            None => format!("The rhyming pair is {answer}."),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::quiz_engine::{
        completion::testing::ScriptedCompletion,
        config::QuizConfig,
        language::{BuiltinLanguages, LanguageConfig, NumeralSystem, Script},
    };
    use rand::{rngs::StdRng, SeedableRng};

    fn strategy(llm: Arc<ScriptedCompletion>) -> RhymeTimeStrategy {
        RhymeTimeStrategy::new(StrategyDeps::new(llm, Arc::new(BuiltinLanguages), QuizConfig::default()))
    }

    fn ctx(language: &str, content: &str) -> GenerationContext {
        GenerationContext::new(QuizType::RhymeTime, language).with_content(content).with_seed(4)
    }

    fn assert_pair_shape(r: &GenerationResult) {
        let (a, b) = split_pair(&r.answer).expect("answer must be FIRST-SECOND");
        assert!(!a.eq_ignore_ascii_case(b));
    }

    #[tokio::test]
    async fn seed_pair_is_accepted_without_confirmation() {
        let llm = Arc::new(ScriptedCompletion::new());
        let r = strategy(llm.clone()).generate_content(&ctx("en", "CAT-HAT")).await;
        assert_eq!(r.answer, "CAT-HAT");
        assert_eq!(r.metadata["source"], "seed");
        assert!(llm.calls().is_empty());
        assert!(r.content.contains("rhyme-word revealed"));
        assert!(r.content.contains("___"));
    }

    #[tokio::test]
    async fn identical_seed_words_are_rejected() {
        let llm = Arc::new(ScriptedCompletion::new());
        let r = strategy(llm).generate_content(&ctx("en", "Cat-CAT")).await;
        assert!(r.error.unwrap().contains("must differ"));
    }

    #[tokio::test]
    async fn confirmed_english_pair_is_generated() {
        let llm = Arc::new(
            ScriptedCompletion::new()
                .reply("easy to rhyme", &["Moon"])
                .reply("rhymes with", &["spoon."])
                .reply("Answer yes or no", &["Yes, they rhyme."]),
        );
        let r = strategy(llm.clone()).generate_content(&ctx("en", "")).await;
        assert_eq!(r.answer, "MOON-SPOON");
        assert_eq!(r.metadata["source"], "generated");
        assert_eq!(llm.calls().len(), 3);
        assert_pair_shape(&r);
    }

    #[tokio::test]
    async fn rejected_confirmation_retries_then_falls_back() {
        let llm = Arc::new(
            ScriptedCompletion::new()
                .reply("easy to rhyme", &["Moon"])
                .reply("rhymes with", &["Table"])
                .reply("Answer yes or no", &["No."]),
        );
        let r = strategy(llm.clone()).generate_content(&ctx("en", "")).await;
        assert_eq!(r.metadata["source"], "fallback");
        // Three attempts of three calls each.
        assert_eq!(llm.calls().len(), 9);
        let (a, b) = split_pair(&r.answer).unwrap();
        assert!(FALLBACK_PAIRS[0].1.contains(&(a, b)));
    }

    #[tokio::test]
    async fn non_english_pairs_skip_confirmation() {
        let llm = Arc::new(
            ScriptedCompletion::new()
                .reply("easy to rhyme", &["casa"])
                .reply("rhymes with", &["masa"]),
        );
        let r = strategy(llm.clone()).generate_content(&ctx("es", "")).await;
        assert_eq!(r.answer, "CASA-MASA");
        assert_eq!(llm.calls().len(), 2);
    }

    #[tokio::test]
    async fn duplicate_second_word_abandons_the_attempt() {
        let llm = Arc::new(
            ScriptedCompletion::new()
                .reply("easy to rhyme", &["cat"])
                .reply("rhymes with", &["Cat", "hat"])
                .reply("Answer yes or no", &["yes"]),
        );
        let r = strategy(llm).generate_content(&ctx("en", "")).await;
        assert_eq!(r.answer, "CAT-HAT");
    }

    #[tokio::test]
    async fn offline_fallback_uses_the_language_script() {
        let s = RhymeTimeStrategy::new(StrategyDeps::offline());
        for code in ["ru", "uk", "el", "ar", "fa", "he", "hi"] {
            let profile = BuiltinLanguages.lookup(code).unwrap();
            let r = s.generate_content(&ctx(code, "")).await;
            assert_eq!(r.metadata["source"], "fallback", "{code}");
            assert_pair_shape(&r);
            let (a, b) = split_pair(&r.answer).unwrap();
            assert!(
                a.chars().chain(b.chars()).all(|c| profile.is_letter(c)),
                "{code}: {} is not in the language's script",
                r.answer
            );
        }
    }

    #[test]
    fn every_builtin_language_has_usable_fallback_pairs() {
        let s = RhymeTimeStrategy::new(StrategyDeps::offline());
        let mut rng = StdRng::seed_from_u64(0);
        for (code, pairs) in FALLBACK_PAIRS {
            let profile = BuiltinLanguages.lookup(code).unwrap();
            for (a, b) in pairs.iter() {
                assert!(s.check_pair(a, b, &profile).is_ok(), "{code}: {a}-{b}");
            }
            assert!(s.fallback_pair(&profile, &mut rng).is_ok());
        }
        assert_eq!(FALLBACK_PAIRS.len(), 17);
    }

    /// Serves a Hebrew-script profile under a code with no pair table.
    struct UntabledLanguage;

    impl LanguageConfig for UntabledLanguage {
        fn lookup(&self, code: &str) -> Option<LanguageProfile> {
            (code == "yi").then(|| LanguageProfile {
                code: "yi".to_string(),
                display_name: "Yiddish".to_string(),
                script: Script::Hebrew,
                extra_letters: String::new(),
                numerals: NumeralSystem::Western,
            })
        }
    }

    #[tokio::test]
    async fn fallback_without_valid_pairs_is_an_error() {
        let s = RhymeTimeStrategy::new(StrategyDeps::new(
            Arc::new(ScriptedCompletion::new()),
            Arc::new(UntabledLanguage),
            QuizConfig::default(),
        ));
        let r = s.generate_content(&ctx("yi", "")).await;
        assert!(!r.is_success());
        assert_eq!(r.error.as_deref(), Some("no fallback rhyme pair for language 'yi'"));
        assert!(r.answer.is_empty());
    }

    #[tokio::test]
    async fn hint_names_the_masked_word_initial() {
        let s = RhymeTimeStrategy::new(StrategyDeps::offline());
        assert_eq!(
            s.generate_hint(&ctx("en", ""), "CAT-HAT").await,
            "The missing word starts with \"H\" and rhymes with CAT."
        );
        let mut first_hidden = ctx("en", "");
        first_hidden.options.metadata.insert("revealed_position".into(), "1".into());
        assert_eq!(
            s.generate_hint(&first_hidden, "CAT-HAT").await,
            "The missing word starts with \"C\" and rhymes with HAT."
        );
        assert_eq!(s.generate_hint(&ctx("en", ""), "CAT").await, HINT);
        assert_eq!(
            s.generate_solution(&ctx("en", ""), "CAT-HAT").await,
            "CAT and HAT rhyme: both end with \"AT\"."
        );
    }

    #[test]
    fn validate_content_checks_both_words() {
        let s = RhymeTimeStrategy::new(StrategyDeps::offline());
        assert!(s.validate_content("cat-hat", "en"));
        assert!(!s.validate_content("cat", "en"));
        assert!(!s.validate_content("cat-hat-bat", "en"));
        assert!(!s.validate_content("cat-cat", "en"));
        assert!(s.validate_content("кот-рот", "ru"));
        assert!(BuiltinLanguages.lookup("ru").is_some());
    }
}
