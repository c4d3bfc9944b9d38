//! Language configuration: display names, legal character sets, numeral
//! systems.
//!
//! The pipeline only depends on the [`LanguageConfig`] trait. [`BuiltinLanguages`]
//! is a static table good enough for the languages the quiz templates ship
//! with; applications with their own language registry implement the trait
//! directly.

/// Writing system a language draws its letters from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Latin,
    Cyrillic,
    Greek,
    Arabic,
    Hebrew,
    Devanagari,
}

/// Digit glyphs a language renders numbers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumeralSystem {
    Western,
    ArabicIndic,
    Persian,
    Devanagari,
}

impl NumeralSystem {
    fn zero(self) -> char {
        match self {
            NumeralSystem::Western     => '0',
            NumeralSystem::ArabicIndic => '\u{0660}',
            NumeralSystem::Persian     => '\u{06F0}',
            NumeralSystem::Devanagari  => '\u{0966}',
        }
    }

    /// Replace ASCII digits with this system's glyphs. Everything else is
    /// copied through.
    pub fn render(self, text: &str) -> String {
        let zero = self.zero() as u32;
        text.chars()
            .map(|c| match c.to_digit(10) {
                Some(d) if c.is_ascii_digit() => char::from_u32(zero + d).unwrap_or(c),
                _ => c,
            })
            .collect()
    }

    /// Map digits from any supported system back to ASCII.
    pub fn normalize(text: &str) -> String {
        const SYSTEMS: [NumeralSystem; 3] = [
            NumeralSystem::ArabicIndic,
            NumeralSystem::Persian,
            NumeralSystem::Devanagari,
        ];
        text.chars()
            .map(|c| {
                SYSTEMS
                    .iter()
                    .find_map(|s| {
                        let offset = (c as u32).checked_sub(s.zero() as u32)?;
                        (offset < 10).then(|| char::from(b'0' + offset as u8))
                    })
                    .unwrap_or(c)
            })
            .collect()
    }
}

/// Everything the pipeline needs to know about one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageProfile {
    pub code: String,
    pub display_name: String,
    pub script: Script,
    /// Letters outside the script's base range (accents, ñ, ß, ...), both cases.
    pub extra_letters: String,
    pub numerals: NumeralSystem,
}

impl LanguageProfile {
    fn in_base_range(&self, c: char) -> bool {
        match self.script {
            Script::Latin      => c.is_ascii_alphabetic(),
            Script::Cyrillic   => matches!(c, '\u{0410}'..='\u{044F}' | 'Ё' | 'ё'),
            Script::Greek      => {
                matches!(c, '\u{0391}'..='\u{03A9}' | '\u{03B1}'..='\u{03C9}') && c != '\u{03A2}'
            }
            Script::Arabic     => matches!(c, '\u{0621}'..='\u{063A}' | '\u{0641}'..='\u{064A}'),
            Script::Hebrew     => matches!(c, '\u{05D0}'..='\u{05EA}'),
            Script::Devanagari => matches!(c, '\u{0900}'..='\u{097F}') && !matches!(c, '\u{0964}'..='\u{096F}'),
        }
    }

    /// Character-set test for a single letter.
    pub fn is_letter(&self, c: char) -> bool {
        self.in_base_range(c) || self.extra_letters.contains(c)
    }

    /// True when `text` holds at least one letter and nothing but letters,
    /// spaces, hyphens and apostrophes.
    pub fn allows_text(&self, text: &str) -> bool {
        let mut letters = 0usize;
        for c in text.chars() {
            if self.is_letter(c) {
                letters += 1;
            } else if !(c.is_whitespace() || c == '-' || c == '\'') {
                return false;
            }
        }
        letters > 0
    }

    /// Upper-case base letters, used to pad puzzle rows with filler.
    pub fn alphabet(&self) -> Vec<char> {
        let range = |lo: u32, hi: u32| (lo..=hi).filter_map(char::from_u32).collect::<Vec<_>>();
        match self.script {
            Script::Latin      => ('A'..='Z').collect(),
            Script::Cyrillic   => range(0x0410, 0x042F),
            Script::Greek      => range(0x0391, 0x03A9).into_iter().filter(|&c| c != '\u{03A2}').collect(),
            Script::Arabic     => range(0x0628, 0x063A).into_iter().chain(range(0x0641, 0x064A)).collect(),
            Script::Hebrew     => range(0x05D0, 0x05EA),
            Script::Devanagari => range(0x0915, 0x0939),
        }
    }
}

/// Language lookup collaborator. Unknown codes return `None`, which the
/// validation stage treats as a terminal error.
pub trait LanguageConfig: Send + Sync {
    fn lookup(&self, code: &str) -> Option<LanguageProfile>;

    fn display_name(&self, code: &str) -> String {
        self.lookup(code)
            .map(|p| p.display_name)
            .unwrap_or_else(|| code.to_string())
    }
}

// (code, display name, script, extra letters, numerals)
const LANGUAGES: &[(&str, &str, Script, &str, NumeralSystem)] = &[
    ("en", "English",    Script::Latin,      "", NumeralSystem::Western),
    ("es", "Spanish",    Script::Latin,      "ÁÉÍÓÚÜÑáéíóúüñ", NumeralSystem::Western),
    ("fr", "French",     Script::Latin,      "ÀÂÆÇÉÈÊËÎÏÔŒÙÛÜŸàâæçéèêëîïôœùûüÿ", NumeralSystem::Western),
    ("de", "German",     Script::Latin,      "ÄÖÜäöüß", NumeralSystem::Western),
    ("it", "Italian",    Script::Latin,      "ÀÈÉÌÒÙàèéìòù", NumeralSystem::Western),
    ("pt", "Portuguese", Script::Latin,      "ÁÂÃÀÇÉÊÍÓÔÕÚáâãàçéêíóôõú", NumeralSystem::Western),
    ("nl", "Dutch",      Script::Latin,      "", NumeralSystem::Western),
    ("sv", "Swedish",    Script::Latin,      "ÅÄÖåäö", NumeralSystem::Western),
    ("pl", "Polish",     Script::Latin,      "ĄĆĘŁŃÓŚŹŻąćęłńóśźż", NumeralSystem::Western),
    ("tr", "Turkish",    Script::Latin,      "ÇĞİÖŞÜçğıöşü", NumeralSystem::Western),
    ("ru", "Russian",    Script::Cyrillic,   "", NumeralSystem::Western),
    ("uk", "Ukrainian",  Script::Cyrillic,   "ЄІЇҐєіїґ", NumeralSystem::Western),
    ("el", "Greek",      Script::Greek,      "ΆΈΉΊΌΎΏάέήίόύώϊϋΐΰς", NumeralSystem::Western),
    ("ar", "Arabic",     Script::Arabic,     "", NumeralSystem::ArabicIndic),
    ("fa", "Persian",    Script::Arabic,     "پچژگکی", NumeralSystem::Persian),
    ("he", "Hebrew",     Script::Hebrew,     "", NumeralSystem::Western),
    ("hi", "Hindi",      Script::Devanagari, "", NumeralSystem::Devanagari),
];

/// Static language table.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLanguages;

impl LanguageConfig for BuiltinLanguages {
    fn lookup(&self, code: &str) -> Option<LanguageProfile> {
        // "en-US" and "pt_BR" resolve to their primary subtag.
        let primary = code
            .split(['-', '_'])
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        LANGUAGES
            .iter()
            .find(|(c, ..)| *c == primary)
            .map(|&(c, name, script, extra, numerals)| LanguageProfile {
                code: c.to_string(),
                display_name: name.to_string(),
                script,
                extra_letters: extra.to_string(),
                numerals,
            })
    }
}
