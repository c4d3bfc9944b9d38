//! Word-guessing board: hint-row construction and letter scoring.
//!
//! Three rows are pre-filled before the player starts. Each one nudges the
//! player closer without giving the word away:
//!
//! | Row | Name        | Contents |
//! |-----|-------------|----------|
//! | 1   | elimination | common letters that are *not* in the answer |
//! | 2   | scout       | first half of the answer's unique letters, all misplaced |
//! | 3   | anchor      | middle letter in place, the other unique letters misplaced |
//!
//! Empty slots are filled with letters absent from the answer, so every
//! "absent" tile is honest.

use std::collections::HashMap;

use rand::{seq::SliceRandom, Rng};
use serde::Serialize;

use crate::quiz_engine::config::ScoringMode;
use crate::quiz_engine::language::LanguageProfile;

/// Common-letter pool for the elimination row, most frequent first.
pub const COMMON_LETTERS: [char; 22] = [
    'E', 'A', 'R', 'I', 'O', 'T', 'N', 'S', 'L', 'C', 'U',
    'D', 'P', 'M', 'H', 'G', 'B', 'F', 'Y', 'W', 'K', 'V',
];

/// Number of pre-filled rows.
pub const HINT_ROWS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterState {
    Correct,
    Present,
    Absent,
}

impl LetterState {
    pub fn css_class(self) -> &'static str {
        match self {
            LetterState::Correct => "correct",
            LetterState::Present => "present",
            LetterState::Absent  => "absent",
        }
    }
}

/// Score a guess against the answer, letter by letter.
pub fn score(guess: &[char], answer: &[char], mode: ScoringMode) -> Vec<LetterState> {
    match mode {
        ScoringMode::Simplified => guess
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if answer.get(i) == Some(c) {
                    LetterState::Correct
                } else if answer.contains(c) {
                    LetterState::Present
                } else {
                    LetterState::Absent
                }
            })
            .collect(),

        ScoringMode::DuplicateAware => {
            let mut states = vec![LetterState::Absent; guess.len()];
            let mut unmatched: HashMap<char, usize> = HashMap::new();
            for (i, &a) in answer.iter().enumerate() {
                if guess.get(i) == Some(&a) {
                    states[i] = LetterState::Correct;
                } else {
                    *unmatched.entry(a).or_default() += 1;
                }
            }
            for (i, c) in guess.iter().enumerate() {
                if states[i] == LetterState::Correct {
                    continue;
                }
                if let Some(n) = unmatched.get_mut(c).filter(|n| **n > 0) {
                    *n -= 1;
                    states[i] = LetterState::Present;
                }
            }
            states
        }
    }
}

/// Unique letters of `answer` with the index of their first occurrence.
fn unique_letters(answer: &[char]) -> Vec<(char, usize)> {
    let mut seen = Vec::new();
    for (i, &c) in answer.iter().enumerate() {
        if !seen.iter().any(|&(s, _)| s == c) {
            seen.push((c, i));
        }
    }
    seen
}

/// First free slot at or after `start` (wrapping) where `letter` would be
/// misplaced.
fn misplaced_slot(row: &[Option<char>], answer: &[char], letter: char, start: usize) -> Option<usize> {
    let n = answer.len();
    (0..n)
        .map(|step| (start + step) % n)
        .find(|&p| row[p].is_none() && answer[p] != letter)
}

/// Builds the three hint rows for one answer.
pub struct BoardBuilder<'a, R: Rng> {
    answer: &'a [char],
    filler: Vec<char>,
    rng: &'a mut R,
}

impl<'a, R: Rng> BoardBuilder<'a, R> {
    /// `None` when the language alphabet has no letter outside the answer.
    pub fn new(answer: &'a [char], profile: &LanguageProfile, rng: &'a mut R) -> Option<Self> {
        let filler: Vec<char> = profile
            .alphabet()
            .into_iter()
            .filter(|c| !answer.contains(c))
            .collect();
        if answer.is_empty() || filler.is_empty() {
            return None;
        }
        Some(Self { answer, filler, rng })
    }

    fn fill(&mut self, row: Vec<Option<char>>) -> Vec<char> {
        row.into_iter()
            .map(|slot| match slot {
                Some(c) => c,
                None => *self.filler.choose(&mut *self.rng).unwrap_or(&'?'),
            })
            .collect()
    }

    /// Row 1: common letters the answer does not use.
    pub fn elimination(&mut self, profile: &LanguageProfile) -> Vec<char> {
        let n = self.answer.len();
        let mut row: Vec<Option<char>> = COMMON_LETTERS
            .iter()
            .copied()
            .filter(|c| profile.is_letter(*c) && !self.answer.contains(c))
            .take(n)
            .map(Some)
            .collect();
        row.resize(n, None);
        self.fill(row)
    }

    /// Row 2: the first half (rounded up) of the unique letters, each shifted
    /// one slot right of where it belongs.
    pub fn scout(&mut self) -> Vec<char> {
        let n = self.answer.len();
        let mut row = vec![None; n];
        let uniques = unique_letters(self.answer);
        let half = (uniques.len() + 1) / 2;
        for &(letter, idx) in uniques.iter().take(half) {
            if let Some(slot) = misplaced_slot(&row, self.answer, letter, (idx + 1) % n) {
                row[slot] = Some(letter);
            }
        }
        self.fill(row)
    }

    /// Row 3: the middle letter in place; every other unique letter shifted
    /// two slots right.
    pub fn anchor(&mut self) -> Vec<char> {
        let n = self.answer.len();
        let mid = n / 2;
        let anchor = self.answer[mid];
        let mut row = vec![None; n];
        row[mid] = Some(anchor);
        for (letter, idx) in unique_letters(self.answer) {
            if letter == anchor {
                continue;
            }
            if let Some(slot) = misplaced_slot(&row, self.answer, letter, (idx + 2) % n) {
                row[slot] = Some(letter);
            }
        }
        self.fill(row)
    }

    pub fn build(mut self, profile: &LanguageProfile) -> [Vec<char>; HINT_ROWS] {
        let first = self.elimination(profile);
        let second = self.scout();
        let third = self.anchor();
        [first, second, third]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz_engine::language::{BuiltinLanguages, LanguageConfig};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn rows(word: &str, seed: u64) -> [Vec<char>; 3] {
        let profile = BuiltinLanguages.lookup("en").unwrap();
        let answer = chars(word);
        let mut rng = StdRng::seed_from_u64(seed);
        BoardBuilder::new(&answer, &profile, &mut rng).unwrap().build(&profile)
    }

    #[test]
    fn puddle_rows_have_word_length() {
        for row in rows("PUDDLE", 1) {
            assert_eq!(row.len(), 6);
        }
    }

    #[test]
    fn elimination_row_shares_no_letter_with_answer() {
        let answer = chars("PUDDLE");
        let [first, ..] = rows("PUDDLE", 7);
        assert!(first.iter().all(|c| !answer.contains(c)));
        // E, D, P, L and U are skipped from the pool.
        assert_eq!(&first[..4], &['A', 'R', 'I', 'O']);
    }

    #[test]
    fn scout_row_places_half_the_unique_letters_misplaced() {
        let answer = chars("PUDDLE");
        let [_, second, _] = rows("PUDDLE", 7);
        let states = score(&second, &answer, ScoringMode::Simplified);
        // P U D L E -> first three unique letters.
        assert_eq!(states.iter().filter(|s| **s == LetterState::Present).count(), 3);
        assert!(!states.contains(&LetterState::Correct));
        assert_eq!(second[1], 'P');
        assert_eq!(second[2], 'U');
    }

    #[test]
    fn anchor_row_fixes_the_middle_letter_only() {
        let answer = chars("PUDDLE");
        let [.., third] = rows("PUDDLE", 7);
        let states = score(&third, &answer, ScoringMode::Simplified);
        assert_eq!(third[3], 'D');
        assert_eq!(states[3], LetterState::Correct);
        assert_eq!(states.iter().filter(|s| **s == LetterState::Correct).count(), 1);
    }

    #[test]
    fn single_letter_word_cannot_be_misplaced() {
        let answer = chars("AAAA");
        let [_, second, third] = rows("AAAA", 3);
        assert!(!second.contains(&'A'));
        assert_eq!(third.iter().filter(|c| **c == 'A').count(), 1);
        assert_eq!(score(&third, &answer, ScoringMode::Simplified)[2], LetterState::Correct);
    }

    #[test]
    fn simplified_scoring_ignores_duplicate_counts() {
        let states = score(&chars("DDDXYZ"), &chars("PUDDLE"), ScoringMode::Simplified);
        assert_eq!(
            states,
            vec![
                LetterState::Present,
                LetterState::Present,
                LetterState::Correct,
                LetterState::Absent,
                LetterState::Absent,
                LetterState::Absent,
            ]
        );
    }

    #[test]
    fn duplicate_aware_scoring_consumes_each_answer_letter_once() {
        let states = score(&chars("DDDXYZ"), &chars("PUDDLE"), ScoringMode::DuplicateAware);
        // D at 2 is exact; one D (index 3) remains for the first stray D only.
        assert_eq!(states[0], LetterState::Present);
        assert_eq!(states[1], LetterState::Absent);
        assert_eq!(states[2], LetterState::Correct);
    }

    #[test]
    fn non_latin_alphabet_fills_from_its_own_letters() {
        let profile = BuiltinLanguages.lookup("ru").unwrap();
        let answer = chars("КОШКА");
        let mut rng = StdRng::seed_from_u64(5);
        let [first, ..] = BoardBuilder::new(&answer, &profile, &mut rng).unwrap().build(&profile);
        assert!(first.iter().all(|c| profile.is_letter(*c) && !answer.contains(c)));
    }

    proptest! {
        #[test]
        fn correct_and_absent_tiles_are_honest(word in "[A-Z]{4,7}", seed in any::<u64>()) {
            let answer = chars(&word);
            for row in rows(&word, seed) {
                prop_assert_eq!(row.len(), answer.len());
                for (i, state) in score(&row, &answer, ScoringMode::Simplified).into_iter().enumerate() {
                    match state {
                        LetterState::Correct => prop_assert_eq!(row[i], answer[i]),
                        LetterState::Absent  => prop_assert!(!answer.contains(&row[i])),
                        LetterState::Present => prop_assert!(answer.contains(&row[i])),
                    }
                }
            }
        }
    }
}
