//! Number-sequence rules: detection, synthesis and next-value formulas.
//!
//! Detection tries the rules in a fixed order and the first match wins; the
//! order matters because several rules overlap (`2, 4, 8, 16` is both a power
//! of two and geometric, `1, 4, 9, 16` is both squares and quadratic).

use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng,
};
use serde::Serialize;

use crate::quiz_engine::helpers::format_number;

/// Terms shown to the player; the answer is the term after these.
pub const CANONICAL_LENGTH: usize = 5;

/// Fewest terms detection will look at.
pub const MIN_TERMS: usize = 3;

const EPS: f64 = 1e-4;

/// The first 50 primes.
pub const PRIMES: [i64; 50] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71,
    73, 79, 83, 89, 97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173,
    179, 181, 191, 193, 197, 199, 211, 223, 227, 229,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Squares,
    Primes,
    Powers,
    IntegerPowers,
    Arithmetic,
    Geometric,
    Fibonacci,
    Quadratic,
    Alternating,
}

impl PatternKind {
    /// Detection order.
    pub const ALL: [PatternKind; 9] = [
        PatternKind::Squares,
        PatternKind::Primes,
        PatternKind::Powers,
        PatternKind::IntegerPowers,
        PatternKind::Arithmetic,
        PatternKind::Geometric,
        PatternKind::Fibonacci,
        PatternKind::Quadratic,
        PatternKind::Alternating,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PatternKind::Squares       => "squares",
            PatternKind::Primes        => "primes",
            PatternKind::Powers        => "powers",
            PatternKind::IntegerPowers => "integer_powers",
            PatternKind::Arithmetic    => "arithmetic",
            PatternKind::Geometric     => "geometric",
            PatternKind::Fibonacci     => "fibonacci",
            PatternKind::Quadratic     => "quadratic",
            PatternKind::Alternating   => "alternating",
        }
    }

    /// Relative frequency in generation mode.
    pub fn weight(self) -> u32 {
        match self {
            PatternKind::Quadratic     => 25,
            PatternKind::Arithmetic    => 20,
            PatternKind::Geometric     => 14,
            PatternKind::Fibonacci     => 12,
            PatternKind::Alternating   => 10,
            PatternKind::Powers        => 8,
            PatternKind::IntegerPowers => 5,
            PatternKind::Squares       => 4,
            PatternKind::Primes        => 2,
        }
    }
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A rule together with the parameters that pin it down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pattern {
    /// root², (root+1)², ...
    Squares { root: i64 },
    /// PRIMES[offset], PRIMES[offset+1], ...
    Primes { offset: usize },
    /// base^exponent, base^(exponent+1), ...
    Powers { base: i64, exponent: u32 },
    /// start^exponent, (start+1)^exponent, ...
    IntegerPowers { start: i64, exponent: u32 },
    Arithmetic { difference: f64 },
    Geometric { ratio: f64 },
    Fibonacci,
    Quadratic { second_difference: f64 },
    /// First differences alternate even, odd, even, ...
    Alternating { even: f64, odd: f64 },
}

impl Pattern {
    pub fn kind(&self) -> PatternKind {
        match self {
            Pattern::Squares { .. }       => PatternKind::Squares,
            Pattern::Primes { .. }        => PatternKind::Primes,
            Pattern::Powers { .. }        => PatternKind::Powers,
            Pattern::IntegerPowers { .. } => PatternKind::IntegerPowers,
            Pattern::Arithmetic { .. }    => PatternKind::Arithmetic,
            Pattern::Geometric { .. }     => PatternKind::Geometric,
            Pattern::Fibonacci            => PatternKind::Fibonacci,
            Pattern::Quadratic { .. }     => PatternKind::Quadratic,
            Pattern::Alternating { .. }   => PatternKind::Alternating,
        }
    }

    /// The term following `terms`. `terms` must be a prefix of a sequence
    /// this pattern generates.
    pub fn next_value(&self, terms: &[f64]) -> Option<f64> {
        let n = terms.len();
        let last = *terms.last()?;
        let step = i64::try_from(n).ok()?;
        match *self {
            Pattern::Squares { root } => {
                let k = root.checked_add(step)?;
                Some(k.checked_mul(k)? as f64)
            }
            Pattern::Primes { offset } => PRIMES.get(offset + n).map(|&p| p as f64),
            Pattern::Powers { base, exponent } => {
                let e = exponent.checked_add(u32::try_from(n).ok()?)?;
                base.checked_pow(e).map(|v| v as f64)
            }
            Pattern::IntegerPowers { start, exponent } => {
                start.checked_add(step)?.checked_pow(exponent).map(|v| v as f64)
            }
            Pattern::Arithmetic { difference } => Some(last + difference),
            Pattern::Geometric { ratio } => Some(last * ratio),
            Pattern::Fibonacci => Some(last + terms.get(n.checked_sub(2)?)?),
            Pattern::Quadratic { second_difference } => {
                let prev = terms.get(n.checked_sub(2)?)?;
                Some(last + (last - prev) + second_difference)
            }
            Pattern::Alternating { even, odd } => {
                // The next difference has index n - 1.
                Some(last + if (n - 1) % 2 == 0 { even } else { odd })
            }
        }
    }

    /// Extend `terms` in place until it holds `len` terms.
    pub fn extend(&self, terms: &mut Vec<f64>, len: usize) -> Option<()> {
        while terms.len() < len {
            let next = self.next_value(terms)?;
            terms.push(next);
        }
        Some(())
    }
}

/// Five displayed terms plus the hidden answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub pattern: Pattern,
    pub terms: Vec<f64>,
    pub next: f64,
}

impl Sequence {
    /// Canonical sequence built from a detected pattern and the seed terms.
    /// Short seeds are extended; long seeds keep their first five terms.
    pub fn from_seed(pattern: Pattern, seed: &[f64]) -> Option<Self> {
        let mut terms = seed.to_vec();
        pattern.extend(&mut terms, CANONICAL_LENGTH + 1)?;
        let next = terms[CANONICAL_LENGTH];
        terms.truncate(CANONICAL_LENGTH);
        Some(Self { pattern, terms, next })
    }

    pub fn min(&self) -> f64 {
        self.terms.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.terms.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPS * 1f64.max(a.abs()).max(b.abs())
}

fn differences(terms: &[f64]) -> Vec<f64> {
    terms.windows(2).map(|w| w[1] - w[0]).collect()
}

fn all_equal(values: &[f64], target: f64) -> bool {
    values.iter().all(|&v| approx_eq(v, target))
}

/// Terms as exact integers, if they all are.
fn integers(terms: &[f64]) -> Option<Vec<i64>> {
    terms
        .iter()
        .map(|&t| {
            let rounded = t.round();
            (t.is_finite() && rounded.abs() < 1e15 && (t - rounded).abs() < EPS).then_some(rounded as i64)
        })
        .collect()
}

fn exact_sqrt(v: i64) -> Option<i64> {
    if v < 0 {
        return None;
    }
    let r = (v as f64).sqrt().round() as i64;
    (r.checked_mul(r)? == v).then_some(r)
}

fn exact_log(value: i64, base: i64) -> Option<u32> {
    let mut power = 1i64;
    let mut exponent = 0u32;
    while power < value {
        power = power.checked_mul(base)?;
        exponent += 1;
    }
    (power == value).then_some(exponent)
}

fn detect_squares(ints: &[i64]) -> Option<Pattern> {
    let roots: Vec<i64> = ints.iter().map(|&v| exact_sqrt(v)).collect::<Option<_>>()?;
    roots
        .windows(2)
        .all(|w| w[1] == w[0] + 1)
        .then(|| Pattern::Squares { root: roots[0] })
}

fn detect_primes(ints: &[i64]) -> Option<Pattern> {
    let offset = PRIMES.iter().position(|&p| p == ints[0])?;
    ints.iter()
        .enumerate()
        .all(|(i, &v)| PRIMES.get(offset + i) == Some(&v))
        .then_some(Pattern::Primes { offset })
}

fn detect_powers(ints: &[i64]) -> Option<Pattern> {
    if ints.iter().any(|&v| v <= 0) {
        return None;
    }
    (2..=10i64).find_map(|base| {
        let exponent = exact_log(ints[0], base)?;
        ints.iter()
            .enumerate()
            .all(|(i, &v)| base.checked_pow(exponent + i as u32) == Some(v))
            .then_some(Pattern::Powers { base, exponent })
    })
}

fn root_candidates(v: i64, exponent: u32) -> Vec<i64> {
    let magnitude = (v.unsigned_abs() as f64).powf(1.0 / exponent as f64).round() as i64;
    let candidates = match exponent {
        2 => vec![magnitude, -magnitude],
        _ => vec![if v < 0 { -magnitude } else { magnitude }],
    };
    candidates
        .into_iter()
        .filter(|c| c.checked_pow(exponent) == Some(v))
        .collect()
}

fn detect_integer_powers(ints: &[i64]) -> Option<Pattern> {
    [2u32, 3].into_iter().find_map(|exponent| {
        root_candidates(ints[0], exponent).into_iter().find_map(|start| {
            ints.iter()
                .enumerate()
                .all(|(i, &v)| (start + i as i64).checked_pow(exponent) == Some(v))
                .then_some(Pattern::IntegerPowers { start, exponent })
        })
    })
}

fn detect_arithmetic(terms: &[f64]) -> Option<Pattern> {
    let diffs = differences(terms);
    all_equal(&diffs, diffs[0]).then_some(Pattern::Arithmetic { difference: diffs[0] })
}

fn detect_geometric(terms: &[f64]) -> Option<Pattern> {
    if terms.iter().any(|&t| t.abs() < EPS) {
        return None;
    }
    let ratio = terms[1] / terms[0];
    if approx_eq(ratio, 1.0) {
        return None;
    }
    terms
        .windows(2)
        .all(|w| approx_eq(w[1], w[0] * ratio))
        .then_some(Pattern::Geometric { ratio })
}

fn detect_fibonacci(terms: &[f64]) -> Option<Pattern> {
    terms
        .windows(3)
        .all(|w| approx_eq(w[2], w[0] + w[1]))
        .then_some(Pattern::Fibonacci)
}

fn detect_quadratic(terms: &[f64]) -> Option<Pattern> {
    // Three terms always have a "constant" second difference.
    if terms.len() < 4 {
        return None;
    }
    let second = differences(&differences(terms));
    let s = second[0];
    (s.abs() > EPS && all_equal(&second, s)).then_some(Pattern::Quadratic { second_difference: s })
}

fn detect_alternating(terms: &[f64]) -> Option<Pattern> {
    // Needs two differences of each parity.
    if terms.len() < 5 {
        return None;
    }
    let diffs = differences(terms);
    let (even, odd) = (diffs[0], diffs[1]);
    if approx_eq(even, odd) {
        return None;
    }
    diffs
        .iter()
        .enumerate()
        .all(|(i, &d)| approx_eq(d, if i % 2 == 0 { even } else { odd }))
        .then_some(Pattern::Alternating { even, odd })
}

/// Classify `terms`. `None` when there are too few terms or no rule fits.
pub fn detect(terms: &[f64]) -> Option<Pattern> {
    if terms.len() < MIN_TERMS || terms.iter().any(|t| !t.is_finite()) {
        return None;
    }
    let ints = integers(terms);
    let on_ints = |f: fn(&[i64]) -> Option<Pattern>| ints.as_deref().and_then(f);

    on_ints(detect_squares)
        .or_else(|| on_ints(detect_primes))
        .or_else(|| on_ints(detect_powers))
        .or_else(|| on_ints(detect_integer_powers))
        .or_else(|| detect_arithmetic(terms))
        .or_else(|| detect_geometric(terms))
        .or_else(|| detect_fibonacci(terms))
        .or_else(|| detect_quadratic(terms))
        .or_else(|| detect_alternating(terms))
}

// ---------------------------------------------------------------------------
// Synthesis
// ---------------------------------------------------------------------------

/// Weighted random rule for generation mode.
pub fn choose_kind<R: Rng>(rng: &mut R) -> PatternKind {
    let weights = PatternKind::ALL.map(PatternKind::weight);
    match WeightedIndex::new(weights) {
        Ok(dist) => PatternKind::ALL[dist.sample(rng)],
        Err(_) => PatternKind::Arithmetic,
    }
}

/// Build a fresh sequence following `kind`.
pub fn synthesize<R: Rng>(kind: PatternKind, rng: &mut R) -> Sequence {
    let (pattern, seed): (Pattern, Vec<f64>) = match kind {
        PatternKind::Squares => {
            let root = rng.gen_range(1..=8i64);
            (Pattern::Squares { root }, vec![(root * root) as f64])
        }
        PatternKind::Primes => {
            let offset = rng.gen_range(0..=15usize);
            (Pattern::Primes { offset }, vec![PRIMES[offset] as f64])
        }
        PatternKind::Powers => {
            let base = rng.gen_range(2..=5i64);
            let exponent = rng.gen_range(0..=2u32);
            (Pattern::Powers { base, exponent }, vec![base.pow(exponent) as f64])
        }
        PatternKind::IntegerPowers => {
            let start = rng.gen_range(1..=4i64);
            (Pattern::IntegerPowers { start, exponent: 3 }, vec![start.pow(3) as f64])
        }
        PatternKind::Arithmetic => {
            let difference = loop {
                let d = rng.gen_range(-5..=12i64);
                if d.abs() >= 2 {
                    break d as f64;
                }
            };
            let start = rng.gen_range(1..=20i64) as f64;
            (Pattern::Arithmetic { difference }, vec![start])
        }
        PatternKind::Geometric => {
            let ratio = rng.gen_range(2..=4i64) as f64;
            let start = rng.gen_range(1..=6i64) as f64;
            (Pattern::Geometric { ratio }, vec![start])
        }
        PatternKind::Fibonacci => {
            let a = rng.gen_range(1..=5i64);
            let b = rng.gen_range(a..=a + 4);
            (Pattern::Fibonacci, vec![a as f64, b as f64])
        }
        PatternKind::Quadratic => {
            let a = rng.gen_range(1..=3i64);
            let b = rng.gen_range(0..=4i64);
            let c = rng.gen_range(0..=5i64);
            let at = |i: i64| (a * i * i + b * i + c) as f64;
            (Pattern::Quadratic { second_difference: (2 * a) as f64 }, vec![at(1), at(2)])
        }
        PatternKind::Alternating => {
            let even = rng.gen_range(2..=6i64);
            let odd = loop {
                let o = rng.gen_range(-3..=9i64);
                if o != even && o != 0 {
                    break o;
                }
            };
            let start = rng.gen_range(1..=10i64) as f64;
            (Pattern::Alternating { even: even as f64, odd: odd as f64 }, vec![start])
        }
    };

    // Every parameter above keeps the sequence small enough to extend.
    Sequence::from_seed(pattern, &seed).unwrap_or_else(|| Sequence {
        pattern,
        terms: vec![0.0; CANONICAL_LENGTH],
        next: 0.0,
    })
}

// ---------------------------------------------------------------------------
// Explanations
// ---------------------------------------------------------------------------

/// `n`, `n + 2`, `n - 1`
fn shifted_n(offset: i64) -> String {
    match offset {
        0 => "n".to_string(),
        o if o > 0 => format!("n + {o}"),
        o => format!("n - {}", -o),
    }
}

fn signed(value: f64) -> String {
    if value < 0.0 {
        format!("- {}", format_number(-value))
    } else {
        format!("+ {}", format_number(value))
    }
}

/// Closed form or recurrence, with `n` counted from 1.
pub fn formula(seq: &Sequence) -> String {
    let first = seq.terms.first().copied().unwrap_or_default();
    match seq.pattern {
        Pattern::Squares { root } => format!("a(n) = ({})²", shifted_n(root - 1)),
        Pattern::Primes { offset } => format!("a(n) = the ({})th prime", shifted_n(offset as i64)),
        Pattern::Powers { base, exponent } => {
            format!("a(n) = {base}^({})", shifted_n(exponent as i64 - 1))
        }
        Pattern::IntegerPowers { start, exponent } => {
            let power = if exponent == 2 { "²" } else { "³" };
            format!("a(n) = ({}){power}", shifted_n(start - 1))
        }
        Pattern::Arithmetic { difference } => format!(
            "a(n) = {} + (n - 1) × {}",
            format_number(first),
            format_number(difference)
        ),
        Pattern::Geometric { ratio } => format!(
            "a(n) = {} × {}^(n - 1)",
            format_number(first),
            format_number(ratio)
        ),
        Pattern::Fibonacci => "a(n) = a(n - 1) + a(n - 2)".to_string(),
        Pattern::Quadratic { second_difference } => format!(
            "a(n) = 2·a(n - 1) - a(n - 2) {}",
            signed(second_difference)
        ),
        Pattern::Alternating { even, odd } => format!(
            "a(n + 1) = a(n) {} for odd n, a(n) {} for even n",
            signed(even),
            signed(odd)
        ),
    }
}

/// Worked explanation ending in the hidden answer.
pub fn explanation(seq: &Sequence) -> String {
    let last = seq.terms.last().copied().unwrap_or_default();
    let prev = seq.terms.iter().rev().nth(1).copied().unwrap_or_default();
    let (last_s, next_s) = (format_number(last), format_number(seq.next));
    match seq.pattern {
        Pattern::Squares { root } => {
            let k = root + seq.terms.len() as i64;
            format!("These are consecutive perfect squares. The next one is {k}² = {next_s}.")
        }
        Pattern::Primes { .. } => {
            format!("These are consecutive prime numbers. The prime after {last_s} is {next_s}.")
        }
        Pattern::Powers { base, .. } => format!(
            "Each number is the previous one multiplied by {base}, so these are powers of {base}: {last_s} × {base} = {next_s}."
        ),
        Pattern::IntegerPowers { start, exponent } => {
            let k = start + seq.terms.len() as i64;
            let name = if exponent == 2 { "squares" } else { "cubes" };
            format!("These are consecutive {name}. The next one is {k}^{exponent} = {next_s}.")
        }
        Pattern::Arithmetic { difference } => {
            let change = if difference < 0.0 { "less" } else { "more" };
            format!(
                "Each number is {} {change} than the one before: {last_s} {} = {next_s}.",
                format_number(difference.abs()),
                signed(difference)
            )
        }
        Pattern::Geometric { ratio } => format!(
            "Each number is the previous one multiplied by {}: {last_s} × {} = {next_s}.",
            format_number(ratio),
            format_number(ratio)
        ),
        Pattern::Fibonacci => format!(
            "Each number is the sum of the two before it: {} + {last_s} = {next_s}.",
            format_number(prev)
        ),
        Pattern::Quadratic { second_difference } => {
            let diffs: Vec<String> = differences(&seq.terms).into_iter().map(format_number).collect();
            let gap = seq.next - last;
            format!(
                "The gaps between numbers are {}, and they change by {} each time. \
                 The next gap is {}, so {last_s} {} = {next_s}.",
                diffs.join(", "),
                format_number(second_difference),
                format_number(gap),
                signed(gap)
            )
        }
        Pattern::Alternating { even, odd } => format!(
            "The steps alternate between {} and {}: {last_s} {} = {next_s}.",
            signed(even),
            signed(odd),
            signed(seq.next - last)
        ),
    }
}

/// Rule-specific nudge that does not give the answer away.
pub fn hint(kind: PatternKind) -> &'static str {
    match kind {
        PatternKind::Squares       => "Try multiplying a number by itself.",
        PatternKind::Primes        => "None of these numbers can be divided evenly by anything but 1 and itself.",
        PatternKind::Powers        => "Look at how many times a single small number has been multiplied by itself.",
        PatternKind::IntegerPowers => "Think of counting numbers raised to the same power.",
        PatternKind::Arithmetic    => "Look at the difference between neighbouring numbers.",
        PatternKind::Geometric     => "Divide each number by the one before it.",
        PatternKind::Fibonacci     => "Add two neighbouring numbers together.",
        PatternKind::Quadratic     => "The gaps between numbers are changing. Look at how the gaps change.",
        PatternKind::Alternating   => "Look at every other step.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn kind_of(terms: &[f64]) -> Option<PatternKind> {
        detect(terms).map(|p| p.kind())
    }

    #[test]
    fn detects_each_rule_in_priority_order() {
        assert_eq!(kind_of(&[1.0, 4.0, 9.0, 16.0, 25.0]), Some(PatternKind::Squares));
        assert_eq!(kind_of(&[5.0, 7.0, 11.0, 13.0]), Some(PatternKind::Primes));
        assert_eq!(kind_of(&[2.0, 4.0, 8.0, 16.0, 32.0]), Some(PatternKind::Powers));
        assert_eq!(kind_of(&[1.0, 8.0, 27.0, 64.0]), Some(PatternKind::IntegerPowers));
        assert_eq!(kind_of(&[4.0, 1.0, 0.0, 1.0, 4.0]), Some(PatternKind::IntegerPowers));
        assert_eq!(kind_of(&[2.0, 4.0, 6.0, 8.0, 10.0]), Some(PatternKind::Arithmetic));
        assert_eq!(kind_of(&[3.0, 6.0, 12.0, 24.0]), Some(PatternKind::Geometric));
        assert_eq!(kind_of(&[1.0, 1.0, 2.0, 3.0, 5.0]), Some(PatternKind::Fibonacci));
        assert_eq!(kind_of(&[2.0, 5.0, 10.0, 17.0, 26.0]), Some(PatternKind::Quadratic));
        assert_eq!(kind_of(&[1.0, 3.0, 4.0, 6.0, 7.0]), Some(PatternKind::Alternating));
    }

    #[test]
    fn unrecognized_and_short_sequences_are_rejected() {
        assert_eq!(kind_of(&[1.0, 7.0, 2.0, 9.0, 3.0]), None);
        assert_eq!(kind_of(&[2.0, 4.0]), None);
        assert_eq!(kind_of(&[]), None);
    }

    #[test]
    fn next_values_follow_detected_parameters() {
        let next = |terms: &[f64]| detect(terms).and_then(|p| p.next_value(terms)).unwrap();
        assert_eq!(next(&[2.0, 4.0, 6.0, 8.0, 10.0]), 12.0);
        assert_eq!(next(&[1.0, 4.0, 9.0, 16.0, 25.0]), 36.0);
        assert_eq!(next(&[5.0, 7.0, 11.0, 13.0]), 17.0);
        assert_eq!(next(&[2.0, 4.0, 8.0, 16.0, 32.0]), 64.0);
        assert_eq!(next(&[1.0, 8.0, 27.0, 64.0]), 125.0);
        assert_eq!(next(&[1.0, 1.0, 2.0, 3.0, 5.0]), 8.0);
        assert_eq!(next(&[2.0, 5.0, 10.0, 17.0, 26.0]), 37.0);
        assert_eq!(next(&[1.0, 3.0, 4.0, 6.0, 7.0]), 9.0);
        assert!((next(&[16.0, 8.0, 4.0, 2.0]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn decimal_arithmetic_is_tolerated() {
        let p = detect(&[0.1, 0.2, 0.3, 0.4]).unwrap();
        assert_eq!(p.kind(), PatternKind::Arithmetic);
        assert!((p.next_value(&[0.1, 0.2, 0.3, 0.4]).unwrap() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn prime_table_end_has_no_next_value() {
        let tail = [211.0, 223.0, 227.0, 229.0];
        let p = detect(&tail).unwrap();
        assert_eq!(p.kind(), PatternKind::Primes);
        assert_eq!(p.next_value(&tail), None);
    }

    #[test]
    fn short_seed_is_extended_and_long_seed_truncated() {
        let seq = Sequence::from_seed(Pattern::Arithmetic { difference: 3.0 }, &[1.0, 4.0, 7.0]).unwrap();
        assert_eq!(seq.terms, vec![1.0, 4.0, 7.0, 10.0, 13.0]);
        assert_eq!(seq.next, 16.0);

        let long = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let seq = Sequence::from_seed(detect(&long).unwrap(), &long).unwrap();
        assert_eq!(seq.terms.len(), CANONICAL_LENGTH);
        assert_eq!(seq.next, 6.0);
    }

    #[test]
    fn synthesized_sequences_obey_their_laws() {
        for seed in 0..200u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let kind = choose_kind(&mut rng);
            let seq = synthesize(kind, &mut rng);
            assert_eq!(seq.terms.len(), CANONICAL_LENGTH);
            assert_eq!(seq.pattern.kind(), kind);
            let last = seq.terms[4];
            let expected = match seq.pattern {
                Pattern::Arithmetic { difference } => last + difference,
                Pattern::Geometric { ratio } => last * ratio,
                Pattern::Fibonacci => last + seq.terms[3],
                other => other.next_value(&seq.terms).unwrap(),
            };
            assert!((seq.next - expected).abs() < 1e-4, "{kind} seed={seed}");
        }
    }

    #[test]
    fn weighted_choice_favours_quadratic_over_primes() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut quadratic = 0;
        let mut primes = 0;
        for _ in 0..2000 {
            match choose_kind(&mut rng) {
                PatternKind::Quadratic => quadratic += 1,
                PatternKind::Primes => primes += 1,
                _ => {}
            }
        }
        assert!(quadratic > primes * 4, "quadratic={quadratic} primes={primes}");
    }

    #[test]
    fn explanations_end_with_the_answer() {
        let seq = Sequence::from_seed(Pattern::Arithmetic { difference: 2.0 }, &[2.0]).unwrap();
        assert_eq!(formula(&seq), "a(n) = 2 + (n - 1) × 2");
        assert_eq!(explanation(&seq), "Each number is 2 more than the one before: 10 + 2 = 12.");

        let squares = Sequence::from_seed(Pattern::Squares { root: 1 }, &[1.0]).unwrap();
        assert_eq!(formula(&squares), "a(n) = (n)²");
        assert!(explanation(&squares).ends_with("6² = 36."));
    }
}
