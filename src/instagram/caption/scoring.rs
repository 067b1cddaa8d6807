//! Per-line ingredient/instruction likelihoods for captions without headers.
//!
//! Each score is the clamped sum of the weights of the signals that fire on
//! a line. Weights live in tables so they can be inspected and tuned on
//! their own.

use super::vocabulary::{BULLETS, LEXICON};
use once_cell::sync::Lazy;
use regex::Regex;

pub const LEADING_QUANTITY_WEIGHT: f32 = 0.35;
pub const QUANTITY_WORD_WEIGHT: f32 = 0.25;
pub const UNIT_WEIGHT: f32 = 0.25;
pub const SHORT_LINE_WEIGHT: f32 = 0.15;
pub const PREPARATION_STATE_WEIGHT: f32 = 0.1;
pub const BULLET_WEIGHT: f32 = 0.1;
pub const LOWERCASE_SHORT_WEIGHT: f32 = 0.1;
pub const INGREDIENT_VERB_PENALTY: f32 = -0.3;
pub const VERY_LONG_PENALTY: f32 = -0.4;

pub const COOKING_VERB_WEIGHT: f32 = 0.3;
pub const LONG_LINE_WEIGHT: f32 = 0.2;
pub const NUMBERED_STEP_WEIGHT: f32 = 0.2;
pub const DURATION_WEIGHT: f32 = 0.1;
pub const TEMPERATURE_WEIGHT: f32 = 0.1;
pub const IMPERATIVE_WEIGHT: f32 = 0.1;

pub const SHORT_LINE_CHARS: usize = 60;
pub const LOWERCASE_SHORT_CHARS: usize = 50;
pub const VERY_LONG_CHARS: usize = 120;
pub const LONG_LINE_CHARS: usize = 60;
pub const IMPERATIVE_MIN_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    LeadingQuantity,
    QuantityWord,
    Unit,
    ShortLine,
    PreparationState,
    Bullet,
    LowercaseShort,
    CookingVerb,
    VeryLong,
    LongLine,
    NumberedStep,
    Duration,
    Temperature,
    Imperative,
}

pub const INGREDIENT_SIGNALS: &[(Signal, f32)] = &[
    (Signal::LeadingQuantity, LEADING_QUANTITY_WEIGHT),
    (Signal::QuantityWord, QUANTITY_WORD_WEIGHT),
    (Signal::Unit, UNIT_WEIGHT),
    (Signal::ShortLine, SHORT_LINE_WEIGHT),
    (Signal::PreparationState, PREPARATION_STATE_WEIGHT),
    (Signal::Bullet, BULLET_WEIGHT),
    (Signal::LowercaseShort, LOWERCASE_SHORT_WEIGHT),
    (Signal::CookingVerb, INGREDIENT_VERB_PENALTY),
    (Signal::VeryLong, VERY_LONG_PENALTY),
];

pub const INSTRUCTION_SIGNALS: &[(Signal, f32)] = &[
    (Signal::CookingVerb, COOKING_VERB_WEIGHT),
    (Signal::LongLine, LONG_LINE_WEIGHT),
    (Signal::NumberedStep, NUMBERED_STEP_WEIGHT),
    (Signal::Duration, DURATION_WEIGHT),
    (Signal::Temperature, TEMPERATURE_WEIGHT),
    (Signal::Imperative, IMPERATIVE_WEIGHT),
];

static LEADING_QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d|[½¼¾⅓⅔⅛⅜⅝⅞]|[.,]\d)").expect("Invalid leading quantity regex")
});

static STEP_WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:step|steg)\s*\d+\s*[.:)\-]?\s*").expect("Invalid step regex")
});

static STEP_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}[.)]").expect("Invalid step number regex"));

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b\d+\s*(?:-\s*\d+\s*)?(?:min|mins|minutes?|minuter|hours?|hrs?|timmar?|tim|seconds?|sec|sekunder)\b",
    )
    .expect("Invalid duration regex")
});

static TEMPERATURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d+\s*°|\d+\s*(?:degrees|grader)\b").expect("Invalid temperature regex")
});

/// A caption line with both of its scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredLine {
    pub text: String,
    pub ingredient: f32,
    pub instruction: f32,
}

impl ScoredLine {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ingredient: ingredient_score(text),
            instruction: instruction_score(text),
        }
    }

    /// Counts towards an ingredient cluster.
    pub fn is_ingredient_like(&self) -> bool {
        self.ingredient >= 0.3 && self.ingredient > self.instruction
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }
}

pub fn score_lines(lines: &[String]) -> Vec<ScoredLine> {
    lines.iter().map(|line| ScoredLine::new(line)).collect()
}

impl Signal {
    pub fn fires(self, line: &str) -> bool {
        let bare = strip_bullet(line);
        let len = line.chars().count();
        match self {
            Signal::LeadingQuantity => LEADING_QUANTITY_RE.is_match(bare),
            Signal::QuantityWord => LEXICON.quantity_word.is_match(bare),
            Signal::Unit => LEXICON.unit.is_match(line),
            Signal::ShortLine => len < SHORT_LINE_CHARS,
            Signal::PreparationState => LEXICON.preparation_state.is_match(line),
            Signal::Bullet => starts_with_bullet(line),
            Signal::LowercaseShort => {
                bare.chars().next().is_some_and(char::is_lowercase)
                    && len < LOWERCASE_SHORT_CHARS
            }
            Signal::CookingVerb => LEXICON.cooking_verb.is_match(line),
            Signal::VeryLong => len > VERY_LONG_CHARS,
            Signal::LongLine => len > LONG_LINE_CHARS,
            Signal::NumberedStep => starts_with_step_number(line),
            Signal::Duration => DURATION_RE.is_match(line),
            Signal::Temperature => TEMPERATURE_RE.is_match(line),
            Signal::Imperative => {
                len > IMPERATIVE_MIN_CHARS
                    && line.chars().next().is_some_and(char::is_uppercase)
                    && LEXICON
                        .cooking_verb
                        .find(line)
                        .is_some_and(|verb| verb.start() == 0)
            }
        }
    }
}

fn weigh(line: &str, table: &[(Signal, f32)]) -> f32 {
    let total: f32 = table
        .iter()
        .filter(|(signal, _)| signal.fires(line))
        .map(|(_, weight)| weight)
        .sum();
    total.clamp(0.0, 1.0)
}

pub fn ingredient_score(line: &str) -> f32 {
    weigh(line.trim(), INGREDIENT_SIGNALS)
}

pub fn instruction_score(line: &str) -> f32 {
    weigh(line.trim(), INSTRUCTION_SIGNALS)
}

pub fn starts_with_bullet(line: &str) -> bool {
    line.starts_with(BULLETS)
}

/// Remove leading bullet glyphs and the whitespace after them.
pub fn strip_bullet(line: &str) -> &str {
    line.trim_start_matches(|c: char| BULLETS.contains(&c) || c.is_whitespace())
}

/// Length of a leading "1." / "2)" / "Step 3:" marker, if any. A number
/// directly followed by another digit ("1.5 dl") is a quantity, not a step.
fn step_number_len(line: &str) -> Option<usize> {
    if let Some(m) = STEP_WORD_RE.find(line) {
        return Some(m.end());
    }
    let m = STEP_NUMBER_RE.find(line)?;
    if line[m.end()..].starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    Some(m.end())
}

pub fn starts_with_step_number(line: &str) -> bool {
    step_number_len(line).is_some()
}

pub fn strip_step_number(line: &str) -> &str {
    match step_number_len(line) {
        Some(end) => line[end..].trim_start(),
        None => line,
    }
}

/// Split at `.`, `!` or `?` followed by whitespace and an uppercase letter.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let boundary = i + c.len_utf8();
        let rest = &text[boundary..];
        let after_space = rest.trim_start();
        if after_space.len() < rest.len()
            && after_space.chars().next().is_some_and(char::is_uppercase)
        {
            sentences.push(text[start..boundary].trim().to_string());
            start = boundary;
        }
    }
    sentences.push(text[start..].trim().to_string());
    sentences.retain(|s| !s.is_empty());
    sentences
}
