use super::vocabulary::LEXICON;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// Lines whose hashtag characters exceed this share of the line are dropped.
const MAX_HASHTAG_SHARE: f32 = 0.5;

/// Instagram handles are at most 30 characters.
const MAX_HANDLE_LEN: usize = 30;

static HASHTAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#[\p{L}\p{N}_]+").expect("Invalid hashtag regex"));

static HANDLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._]+$").expect("Invalid handle regex"));

/// Caption lines after noise removal, plus any servings line that was lifted out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedCaption {
    pub lines: Vec<String>,
    pub servings: Option<String>,
}

/// Split, trim and de-noise a raw caption. The order of the steps matters:
/// the handle check only looks at what survives the junk filters.
pub fn prepare(caption: &str) -> PreparedCaption {
    let mut lines: Vec<String> = caption
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !is_junk(line))
        .filter(|line| !is_hashtag_noise(line))
        .map(str::to_string)
        .collect();

    if lines.first().is_some_and(|first| looks_like_handle(first)) {
        debug!("Caption: dropping leading handle line '{}'", lines[0]);
        lines.remove(0);
    }

    let mut servings = None;
    lines.retain(|line| {
        if servings.is_none() {
            if let Some(caps) = LEXICON.servings_line.captures(line) {
                servings = Some(caps[1].trim().to_string());
                return false;
            }
        }
        true
    });

    PreparedCaption { lines, servings }
}

pub fn is_junk(line: &str) -> bool {
    LEXICON.junk.is_match(line.trim())
}

/// Hashtag- or emoji-only lines, and lines dominated by hashtags.
pub fn is_hashtag_noise(line: &str) -> bool {
    let without_tags = HASHTAG_RE.replace_all(line, "");
    let has_content = without_tags
        .chars()
        .any(|c| c.is_alphanumeric() && !is_emoji(c));
    if !has_content {
        return true;
    }

    let total = line.chars().count();
    let tagged: usize = HASHTAG_RE
        .find_iter(line)
        .map(|m| m.as_str().chars().count())
        .sum();
    total > 0 && tagged as f32 / total as f32 > MAX_HASHTAG_SHARE
}

/// A bare Instagram handle that embeds glue to the start of the caption.
/// Section headers such as "Ingredients" are never treated as handles.
pub fn looks_like_handle(line: &str) -> bool {
    line.chars().count() <= MAX_HANDLE_LEN
        && HANDLE_RE.is_match(line)
        && !LEXICON.ingredient_header.is_match(line)
        && !LEXICON.instruction_header.is_match(line)
}

pub fn is_emoji(c: char) -> bool {
    matches!(c as u32,
        0x1F000..=0x1FAFF   // pictographs, emoticons, transport, flags
        | 0x2600..=0x27BF   // misc symbols, dingbats
        | 0x2B00..=0x2BFF   // arrows, stars
        | 0x2300..=0x23FF   // technical (⌚, ⏰)
        | 0xFE00..=0xFE0F   // variation selectors
        | 0x200D            // zero-width joiner
        | 0x20E3            // keycap
        | 0xE0020..=0xE007F // tag sequences
    )
}

/// Drop emoji (and the whitespace around them) from the start of a line.
pub fn strip_leading_emoji(line: &str) -> &str {
    line.trim_start_matches(|c: char| is_emoji(c) || c.is_whitespace())
}

/// Drop emoji from both ends of a line.
pub fn strip_edge_emoji(line: &str) -> &str {
    strip_leading_emoji(line).trim_end_matches(|c: char| is_emoji(c) || c.is_whitespace())
}
