//! Segmentation for captions that name their sections.

use super::preprocess::{is_junk, strip_edge_emoji, strip_leading_emoji};
use super::scoring::{strip_bullet, strip_step_number};
use super::vocabulary::LEXICON;
use regex::{Captures, Regex};

/// Where a section header sits, and the first item when it shares the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    pub index: usize,
    pub inline_item: Option<String>,
}

impl SectionHeader {
    pub fn is_inline(&self) -> bool {
        self.inline_item.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionHeaders {
    pub ingredients: Option<SectionHeader>,
    pub instructions: Option<SectionHeader>,
}

impl SectionHeaders {
    pub fn any(&self) -> bool {
        self.ingredients.is_some() || self.instructions.is_some()
    }

    /// Index of the earliest header; everything above it is title and description.
    fn first_index(&self) -> Option<usize> {
        [&self.ingredients, &self.instructions]
            .into_iter()
            .flatten()
            .map(|header| header.index)
            .min()
    }
}

/// Result of splitting the block above the first header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preamble {
    pub title: Option<String>,
    pub description: Option<String>,
    pub servings: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sections {
    pub preamble: Preamble,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

fn inline_item(caps: &Captures) -> Option<String> {
    ["colon", "bullet", "dot", "glued"]
        .into_iter()
        .find_map(|group| caps.name(group))
        .map(|m| m.as_str().trim().to_string())
}

fn match_header(line: &str, whole: &Regex, inline: &Regex, index: usize) -> Option<SectionHeader> {
    if whole.is_match(line) {
        return Some(SectionHeader {
            index,
            inline_item: None,
        });
    }
    let caps = inline.captures(line)?;
    Some(SectionHeader {
        index,
        inline_item: inline_item(&caps),
    })
}

/// First ingredient header and first instruction header, if any.
pub fn find_headers(lines: &[String]) -> SectionHeaders {
    let mut headers = SectionHeaders::default();
    for (index, line) in lines.iter().enumerate() {
        if headers.ingredients.is_none() {
            if let Some(header) = match_header(
                line,
                &LEXICON.ingredient_header,
                &LEXICON.ingredient_inline,
                index,
            ) {
                headers.ingredients = Some(header);
                continue;
            }
        }
        if headers.instructions.is_none() {
            headers.instructions = match_header(
                line,
                &LEXICON.instruction_header,
                &LEXICON.instruction_inline,
                index,
            );
        }
    }
    headers
}

fn is_title_candidate(line: &str) -> bool {
    !line.is_empty()
        && !line.contains('@')
        && !line.starts_with('#')
        && !is_junk(line)
        && !line.contains(['!', '?'])
}

/// Take the first parenthesized servings mention out of `text`.
fn take_servings(text: &str, servings: &mut Option<String>) -> String {
    let Some(caps) = LEXICON.servings_parenthesized.captures(text) else {
        return text.to_string();
    };
    if servings.is_none() {
        *servings = Some(caps[1].trim().to_string());
    }
    LEXICON
        .servings_parenthesized
        .replace(text, "")
        .trim()
        .to_string()
}

/// Pick the title from the lines above the first header. The shortest clean
/// line wins so a long promotional hook is not mistaken for the dish name.
fn split_preamble(lines: &[String], known_servings: Option<String>) -> Preamble {
    let mut servings = known_servings;

    // Candidates are judged without their servings mention, so a bare
    // "(4 servings)" line never wins.
    let title_index = lines
        .iter()
        .enumerate()
        .map(|(i, line)| (i, take_servings(strip_edge_emoji(line), &mut None)))
        .filter(|(_, line)| is_title_candidate(line))
        .min_by_key(|(_, line)| line.chars().count())
        .map(|(i, _)| i)
        .or_else(|| (!lines.is_empty()).then_some(0));

    let title = title_index
        .map(|i| take_servings(strip_edge_emoji(&lines[i]), &mut servings))
        .filter(|title| !title.is_empty());

    let description: Vec<String> = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != title_index)
        .map(|(_, line)| line.as_str())
        .filter(|line| !line.contains('@') && !line.starts_with('#'))
        .map(|line| take_servings(strip_leading_emoji(line), &mut servings))
        .filter(|line| !line.is_empty())
        .collect();

    Preamble {
        title,
        description: (!description.is_empty()).then(|| description.join("\n")),
        servings,
    }
}

/// Lines strictly after `start` up to the next header or the end.
fn section_body<'a>(lines: &'a [String], start: usize, other: Option<&SectionHeader>) -> &'a [String] {
    let end = other
        .map(|header| header.index)
        .filter(|&index| index > start)
        .unwrap_or(lines.len());
    &lines[start + 1..end]
}

fn ingredient_section(lines: &[String], header: &SectionHeader, other: Option<&SectionHeader>) -> Vec<String> {
    header
        .inline_item
        .iter()
        .map(String::as_str)
        .chain(section_body(lines, header.index, other).iter().map(String::as_str))
        .map(|line| strip_bullet(line).trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// An inline header ends its section at the first blank, hashtag or junk
/// line; a header on its own line only skips them.
fn instruction_section(lines: &[String], header: &SectionHeader, other: Option<&SectionHeader>) -> Vec<String> {
    let mut steps = Vec::new();
    let candidates = header
        .inline_item
        .iter()
        .map(String::as_str)
        .chain(section_body(lines, header.index, other).iter().map(String::as_str));

    for line in candidates {
        let step = strip_step_number(strip_bullet(line)).trim();
        if step.is_empty() || step.starts_with('#') || is_junk(step) {
            if header.is_inline() {
                break;
            }
            continue;
        }
        steps.push(step.to_string());
    }
    steps
}

pub fn segment(lines: &[String], headers: &SectionHeaders, servings: Option<String>) -> Sections {
    let first = headers.first_index().unwrap_or(lines.len());
    let preamble = split_preamble(&lines[..first], servings);

    let ingredients = headers
        .ingredients
        .as_ref()
        .map(|header| ingredient_section(lines, header, headers.instructions.as_ref()))
        .unwrap_or_default();
    let instructions = headers
        .instructions
        .as_ref()
        .map(|header| instruction_section(lines, header, headers.ingredients.as_ref()))
        .unwrap_or_default();

    Sections {
        preamble,
        ingredients,
        instructions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_find_block_and_inline_headers() {
        let caption = lines("Soup\nIngredienser:\n2 dl grädde\nInstructions1. Heat\n2. Serve");
        let headers = find_headers(&caption);
        assert_eq!(
            headers.ingredients,
            Some(SectionHeader {
                index: 1,
                inline_item: None
            })
        );
        assert_eq!(
            headers.instructions,
            Some(SectionHeader {
                index: 3,
                inline_item: Some("1. Heat".to_string())
            })
        );
    }

    #[test]
    fn test_segment_block_headers() {
        let caption = lines("My Pasta\nIngredients\n1 cup flour\n2 eggs\nInstructions\n1. Mix\n2. Bake");
        let headers = find_headers(&caption);
        let sections = segment(&caption, &headers, None);

        assert_eq!(sections.preamble.title.as_deref(), Some("My Pasta"));
        assert_eq!(sections.preamble.description, None);
        assert_eq!(sections.ingredients, vec!["1 cup flour", "2 eggs"]);
        assert_eq!(sections.instructions, vec!["Mix", "Bake"]);
    }

    #[test]
    fn test_shortest_clean_line_is_title() {
        let caption = lines(
            "You have to try this, it changed my life!\n🍝 Creamy Pasta ✨\nrecipe by @friend\nA weeknight favourite for the whole family\nIngredients\n- pasta",
        );
        let headers = find_headers(&caption);
        let sections = segment(&caption, &headers, None);

        assert_eq!(sections.preamble.title.as_deref(), Some("Creamy Pasta"));
        assert_eq!(
            sections.preamble.description.as_deref(),
            Some("You have to try this, it changed my life!\nA weeknight favourite for the whole family")
        );
        assert_eq!(sections.ingredients, vec!["pasta"]);
    }

    #[test]
    fn test_parenthesized_servings_leave_title() {
        let caption = lines("Pasta Carbonara (6 portioner)\nIngredienser\n400 g pasta\nGör så här\nKoka pastan.");
        let headers = find_headers(&caption);
        let sections = segment(&caption, &headers, None);

        assert_eq!(sections.preamble.title.as_deref(), Some("Pasta Carbonara"));
        assert_eq!(sections.preamble.servings.as_deref(), Some("6 portioner"));
        assert_eq!(sections.instructions, vec!["Koka pastan."]);
    }

    #[test]
    fn test_servings_only_line_is_not_title() {
        let caption = lines("(4 servings)\nBanana Bread\nIngredients\n2 bananas");
        let sections = segment(&caption, &find_headers(&caption), None);

        assert_eq!(sections.preamble.title.as_deref(), Some("Banana Bread"));
        assert_eq!(sections.preamble.servings.as_deref(), Some("4 servings"));
        assert_eq!(sections.preamble.description, None);
    }

    #[test]
    fn test_inline_instruction_header_stops_at_hashtag() {
        let caption = lines("Instructions1. Mix\n2. Bake\n#tip: lots of cheese here always\nShare with friends");
        let sections = segment(&caption, &find_headers(&caption), None);
        assert_eq!(sections.instructions, vec!["Mix", "Bake"]);

        let caption = lines("Instructions\n1. Mix\n2. Bake\n#tip: lots of cheese here always\nShare with friends");
        let sections = segment(&caption, &find_headers(&caption), None);
        assert_eq!(sections.instructions, vec!["Mix", "Bake", "Share with friends"]);
    }

    #[test]
    fn test_instructions_before_ingredients() {
        let caption = lines("Method: Whisk everything\nBake 20 min\nIngredients\n• 2 eggs\n• 1 dl milk");
        let sections = segment(&caption, &find_headers(&caption), None);

        assert_eq!(sections.preamble.title, None);
        assert_eq!(sections.instructions, vec!["Whisk everything", "Bake 20 min"]);
        assert_eq!(sections.ingredients, vec!["2 eggs", "1 dl milk"]);
    }
}
