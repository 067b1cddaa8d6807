//! Segmentation for captions without section headers, driven by line scores.

use super::preprocess::{is_junk, strip_edge_emoji, strip_leading_emoji};
use super::scoring::{
    split_sentences, starts_with_bullet, starts_with_step_number, strip_bullet, strip_step_number,
    ScoredLine,
};
use std::ops::Range;

/// Runs shorter than this are not treated as an ingredient list.
pub const MIN_CLUSTER_LEN: usize = 2;
/// Only this many leading lines are searched for a decorated title.
pub const TITLE_SCAN_LINES: usize = 5;
/// Short, non-instructional lines right after a cluster are absorbed into it.
pub const EXTENSION_MAX_CHARS: usize = 60;
pub const EXTENSION_MAX_INSTRUCTION: f32 = 0.2;
/// Instruction lines longer than this are split into sentences.
pub const SPLIT_SENTENCES_OVER: usize = 100;
/// Sweep fallback thresholds for prose instructions.
pub const SWEEP_MIN_INSTRUCTION: f32 = 0.3;
pub const SWEEP_MIN_CHARS: usize = 60;

const TITLE_MARKERS: &[char] = &['⭐', '✨', '🌟', '💫', '★', '☆'];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

/// Longest run of ingredient-like lines (earliest wins ties), extended over
/// trailing short lines that do not read as instructions.
pub fn find_cluster(scored: &[ScoredLine]) -> Option<Range<usize>> {
    let mut best: Option<Range<usize>> = None;
    let mut run_start = None;

    for i in 0..=scored.len() {
        let inside = scored.get(i).is_some_and(ScoredLine::is_ingredient_like);
        match (inside, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                if best.as_ref().map_or(true, |b| i - start > b.len()) {
                    best = Some(start..i);
                }
                run_start = None;
            }
            _ => {}
        }
    }

    let mut cluster = best.filter(|run| run.len() >= MIN_CLUSTER_LEN)?;
    while let Some(next) = scored.get(cluster.end) {
        if next.len() >= EXTENSION_MAX_CHARS
            || next.instruction >= EXTENSION_MAX_INSTRUCTION
            || next.text.starts_with('#')
        {
            break;
        }
        cluster.end += 1;
    }
    Some(cluster)
}

fn is_decorated_title(line: &str) -> bool {
    if line.contains(TITLE_MARKERS) {
        return true;
    }
    let letters: Vec<char> = line.chars().filter(|c| c.is_alphabetic()).collect();
    line.chars().count() > 3 && !letters.is_empty() && letters.iter().all(|c| c.is_uppercase())
}

/// Title line among the first lines, stopping before `limit`.
fn pick_title(lines: &[String], limit: usize) -> Option<usize> {
    let scan = limit.min(TITLE_SCAN_LINES);
    (0..scan)
        .find(|&i| is_decorated_title(&lines[i]))
        .or_else(|| (limit > 0).then_some(0))
}

fn clean_title(line: &str) -> Option<String> {
    let title = strip_edge_emoji(line).trim();
    (!title.is_empty()).then(|| title.to_string())
}

fn description_line(line: &str) -> Option<String> {
    if line.starts_with('#') || line.contains('@') {
        return None;
    }
    let line = strip_leading_emoji(line).trim();
    (!line.is_empty()).then(|| line.to_string())
}

fn join_description(lines: Vec<String>) -> Option<String> {
    (!lines.is_empty()).then(|| lines.join("\n"))
}

fn push_instruction(steps: &mut Vec<String>, line: &str) {
    if line.chars().count() > SPLIT_SENTENCES_OVER {
        steps.extend(split_sentences(line));
        return;
    }
    let step = strip_step_number(strip_bullet(line)).trim();
    if !step.is_empty() {
        steps.push(step.to_string());
    }
}

/// Ingredients are the cluster; everything after it is method, skipping
/// hashtag and junk lines rather than stopping at them.
pub fn split_around_cluster(scored: &[ScoredLine], cluster: Range<usize>) -> Classified {
    let lines: Vec<String> = scored.iter().map(|line| line.text.clone()).collect();
    let title_index = pick_title(&lines, cluster.start);

    // Only the lines between the title and the cluster describe the dish.
    let description = (title_index.map_or(0, |t| t + 1)..cluster.start)
        .filter_map(|i| description_line(&lines[i]))
        .collect();

    let ingredients = lines[cluster.clone()]
        .iter()
        .map(|line| strip_bullet(line).trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    let mut instructions = Vec::new();
    for line in &lines[cluster.end..] {
        if line.starts_with('#') || is_junk(line) {
            continue;
        }
        push_instruction(&mut instructions, line);
    }

    Classified {
        title: title_index.and_then(|i| clean_title(&lines[i])),
        description: join_description(description),
        ingredients,
        instructions,
    }
}

/// Single pass for captions with neither headers nor a cluster.
pub fn sweep(scored: &[ScoredLine]) -> Classified {
    let lines: Vec<String> = scored.iter().map(|line| line.text.clone()).collect();
    let title_index = pick_title(&lines, lines.len());

    let mut classified = Classified {
        title: title_index.and_then(|i| clean_title(&lines[i])),
        ..Classified::default()
    };
    let mut description = Vec::new();

    for (i, line) in scored.iter().enumerate() {
        if Some(i) == title_index {
            continue;
        }
        let text = line.text.as_str();
        if starts_with_bullet(text) {
            let item = strip_bullet(text).trim();
            if !item.is_empty() {
                classified.ingredients.push(item.to_string());
            }
        } else if starts_with_step_number(text) {
            push_instruction(&mut classified.instructions, text);
        } else if line.instruction > SWEEP_MIN_INSTRUCTION && line.len() > SWEEP_MIN_CHARS {
            classified.instructions.extend(split_sentences(text));
        } else if let Some(text) = description_line(text) {
            description.push(text);
        }
    }

    classified.description = join_description(description);
    classified
}
