//! Turns a free-form social media caption into a [`RecipeData`].
//!
//! A caption is cleaned first ([`preprocess`]), then classified into one of
//! three layouts, each with its own segmentation:
//!
//! - [`CaptionLayout::HeaderAnchored`]: the caption names its sections
//!   ("Ingredients", "Gör så här", ...)
//! - [`CaptionLayout::Clustered`]: no headers, but a run of lines scores as
//!   an ingredient list
//! - [`CaptionLayout::Unstructured`]: neither; lines are sorted one by one

pub mod cluster;
pub mod headers;
pub mod preprocess;
pub mod scoring;
pub mod vocabulary;

use crate::model::{RecipeData, INSTAGRAM_PLACEHOLDER_TITLE};
use cluster::Classified;
use headers::SectionHeaders;
use log::debug;
use scoring::ScoredLine;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq)]
pub enum CaptionLayout {
    HeaderAnchored(SectionHeaders),
    Clustered(Range<usize>),
    Unstructured,
}

impl CaptionLayout {
    /// Headers take precedence; scoring is only consulted without them.
    pub fn detect(lines: &[String], scored: &[ScoredLine]) -> Self {
        let headers = headers::find_headers(lines);
        if headers.any() {
            return CaptionLayout::HeaderAnchored(headers);
        }
        match cluster::find_cluster(scored) {
            Some(range) => CaptionLayout::Clustered(range),
            None => CaptionLayout::Unstructured,
        }
    }
}

/// Parse a caption into a recipe. Never fails; a caption without anything
/// recipe-like still yields a titled record with empty lists.
pub fn parse_caption(caption: &str, source_url: &str) -> RecipeData {
    let prepared = preprocess::prepare(caption);
    let scored = scoring::score_lines(&prepared.lines);
    let layout = CaptionLayout::detect(&prepared.lines, &scored);
    debug!(
        "Caption: {} lines after cleanup, layout {:?}",
        prepared.lines.len(),
        layout
    );

    let (classified, servings) = match layout {
        CaptionLayout::HeaderAnchored(found) => {
            let sections = headers::segment(&prepared.lines, &found, prepared.servings);
            let classified = Classified {
                title: sections.preamble.title,
                description: sections.preamble.description,
                ingredients: sections.ingredients,
                instructions: sections.instructions,
            };
            (classified, sections.preamble.servings)
        }
        CaptionLayout::Clustered(range) => (
            cluster::split_around_cluster(&scored, range),
            prepared.servings,
        ),
        CaptionLayout::Unstructured => (cluster::sweep(&scored), prepared.servings),
    };

    RecipeData {
        title: classified.title.unwrap_or_default(),
        description: classified.description,
        ingredients: classified.ingredients,
        instructions: classified.instructions,
        images: Vec::new(),
        prep_time: None,
        cook_time: None,
        servings,
        source_url: source_url.to_string(),
        tags: None,
    }
    .finalize(INSTAGRAM_PLACEHOLDER_TITLE)
}
