use crate::extractors::{Extractor, HtmlClassExtractor, JsonLdExtractor, ParsingContext};
use crate::model::{RecipeData, UNTITLED_PLACEHOLDER_TITLE};
use log::debug;

/// Which extractor produced a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    JsonLd,
    Heuristic,
}

/// Extract a recipe from fetched markup: structured data first, then the
/// DOM heuristic on a noise-stripped document. Never fails; the heuristic
/// tolerates pages with nothing recipe-like on them.
///
/// `scraper::Html` is not `Send`, so this stays synchronous.
pub fn extract_from_html(html: &str, url: &str) -> (RecipeData, Tier) {
    let mut context = ParsingContext::new(url, html);

    match JsonLdExtractor.parse(&context) {
        Ok(recipe) => return (recipe, Tier::JsonLd),
        Err(e) => debug!("No structured data for {}: {}", url, e),
    }

    context.strip_noise();
    let recipe = HtmlClassExtractor.parse(&context).unwrap_or_else(|e| {
        debug!("Heuristic extraction failed for {}: {}", url, e);
        let fallback = context
            .hostname()
            .unwrap_or_else(|| UNTITLED_PLACEHOLDER_TITLE.to_string());
        RecipeData {
            source_url: url.to_string(),
            ..RecipeData::default()
        }
        .finalize(&fallback)
    });
    (recipe, Tier::Heuristic)
}
