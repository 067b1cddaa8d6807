use crate::error::ImportError;
use crate::model::RecipeData;
use scraper::{ElementRef, Html, Selector};

mod html_class;
mod json_ld;

pub use html_class::HtmlClassExtractor;
pub use json_ld::{normalize_images, normalize_instructions, JsonLdExtractor};

/// Elements that never carry recipe content and confuse the DOM heuristics.
pub const NOISE_SELECTOR: &str = "script, style, nav, footer, noscript, iframe";

pub struct ParsingContext {
    /// The original, user-supplied URL
    pub url: String,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }

    pub fn hostname(&self) -> Option<String> {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }

    /// Remove noise subtrees (scripts, navigation, footers, ...) in place.
    pub fn strip_noise(&mut self) {
        strip_noise(&mut self.document);
    }
}

pub trait Extractor {
    fn parse(&self, context: &ParsingContext) -> Result<RecipeData, ImportError>;
}

pub fn strip_noise(document: &mut Html) {
    let selector = Selector::parse(NOISE_SELECTOR).expect("valid noise selector");
    remove_matching(document, &selector);
}

/// Detach every subtree whose root matches `selector`.
pub(crate) fn remove_matching(document: &mut Html, selector: &Selector) {
    let ids: Vec<_> = document.select(selector).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Concatenated text of an element with whitespace runs collapsed.
pub(crate) fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trimmed, non-empty `content` attribute of the first element matching `selector`.
pub(crate) fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .find(|content| !content.is_empty())
}
