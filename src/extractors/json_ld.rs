use super::{Extractor, ParsingContext};
use crate::duration::humanize_iso_duration;
use crate::error::ImportError;
use crate::model::{ImageSource, RecipeData};
use html_escape::decode_html_entities;
use log::debug;
use scraper::Selector;
use serde_json::Value;

pub struct JsonLdExtractor;

impl JsonLdExtractor {
    fn convert_to_recipe(&self, candidate: &Value, url: &str) -> Option<RecipeData> {
        let title = candidate
            .get("name")
            .and_then(Value::as_str)
            .map(decode_html_symbols)
            .filter(|name| !name.is_empty())?;

        let description = candidate
            .get("description")
            .and_then(|d| match d {
                Value::String(s) => Some(s.as_str()),
                Value::Object(obj) => obj.get("text").and_then(Value::as_str),
                _ => None,
            })
            .map(decode_html_symbols)
            .filter(|d| !d.is_empty());

        let ingredients = match candidate.get("recipeIngredient") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(decode_html_symbols)
                .filter(|ing| !ing.is_empty())
                .collect(),
            Some(Value::String(single)) => vec![decode_html_symbols(single)],
            _ => Vec::new(),
        };

        let instructions = normalize_instructions(candidate.get("recipeInstructions"));
        let images = normalize_images(candidate.get("image"))
            .into_iter()
            .map(ImageSource::Url)
            .collect();

        let duration = |key: &str| {
            candidate
                .get(key)
                .and_then(Value::as_str)
                .filter(|d| !d.trim().is_empty())
                .map(humanize_iso_duration)
        };

        Some(
            RecipeData {
                title,
                description,
                ingredients,
                instructions,
                images,
                prep_time: duration("prepTime"),
                cook_time: duration("cookTime"),
                servings: candidate.get("recipeYield").and_then(yield_to_string),
                source_url: url.to_string(),
                tags: None,
            }
            .finalize(""),
        )
    }
}

impl Extractor for JsonLdExtractor {
    fn parse(&self, context: &ParsingContext) -> Result<RecipeData, ImportError> {
        debug!("JsonLdExtractor: Starting parse for URL: {}", context.url);
        let selector =
            Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid selector");

        let scripts: Vec<_> = context.document.select(&selector).collect();
        debug!(
            "JsonLdExtractor: Found {} JSON-LD script tags",
            scripts.len()
        );

        for (index, script) in scripts.iter().enumerate() {
            let raw_json = script.text().collect::<String>();
            let json_ld = match parse_block(&raw_json) {
                Ok(value) => value,
                Err(e) => {
                    debug!("JsonLdExtractor: Skipping script {}: {}", index, e);
                    continue;
                }
            };

            let mut candidates = Vec::new();
            flatten_candidates(&json_ld, &mut candidates);
            debug!(
                "JsonLdExtractor: Script {} yielded {} candidates",
                index,
                candidates.len()
            );

            for candidate in candidates.into_iter().filter(|c| is_recipe_type(c)) {
                if let Some(recipe) = self.convert_to_recipe(candidate, &context.url) {
                    debug!("JsonLdExtractor: Found recipe '{}'", recipe.title);
                    return Ok(recipe);
                }
                debug!("JsonLdExtractor: Recipe candidate without a name, skipping");
            }
        }

        Err(ImportError::NoContentFound(
            "no Recipe object in any JSON-LD script".to_string(),
        ))
    }
}

fn parse_block(raw: &str) -> Result<Value, ImportError> {
    serde_json::from_str(raw.trim())
        .map_err(|e| ImportError::MalformedStructuredData(e.to_string()))
}

/// Flatten the three block shapes (object, array, `@graph` container) into a
/// candidate list, keeping document order.
fn flatten_candidates<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten_candidates(item, out);
            }
        }
        Value::Object(obj) => {
            out.push(value);
            if let Some(Value::Array(graph)) = obj.get("@graph") {
                for item in graph {
                    flatten_candidates(item, out);
                }
            }
        }
        _ => {}
    }
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t == "Recipe",
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("Recipe")),
        _ => false,
    }
}

/// Normalize `recipeInstructions` into a flat list of steps.
///
/// Accepts a plain string, an array of strings, `HowToStep` objects (`text`
/// or `name`), and `HowToSection` objects whose `itemListElement` steps are
/// joined into a single entry.
pub fn normalize_instructions(raw: Option<&Value>) -> Vec<String> {
    let items: Vec<String> = match raw {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) => vec![decode_html_symbols(s)],
        Some(Value::Array(items)) => items.iter().map(instruction_text).collect(),
        Some(obj @ Value::Object(_)) => vec![instruction_text(obj)],
        Some(_) => Vec::new(),
    };
    items.into_iter().filter(|step| !step.is_empty()).collect()
}

fn instruction_text(item: &Value) -> String {
    match item {
        Value::String(s) => decode_html_symbols(s),
        Value::Object(obj) => {
            if let Some(text) = obj.get("text").and_then(Value::as_str) {
                decode_html_symbols(text)
            } else if let Some(steps @ Value::Array(_)) = obj.get("itemListElement") {
                normalize_instructions(Some(steps)).join(" ")
            } else if let Some(name) = obj.get("name").and_then(Value::as_str) {
                decode_html_symbols(name)
            } else {
                String::new()
            }
        }
        _ => String::new(),
    }
}

/// Normalize the `image` property into a list of URLs.
pub fn normalize_images(raw: Option<&Value>) -> Vec<String> {
    match raw {
        Some(Value::String(url)) => vec![url.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(url) => Some(url.clone()),
                Value::Object(obj) => obj.get("url").and_then(Value::as_str).map(str::to_string),
                _ => None,
            })
            .collect(),
        Some(Value::Object(obj)) => obj
            .get("url")
            .and_then(Value::as_str)
            .map(|url| vec![url.to_string()])
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn yield_to_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => return items.first().and_then(yield_to_string),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn decode_html_symbols(text: &str) -> String {
    // for some reason need to decode twice to get the correct string
    decode_html_entities(&decode_html_entities(text))
        .trim()
        .to_string()
}
