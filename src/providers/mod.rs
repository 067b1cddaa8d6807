mod anthropic;
mod factory;
mod open_ai;
mod prompt;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use open_ai::OpenAIProvider;
pub use prompt::RECIPE_CLEANUP_PROMPT;

use crate::model::RecipeData;
use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;

/// Optional LLM pass that tidies an extracted recipe.
#[async_trait]
pub trait RecipeReformatter: Send + Sync {
    /// Get the provider name (e.g., "openai", "anthropic")
    fn provider_name(&self) -> &str;

    async fn reformat(&self, recipe: &RecipeData) -> Result<RecipeData, Box<dyn Error + Send + Sync>>;
}

/// Run the cleanup pass; any failure leaves `recipe` untouched.
pub async fn reformat_or_keep(reformatter: &dyn RecipeReformatter, recipe: RecipeData) -> RecipeData {
    match reformatter.reformat(&recipe).await {
        Ok(cleaned) => {
            debug!("Cleanup via {} succeeded", reformatter.provider_name());
            cleaned
        }
        Err(e) => {
            warn!(
                "Cleanup via {} failed, keeping extracted recipe: {}",
                reformatter.provider_name(),
                e
            );
            recipe
        }
    }
}

/// The editable part of a recipe, as exchanged with the model.
#[derive(Debug, Serialize, Deserialize)]
struct RecipeDraft {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    ingredients: Vec<String>,
    #[serde(default)]
    instructions: Vec<String>,
}

fn draft_json(recipe: &RecipeData) -> Result<String, serde_json::Error> {
    serde_json::to_string(&RecipeDraft {
        title: recipe.title.clone(),
        description: recipe.description.clone(),
        ingredients: recipe.ingredients.clone(),
        instructions: recipe.instructions.clone(),
    })
}

/// Merge a model reply into `original`. Replies that are not the expected
/// JSON, or that drop every ingredient and instruction, are rejected.
fn apply_reply(original: &RecipeData, reply: &str) -> Result<RecipeData, Box<dyn Error + Send + Sync>> {
    let body = reply.trim();
    let body = body
        .strip_prefix("```json")
        .or_else(|| body.strip_prefix("```"))
        .and_then(|b| b.strip_suffix("```"))
        .unwrap_or(body)
        .trim();

    let draft: RecipeDraft = serde_json::from_str(body)?;
    if draft.ingredients.is_empty() && draft.instructions.is_empty() && original.has_structured_content() {
        return Err("Model reply dropped all ingredients and instructions".into());
    }

    Ok(RecipeData {
        title: draft.title,
        description: draft.description,
        ingredients: draft.ingredients,
        instructions: draft.instructions,
        ..original.clone()
    }
    .finalize(&original.title))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn original() -> RecipeData {
        RecipeData {
            title: "Pasta".to_string(),
            ingredients: vec!["1. 200 g pasta".to_string()],
            instructions: vec!["Boil. Drain.".to_string()],
            servings: Some("2".to_string()),
            source_url: "https://example.com/pasta".to_string(),
            ..RecipeData::default()
        }
    }

    #[test]
    fn test_apply_reply_keeps_untouched_fields() {
        let reply = "```json\n{\"title\": \"Quick Pasta\", \"ingredients\": [\"200 g pasta\"], \"instructions\": [\"Boil.\", \"Drain.\"]}\n```";
        let cleaned = apply_reply(&original(), reply).unwrap();

        assert_eq!(cleaned.title, "Quick Pasta");
        assert_eq!(cleaned.ingredients, vec!["200 g pasta"]);
        assert_eq!(cleaned.instructions, vec!["Boil.", "Drain."]);
        assert_eq!(cleaned.servings.as_deref(), Some("2"));
        assert_eq!(cleaned.source_url, "https://example.com/pasta");
    }

    #[test]
    fn test_apply_reply_rejects_unusable_replies() {
        assert!(apply_reply(&original(), "Sure! Here is your recipe.").is_err());
        assert!(apply_reply(&original(), r#"{"title": "Pasta"}"#).is_err());
    }

    #[test]
    fn test_blank_title_falls_back_to_original() {
        let cleaned = apply_reply(
            &original(),
            r#"{"title": " ", "ingredients": ["pasta"], "instructions": []}"#,
        )
        .unwrap();
        assert_eq!(cleaned.title, "Pasta");
    }
}
