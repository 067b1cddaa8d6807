//! Extract structured recipes from recipe web pages and Instagram captions.
//!
//! Web pages are read from schema.org JSON-LD when present and from
//! ingredient/instruction-classed markup otherwise. Instagram captions are
//! segmented by section headers, or by a line-scoring heuristic when the
//! caption has none.

pub mod builder;
pub mod config;
pub mod duration;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod instagram;
pub mod json_walk;
pub mod model;
pub mod pipelines;
pub mod providers;
pub mod scale;
pub mod store;

// Re-export commonly used types
pub use builder::{InputSource, RecipeImporter, RecipeImporterBuilder};
pub use config::{ImportConfig, LlmConfig};
pub use error::ImportError;
pub use instagram::{parse_caption, CapturedPost, PostCapture};
pub use model::{ImageSource, RecipeData};
pub use pipelines::{extract_from_html, Orchestrator};
pub use providers::RecipeReformatter;
pub use scale::{scale_factor, scale_ingredient, scale_ingredients};
pub use store::{MemoryStore, RecipeId, RecipeStore};

/// Extract a recipe from a URL using configuration from the environment
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let recipe = recipe_import::url_to_recipe("https://example.com/recipe").await?;
/// # Ok(())
/// # }
/// ```
pub async fn url_to_recipe(url: &str) -> Result<RecipeData, ImportError> {
    let config = ImportConfig::load()?;
    Orchestrator::new(&config)?.extract(url).await
}

/// Parse an Instagram caption using configuration from the environment
pub async fn caption_to_recipe(caption: &str, source_url: &str) -> Result<RecipeData, ImportError> {
    let config = ImportConfig::load()?;
    Ok(Orchestrator::new(&config)?
        .extract_caption(caption, source_url)
        .await)
}

/// Extract a recipe from already-fetched HTML using configuration from the environment
pub async fn html_to_recipe(html: &str, source_url: &str) -> Result<RecipeData, ImportError> {
    let config = ImportConfig::load()?;
    Ok(Orchestrator::new(&config)?.extract_html(html, source_url).await)
}
