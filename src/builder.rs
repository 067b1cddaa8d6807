use std::time::Duration;

use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::instagram::PostCapture;
use crate::model::RecipeData;
use crate::pipelines::Orchestrator;
use crate::providers::RecipeReformatter;

/// Represents the input source for a recipe
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Fetch a web page or Instagram post
    Url(String),
    /// Parse an Instagram caption that was obtained elsewhere
    Caption { text: String, source_url: String },
    /// Extract from markup that was obtained elsewhere
    Html { html: String, source_url: String },
}

/// Builder for configuring and executing recipe imports
#[derive(Default)]
pub struct RecipeImporterBuilder {
    source: Option<InputSource>,
    config: Option<ImportConfig>,
    timeout: Option<Duration>,
    max_bytes: Option<usize>,
    capture: Option<Box<dyn PostCapture>>,
    reformatter: Option<Box<dyn RecipeReformatter>>,
}

impl RecipeImporterBuilder {
    /// Set the input source to a URL
    ///
    /// Instagram post and reel URLs go through caption capture; anything
    /// else is fetched and scanned for structured data.
    ///
    /// # Example
    /// ```
    /// use recipe_import::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder()
    ///     .url("https://example.com/recipe");
    /// ```
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.source = Some(InputSource::Url(url.into()));
        self
    }

    /// Set the input source to an Instagram caption
    ///
    /// # Example
    /// ```
    /// use recipe_import::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder().caption(
    ///     "My Pasta\nIngredients\n1 cup flour\nInstructions\n1. Mix",
    ///     "https://www.instagram.com/p/C1a2B3c4D5e/",
    /// );
    /// ```
    pub fn caption(mut self, text: impl Into<String>, source_url: impl Into<String>) -> Self {
        self.source = Some(InputSource::Caption {
            text: text.into(),
            source_url: source_url.into(),
        });
        self
    }

    /// Set the input source to already-fetched HTML
    pub fn html(mut self, html: impl Into<String>, source_url: impl Into<String>) -> Self {
        self.source = Some(InputSource::Html {
            html: html.into(),
            source_url: source_url.into(),
        });
        self
    }

    /// Use an explicit configuration instead of the defaults
    ///
    /// # Example
    /// ```no_run
    /// use recipe_import::{ImportConfig, RecipeImporter};
    ///
    /// let config = ImportConfig::load().unwrap_or_default();
    /// let builder = RecipeImporter::builder()
    ///     .url("https://example.com/recipe")
    ///     .config(config);
    /// ```
    pub fn config(mut self, config: ImportConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a timeout for HTTP requests
    ///
    /// # Example
    /// ```
    /// use recipe_import::RecipeImporter;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeImporter::builder()
    ///     .url("https://example.com/recipe")
    ///     .timeout(Duration::from_secs(30));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Cap the accepted response size in bytes
    pub fn max_bytes(mut self, limit: usize) -> Self {
        self.max_bytes = Some(limit);
        self
    }

    /// Replace the Instagram caption capture
    pub fn capture(mut self, capture: Box<dyn PostCapture>) -> Self {
        self.capture = Some(capture);
        self
    }

    /// Run a cleanup pass over every result, regardless of configuration
    pub fn reformatter(mut self, reformatter: Box<dyn RecipeReformatter>) -> Self {
        self.reformatter = Some(reformatter);
        self
    }

    /// Build and execute the import
    ///
    /// # Errors
    /// Returns `ImportError` if:
    /// - No input source was specified
    /// - The URL is not http(s)
    /// - The fetch or caption capture fails
    ///
    /// Caption and HTML inputs never fail once a source is set.
    ///
    /// # Example
    /// ```no_run
    /// # use recipe_import::RecipeImporter;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let recipe = RecipeImporter::builder()
    ///     .url("https://example.com/recipe")
    ///     .build()
    ///     .await?;
    /// println!("{}", recipe.title);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<RecipeData, ImportError> {
        let source = self.source.ok_or_else(|| {
            ImportError::BuilderError(
                "No input source specified. Use .url(), .caption() or .html()".to_string(),
            )
        })?;

        let mut config = self.config.unwrap_or_default();
        if let Some(timeout) = self.timeout {
            config.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        }
        if let Some(limit) = self.max_bytes {
            config.max_bytes = limit;
        }

        let mut orchestrator = Orchestrator::new(&config)?;
        if let Some(capture) = self.capture {
            orchestrator = orchestrator.with_capture(capture);
        }
        if let Some(reformatter) = self.reformatter {
            orchestrator = orchestrator.with_reformatter(reformatter);
        }

        match source {
            InputSource::Url(url) => orchestrator.extract(&url).await,
            InputSource::Caption { text, source_url } => {
                Ok(orchestrator.extract_caption(&text, &source_url).await)
            }
            InputSource::Html { html, source_url } => {
                Ok(orchestrator.extract_html(&html, &source_url).await)
            }
        }
    }
}

/// Main entry point for the builder API
pub struct RecipeImporter;

impl RecipeImporter {
    /// Creates a new builder for importing recipes
    ///
    /// # Example
    /// ```
    /// use recipe_import::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder();
    /// ```
    pub fn builder() -> RecipeImporterBuilder {
        RecipeImporterBuilder::default()
    }
}
