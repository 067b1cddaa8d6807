use super::{extract_from_html, Event, Run, Tier};
use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::fetchers::RequestFetcher;
use crate::instagram::{
    embed_url, is_instagram_url, parse_caption, EmbedPageCapture, PostCapture,
    RemoteBrowserCapture,
};
use crate::model::RecipeData;
use crate::providers::{reformat_or_keep, ProviderFactory, RecipeReformatter};
use log::{debug, info};
use url::Url;

/// Reject anything that is not an absolute http(s) URL.
pub fn validate_url(raw: &str) -> Result<Url, ImportError> {
    let url = Url::parse(raw.trim()).map_err(|e| ImportError::InvalidUrl(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ImportError::InvalidUrl(format!(
            "{raw}: unsupported scheme '{scheme}'"
        ))),
    }
}

/// Runs extraction requests end to end. Collaborators are built once from
/// an [`ImportConfig`] and shared by every request; no request mutates them.
pub struct Orchestrator {
    fetcher: RequestFetcher,
    capture: Box<dyn PostCapture>,
    reformatter: Option<Box<dyn RecipeReformatter>>,
}

impl Orchestrator {
    pub fn new(config: &ImportConfig) -> Result<Self, ImportError> {
        let capture: Box<dyn PostCapture> = match &config.capture_service_url {
            Some(service) => Box::new(RemoteBrowserCapture::new(service, config.timeout())?),
            None => Box::new(EmbedPageCapture::new(RequestFetcher::from_config(config)?)),
        };
        let reformatter = ProviderFactory::from_config(&config.llm)
            .map_err(|e| config::ConfigError::Message(format!("LLM cleanup: {e}")))?;

        Ok(Self {
            fetcher: RequestFetcher::from_config(config)?,
            capture,
            reformatter,
        })
    }

    pub fn with_capture(mut self, capture: Box<dyn PostCapture>) -> Self {
        self.capture = capture;
        self
    }

    pub fn with_reformatter(mut self, reformatter: Box<dyn RecipeReformatter>) -> Self {
        self.reformatter = Some(reformatter);
        self
    }

    /// Extract a recipe from a web page or an Instagram post URL.
    pub async fn extract(&self, url: &str) -> Result<RecipeData, ImportError> {
        let mut run = Run::new(url);
        run.advance(Event::Begin);

        match self.run_stages(&mut run, url).await {
            Ok(recipe) => {
                info!("Extracted '{}' from {}", recipe.title, url);
                Ok(self.cleanup(recipe).await)
            }
            Err(e) => {
                run.advance(Event::Error);
                Err(e)
            }
        }
    }

    async fn run_stages(&self, run: &mut Run<'_>, url: &str) -> Result<RecipeData, ImportError> {
        // Gate only: the record keeps the caller's URL verbatim.
        validate_url(url)?;

        if is_instagram_url(url) {
            run.advance(Event::InstagramUrl);
            let embed = embed_url(url)
                .ok_or_else(|| ImportError::InvalidUrl(format!("{url}: no post shortcode")))?;
            let post = self.capture.acquire(&embed).await?;

            let mut recipe = parse_caption(&post.caption, url);
            recipe.images.extend(post.image);
            run.advance(Event::CaptionParsed);
            return Ok(recipe);
        }

        run.advance(Event::WebUrl);
        let html = self.fetcher.fetch(url).await?;
        let (recipe, tier) = extract_from_html(&html, url);
        run.advance(match tier {
            Tier::JsonLd => Event::StructuredData,
            Tier::Heuristic => Event::NoStructuredData,
        });
        run.advance(Event::Extracted);
        Ok(recipe)
    }

    /// Parse a caption obtained elsewhere.
    pub async fn extract_caption(&self, caption: &str, source_url: &str) -> RecipeData {
        self.cleanup(parse_caption(caption, source_url)).await
    }

    /// Extract from markup obtained elsewhere.
    pub async fn extract_html(&self, html: &str, source_url: &str) -> RecipeData {
        let (recipe, tier) = extract_from_html(html, source_url);
        debug!("Extracted '{}' via {:?}", recipe.title, tier);
        self.cleanup(recipe).await
    }

    async fn cleanup(&self, recipe: RecipeData) -> RecipeData {
        match &self.reformatter {
            Some(reformatter) => reformat_or_keep(reformatter.as_ref(), recipe).await,
            None => recipe,
        }
    }
}
