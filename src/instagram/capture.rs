use super::{CapturedPost, PostCapture};
use crate::error::ImportError;
use crate::extractors::{meta_content, remove_matching};
use crate::fetchers::RequestFetcher;
use crate::json_walk::{strings_under_keys, values_under_key};
use crate::model::ImageSource;
use async_trait::async_trait;
use base64::Engine;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Node, Selector};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// "1,234 likes, 56 comments - someuser on March 3, 2024: "
static OG_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[\d,.]+\s*[km]?\s+likes?,\s*[\d,.]+\s*[km]?\s+comments?\s*-\s*[^:]+:\s*")
        .expect("Invalid og:description prefix regex")
});

/// Scrapes the public embed page of a post.
pub struct EmbedPageCapture {
    fetcher: RequestFetcher,
}

impl EmbedPageCapture {
    pub fn new(fetcher: RequestFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl PostCapture for EmbedPageCapture {
    async fn acquire(&self, embed_url: &str) -> Result<CapturedPost, ImportError> {
        let html = self.fetcher.fetch(embed_url).await?;
        parse_embed_page(&html)
    }
}

/// Caption and image from embed page markup. The caption element wins, then
/// inline script state, then the `og:description` summary.
pub(crate) fn parse_embed_page(html: &str) -> Result<CapturedPost, ImportError> {
    let mut document = Html::parse_document(html);
    let scripts = script_values(&document);

    let image = attribute(&document, ".EmbeddedMediaImage", "src")
        .or_else(|| meta_content(&document, r#"meta[property="og:image"]"#))
        .or_else(|| {
            scripts
                .iter()
                .find_map(|value| strings_under_keys(value, &["display_url"]).into_iter().next())
        })
        .map(ImageSource::Url);

    let caption = caption_element(&mut document)
        .or_else(|| script_caption(&scripts))
        .or_else(|| og_caption(&document))
        .ok_or_else(|| ImportError::CaptureFailed("no caption found on embed page".to_string()))?;

    Ok(CapturedPost { caption, image })
}

fn attribute(document: &Html, selector: &str, name: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Text of an element with `<br>` turned into newlines.
fn text_with_breaks(element: ElementRef) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(chunk) => text.push_str(chunk),
            Node::Element(el) if el.name() == "br" => text.push('\n'),
            _ => {}
        }
    }
    text.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn caption_element(document: &mut Html) -> Option<String> {
    let chrome = Selector::parse(".Caption .CaptionUsername, .Caption .CaptionComments")
        .expect("valid caption selector");
    remove_matching(document, &chrome);

    let caption = Selector::parse(".Caption").expect("valid caption selector");
    document
        .select(&caption)
        .map(text_with_breaks)
        .find(|text| !text.is_empty())
}

/// Every inline script that carries a JSON object. Scripts that fail to
/// parse are skipped.
fn script_values(document: &Html) -> Vec<Value> {
    let selector = Selector::parse("script:not([src])").expect("valid script selector");
    let mut values = Vec::new();
    for (index, script) in document.select(&selector).enumerate() {
        let raw = script.text().collect::<String>();
        let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) else {
            continue;
        };
        if end <= start {
            continue;
        }
        match serde_json::from_str::<Value>(&raw[start..=end]) {
            Ok(value) => values.push(value),
            Err(e) => debug!(
                "EmbedPageCapture: skipping script {}: {}",
                index,
                ImportError::MalformedStructuredData(e.to_string())
            ),
        }
    }
    values
}

fn script_caption(scripts: &[Value]) -> Option<String> {
    scripts.iter().find_map(|value| {
        let mut found = strings_under_keys(value, &["caption"]);
        // Newer media JSON nests the text: {"caption": {"text": "..."}}
        for caption in values_under_key(value, "caption") {
            if caption.is_object() {
                found.extend(strings_under_keys(caption, &["text"]));
            }
        }
        for edge in values_under_key(value, "edge_media_to_caption") {
            found.extend(strings_under_keys(edge, &["text"]));
        }
        found.into_iter().next()
    })
}

fn og_caption(document: &Html) -> Option<String> {
    let description = meta_content(document, r#"meta[property="og:description"]"#)?;
    let Some(prefix) = OG_PREFIX_RE.find(&description) else {
        return Some(description);
    };

    let body = description[prefix.end()..].trim();
    let body = body
        .strip_suffix('.')
        .filter(|b| b.ends_with(['"', '”']))
        .unwrap_or(body);
    let body = body
        .trim_start_matches(['"', '“'])
        .trim_end_matches(['"', '”'])
        .trim();
    (!body.is_empty()).then(|| body.to_string())
}

#[derive(Serialize)]
struct CaptureRequest<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct CaptureResponse {
    caption: String,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    image_base64: Option<String>,
}

/// Delegates the post to a headless browser service.
pub struct RemoteBrowserCapture {
    endpoint: String,
    client: Client,
    timeout: Duration,
}

impl RemoteBrowserCapture {
    pub fn new(service_url: &str, timeout: Duration) -> Result<Self, ImportError> {
        let endpoint = format!("{}/api/capture", service_url.trim_end_matches('/'));
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImportError::CaptureFailed(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            endpoint,
            client,
            timeout,
        })
    }
}

fn decode_image(encoded: &str) -> Result<Vec<u8>, ImportError> {
    let data = encoded
        .split_once(";base64,")
        .map_or(encoded, |(_, data)| data)
        .trim();
    base64::engine::general_purpose::STANDARD
        .decode(data)
        .map_err(|e| ImportError::CaptureFailed(format!("invalid image data: {e}")))
}

#[async_trait]
impl PostCapture for RemoteBrowserCapture {
    async fn acquire(&self, embed_url: &str) -> Result<CapturedPost, ImportError> {
        debug!("RemoteBrowserCapture: POST {} for {}", self.endpoint, embed_url);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&CaptureRequest { url: embed_url })
            .send()
            .await
            .map_err(|e| match ImportError::from_request(e, self.timeout) {
                ImportError::FetchFailed(msg) => ImportError::CaptureFailed(msg),
                other => other,
            })?;

        if !response.status().is_success() {
            return Err(ImportError::CaptureFailed(format!(
                "capture service returned status {}",
                response.status()
            )));
        }

        let captured: CaptureResponse = response
            .json()
            .await
            .map_err(|e| ImportError::CaptureFailed(format!("invalid capture response: {e}")))?;

        let image = match (captured.image_base64, captured.image_url) {
            (Some(encoded), _) if !encoded.trim().is_empty() => Some(ImageSource::Bytes {
                data: decode_image(&encoded)?,
            }),
            (_, Some(url)) if !url.trim().is_empty() => Some(ImageSource::Url(url)),
            _ => None,
        };

        Ok(CapturedPost {
            caption: captured.caption,
            image,
        })
    }
}
