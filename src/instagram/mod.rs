//! Instagram posts: URL recognition, caption/image acquisition and caption parsing.

pub mod caption;
mod capture;

pub use capture::{EmbedPageCapture, RemoteBrowserCapture};
pub use caption::parse_caption;

use crate::error::ImportError;
use crate::model::ImageSource;
use async_trait::async_trait;
use url::Url;

/// Path segments that introduce a post shortcode.
const POST_KINDS: &[&str] = &["p", "reel", "reels", "tv"];

/// Caption and image of a post, as delivered by a [`PostCapture`].
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedPost {
    pub caption: String,
    pub image: Option<ImageSource>,
}

/// Acquires the caption and preview image behind an embed URL.
#[async_trait]
pub trait PostCapture: Send + Sync {
    async fn acquire(&self, embed_url: &str) -> Result<CapturedPost, ImportError>;
}

fn is_instagram_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host == "instagram.com" || host.ends_with(".instagram.com")
}

/// Shortcode of a post, reel or IGTV URL. Profile-prefixed paths
/// (`/{user}/p/{code}/`) are recognised too.
pub fn shortcode(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if !is_instagram_host(parsed.host_str()?) {
        return None;
    }
    let segments: Vec<&str> = parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .collect();

    segments
        .windows(2)
        .take(2)
        .find(|pair| POST_KINDS.contains(&pair[0]))
        .map(|pair| pair[1])
        .filter(|code| {
            code.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        })
        .map(str::to_string)
}

pub fn is_instagram_url(url: &str) -> bool {
    shortcode(url).is_some()
}

/// The captioned embed page for a post URL.
pub fn embed_url(url: &str) -> Option<String> {
    shortcode(url).map(|code| format!("https://www.instagram.com/p/{code}/embed/captioned/"))
}
