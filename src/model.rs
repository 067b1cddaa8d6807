use serde::{Deserialize, Serialize};

/// Title used when a caption yields nothing title-like
pub const INSTAGRAM_PLACEHOLDER_TITLE: &str = "Instagram Recipe";

/// Title used when a page has no usable title and no hostname
pub const UNTITLED_PLACEHOLDER_TITLE: &str = "Untitled Recipe";

/// The canonical output of every extraction path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeData {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub images: Vec<ImageSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,
    pub source_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl RecipeData {
    /// True when at least one ingredient or instruction was found.
    ///
    /// An empty result is still a successful extraction; callers should
    /// present it as "structured extraction unavailable".
    pub fn has_structured_content(&self) -> bool {
        !self.ingredients.is_empty() || !self.instructions.is_empty()
    }

    /// Enforce the record invariants: trimmed, non-empty list entries and a
    /// non-empty title.
    pub(crate) fn finalize(mut self, fallback_title: &str) -> Self {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            self.title = fallback_title.to_string();
        }
        self.ingredients = clean_lines(self.ingredients);
        self.instructions = clean_lines(self.instructions);
        self.description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self
    }
}

fn clean_lines(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// An image attached to a recipe: either a URL or raw bytes captured out of band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageSource {
    Url(String),
    Bytes {
        #[serde(with = "base64_bytes")]
        data: Vec<u8>,
    },
}

impl ImageSource {
    pub fn as_url(&self) -> Option<&str> {
        match self {
            ImageSource::Url(url) => Some(url),
            ImageSource::Bytes { .. } => None,
        }
    }
}

impl From<String> for ImageSource {
    fn from(url: String) -> Self {
        ImageSource::Url(url)
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
