use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Top-level configuration, constructed once at startup and handed to the
/// components that need it.
#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    /// Hard deadline for a single page fetch, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum accepted response body size in bytes
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
    /// User agent sent with every fetch
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Base URL of a headless-browser capture service for Instagram posts.
    /// When unset, the public embed page is fetched and scraped directly.
    #[serde(default)]
    pub capture_service_url: Option<String>,
    /// Optional LLM cleanup pass
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Configuration for the optional LLM cleanup pass
#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// Whether the cleanup pass runs at all
    #[serde(default)]
    pub enabled: bool,
    /// Provider name: "openai" or "anthropic"
    #[serde(default = "default_provider")]
    pub provider: String,
    /// API key (falls back to OPENAI_API_KEY / ANTHROPIC_API_KEY)
    pub api_key: Option<String>,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL override (proxies, tests)
    pub base_url: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_provider(),
            api_key: None,
            model: default_model(),
            base_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
            user_agent: default_user_agent(),
            capture_service_url: None,
            llm: LlmConfig::default(),
        }
    }
}

// Default value functions
fn default_timeout_ms() -> u64 {
    15_000
}

fn default_max_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; RecipeImportBot/1.0)".to_string()
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    2000
}

impl ImportConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_IMPORT__ prefix
    /// 2. recipe-import.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_IMPORT__LLM__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("recipe-import").required(false))
            .add_source(
                Environment::with_prefix("RECIPE_IMPORT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = ImportConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert_eq!(config.max_bytes, 5 * 1024 * 1024);
        assert!(config.capture_service_url.is_none());
        assert!(!config.llm.enabled);
        assert_eq!(config.llm.provider, "openai");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ImportConfig = Config::builder()
            .add_source(File::from_str(
                "timeout_ms = 2500\n[llm]\nenabled = true\nprovider = \"anthropic\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.timeout_ms, 2500);
        assert_eq!(config.max_bytes, default_max_bytes());
        assert!(config.llm.enabled);
        assert_eq!(config.llm.provider, "anthropic");
        assert_eq!(config.llm.max_tokens, 2000);
    }

    #[test]
    fn test_load_without_file() {
        // No config file in the test working directory; defaults must deserialize
        let result = ImportConfig::load();
        assert!(result.is_ok());
    }
}
