use crate::config::LlmConfig;
use crate::providers::{AnthropicProvider, OpenAIProvider, RecipeReformatter};
use std::error::Error;

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(config: &LlmConfig) -> Result<Box<dyn RecipeReformatter>, Box<dyn Error + Send + Sync>> {
        // Validate that provider is enabled
        if !config.enabled {
            return Err(format!(
                "Provider '{}' is not enabled in configuration",
                config.provider
            )
            .into());
        }

        match config.provider.as_str() {
            "openai" => Ok(Box::new(OpenAIProvider::new(config)?)),
            "anthropic" => Ok(Box::new(AnthropicProvider::new(config)?)),
            other => Err(format!(
                "Unknown provider: {} (available: {})",
                other,
                Self::available_providers().join(", ")
            )
            .into()),
        }
    }

    /// The configured cleanup provider, or `None` when cleanup is switched off.
    pub fn from_config(
        config: &LlmConfig,
    ) -> Result<Option<Box<dyn RecipeReformatter>>, Box<dyn Error + Send + Sync>> {
        if !config.enabled {
            return Ok(None);
        }
        Self::create(config).map(Some)
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["openai", "anthropic"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config(provider: &str) -> LlmConfig {
        LlmConfig {
            enabled: true,
            provider: provider.to_string(),
            api_key: Some("test-key".to_string()),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_create_openai_provider() {
        let provider = ProviderFactory::create(&create_test_config("openai")).unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_create_anthropic_provider() {
        let provider = ProviderFactory::create(&create_test_config("anthropic")).unwrap();
        assert_eq!(provider.provider_name(), "anthropic");
    }

    #[test]
    fn test_create_unknown_provider() {
        let result = ProviderFactory::create(&create_test_config("unknown"));
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("Unknown provider"));
            assert!(e.to_string().contains("available: openai, anthropic"));
        }
    }

    #[test]
    fn test_create_disabled_provider() {
        let mut config = create_test_config("openai");
        config.enabled = false;

        let result = ProviderFactory::create(&config);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("not enabled in configuration"));
        }
    }

    #[test]
    fn test_from_config_disabled_is_none() {
        let config = LlmConfig::default();
        assert!(ProviderFactory::from_config(&config).unwrap().is_none());
    }
}
