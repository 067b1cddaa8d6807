use mockito::{Matcher, Server};
use recipe_import::providers::{reformat_or_keep, OpenAIProvider};
use recipe_import::{ImportConfig, LlmConfig, RecipeData, RecipeImporter};

const CAPTION: &str = "My Pasta\nIngredients\n- 1 cup flour\n- 2 eggs\nInstructions\n1. Mix\n2. Bake";
const SOURCE: &str = "https://www.instagram.com/p/C1a2B3c4D5e/";

fn extracted() -> RecipeData {
    RecipeData {
        title: "my pasta".to_string(),
        ingredients: vec!["1 cup flour".to_string()],
        instructions: vec!["Mix".to_string()],
        servings: Some("2".to_string()),
        source_url: SOURCE.to_string(),
        ..RecipeData::default()
    }
}

fn openai(server: &Server) -> OpenAIProvider {
    OpenAIProvider::with_base_url("fake_api_key".to_string(), server.url(), "gpt-4o-mini".to_string())
}

#[tokio::test]
async fn test_builder_applies_cleanup() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "model": "gpt-4o-mini",
            "response_format": {"type": "json_object"}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"choices": [{"message": {"content": "{\"title\": \"My Pasta\", \"description\": \"Fresh egg pasta\", \"ingredients\": [\"1 cup flour\", \"2 eggs\"], \"instructions\": [\"Mix the flour and eggs.\", \"Bake.\"]}"}}]}"#,
        )
        .create_async()
        .await;

    let recipe = RecipeImporter::builder()
        .caption(CAPTION, SOURCE)
        .reformatter(Box::new(openai(&server)))
        .build()
        .await
        .unwrap();

    assert_eq!(recipe.description.as_deref(), Some("Fresh egg pasta"));
    assert_eq!(recipe.instructions, vec!["Mix the flour and eggs.", "Bake."]);
    assert_eq!(recipe.source_url, SOURCE);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_passes_original_through() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let original = extracted();
    let result = reformat_or_keep(&openai(&server), original.clone()).await;

    assert_eq!(result, original);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_reply_passes_original_through() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices": [{"message": {"content": "I cannot help with that."}}]}"#)
        .create_async()
        .await;

    let original = extracted();
    let result = reformat_or_keep(&openai(&server), original.clone()).await;

    assert_eq!(result, original);
}

#[tokio::test]
async fn test_configured_anthropic_provider() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "test-key")
        .match_header("anthropic-version", "2023-06-01")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"content": [{"type": "text", "text": "{\"title\": \"My Pasta\", \"ingredients\": [\"1 cup flour\", \"2 eggs\"], \"instructions\": [\"Mix\", \"Bake until golden\"]}"}]}"#,
        )
        .create_async()
        .await;

    let config = ImportConfig {
        llm: LlmConfig {
            enabled: true,
            provider: "anthropic".to_string(),
            api_key: Some("test-key".to_string()),
            base_url: Some(server.url()),
            ..LlmConfig::default()
        },
        ..ImportConfig::default()
    };

    let recipe = RecipeImporter::builder()
        .caption(CAPTION, SOURCE)
        .config(config)
        .build()
        .await
        .unwrap();

    assert_eq!(recipe.instructions, vec!["Mix", "Bake until golden"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unknown_provider_is_a_config_error() {
    let config = ImportConfig {
        llm: LlmConfig {
            enabled: true,
            provider: "carrier-pigeon".to_string(),
            ..LlmConfig::default()
        },
        ..ImportConfig::default()
    };

    let result = RecipeImporter::builder()
        .caption(CAPTION, SOURCE)
        .config(config)
        .build()
        .await;

    assert!(matches!(
        result,
        Err(recipe_import::ImportError::ConfigError(_))
    ));
}
