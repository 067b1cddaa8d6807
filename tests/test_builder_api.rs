use async_trait::async_trait;
use mockito::Server;
use recipe_import::{
    CapturedPost, ImageSource, ImportError, PostCapture, RecipeImporter,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const RECIPE_PAGE: &str = r#"
<html>
<head>
    <title>Lemon Drizzle Cake | Example Bakes</title>
    <script type="application/ld+json">
    {
        "@context": "https://schema.org",
        "@type": "Recipe",
        "name": "Lemon Drizzle Cake",
        "recipeYield": "8 slices",
        "recipeIngredient": ["225 g butter", "225 g caster sugar", "4 eggs"],
        "recipeInstructions": "Cream the butter and sugar, beat in the eggs, then bake."
    }
    </script>
</head>
<body><h1>Lemon Drizzle Cake</h1></body>
</html>
"#;

/// Records the embed URLs it was asked for and returns a fixed post.
struct RecordingCapture {
    requested: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl PostCapture for RecordingCapture {
    async fn acquire(&self, embed_url: &str) -> Result<CapturedPost, ImportError> {
        self.requested
            .lock()
            .map_err(|e| ImportError::CaptureFailed(e.to_string()))?
            .push(embed_url.to_string());
        Ok(CapturedPost {
            caption: "Spicy Tacos 🌮\nIngredients\n- 8 tortillas\n- 500 g beef\nMethod\n1. Brown the beef\n2. Fill the tortillas".to_string(),
            image: Some(ImageSource::Bytes {
                data: vec![0xFF, 0xD8, 0xFF],
            }),
        })
    }
}

struct FailingCapture;

#[async_trait]
impl PostCapture for FailingCapture {
    async fn acquire(&self, _embed_url: &str) -> Result<CapturedPost, ImportError> {
        Err(ImportError::CaptureFailed("login wall".to_string()))
    }
}

#[tokio::test]
async fn test_builder_url_end_to_end() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/recipes/lemon-drizzle")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(RECIPE_PAGE)
        .create_async()
        .await;

    let url = format!("{}/recipes/lemon-drizzle", server.url());
    let recipe = RecipeImporter::builder()
        .url(&url)
        .timeout(Duration::from_secs(5))
        .build()
        .await
        .unwrap();

    assert_eq!(recipe.title, "Lemon Drizzle Cake");
    assert_eq!(recipe.servings.as_deref(), Some("8 slices"));
    assert_eq!(recipe.ingredients.len(), 3);
    assert_eq!(
        recipe.instructions,
        vec!["Cream the butter and sugar, beat in the eggs, then bake."]
    );
    assert_eq!(recipe.source_url, url);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_builder_url_respects_size_cap() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/recipes/lemon-drizzle")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(RECIPE_PAGE)
        .create_async()
        .await;

    let result = RecipeImporter::builder()
        .url(format!("{}/recipes/lemon-drizzle", server.url()))
        .max_bytes(64)
        .build()
        .await;

    assert!(matches!(result, Err(ImportError::ResponseTooLarge { limit: 64 })));
}

#[tokio::test]
async fn test_builder_instagram_url_uses_capture() {
    let requested = Arc::new(Mutex::new(Vec::new()));
    let capture = RecordingCapture {
        requested: Arc::clone(&requested),
    };

    let recipe = RecipeImporter::builder()
        .url("https://www.instagram.com/reel/C1a2B3c4D5e/?igsh=xyz")
        .capture(Box::new(capture))
        .build()
        .await
        .unwrap();

    assert_eq!(
        requested.lock().unwrap().as_slice(),
        ["https://www.instagram.com/p/C1a2B3c4D5e/embed/captioned/"]
    );
    assert_eq!(recipe.title, "Spicy Tacos");
    assert_eq!(recipe.ingredients, vec!["8 tortillas", "500 g beef"]);
    assert_eq!(recipe.instructions, vec!["Brown the beef", "Fill the tortillas"]);
    assert_eq!(recipe.images.len(), 1);
    assert!(recipe.images[0].as_url().is_none());
}

#[tokio::test]
async fn test_builder_capture_failure_surfaces() {
    let result = RecipeImporter::builder()
        .url("https://www.instagram.com/p/C1a2B3c4D5e/")
        .capture(Box::new(FailingCapture))
        .build()
        .await;

    assert!(matches!(result, Err(ImportError::CaptureFailed(msg)) if msg == "login wall"));
}

#[tokio::test]
async fn test_builder_html_input() {
    let recipe = RecipeImporter::builder()
        .html(RECIPE_PAGE, "https://bakes.example.com/lemon")
        .build()
        .await
        .unwrap();

    assert_eq!(recipe.title, "Lemon Drizzle Cake");
    assert_eq!(recipe.source_url, "https://bakes.example.com/lemon");
}

#[tokio::test]
async fn test_builder_caption_input() {
    let recipe = RecipeImporter::builder()
        .caption(
            "My Pasta\nIngredients\n1 cup flour\n2 eggs\nInstructions\n1. Mix\n2. Bake",
            "https://www.instagram.com/p/abc/",
        )
        .build()
        .await
        .unwrap();

    assert_eq!(recipe.title, "My Pasta");
    assert_eq!(recipe.ingredients, vec!["1 cup flour", "2 eggs"]);
}

#[tokio::test]
async fn test_builder_rejects_non_http_urls() {
    for url in ["ftp://example.com/recipe", "javascript:alert(1)", "not a url"] {
        let result = RecipeImporter::builder().url(url).build().await;
        assert!(
            matches!(result, Err(ImportError::InvalidUrl(_))),
            "{url} should be rejected"
        );
    }
}

#[tokio::test]
async fn test_builder_without_source() {
    let result = RecipeImporter::builder().build().await;

    assert!(matches!(result, Err(ImportError::BuilderError(msg)) if msg.contains("No input source")));
}
