use mockito::Server;
use recipe_import::fetchers::RequestFetcher;
use recipe_import::ImportError;
use std::io::Write;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

fn fetcher(timeout: Duration, max_bytes: usize) -> RequestFetcher {
    RequestFetcher::new(timeout, "recipe-import-tests", max_bytes).unwrap()
}

#[tokio::test]
async fn test_streamed_body_over_cap_fails() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/stream")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_chunked_body(|w| {
            for _ in 0..64 {
                w.write_all(&[b'a'; 256])?;
            }
            Ok(())
        })
        .create_async()
        .await;

    let result = fetcher(Duration::from_secs(5), 4096)
        .fetch(&format!("{}/stream", server.url()))
        .await;

    assert!(matches!(
        result,
        Err(ImportError::ResponseTooLarge { limit: 4096 })
    ));
}

#[tokio::test]
async fn test_streamed_body_under_cap_succeeds() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/stream")
        .with_status(200)
        .with_header("content-type", "text/plain; charset=utf-8")
        .with_chunked_body(|w| {
            w.write_all(b"1 cup flour\n")?;
            w.write_all(b"2 eggs\n")
        })
        .create_async()
        .await;

    let body = fetcher(Duration::from_secs(5), 4096)
        .fetch(&format!("{}/stream", server.url()))
        .await
        .unwrap();

    assert_eq!(body, "1 cup flour\n2 eggs\n");
}

#[tokio::test]
async fn test_image_content_type_is_rejected() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/blob")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body("binary")
        .create_async()
        .await;

    let result = fetcher(Duration::from_secs(5), 4096)
        .fetch(&format!("{}/blob", server.url()))
        .await;

    assert!(matches!(result, Err(ImportError::UnsupportedContentType(ct)) if ct == "image/png"));
}

#[tokio::test]
async fn test_server_error_is_fetch_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/down")
        .with_status(503)
        .with_header("content-type", "text/html")
        .with_body("maintenance")
        .create_async()
        .await;

    let result = fetcher(Duration::from_secs(5), 4096)
        .fetch(&format!("{}/down", server.url()))
        .await;

    assert!(matches!(result, Err(ImportError::FetchFailed(msg)) if msg.contains("503")));
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            // hold the connection without ever answering
            open.push(socket);
        }
    });

    let timeout = Duration::from_millis(300);
    let started = Instant::now();
    let result = fetcher(timeout, 4096)
        .fetch(&format!("http://{address}/slow"))
        .await;

    assert!(matches!(result, Err(ImportError::FetchTimeout(t)) if t == timeout));
    assert!(started.elapsed() < Duration::from_secs(5));
}
