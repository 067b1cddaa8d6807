use crate::config::ImportConfig;
use crate::error::ImportError;
use log::debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;

pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,text/plain;q=0.9,*/*;q=0.8";

const ACCEPTED_CONTENT_TYPES: &[&str] = &["text/html", "text/plain"];

/// Single-shot GET with a hard deadline, a content-type guard and a byte cap.
pub struct RequestFetcher {
    client: Client,
    timeout: Duration,
    max_bytes: usize,
}

impl RequestFetcher {
    pub fn new(timeout: Duration, user_agent: &str, max_bytes: usize) -> Result<Self, ImportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ImportError::FetchFailed(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout,
            max_bytes,
        })
    }

    pub fn from_config(config: &ImportConfig) -> Result<Self, ImportError> {
        Self::new(config.timeout(), &config.user_agent, config.max_bytes)
    }

    /// Fetch `url` and return the body as text. The deadline covers the whole
    /// exchange, body included; it is never retried.
    pub async fn fetch(&self, url: &str) -> Result<String, ImportError> {
        match tokio::time::timeout(self.timeout, self.fetch_body(url)).await {
            Ok(result) => result,
            Err(_) => Err(ImportError::FetchTimeout(self.timeout)),
        }
    }

    async fn fetch_body(&self, url: &str) -> Result<String, ImportError> {
        debug!("RequestFetcher: GET {}", url);
        let mut response = self
            .client
            .get(url)
            .header(ACCEPT, ACCEPT_HTML)
            .send()
            .await
            .map_err(|e| ImportError::from_request(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::FetchFailed(format!("HTTP status {status}")));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if !ACCEPTED_CONTENT_TYPES
            .iter()
            .any(|accepted| content_type.contains(accepted))
        {
            let shown = if content_type.is_empty() {
                "missing".to_string()
            } else {
                content_type
            };
            return Err(ImportError::UnsupportedContentType(shown));
        }

        if response
            .content_length()
            .is_some_and(|length| length > self.max_bytes as u64)
        {
            return Err(ImportError::ResponseTooLarge {
                limit: self.max_bytes,
            });
        }

        // Returning early drops the response, which closes the connection
        // instead of draining the rest of the body.
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ImportError::from_request(e, self.timeout))?
        {
            if body.len() + chunk.len() > self.max_bytes {
                debug!(
                    "RequestFetcher: aborting {} after {} bytes",
                    url,
                    body.len() + chunk.len()
                );
                return Err(ImportError::ResponseTooLarge {
                    limit: self.max_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }

        debug!("RequestFetcher: received {} bytes from {}", body.len(), url);
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
