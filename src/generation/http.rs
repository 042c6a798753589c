//! HTTP generation backend.
//!
//! POSTs the request as JSON to `{base_url}/v1/generate` and expects
//! `{"artifact_text": "..."}` back.

use async_trait::async_trait;
use reqwest::Client;

use super::{GeneratedArtifact, GenerationClient, GenerationError, GenerationRequest};

#[derive(Debug)]
pub struct HttpClient {
    http: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Use a preconfigured reqwest client (timeouts, proxies).
    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/generate", self.base_url)
    }
}

/// Pull `error.message` (or a top-level `message`) out of a JSON error
/// body; anything else is passed through as-is.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };
    value
        .pointer("/error/message")
        .or_else(|| value.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl GenerationClient for HttpClient {
    async fn submit(&self, request: GenerationRequest) -> Result<GeneratedArtifact, GenerationError> {
        let response = self
            .http
            .post(self.endpoint())
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_else(|_| "(no body)".into());
            return Err(GenerationError::Api {
                status,
                message: error_message(&body),
            });
        }

        response
            .json::<GeneratedArtifact>()
            .await
            .map_err(|e| GenerationError::InvalidResponse(format!("failed to parse response: {e}")))
    }
}
