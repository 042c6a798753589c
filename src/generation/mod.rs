//! Generation: the backend that turns a validated request into code.
//!
//! The form never blocks on a generator. It hands a request to a
//! `GenerationClient`, spawns the future, and hears back through the
//! session event queue.

pub mod http;
pub mod simulated;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::Identifier;

pub use http::HttpClient;
pub use simulated::SimulatedClient;

/// A validated generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub source: Identifier,
    pub destination: Identifier,
    pub prompt: String,
}

/// What a generator hands back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub artifact_text: String,
}

/// Errors from generation backends.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Anything that can generate an artifact from a request.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn submit(&self, request: GenerationRequest) -> Result<GeneratedArtifact, GenerationError>;
}
