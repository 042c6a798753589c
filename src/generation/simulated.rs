//! Fixed-latency stand-in for a real generator. Always succeeds.

use std::time::Duration;

use async_trait::async_trait;

use super::{GeneratedArtifact, GenerationClient, GenerationError, GenerationRequest};

/// Default simulated latency.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone)]
pub struct SimulatedClient {
    latency: Duration,
}

impl SimulatedClient {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for SimulatedClient {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY)
    }
}

/// The artifact text the simulated backend produces for `request`.
pub fn render_artifact(request: &GenerationRequest) -> String {
    let GenerationRequest {
        source,
        destination,
        prompt,
    } = request;
    format!(
        "Generated ETL code for {source} to {destination}:\n\n\
         # ETL Pipeline Code\n\
         # Source: {source}\n\
         # Destination: {destination}\n\
         # Prompt: {prompt}\n\n\
         # Your ETL code would be generated here..."
    )
}

#[async_trait]
impl GenerationClient for SimulatedClient {
    async fn submit(&self, request: GenerationRequest) -> Result<GeneratedArtifact, GenerationError> {
        tokio::time::sleep(self.latency).await;
        Ok(GeneratedArtifact {
            artifact_text: render_artifact(&request),
        })
    }
}
