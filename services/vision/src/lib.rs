//! Inference-provider boundary for grounded image analysis.
//!
//! The game core treats multimodal inference as an external collaborator:
//! a provider accepts a prompt plus image bytes and returns generated text
//! with grounding citations, or a typed failure. Retry policy lives here,
//! on the caller's side of the boundary, never inside a provider.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use tracing::warn;

use aviator_types::MAX_PROVIDER_ATTEMPTS;

mod gemini;

pub use gemini::{GeminiClient, GeminiConfig};

/// A single analysis request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub prompt: String,
    pub image_bytes: Vec<u8>,
    pub mime_type: String,
}

/// A web source the response text was grounded on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub uri: String,
    pub title: String,
}

/// Generated text plus its grounding citations, in provider order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub text: String,
    pub sources: Vec<Citation>,
}

/// Typed provider failures.
///
/// `Authorization` and `Malformed` are terminal; the rest are transient
/// and eligible for retry.
#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("authorization rejected: {0}")]
    Authorization(String),
    #[error("rate limited")]
    RateLimited,
    #[error("server error (status={status})")]
    Server { status: u16 },
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Whether the failure is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::Server { .. } | Self::Network(_)
        )
    }
}

/// An inference backend.
pub trait InferenceProvider {
    fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> impl std::future::Future<Output = Result<AnalysisResponse, ProviderError>> + Send;
}

/// Sleep duration before retry number `attempt` (zero-based): 2^attempt
/// seconds, so 1s, 2s, 4s, 8s across the default attempt budget.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt)
}

/// Call the provider, retrying transient failures with exponential
/// backoff up to [`MAX_PROVIDER_ATTEMPTS`] total attempts.
///
/// Terminal failures (authorization, malformed response) surface
/// immediately; a still-transient failure on the last attempt surfaces
/// verbatim.
pub async fn analyze_with_retry<P: InferenceProvider>(
    provider: &P,
    request: &AnalysisRequest,
) -> Result<AnalysisResponse, ProviderError> {
    let mut attempt = 0;
    loop {
        match provider.analyze(request).await {
            Ok(response) => return Ok(response),
            Err(err) => {
                if !err.is_retryable() || attempt + 1 >= MAX_PROVIDER_ATTEMPTS {
                    return Err(err);
                }
                let delay = backoff_delay(attempt);
                warn!(attempt, delay_secs = delay.as_secs(), error = %err, "provider failure, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
