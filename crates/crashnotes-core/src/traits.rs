//! The generation backend seam.
//!
//! Implemented by `crashnotes-providers` for the hosted service and by the
//! scripted mock used in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trait for backends that turn one prompt into generated text.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Issue exactly one generation request.
    ///
    /// Implementations return a [`crate::error::ProviderError`] inside the
    /// `anyhow::Error` for any outcome other than a non-empty text payload.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;
}

/// One request for one model candidate.
#[derive(Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "gemini-2.5-flash").
    pub model: String,
    /// The full prompt.
    pub prompt: String,
    /// Caller-supplied credential, embedded into the request by the provider.
    pub api_key: String,
}

impl std::fmt::Debug for GenerateRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateRequest")
            .field("model", &self.model)
            .field("prompt", &self.prompt)
            .field("api_key", &"***")
            .finish()
    }
}

/// Text produced by a successful request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated text. Never empty.
    pub text: String,
    /// Model that produced the text.
    pub model: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}
