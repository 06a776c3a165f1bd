//! Mock provider for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crashnotes_core::error::ProviderError;
use crashnotes_core::traits::{GenerateRequest, GenerateResponse, LlmProvider};

/// A mock provider for exercising the fallback client and orchestrator
/// without real API calls.
///
/// Answers are scripted per model id. Models with neither a response nor a
/// failure fall back to the default response, or to "model not found" when
/// there is none.
pub struct MockProvider {
    /// Map of model id → response text.
    responses: HashMap<String, String>,
    /// Map of model id → failure message (reported as HTTP 500).
    failures: HashMap<String, String>,
    default_response: Option<String>,
    call_count: AtomicU32,
    /// Models called, in order.
    calls: Mutex<Vec<String>>,
    last_request: Mutex<Option<GenerateRequest>>,
}

impl MockProvider {
    /// Create a mock with the given model→response mappings.
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self {
            responses,
            failures: HashMap::new(),
            default_response: None,
            call_count: AtomicU32::new(0),
            calls: Mutex::new(Vec::new()),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock where every model returns the same text.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            default_response: Some(response.to_string()),
            ..Self::new(HashMap::new())
        }
    }

    /// Script `model` to answer with `text`.
    pub fn respond(mut self, model: &str, text: &str) -> Self {
        self.responses.insert(model.to_string(), text.to_string());
        self
    }

    /// Script `model` to fail with an HTTP 500 carrying `message`.
    pub fn fail(mut self, model: &str, message: &str) -> Self {
        self.failures.insert(model.to_string(), message.to_string());
        self
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Models requested so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Get the last request made to this provider.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request.lock().ok().and_then(|r| r.clone())
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.model.clone());
        }
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        if let Some(message) = self.failures.get(&request.model) {
            return Err(ProviderError::ApiError {
                status: 500,
                message: message.clone(),
            }
            .into());
        }

        let text = self
            .responses
            .get(&request.model)
            .or(self.default_response.as_ref())
            .cloned()
            .ok_or_else(|| ProviderError::ModelNotFound(request.model.clone()))?;

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse.into());
        }

        Ok(GenerateResponse {
            text,
            model: request.model.clone(),
            latency_ms: 1,
        })
    }
}
