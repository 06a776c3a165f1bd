//! Sequential model fallback.
//!
//! One request per candidate, strictly in the given order, stopping at the
//! first candidate that yields text. No retries within a candidate, no
//! backoff and no parallel requests.

use std::sync::Arc;

use tracing::instrument;

use crate::error::GenerationError;
use crate::model::{ModelCandidate, Topic};
use crate::traits::{GenerateRequest, GenerateResponse, LlmProvider};

/// Calls a provider across an ordered list of model candidates.
#[derive(Clone)]
pub struct FallbackClient {
    provider: Arc<dyn LlmProvider>,
    api_key: Option<String>,
}

impl FallbackClient {
    /// A blank or whitespace-only key counts as missing.
    pub fn new(provider: Arc<dyn LlmProvider>, api_key: Option<String>) -> Self {
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        Self { provider, api_key }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate text for `topic`, trying each candidate in order.
    ///
    /// Returns the first non-empty payload. Fails with
    /// [`GenerationError::CredentialMissing`] before any request when no key
    /// is configured, and with [`GenerationError::AllCandidatesExhausted`]
    /// carrying the last failure when every candidate fails.
    #[instrument(skip(self, topic, prompt_builder, candidates), fields(topic = %topic))]
    pub async fn generate<F>(
        &self,
        topic: &Topic,
        prompt_builder: F,
        candidates: &[ModelCandidate],
    ) -> Result<GenerateResponse, GenerationError>
    where
        F: Fn(&Topic) -> String,
    {
        let Some(api_key) = &self.api_key else {
            return Err(GenerationError::CredentialMissing);
        };

        let prompt = prompt_builder(topic);
        let mut last_cause = String::from("no model candidates configured");

        for candidate in candidates {
            tracing::info!("trying {} via {}", candidate, self.provider.name());

            let request = GenerateRequest {
                model: candidate.id().to_string(),
                prompt: prompt.clone(),
                api_key: api_key.clone(),
            };

            match self.provider.generate(&request).await {
                Ok(response) if !response.text.trim().is_empty() => {
                    tracing::info!("{} answered in {}ms", candidate, response.latency_ms);
                    return Ok(response);
                }
                Ok(_) => {
                    tracing::warn!("model {candidate} returned empty text");
                    last_cause = "empty response from model".to_string();
                }
                Err(e) => {
                    tracing::warn!("model {candidate} failed: {e:#}");
                    last_cause = format!("{e:#}");
                }
            }
        }

        Err(GenerationError::AllCandidatesExhausted {
            attempts: candidates.len(),
            last_cause,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::error::ProviderError;
    use crate::model::candidates;

    /// Answers per model: `Some(text)` succeeds, `None` fails with HTTP 500.
    struct Scripted {
        outcomes: HashMap<String, Option<String>>,
        calls: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(outcomes: &[(&str, Option<&str>)]) -> Arc<Self> {
            Arc::new(Self {
                outcomes: outcomes
                    .iter()
                    .map(|(m, o)| (m.to_string(), o.map(str::to_string)))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
            self.calls.lock().unwrap().push(request.model.clone());
            match self.outcomes.get(&request.model).cloned().flatten() {
                Some(text) => Ok(GenerateResponse {
                    text,
                    model: request.model.clone(),
                    latency_ms: 1,
                }),
                None => Err(ProviderError::ApiError {
                    status: 500,
                    message: format!("{} is down", request.model),
                }
                .into()),
            }
        }
    }

    fn topic() -> Topic {
        Topic::new("Rust").unwrap()
    }

    fn prompt(t: &Topic) -> String {
        format!("teach me {t}")
    }

    #[tokio::test]
    async fn first_success_short_circuits() {
        let provider = Scripted::new(&[("a", None), ("b", Some("from b")), ("c", Some("from c"))]);
        let client = FallbackClient::new(provider.clone(), Some("key".into()));

        let response = client
            .generate(&topic(), prompt, &candidates(["a", "b", "c"]))
            .await
            .unwrap();

        assert_eq!(response.text, "from b");
        assert_eq!(provider.calls(), ["a", "b"]);
    }

    #[tokio::test]
    async fn first_candidate_success_makes_one_request() {
        let provider = Scripted::new(&[("a", Some("ok")), ("b", Some("unused"))]);
        let client = FallbackClient::new(provider.clone(), Some("key".into()));

        client
            .generate(&topic(), prompt, &candidates(["a", "b"]))
            .await
            .unwrap();
        assert_eq!(provider.calls(), ["a"]);
    }

    #[tokio::test]
    async fn all_failures_report_last_cause() {
        let provider = Scripted::new(&[("a", None), ("b", None), ("c", None)]);
        let client = FallbackClient::new(provider.clone(), Some("key".into()));

        let err = client
            .generate(&topic(), prompt, &candidates(["a", "b", "c"]))
            .await
            .unwrap_err();

        assert_eq!(provider.calls(), ["a", "b", "c"]);
        match err {
            GenerationError::AllCandidatesExhausted {
                attempts,
                last_cause,
            } => {
                assert_eq!(attempts, 3);
                assert!(last_cause.contains("c is down"), "got: {last_cause}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn whitespace_payload_counts_as_failure() {
        let provider = Scripted::new(&[("a", Some("   ")), ("b", Some("real"))]);
        let client = FallbackClient::new(provider.clone(), Some("key".into()));

        let response = client
            .generate(&topic(), prompt, &candidates(["a", "b"]))
            .await
            .unwrap();
        assert_eq!(response.text, "real");
        assert_eq!(provider.calls(), ["a", "b"]);
    }

    #[tokio::test]
    async fn missing_credential_makes_no_requests() {
        let provider = Scripted::new(&[("a", Some("ok"))]);

        for key in [None, Some(String::new()), Some("  ".to_string())] {
            let client = FallbackClient::new(provider.clone(), key);
            assert!(!client.has_credential());
            let err = client
                .generate(&topic(), prompt, &candidates(["a"]))
                .await
                .unwrap_err();
            assert_eq!(err, GenerationError::CredentialMissing);
        }
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn no_candidates_is_exhausted() {
        let provider = Scripted::new(&[]);
        let client = FallbackClient::new(provider.clone(), Some("key".into()));

        let err = client.generate(&topic(), prompt, &[]).await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::AllCandidatesExhausted { attempts: 0, .. }
        ));
    }

    #[tokio::test]
    async fn prompt_is_built_from_topic() {
        let provider = Scripted::new(&[("a", Some("ok"))]);
        let client = FallbackClient::new(provider.clone(), Some("key".into()));
        let built = Mutex::new(None);

        client
            .generate(
                &topic(),
                |t| {
                    let p = prompt(t);
                    *built.lock().unwrap() = Some(p.clone());
                    p
                },
                &candidates(["a"]),
            )
            .await
            .unwrap();
        assert_eq!(built.lock().unwrap().as_deref(), Some("teach me Rust"));
    }
}
