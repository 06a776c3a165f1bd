//! Error taxonomy.
//!
//! Provider failures are per-candidate and recovered by the fallback client.
//! Everything the client and parser give back to callers is one of the typed
//! errors below; nothing in this crate panics on bad model output.

use thiserror::Error;

/// Errors that can occur when talking to a generation backend.
///
/// Each of these marks one candidate as failed; the fallback client moves on
/// to the next candidate regardless of the variant.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response body did not have the expected envelope.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The envelope was fine but carried no text.
    #[error("empty response from model")]
    EmptyResponse,
}

/// Failure of a whole `generate` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// No API credential is configured. No candidate was attempted.
    #[error("no API key configured; set CRASHNOTES_API_KEY or api_key in crashnotes.toml")]
    CredentialMissing,

    /// Every candidate failed. Carries the last candidate's failure.
    #[error("all {attempts} model candidates failed; last error: {last_cause}")]
    AllCandidatesExhausted { attempts: usize, last_cause: String },
}

impl GenerationError {
    /// The failure detail shown to users next to the generic message.
    pub fn detail(&self) -> String {
        match self {
            GenerationError::CredentialMissing => self.to_string(),
            GenerationError::AllCandidatesExhausted { last_cause, .. } => last_cause.clone(),
        }
    }
}

/// Quiz-mode parse failure. Course mode never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No balanced JSON array literal was found in the text.
    #[error("no JSON array found in response")]
    NoJsonArray,

    /// An array was found but does not decode into scorable questions.
    #[error("invalid quiz shape: {0}")]
    InvalidShape(String),

    /// The array decoded but held no questions.
    #[error("quiz array is empty")]
    EmptyArray,
}

impl ParseError {
    /// Stable machine-readable reason code.
    pub fn reason(&self) -> &'static str {
        match self {
            ParseError::NoJsonArray => "no-json-array",
            ParseError::InvalidShape(_) => "invalid-shape",
            ParseError::EmptyArray => "empty-array",
        }
    }
}

/// Why a quiz could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Rejected topic input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopicError {
    #[error("topic must not be empty")]
    Empty,
}
