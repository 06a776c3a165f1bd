//! crashnotes-providers: generative-text backends.
//!
//! Implements the `LlmProvider` trait for the hosted Gemini API and for a
//! scripted mock, and loads the configuration that wires them up.

pub mod config;
pub mod gemini;
pub mod mock;

pub use config::{create_provider, load_config, load_config_from, CrashnotesConfig};
pub use crashnotes_core::error::ProviderError;
