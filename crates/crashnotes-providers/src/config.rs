//! Configuration and provider factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crashnotes_core::engine::GenerationSettings;
use crashnotes_core::model::{candidates, ModelCandidate};
use crashnotes_core::prompt::{DEFAULT_COURSE_MODELS, DEFAULT_QUIZ_MODELS};
use crashnotes_core::traits::LlmProvider;

use crate::gemini::{GeminiProvider, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Environment variables consulted for the API key, in priority order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["CRASHNOTES_API_KEY", "GEMINI_API_KEY"];

/// Top-level crashnotes configuration.
///
/// `Debug` prints the API key as `***`.
#[derive(Clone, Serialize, Deserialize)]
pub struct CrashnotesConfig {
    /// Credential for the generation endpoint. `${VAR}` references are
    /// resolved from the environment.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of the generation endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Course candidates, in fallback order.
    #[serde(default = "default_course_models")]
    pub course_models: Vec<ModelCandidate>,
    /// Quiz candidates, in fallback order.
    #[serde(default = "default_quiz_models")]
    pub quiz_models: Vec<ModelCandidate>,
    /// Ask for structured course JSON rather than free prose.
    #[serde(default = "default_true")]
    pub structured_course: bool,
    /// Per-request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Where the recent-topics cache lives.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl std::fmt::Debug for CrashnotesConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrashnotesConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("course_models", &self.course_models)
            .field("quiz_models", &self.quiz_models)
            .field("structured_course", &self.structured_course)
            .field("timeout_secs", &self.timeout_secs)
            .field("data_dir", &self.data_dir)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_course_models() -> Vec<ModelCandidate> {
    candidates(DEFAULT_COURSE_MODELS)
}
fn default_quiz_models() -> Vec<ModelCandidate> {
    candidates(DEFAULT_QUIZ_MODELS)
}
fn default_true() -> bool {
    true
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_data_dir() -> PathBuf {
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(".local").join("share").join("crashnotes"))
        .unwrap_or_else(|_| PathBuf::from(".crashnotes"))
}

impl Default for CrashnotesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            course_models: default_course_models(),
            quiz_models: default_quiz_models(),
            structured_course: true,
            timeout_secs: default_timeout(),
            data_dir: default_data_dir(),
        }
    }
}

impl CrashnotesConfig {
    /// Candidate lists and prompt options for the orchestrator.
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            course_candidates: self.course_models.clone(),
            quiz_candidates: self.quiz_models.clone(),
            structured_course: self.structured_course,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `crashnotes.toml` in the current directory
/// 2. `~/.config/crashnotes/config.toml`
///
/// Environment variable overrides: `CRASHNOTES_API_KEY`, then `GEMINI_API_KEY`.
pub fn load_config() -> Result<CrashnotesConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<CrashnotesConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("crashnotes.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<CrashnotesConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => CrashnotesConfig::default(),
    };

    // Apply env var overrides
    if let Some(key) = API_KEY_ENV_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
    {
        config.api_key = Some(key);
    }

    config.api_key = config
        .api_key
        .as_deref()
        .map(resolve_env_vars)
        .filter(|k| !k.trim().is_empty());
    config.base_url = resolve_env_vars(&config.base_url);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("crashnotes"))
}

/// Create the generation backend described by the configuration.
pub fn create_provider(config: &CrashnotesConfig) -> Result<Arc<dyn LlmProvider>> {
    let provider = GeminiProvider::new(Some(config.base_url.clone()), config.timeout_secs)?;
    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_CRASHNOTES_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_CRASHNOTES_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_CRASHNOTES_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_CRASHNOTES_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = CrashnotesConfig::default();
        assert_eq!(config.api_key, None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.course_models[0].id(), "gemini-2.5-flash");
        assert_eq!(config.quiz_models.len(), 3);
        assert!(config.structured_course);
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
api_key = "from-file"
course_models = ["model-x", "model-y"]
structured_course = false
data_dir = "/tmp/crashnotes-test"
"#;
        let config: CrashnotesConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
        let settings = config.generation_settings();
        assert_eq!(
            settings.course_candidates,
            vec![ModelCandidate::new("model-x"), ModelCandidate::new("model-y")]
        );
        assert_eq!(settings.quiz_candidates[0].id(), "gemini-1.5-flash");
        assert!(!settings.structured_course);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/crashnotes-test"));
    }

    #[test]
    fn debug_masks_api_key() {
        let config = CrashnotesConfig {
            api_key: Some("super-secret".into()),
            ..CrashnotesConfig::default()
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("***"));
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config_from(Some(&missing)).is_err());
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crashnotes.toml");
        std::fs::write(&path, "quiz_models = [\"only-one\"]\ntimeout_secs = 7\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.quiz_models, vec![ModelCandidate::new("only-one")]);
        assert_eq!(config.timeout_secs, 7);
    }

    #[test]
    fn create_provider_from_default_config() {
        let provider = create_provider(&CrashnotesConfig::default()).unwrap();
        assert_eq!(provider.name(), "gemini");
    }
}
