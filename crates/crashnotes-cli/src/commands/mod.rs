//! Subcommand implementations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crashnotes_core::engine::Orchestrator;
use crashnotes_core::fallback::FallbackClient;
use crashnotes_core::recent::RecentTopicsCache;
use crashnotes_core::store::FileStore;
use crashnotes_providers::config::load_config_from;
use crashnotes_providers::{create_provider, CrashnotesConfig};

pub mod init;
pub mod learn;
pub mod quiz;
pub mod recent;

/// Global flags shared by every subcommand.
pub struct ContextArgs {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

impl ContextArgs {
    /// Load the configuration, applying command-line overrides.
    pub fn load_config(&self) -> Result<CrashnotesConfig> {
        let mut config = load_config_from(self.config.as_deref())?;
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Recent-topics cache in the configured data directory.
    pub fn cache(&self, config: &CrashnotesConfig) -> RecentTopicsCache {
        RecentTopicsCache::new(Arc::new(FileStore::new(config.data_dir.clone())))
    }

    /// Orchestrator wired to the configured provider and cache.
    pub fn orchestrator(&self, config: &CrashnotesConfig) -> Result<Orchestrator> {
        let provider = create_provider(config)?;
        let client = FallbackClient::new(provider, config.api_key.clone());
        Ok(Orchestrator::new(
            client,
            self.cache(config),
            config.generation_settings(),
        ))
    }
}
