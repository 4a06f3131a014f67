// src/config.rs
// =============================================================================
// Crawl configuration.
//
// Settings come from three places, later ones winning:
// 1. built-in defaults (depth 3, 10 concurrent fetches, 500ms delay, ...)
// 2. an optional YAML file passed with --config
// 3. command-line flags
//
// The result is a CrawlConfig, which never changes while a crawl runs.
// =============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::error::CrawlError;
use crate::page::LinkScope;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/89.0.4389.82 Safari/537.36";

#[derive(Debug, Clone, PartialEq)]
pub struct CrawlConfig {
    /// Links further than this from the seed are not followed.
    /// The seed itself is always fetched.
    pub max_depth: usize,
    /// Upper bound on simultaneous fetches; also the worker pool size.
    pub max_concurrency: usize,
    /// Pause before each non-seed task starts.
    pub per_task_delay: Duration,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub link_scope: LinkScope,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        CrawlConfig {
            max_depth: 3,
            max_concurrency: 10,
            per_task_delay: Duration::from_millis(500),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(30),
            link_scope: LinkScope::Relative,
        }
    }
}

impl CrawlConfig {
    pub fn validate(&self) -> Result<(), CrawlError> {
        if self.max_concurrency == 0 {
            return Err(CrawlError::config("max_concurrency must be at least 1"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(CrawlError::config("user_agent must not be empty"));
        }
        if self.request_timeout.is_zero() {
            return Err(CrawlError::config("request timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Overlays every value that is set in `overrides`.
    pub fn merge(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(max_depth) = overrides.max_depth {
            self.max_depth = max_depth;
        }
        if let Some(max_concurrency) = overrides.max_concurrency {
            self.max_concurrency = max_concurrency;
        }
        if let Some(delay_ms) = overrides.delay_ms {
            self.per_task_delay = Duration::from_millis(delay_ms);
        }
        if let Some(user_agent) = &overrides.user_agent {
            self.user_agent = user_agent.clone();
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.request_timeout = Duration::from_secs(timeout_secs);
        }
        if let Some(link_scope) = overrides.link_scope {
            self.link_scope = link_scope;
        }
        self
    }
}

// A partial configuration: the shape of the YAML file, and of the
// command-line flags once parsed. Unset fields leave the value below alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub max_depth: Option<usize>,
    pub max_concurrency: Option<usize>,
    pub delay_ms: Option<u64>,
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
    pub link_scope: Option<LinkScope>,
}

impl ConfigOverrides {
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("invalid crawl config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading crawl config from {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("in {}", path.display()))
    }
}

// Builds the final config: defaults, then the file (if any), then flags
pub fn resolve(file: Option<&Path>, flags: &ConfigOverrides) -> Result<CrawlConfig> {
    let mut config = CrawlConfig::default();
    if let Some(path) = file {
        config = config.merge(&ConfigOverrides::load(path)?);
    }
    let config = config.merge(flags);
    config.validate()?;
    Ok(config)
}
