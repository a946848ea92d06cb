//! Configuration resolution for the agent client
//!
//! Values come from three layers, highest first: explicit overrides (CLI flags
//! or environment), an optional civforge.toml, and built-in defaults.

use crate::error::ConfigError;
use reqwest::Url;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Production world service.
pub const DEFAULT_BASE_URL: &str = "https://civforge-worker.civforge519.workers.dev";

/// World observed and acted upon when none is configured.
pub const DEFAULT_WORLD_ID: &str = "public";

pub const CONFIG_FILE_NAME: &str = "civforge.toml";

/// Agent credentials. Immutable once constructed.
#[derive(Clone, PartialEq, Eq)]
pub struct AgentIdentity {
    agent_id: String,
    agent_key: String,
}

impl AgentIdentity {
    pub fn new(agent_id: impl Into<String>, agent_key: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            agent_key: agent_key.into(),
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn agent_key(&self) -> &str {
        &self.agent_key
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.agent_key)
    }
}

impl fmt::Debug for AgentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentIdentity")
            .field("agent_id", &self.agent_id)
            .field("agent_key", &"<redacted>")
            .finish()
    }
}

/// Fully resolved client configuration
#[derive(Debug, Clone)]
pub struct AgentConfig {
    base_url: String,
    identity: AgentIdentity,
    world_id: String,
}

impl AgentConfig {
    /// Build a configuration from already-known values, validating the base URL.
    pub fn new(
        base_url: impl Into<String>,
        identity: AgentIdentity,
        world_id: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(base_url.into())?;
        Ok(Self {
            base_url,
            identity,
            world_id: world_id.into(),
        })
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    pub fn agent_id(&self) -> &str {
        self.identity.agent_id()
    }

    pub fn world_id(&self) -> &str {
        &self.world_id
    }
}

/// One layer of partially specified configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSource {
    pub http: Option<String>,
    pub agent_id: Option<String>,
    pub agent_key: Option<String>,
    pub world_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    agent: AgentSection,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    http: Option<String>,
    world_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AgentSection {
    id: Option<String>,
    key: Option<String>,
}

impl ConfigSource {
    /// Fill fields missing (or blank) in `self` from `fallback`.
    pub fn or(self, fallback: ConfigSource) -> Self {
        Self {
            http: non_blank(self.http).or_else(|| non_blank(fallback.http)),
            agent_id: non_blank(self.agent_id).or_else(|| non_blank(fallback.agent_id)),
            agent_key: non_blank(self.agent_key).or_else(|| non_blank(fallback.agent_key)),
            world_id: non_blank(self.world_id).or_else(|| non_blank(fallback.world_id)),
        }
    }

    /// Load a layer from a civforge.toml file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            http: file.server.http,
            agent_id: file.agent.id,
            agent_key: file.agent.key,
            world_id: file.server.world_id,
        })
    }

    /// Find civforge.toml in the current directory or its parents
    pub fn find_config_path() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_config_path_from(&current)
    }

    /// Find civforge.toml starting at `start`, walking up at most ten levels.
    pub fn find_config_path_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        for _ in 0..10 {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Apply defaults and check that credentials are present.
    pub fn resolve(self) -> Result<AgentConfig, ConfigError> {
        let agent_id = non_blank(self.agent_id).ok_or(ConfigError::Missing("AGENT_ID"))?;
        let agent_key = non_blank(self.agent_key).ok_or(ConfigError::Missing("AGENT_KEY"))?;
        let base_url = non_blank(self.http).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let world_id = non_blank(self.world_id).unwrap_or_else(|| DEFAULT_WORLD_ID.to_string());

        AgentConfig::new(base_url, AgentIdentity::new(agent_id, agent_key), world_id)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn normalize_base_url(raw: String) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/').to_string();
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.clone(),
        reason,
    };

    let url = Url::parse(&trimmed).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    if url.query().is_some() {
        return Err(invalid("query strings are not allowed".to_string()));
    }
    if url.fragment().is_some() {
        return Err(invalid("fragments are not allowed".to_string()));
    }

    Ok(trimmed)
}
