//! Agent configuration
//!
//! Reads the agent JSON config naming the plugins to boot.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::common::{AgentError, AgentResult};

/// Largest config file accepted (1MB)
const MAX_CONFIG_BYTES: u64 = 1_000_000;

/// Get the agent base directory (`~/.agent-spi/`)
pub fn agent_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".agent-spi"))
}

/// Get the default config path (`~/.agent-spi/agent.json`)
///
/// Falls back to `agent.json` in the working directory when no home
/// directory is available.
pub fn default_config_path() -> PathBuf {
    agent_dir()
        .map(|dir| dir.join("agent.json"))
        .unwrap_or_else(|| PathBuf::from("agent.json"))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Plugin configuration keyed by plugin type
    #[serde(default)]
    pub plugins: BTreeMap<String, PluginConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub props: Map<String, Value>,
}

impl PluginConfig {
    /// Get a string property
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }
}

impl AgentConfig {
    /// Load config from `path`
    pub fn load(path: &Path) -> AgentResult<Self> {
        let io_err = |source: io::Error| AgentError::Io {
            path: path.to_path_buf(),
            source,
        };

        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(AgentError::ConfigNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(io_err(e)),
        };
        if metadata.len() > MAX_CONFIG_BYTES {
            return Err(AgentError::ConfigParse {
                path: path.to_path_buf(),
                reason: "Config file too large (max 1MB)".to_string(),
            });
        }

        let content = fs::read_to_string(path).map_err(io_err)?;
        let config: AgentConfig =
            serde_json::from_str(&content).map_err(|e| AgentError::ConfigParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        info!(
            "Loaded agent config from {:?}: {} plugins",
            path,
            config.plugins.len()
        );
        Ok(config)
    }

    /// Load config from `path`, treating a missing file as an empty config
    pub fn load_or_default(path: &Path) -> AgentResult<Self> {
        match Self::load(path) {
            Err(AgentError::ConfigNotFound(_)) => {
                info!("No agent config at {:?}, no plugins configured", path);
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Configured plugin types, sorted
    pub fn plugin_types(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }
}
