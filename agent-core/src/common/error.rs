//! Common Error Types
//!
//! Unified error handling for service lookup, configuration and plugin lifecycle.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by service factories
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Agent error type
#[derive(Debug, Error)]
pub enum AgentError {
    /// No registered implementation of `capability` advertises `service_type`
    #[error("No implementation of `{capability}` registered with type `{service_type}`")]
    ServiceProviderNotFound {
        capability: &'static str,
        service_type: String,
    },

    /// A factory for `capability` failed to produce an instance
    #[error("Failed to instantiate `{capability}` provider: {source}")]
    Instantiation {
        capability: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("Config file not found at {0:?}")]
    ConfigNotFound(PathBuf),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path:?}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("Plugin '{plugin_type}' failed to start: {reason}")]
    PluginStart { plugin_type: String, reason: String },

    #[error("Plugin '{plugin_type}' failed to close: {reason}")]
    PluginClose { plugin_type: String, reason: String },
}

impl AgentError {
    /// Create a service provider not found error
    pub fn service_provider_not_found(capability: &'static str, service_type: &str) -> Self {
        Self::ServiceProviderNotFound {
            capability,
            service_type: service_type.to_string(),
        }
    }

    /// Create a plugin start error
    pub fn plugin_start(plugin_type: &str, reason: impl Into<String>) -> Self {
        Self::PluginStart {
            plugin_type: plugin_type.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a plugin close error
    pub fn plugin_close(plugin_type: &str, reason: impl Into<String>) -> Self {
        Self::PluginClose {
            plugin_type: plugin_type.to_string(),
            reason: reason.into(),
        }
    }

    /// True when this is the strict single-lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ServiceProviderNotFound { .. })
    }
}
