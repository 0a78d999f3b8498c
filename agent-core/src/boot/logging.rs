//! Built-in logging plugin

use tracing::{info, Level};

use super::service::PluginBootService;
use crate::common::{AgentError, AgentResult};
use crate::config::PluginConfig;
use crate::spi::TypedSpi;

const PLUGIN_TYPE: &str = "Logging";

/// Reports its configuration through tracing.
///
/// The optional `level` prop must name a tracing level.
#[derive(Debug, Default)]
pub struct LoggingPluginBootService;

impl TypedSpi for LoggingPluginBootService {
    fn spi_type(&self) -> &str {
        PLUGIN_TYPE
    }
}

impl PluginBootService for LoggingPluginBootService {
    fn start(&self, config: &PluginConfig) -> AgentResult<()> {
        if let Some(level) = config.prop_str("level") {
            level.parse::<Level>().map_err(|_| {
                AgentError::plugin_start(PLUGIN_TYPE, format!("unknown level '{}'", level))
            })?;
        }

        for (key, value) in &config.props {
            info!(plugin = PLUGIN_TYPE, %key, %value, "Plugin property");
        }
        info!("Logging plugin started");
        Ok(())
    }

    fn close(&self) -> AgentResult<()> {
        info!("Logging plugin closed");
        Ok(())
    }
}
