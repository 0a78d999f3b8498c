//! Plugin boot capability

use crate::common::AgentResult;
use crate::config::PluginConfig;
use crate::spi::TypedSpi;

/// A plugin started when the agent config names its type.
pub trait PluginBootService: TypedSpi {
    /// Start the plugin with its configuration
    fn start(&self, config: &PluginConfig) -> AgentResult<()>;

    /// Release whatever `start` acquired
    fn close(&self) -> AgentResult<()> {
        Ok(())
    }
}
