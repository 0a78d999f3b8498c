//! Agent core
//!
//! Typed SPI registry resolving service implementations by type key, plus
//! the agent config and plugin boot built on top of it.

pub mod boot;
pub mod common;
pub mod config;
pub mod spi;

pub use boot::{builtin_loader, BootReport, PluginBootManager, PluginBootService};
pub use common::{AgentError, AgentResult, BoxError};
pub use config::{default_config_path, AgentConfig, PluginConfig};
pub use spi::{RegisteredServices, ServiceLoader, ServiceLoaderBuilder, TypedSpi, TypedSpiRegistry};
