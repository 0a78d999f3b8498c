//! Plugin Boot
//!
//! Starts the plugins named in the agent config through the typed SPI registry.

pub mod logging;
pub mod manager;
pub mod service;

use std::sync::Arc;

use crate::spi::{ServiceLoader, ServiceLoaderBuilder};

pub use logging::LoggingPluginBootService;
pub use manager::{BootReport, PluginBootManager};
pub use service::PluginBootService;

/// Loader builder with the built-in plugins already registered
pub fn builtin_loader() -> ServiceLoaderBuilder {
    ServiceLoader::builder()
        .register_singleton::<dyn PluginBootService>(Arc::new(LoggingPluginBootService))
}
