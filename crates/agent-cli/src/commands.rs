use std::path::Path;

use anyhow::Context;
use serde_json::json;

use agent_core::{AgentConfig, PluginBootManager, PluginBootService, TypedSpi, TypedSpiRegistry};

pub fn plugins(registry: &TypedSpiRegistry) -> anyhow::Result<()> {
    let services = registry
        .get_all_registered_services::<dyn PluginBootService>()
        .context("failed to enumerate plugins")?;

    for service in services {
        println!("{}", service.spi_type());
    }
    Ok(())
}

pub fn resolve(registry: &TypedSpiRegistry, plugin_type: &str) -> anyhow::Result<()> {
    let service = registry.get_registered_service::<dyn PluginBootService>(plugin_type)?;
    println!("{}", service.spi_type());
    Ok(())
}

pub fn boot(registry: &TypedSpiRegistry, config_path: &Path) -> anyhow::Result<()> {
    let config = AgentConfig::load_or_default(config_path)
        .with_context(|| format!("failed to load agent config {}", config_path.display()))?;

    let mut manager = PluginBootManager::new();
    let report = manager
        .start_all(registry, &config)
        .context("failed to resolve configured plugins")?;
    let close_failed = manager.close_all();
    let failed_count = report.failed.len();

    let summary = json!({
        "started": report.started,
        "missing": report.missing,
        "failed": report.failed,
        "closeFailed": close_failed,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if failed_count > 0 {
        anyhow::bail!("{} plugin(s) failed to start", failed_count);
    }
    Ok(())
}
