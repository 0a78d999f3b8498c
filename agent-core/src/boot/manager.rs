//! Plugin Boot Manager
//!
//! Resolves configured plugins by type, starts them, and closes them in
//! reverse start order.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::service::PluginBootService;
use crate::common::AgentResult;
use crate::config::AgentConfig;
use crate::spi::TypedSpiRegistry;

/// Outcome of [`PluginBootManager::start_all`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootReport {
    /// Plugins started, in start order
    pub started: Vec<String>,
    /// Configured plugins with no registered implementation
    pub missing: Vec<String>,
    /// Plugins whose start failed
    pub failed: Vec<String>,
}

#[derive(Default)]
pub struct PluginBootManager {
    started: Vec<(String, Arc<dyn PluginBootService>)>,
}

impl PluginBootManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start every configured plugin that has a registered implementation.
    ///
    /// Plugin types match exactly. Missing plugins and start failures are
    /// logged and reported; only lookup errors are returned. Plugins this
    /// manager already started are skipped.
    pub fn start_all(
        &mut self,
        registry: &TypedSpiRegistry,
        config: &AgentConfig,
    ) -> AgentResult<BootReport> {
        let services =
            registry.get_registered_services::<dyn PluginBootService, _, _>(config.plugin_types())?;

        let mut report = BootReport {
            missing: config
                .plugin_types()
                .filter(|plugin_type| !services.contains_key(plugin_type))
                .map(str::to_string)
                .collect(),
            ..BootReport::default()
        };
        for plugin_type in &report.missing {
            warn!("No plugin registered for configured type '{}'", plugin_type);
        }

        for (plugin_type, service) in services {
            let Some(plugin_config) = config.plugins.get(&plugin_type) else {
                continue;
            };
            if self.is_started(&plugin_type) {
                debug!("Plugin '{}' already started", plugin_type);
                continue;
            }

            info!("Starting plugin '{}'", plugin_type);
            match service.start(plugin_config) {
                Ok(()) => {
                    report.started.push(plugin_type.clone());
                    self.started.push((plugin_type, service));
                }
                Err(e) => {
                    error!("Failed to start plugin '{}': {}", plugin_type, e);
                    report.failed.push(plugin_type);
                }
            }
        }

        info!(
            "Plugin boot finished: {} started, {} missing, {} failed",
            report.started.len(),
            report.missing.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// Close started plugins in reverse start order.
    ///
    /// Returns the types that failed to close.
    pub fn close_all(&mut self) -> Vec<String> {
        let mut failed = Vec::new();
        while let Some((plugin_type, service)) = self.started.pop() {
            match service.close() {
                Ok(()) => info!("Closed plugin '{}'", plugin_type),
                Err(e) => {
                    error!("Failed to close plugin '{}': {}", plugin_type, e);
                    failed.push(plugin_type);
                }
            }
        }
        failed
    }

    fn is_started(&self, plugin_type: &str) -> bool {
        self.started.iter().any(|(started, _)| started == plugin_type)
    }

    /// Types of the plugins currently started
    pub fn started(&self) -> impl Iterator<Item = &str> {
        self.started.iter().map(|(plugin_type, _)| plugin_type.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::common::AgentError;
    use crate::config::PluginConfig;
    use crate::spi::{ServiceLoader, TypedSpi};

    type Journal = Arc<Mutex<Vec<String>>>;

    struct Recording {
        spi_type: &'static str,
        journal: Journal,
        fail_start: bool,
        fail_close: bool,
    }

    impl TypedSpi for Recording {
        fn spi_type(&self) -> &str {
            self.spi_type
        }
    }

    impl PluginBootService for Recording {
        fn start(&self, config: &PluginConfig) -> AgentResult<()> {
            if self.fail_start {
                return Err(AgentError::plugin_start(self.spi_type, "port in use"));
            }
            let port = config.port.map(|p| p.to_string()).unwrap_or_default();
            self.journal
                .lock()
                .unwrap()
                .push(format!("start {} {}", self.spi_type, port));
            Ok(())
        }

        fn close(&self) -> AgentResult<()> {
            self.journal.lock().unwrap().push(format!("close {}", self.spi_type));
            if self.fail_close {
                return Err(AgentError::plugin_close(self.spi_type, "still flushing"));
            }
            Ok(())
        }
    }

    fn plugin(spi_type: &'static str, journal: &Journal) -> Arc<dyn PluginBootService> {
        Arc::new(Recording {
            spi_type,
            journal: Arc::clone(journal),
            fail_start: false,
            fail_close: false,
        })
    }

    fn config(types: &[&str]) -> AgentConfig {
        let mut config = AgentConfig::default();
        for plugin_type in types {
            config.plugins.insert(
                plugin_type.to_string(),
                PluginConfig {
                    port: Some(9090),
                    ..PluginConfig::default()
                },
            );
        }
        config
    }

    #[test]
    fn test_starts_configured_plugins_in_registration_order() {
        let journal = Journal::default();
        let registry = TypedSpiRegistry::new(
            ServiceLoader::builder()
                .register_singleton(plugin("Tracing", &journal))
                .register_singleton(plugin("Metrics", &journal))
                .register_singleton(plugin("Unused", &journal))
                .build(),
        );

        let mut manager = PluginBootManager::new();
        let report = manager
            .start_all(&registry, &config(&["Metrics", "Tracing"]))
            .unwrap();

        assert_eq!(report.started, vec!["Tracing", "Metrics"]);
        assert!(report.missing.is_empty());
        assert!(report.failed.is_empty());
        assert_eq!(
            *journal.lock().unwrap(),
            vec!["start Tracing 9090", "start Metrics 9090"]
        );
        assert_eq!(manager.started().collect::<Vec<_>>(), vec!["Tracing", "Metrics"]);
    }

    #[test]
    fn test_reports_missing_and_exact_match_only() {
        let journal = Journal::default();
        let registry = TypedSpiRegistry::new(
            ServiceLoader::builder()
                .register_singleton(plugin("Metrics", &journal))
                .build(),
        );

        let mut manager = PluginBootManager::new();
        let report = manager
            .start_all(&registry, &config(&["metrics", "Jaeger"]))
            .unwrap();

        assert!(report.started.is_empty());
        assert_eq!(report.missing, vec!["Jaeger", "metrics"]);
        assert!(journal.lock().unwrap().is_empty());
    }

    #[test]
    fn test_start_failure_does_not_stop_others() {
        let journal = Journal::default();
        let broken: Arc<dyn PluginBootService> = Arc::new(Recording {
            spi_type: "Broken",
            journal: Arc::clone(&journal),
            fail_start: true,
            fail_close: false,
        });
        let registry = TypedSpiRegistry::new(
            ServiceLoader::builder()
                .register_singleton(broken)
                .register_singleton(plugin("Metrics", &journal))
                .build(),
        );

        let mut manager = PluginBootManager::new();
        let report = manager
            .start_all(&registry, &config(&["Broken", "Metrics"]))
            .unwrap();

        assert_eq!(report.started, vec!["Metrics"]);
        assert_eq!(report.failed, vec!["Broken"]);
        assert_eq!(manager.started().collect::<Vec<_>>(), vec!["Metrics"]);
    }

    #[test]
    fn test_close_runs_in_reverse_and_continues_on_failure() {
        let journal = Journal::default();
        let stubborn: Arc<dyn PluginBootService> = Arc::new(Recording {
            spi_type: "Stubborn",
            journal: Arc::clone(&journal),
            fail_start: false,
            fail_close: true,
        });
        let registry = TypedSpiRegistry::new(
            ServiceLoader::builder()
                .register_singleton(plugin("Tracing", &journal))
                .register_singleton(stubborn)
                .register_singleton(plugin("Metrics", &journal))
                .build(),
        );

        let mut manager = PluginBootManager::new();
        manager
            .start_all(&registry, &config(&["Tracing", "Stubborn", "Metrics"]))
            .unwrap();
        journal.lock().unwrap().clear();

        let failed = manager.close_all();

        assert_eq!(failed, vec!["Stubborn"]);
        assert_eq!(
            *journal.lock().unwrap(),
            vec!["close Metrics", "close Stubborn", "close Tracing"]
        );
        assert_eq!(manager.started().count(), 0);
    }

    #[test]
    fn test_second_start_skips_started_plugins() {
        let journal = Journal::default();
        let registry = TypedSpiRegistry::new(
            ServiceLoader::builder()
                .register_singleton(plugin("Tracing", &journal))
                .register_singleton(plugin("Metrics", &journal))
                .build(),
        );

        let mut manager = PluginBootManager::new();
        manager.start_all(&registry, &config(&["Tracing"])).unwrap();
        let report = manager
            .start_all(&registry, &config(&["Tracing", "Metrics"]))
            .unwrap();

        assert_eq!(report.started, vec!["Metrics"]);
        assert_eq!(manager.started().collect::<Vec<_>>(), vec!["Tracing", "Metrics"]);

        assert!(manager.close_all().is_empty());
        assert_eq!(
            *journal.lock().unwrap(),
            vec![
                "start Tracing 9090",
                "start Metrics 9090",
                "close Metrics",
                "close Tracing"
            ]
        );
    }

    #[test]
    fn test_lookup_errors_propagate() {
        let registry = TypedSpiRegistry::new(
            ServiceLoader::builder()
                .register_factory::<dyn PluginBootService, _>(|| Err("no such plugin jar".into()))
                .build(),
        );

        let mut manager = PluginBootManager::new();
        assert!(matches!(
            manager.start_all(&registry, &config(&["Metrics"])),
            Err(AgentError::Instantiation { .. })
        ));
    }

    #[test]
    fn test_builtin_logging_plugin_boots() {
        let registry = TypedSpiRegistry::new(crate::boot::builtin_loader().build());

        let mut manager = PluginBootManager::new();
        let report = manager.start_all(&registry, &config(&["Logging"])).unwrap();

        assert_eq!(report.started, vec!["Logging"]);
        assert!(manager.close_all().is_empty());
    }
}
