//! Service Loader
//!
//! Explicit registration table mapping a capability to its providers.
//! Populated once through [`ServiceLoaderBuilder`] and immutable afterwards.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::typed::TypedSpi;
use crate::common::{AgentError, AgentResult, BoxError};

enum Provider<S: ?Sized> {
    /// Shared instance handed out on every enumeration
    Singleton(Arc<S>),
    /// Invoked on every enumeration
    Factory(Box<dyn Fn() -> Result<Arc<S>, BoxError> + Send + Sync>),
}

impl<S: ?Sized> Provider<S> {
    fn instantiate(&self) -> Result<Arc<S>, BoxError> {
        match self {
            Provider::Singleton(instance) => Ok(Arc::clone(instance)),
            Provider::Factory(factory) => factory(),
        }
    }
}

/// Providers of one capability, in registration order.
///
/// Each element is a `Provider<S>` for the capability `S` this entry is keyed by.
struct Registrations {
    capability: &'static str,
    providers: Vec<Box<dyn Any + Send + Sync>>,
}

/// Builder collecting providers at startup
#[derive(Default)]
pub struct ServiceLoaderBuilder {
    capabilities: HashMap<TypeId, Registrations>,
}

impl ServiceLoaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared instance of capability `S`
    pub fn register_singleton<S>(self, instance: Arc<S>) -> Self
    where
        S: ?Sized + TypedSpi + 'static,
    {
        self.push(Provider::Singleton(instance))
    }

    /// Register a factory producing a new instance of capability `S` per enumeration
    pub fn register_factory<S, F>(self, factory: F) -> Self
    where
        S: ?Sized + TypedSpi + 'static,
        F: Fn() -> Result<Arc<S>, BoxError> + Send + Sync + 'static,
    {
        self.push::<S>(Provider::Factory(Box::new(factory)))
    }

    fn push<S>(mut self, provider: Provider<S>) -> Self
    where
        S: ?Sized + TypedSpi + 'static,
    {
        self.capabilities
            .entry(TypeId::of::<S>())
            .or_insert_with(|| Registrations {
                capability: type_name::<S>(),
                providers: Vec::new(),
            })
            .providers
            .push(Box::new(provider));
        self
    }

    pub fn build(self) -> ServiceLoader {
        let loader = ServiceLoader {
            capabilities: self.capabilities,
        };
        debug!(?loader, "Service loader built");
        loader
    }
}

/// Immutable table of registered providers
pub struct ServiceLoader {
    capabilities: HashMap<TypeId, Registrations>,
}

impl ServiceLoader {
    pub fn builder() -> ServiceLoaderBuilder {
        ServiceLoaderBuilder::new()
    }

    /// Enumerate every instance of capability `S` in registration order.
    ///
    /// Singletons are returned as shared handles, factories are invoked. The
    /// first failing factory aborts the enumeration. An unknown capability
    /// yields an empty list.
    pub fn new_service_instances<S>(&self) -> AgentResult<Vec<Arc<S>>>
    where
        S: ?Sized + TypedSpi + 'static,
    {
        let Some(registrations) = self.capabilities.get(&TypeId::of::<S>()) else {
            debug!(capability = type_name::<S>(), "No providers registered");
            return Ok(Vec::new());
        };

        registrations
            .providers
            .iter()
            .filter_map(|provider| provider.downcast_ref::<Provider<S>>())
            .map(|provider| {
                provider
                    .instantiate()
                    .map_err(|source| AgentError::Instantiation {
                        capability: registrations.capability,
                        source,
                    })
            })
            .collect()
    }

    /// Number of providers registered for capability `S`
    pub fn provider_count<S>(&self) -> usize
    where
        S: ?Sized + TypedSpi + 'static,
    {
        self.capabilities
            .get(&TypeId::of::<S>())
            .map_or(0, |registrations| registrations.providers.len())
    }

    /// Names of all registered capabilities, sorted
    pub fn capabilities(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .capabilities
            .values()
            .map(|registrations| registrations.capability)
            .collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ServiceLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for registrations in self.capabilities.values() {
            map.entry(&registrations.capability, &registrations.providers.len());
        }
        map.finish()
    }
}
