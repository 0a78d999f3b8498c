//! Typed SPI Registry
//!
//! Resolves registered services by the type key they advertise.

use std::any::type_name;
use std::sync::Arc;

use tracing::debug;

use super::loader::ServiceLoader;
use super::services::RegisteredServices;
use super::typed::TypedSpi;
use crate::common::{AgentError, AgentResult};

/// Registry handle built once at startup and passed to whatever needs lookup.
///
/// Cloning is cheap; all clones share the same loader.
#[derive(Debug, Clone)]
pub struct TypedSpiRegistry {
    loader: Arc<ServiceLoader>,
}

impl TypedSpiRegistry {
    pub fn new(loader: ServiceLoader) -> Self {
        Self {
            loader: Arc::new(loader),
        }
    }

    /// Get the first registered service whose type matches `service_type`, ignoring case.
    ///
    /// Fails with [`AgentError::ServiceProviderNotFound`] when nothing matches.
    pub fn get_registered_service<S>(&self, service_type: &str) -> AgentResult<Arc<S>>
    where
        S: ?Sized + TypedSpi + 'static,
    {
        let found = self
            .loader
            .new_service_instances::<S>()?
            .into_iter()
            .find(|each| eq_ignore_case(each.spi_type(), service_type));

        match found {
            Some(service) => {
                debug!(
                    capability = type_name::<S>(),
                    requested = service_type,
                    resolved = service.spi_type(),
                    "Resolved service"
                );
                Ok(service)
            }
            None => Err(AgentError::service_provider_not_found(
                type_name::<S>(),
                service_type,
            )),
        }
    }

    /// Get every registered service of capability `S`, unfiltered
    pub fn get_all_registered_services<S>(&self) -> AgentResult<Vec<Arc<S>>>
    where
        S: ?Sized + TypedSpi + 'static,
    {
        self.loader.new_service_instances::<S>()
    }

    /// Map each requested type to the service advertising exactly that type.
    ///
    /// Types with no match are left out. If several services share a type
    /// the last one enumerated wins.
    pub fn get_registered_services<S, I, K>(&self, types: I) -> AgentResult<RegisteredServices<S>>
    where
        S: ?Sized + TypedSpi + 'static,
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let requested: Vec<K> = types.into_iter().collect();
        let types: Vec<&str> = requested.iter().map(|t| t.as_ref()).collect();
        let registered = self.loader.new_service_instances::<S>()?;

        let mut result = RegisteredServices::with_capacity(registered.len());
        for each in registered {
            for service_type in types.iter().filter(|t| **t == each.spi_type()) {
                result.insert(service_type.to_string(), Arc::clone(&each));
            }
        }

        debug!(
            capability = type_name::<S>(),
            requested = types.len(),
            resolved = result.len(),
            "Resolved services"
        );
        Ok(result)
    }
}

/// Character-wise comparison using simple (single char) case mappings.
///
/// Two chars match when equal, when their uppercase forms are equal, or
/// when the lowercase forms of those are equal. Lengths must agree, so
/// `"ß"` never matches `"ss"`.
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars().count() == b.chars().count()
        && a.chars().zip(b.chars()).all(|(x, y)| chars_eq_ignore_case(x, y))
}

fn chars_eq_ignore_case(x: char, y: char) -> bool {
    if x == y {
        return true;
    }
    let (upper_x, upper_y) = (simple_uppercase(x), simple_uppercase(y));
    upper_x == upper_y || simple_lowercase(upper_x) == simple_lowercase(upper_y)
}

/// Multi-char uppercase expansions (`ß` -> `SS`) leave the char unchanged.
fn simple_uppercase(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Only `İ` lowercases to more than one char; its simple mapping is the leading `i`.
fn simple_lowercase(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}
