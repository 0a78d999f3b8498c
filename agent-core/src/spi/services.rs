//! Ordered mapping from requested type key to resolved service.

use std::fmt;
use std::sync::Arc;

use super::typed::TypedSpi;

/// Result of a bulk lookup.
///
/// Keys keep the order in which the loader enumerated their services. When
/// a key is inserted again the service is replaced in place.
pub struct RegisteredServices<S: ?Sized> {
    entries: Vec<(String, Arc<S>)>,
}

impl<S: ?Sized> RegisteredServices<S> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert or replace, returning the previous service for `key`
    pub(crate) fn insert(&mut self, key: String, service: Arc<S>) -> Option<Arc<S>> {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, service)),
            None => {
                self.entries.push((key, service));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Arc<S>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, service)| service)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: ?Sized> Default for RegisteredServices<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<S: ?Sized> IntoIterator for RegisteredServices<S> {
    type Item = (String, Arc<S>);
    type IntoIter = std::vec::IntoIter<(String, Arc<S>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<S: ?Sized + TypedSpi> fmt::Debug for RegisteredServices<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(key, service)| (key, service.spi_type())))
            .finish()
    }
}
