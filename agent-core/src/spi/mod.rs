//! Typed SPI
//!
//! Registration table of service providers keyed by capability, and the
//! registry that resolves providers by the type key they advertise.

pub mod loader;
pub mod registry;
pub mod services;
pub mod typed;

pub use loader::{ServiceLoader, ServiceLoaderBuilder};
pub use registry::TypedSpiRegistry;
pub use services::RegisteredServices;
pub use typed::TypedSpi;
