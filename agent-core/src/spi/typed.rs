//! Typed SPI capability

/// Implemented by every service that can be resolved by type key.
///
/// A capability is any trait extending `TypedSpi`; the registry hands out
/// implementations as `Arc<dyn Capability>`.
pub trait TypedSpi: Send + Sync {
    /// Type key this implementation advertises among its peers
    fn spi_type(&self) -> &str;
}
