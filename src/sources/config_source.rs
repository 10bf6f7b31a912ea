//! Configuration source trait.

use config::Value;

/// Trait for sources that references can point into.
///
/// Every entry of the [`SourceRegistry`](crate::core::SourceRegistry) implements
/// this trait. Implement it to make custom key-value backends (secret stores,
/// remote documents, test fixtures) addressable as `${name:key}`.
pub trait ConfigSource: Send + Sync {
    /// Look up the value stored under a dotted key.
    ///
    /// Returns `None` when the key is absent.
    fn lookup(&self, key: &str) -> Option<Value>;

    /// Get a human-readable name for this source (for logging/debugging).
    fn name(&self) -> String;
}
