//! Builder for constructing Config instances.

use crate::core::Config;
use crate::error::Result;
use crate::sources::{ConfigSource, EnvSource, FileSource, Store};
use std::path::PathBuf;
use std::sync::Arc;

/// A reference source that is either ready or still to be read from disk.
enum PendingSource {
    Ready(Arc<dyn ConfigSource>),
    File(PathBuf),
}

/// Builder for constructing a [`Config`].
///
/// Provides a fluent interface for assembling the primary store, the named
/// reference sources and the reserved `env` source.
///
/// # Examples
///
/// ```rust,no_run
/// use xref_config::prelude::*;
///
/// # fn example() -> Result<()> {
/// let config = Config::builder()
///     .with_file("config/default.yaml")
///     .with_file("config/production.yaml")
///     .with_reference_file("secrets", "config/secrets.yaml")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ConfigBuilder {
    base: Store,
    file_paths: Vec<PathBuf>,
    references: Vec<(String, PendingSource)>,
    env: EnvSource,
}

impl ConfigBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base: Store::new(),
            file_paths: Vec::new(),
            references: Vec::new(),
            env: EnvSource::new(),
        }
    }

    /// Start the primary store from an in-memory store.
    ///
    /// Files added with [`with_file`](Self::with_file) are merged over it.
    pub fn with_store(mut self, store: Store) -> Self {
        self.base = store;
        self
    }

    /// Add a file to the primary store.
    ///
    /// Supported formats: YAML (.yaml, .yml), TOML (.toml), JSON (.json)
    ///
    /// Files are merged in the order they are specified. Later files
    /// override individual keys of earlier ones.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_paths.push(path.into());
        self
    }

    /// Register a reference source under `name`.
    ///
    /// The names `this` and `env` are reserved; sources registered under them
    /// are ignored.
    pub fn with_reference<S: ConfigSource + 'static>(mut self, name: impl Into<String>, source: S) -> Self {
        self.references
            .push((name.into(), PendingSource::Ready(Arc::new(source))));
        self
    }

    /// Register an in-memory store under `name`.
    pub fn with_reference_store(self, name: impl Into<String>, store: Store) -> Self {
        self.with_reference(name, store)
    }

    /// Register a store loaded from `path` under `name`.
    ///
    /// The file is read when [`build`](Self::build) runs.
    pub fn with_reference_file(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.references
            .push((name.into(), PendingSource::File(path.into())));
        self
    }

    /// Map `${env:key}` lookups onto prefixed variable names.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Prefix for environment variables (e.g., "APP")
    /// * `separator` - Separator for nested keys (e.g., "__" for APP_DB__HOST)
    pub fn with_env_prefix(mut self, prefix: &str, separator: &str) -> Self {
        self.env = EnvSource::new().with_prefix(prefix, separator);
        self
    }

    /// Load every file, register every source and resolve all references.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A primary or reference file cannot be loaded
    /// - A reference names an unregistered source or a missing key
    /// - A chain of references is circular
    pub fn build(self) -> Result<Config> {
        let mut primary = self.base;
        for path in &self.file_paths {
            primary.merge(FileSource::new(path).load()?);
        }

        let mut references = Vec::with_capacity(self.references.len());
        for (name, pending) in self.references {
            let source = match pending {
                PendingSource::Ready(source) => source,
                PendingSource::File(path) => {
                    Arc::new(FileSource::new(path).load()?) as Arc<dyn ConfigSource>
                }
            };
            references.push((name, source));
        }

        Config::assemble(primary, self.env, references)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
