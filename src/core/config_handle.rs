//! The main configuration handle: typed access and prefix views.

use crate::core::cast::FromValue;
use crate::core::{ConfigBuilder, SourceRegistry, resolver};
use crate::error::{ConfigError, DecodeError, Result};
use crate::sources::{ConfigSource, EnvSource, SharedStore, Store};
use chrono::{DateTime, Utc};
use config::{Map, Value, ValueKind};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// A resolved configuration, optionally scoped to a key prefix.
///
/// Construction resolves every `${source:key}` reference in the primary store
/// exactly once. Afterwards every getter reads the resolved store. A view
/// returned by [`of`](Self::of) shares the store with its parent, so a
/// [`set`](Self::set) through either one is visible through both.
///
/// Values written with `set` or `set_default` after construction are stored
/// as given; a string that looks like a reference stays a string.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use xref_config::prelude::*;
///
/// # fn example() -> xref_config::error::Result<()> {
/// let primary = Store::new()
///     .with("server.port", 8080)
///     .with("database.password", "${secrets:db}");
/// let secrets = Store::new().with("db", "hunter2");
///
/// let config = Config::new(primary, HashMap::from([("secrets".to_string(), secrets)]))?;
///
/// assert_eq!(config.get_string("database.password")?, "hunter2");
/// assert_eq!(config.of("server").get_int("port")?, 8080);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Clone)]
pub struct Config {
    store: SharedStore,
    sources: Arc<SourceRegistry>,
    prefix: String,
}

impl Config {
    /// Build a configuration from in-memory stores.
    ///
    /// `references` are registered under their map keys next to the reserved
    /// `this` and `env` sources.
    ///
    /// # Errors
    ///
    /// Returns an error if any reference in `primary` cannot be resolved.
    pub fn new(primary: Store, references: HashMap<String, Store>) -> Result<Self> {
        let references = references
            .into_iter()
            .map(|(name, store)| (name, Arc::new(store) as Arc<dyn ConfigSource>));
        Self::assemble(primary, EnvSource::new(), references)
    }

    /// Build a configuration by loading the primary store and every reference
    /// store from files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LoadError`] if a file cannot be read or parsed,
    /// and a resolution error if a reference cannot be resolved.
    pub fn from_paths(
        path: impl Into<PathBuf>,
        reference_paths: HashMap<String, PathBuf>,
    ) -> Result<Self> {
        reference_paths
            .into_iter()
            .fold(Self::builder().with_file(path), |builder, (name, path)| {
                builder.with_reference_file(name, path)
            })
            .build()
    }

    /// Create a new builder for constructing a configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub(crate) fn assemble<I>(primary: Store, env: EnvSource, references: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Arc<dyn ConfigSource>)>,
    {
        let store = SharedStore::new(primary);
        let sources = SourceRegistry::new(store.clone(), env, references);

        let rewritten = resolver::resolve_all(&store, &sources)?;
        tracing::info!(
            sources = ?sources.names(),
            keys = store.read().keys().len(),
            references = rewritten,
            "configuration resolved"
        );

        Ok(Self {
            store,
            sources: Arc::new(sources),
            prefix: String::new(),
        })
    }

    /// Get the value at `key` cast to `T`.
    ///
    /// Every typed getter is a shorthand for this.
    ///
    /// # Errors
    ///
    /// [`ConfigError::KeyNotFound`] if nothing is stored at the key,
    /// [`ConfigError::Cast`] if the value cannot be converted.
    pub fn get_as<T: FromValue>(&self, key: &str) -> Result<T> {
        let key = self.key(key);
        let value = self.fetch(&key)?;
        T::from_value(&value).map_err(|reason| ConfigError::Cast {
            key,
            target: T::TARGET,
            reason,
        })
    }

    /// Get the raw value at `key`.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.fetch(&self.key(key))
    }

    /// Get a boolean.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.get_as(key)
    }

    /// Get a duration such as `"10s"`; bare integers are nanoseconds.
    pub fn get_duration(&self, key: &str) -> Result<Duration> {
        self.get_as(key)
    }

    /// Get a float.
    pub fn get_f64(&self, key: &str) -> Result<f64> {
        self.get_as(key)
    }

    /// Get a platform-width integer.
    pub fn get_int(&self, key: &str) -> Result<isize> {
        self.get_as(key)
    }

    /// Get a 32-bit integer.
    pub fn get_int32(&self, key: &str) -> Result<i32> {
        self.get_as(key)
    }

    /// Get a 64-bit integer.
    pub fn get_int64(&self, key: &str) -> Result<i64> {
        self.get_as(key)
    }

    /// Get a list of integers.
    pub fn get_int_slice(&self, key: &str) -> Result<Vec<isize>> {
        self.get_as(key)
    }

    /// Get a string.
    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get_as(key)
    }

    /// Get a table.
    pub fn get_string_map(&self, key: &str) -> Result<Map<String, Value>> {
        self.get_as(key)
    }

    /// Get a list of strings.
    pub fn get_string_slice(&self, key: &str) -> Result<Vec<String>> {
        self.get_as(key)
    }

    /// Get a point in time.
    pub fn get_time(&self, key: &str) -> Result<DateTime<Utc>> {
        self.get_as(key)
    }

    /// Store `value` at `key`, overwriting any existing value.
    pub fn set(&self, key: &str, value: impl Into<Value>) {
        self.store.write().set(&self.key(key), value);
    }

    /// Store `value` at `key` unless a value is already there.
    ///
    /// Returns `true` if the value was written.
    pub fn set_default(&self, key: &str, value: impl Into<Value>) -> bool {
        self.store.write().set_default(&self.key(key), value)
    }

    /// Whether a non-nil value is stored at `key`.
    pub fn exists(&self, key: &str) -> bool {
        self.store.read().contains(&self.key(key))
    }

    /// Return a view of this configuration scoped to `prefix`.
    ///
    /// No values are copied.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::collections::HashMap;
    /// # use xref_config::prelude::*;
    /// # fn example() -> xref_config::error::Result<()> {
    /// let cfg = Config::new(Store::new().with("foo.bar", "baz"), HashMap::new())?;
    /// assert_eq!(cfg.get_string("foo.bar")?, cfg.of("foo").get_string("bar")?);
    /// # Ok(())
    /// # }
    /// # example().unwrap();
    /// ```
    pub fn of(&self, prefix: &str) -> Config {
        Config {
            store: self.store.clone(),
            sources: Arc::clone(&self.sources),
            prefix: self.key(prefix),
        }
    }

    /// Decode the subtree at `key` into `T`.
    ///
    /// An empty key decodes the whole view.
    ///
    /// # Errors
    ///
    /// Unlike the getters, failures here are a [`DecodeError`]; a missing key
    /// or a shape mismatch is something the caller may want to recover from.
    pub fn unmarshal<T: DeserializeOwned>(&self, key: &str) -> std::result::Result<T, DecodeError> {
        let key = self.key(key);
        let value = self
            .store
            .read()
            .get(&key)
            .cloned()
            .ok_or_else(|| DecodeError::new(&key, "key not found"))?;
        value
            .try_deserialize::<T>()
            .map_err(|e| DecodeError::new(&key, e.to_string()))
    }

    /// All leaf keys below this view, relative to its prefix, sorted.
    pub fn keys(&self) -> Vec<String> {
        let keys = self.store.read().keys();
        if self.prefix.is_empty() {
            return keys;
        }
        let scope = format!("{}.", self.prefix.to_lowercase());
        keys.into_iter()
            .filter_map(|key| key.strip_prefix(&scope).map(str::to_string))
            .collect()
    }

    /// The dotted prefix of this view; empty for the root.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Names of every registered reference source, sorted.
    pub fn source_names(&self) -> Vec<String> {
        self.sources.names().into_iter().map(str::to_string).collect()
    }

    fn key(&self, key: &str) -> String {
        match (self.prefix.is_empty(), key.is_empty()) {
            (true, _) => key.to_string(),
            (false, true) => self.prefix.clone(),
            (false, false) => format!("{}.{}", self.prefix, key),
        }
    }

    fn fetch(&self, key: &str) -> Result<Value> {
        self.store
            .read()
            .get(key)
            .filter(|value| !matches!(value.kind, ValueKind::Nil))
            .cloned()
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("prefix", &self.prefix)
            .field("sources", &self.sources)
            .finish_non_exhaustive()
    }
}
