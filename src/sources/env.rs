//! Environment variable configuration source.

use super::ConfigSource;
use config::{Value, ValueKind};

/// Environment variable configuration source.
///
/// Backs the reserved `env` reference source. Nothing is read up front: each
/// lookup goes to the process environment, trying the key verbatim first and
/// then upper-cased, so `${env:home}` and `${env:HOME}` both read `HOME`.
///
/// An optional prefix and separator map dotted keys onto variable names.
///
/// # Examples
///
/// ```rust
/// use xref_config::sources::EnvSource;
///
/// // ${env:db.host} -> APP_DB__HOST
/// let source = EnvSource::new().with_prefix("APP", "__");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    prefix: Option<String>,
    separator: Option<String>,
}

impl EnvSource {
    /// Create a source reading variables by their plain name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read variables as `{prefix}_{key}`, with `.` in the key replaced by
    /// `separator`.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Prefix for environment variables (e.g., "APP")
    /// * `separator` - Separator for nested keys (e.g., "__" for APP_DB__HOST)
    pub fn with_prefix(mut self, prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self.separator = Some(separator.into());
        self
    }

    /// The variable name a key is looked up under, before upper-casing.
    fn variable_name(&self, key: &str) -> String {
        let key = match &self.separator {
            Some(separator) => key.replace('.', separator),
            None => key.to_string(),
        };
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix, key),
            None => key,
        }
    }
}

impl ConfigSource for EnvSource {
    fn lookup(&self, key: &str) -> Option<Value> {
        let name = self.variable_name(key);
        std::env::var(&name)
            .or_else(|_| std::env::var(name.to_uppercase()))
            .ok()
            .map(|raw| Value::new(None, ValueKind::String(raw)))
    }

    fn name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("env:{}*", prefix),
            None => "env".to_string(),
        }
    }
}
