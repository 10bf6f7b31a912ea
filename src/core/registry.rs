//! Named reference sources.

use crate::sources::{ConfigSource, EnvSource, SharedStore};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Mapping from logical name to the source a `${name:key}` reference reads.
///
/// Two names are reserved and always present: [`THIS`](Self::THIS) is the
/// primary store of the owning [`Config`](crate::core::Config) and
/// [`ENV`](Self::ENV) is the process environment. Caller sources registered
/// under either name are dropped with a warning; the reserved binding wins.
#[derive(Clone)]
pub struct SourceRegistry {
    sources: HashMap<String, Arc<dyn ConfigSource>>,
}

impl SourceRegistry {
    /// Reserved name of the primary store.
    pub const THIS: &'static str = "this";
    /// Reserved name of the environment source.
    pub const ENV: &'static str = "env";

    pub(crate) fn new<I>(primary: SharedStore, env: EnvSource, references: I) -> Self
    where
        I: IntoIterator<Item = (String, Arc<dyn ConfigSource>)>,
    {
        let mut sources: HashMap<String, Arc<dyn ConfigSource>> = HashMap::new();

        for (name, source) in references {
            if Self::is_reserved(&name) {
                tracing::warn!(
                    source = %name,
                    "ignoring caller-supplied source with a reserved name"
                );
                continue;
            }
            sources.insert(name, source);
        }

        sources.insert(Self::THIS.to_string(), Arc::new(primary));
        sources.insert(Self::ENV.to_string(), Arc::new(env));

        Self { sources }
    }

    /// Whether `name` is one of the reserved source names.
    pub fn is_reserved(name: &str) -> bool {
        name == Self::THIS || name == Self::ENV
    }

    /// Get the source registered under `name`.
    pub fn get(&self, name: &str) -> Option<&dyn ConfigSource> {
        self.sources.get(name).map(|source| &**source)
    }

    /// Whether a source is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("sources", &self.names())
            .finish()
    }
}
