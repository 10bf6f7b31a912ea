//! Reference resolution over the primary store.

use crate::core::{Reference, SourceRegistry};
use crate::error::{ConfigError, Result};
use crate::sources::{ConfigSource, SharedStore};
use config::{Value, ValueKind};

/// Replace every reference token in `store` with the literal it points at.
///
/// Keys are enumerated once up front. Each reference is followed across the
/// registry until a non-reference value is reached, which is written back
/// under the original key. Returns the number of keys rewritten.
///
/// When a reference lands on a table, references among that table's entries
/// are followed too. Array elements are never resolved: a list such as
/// `["${other:h}"]` keeps its literal strings, whether it sits in the primary
/// store or inside a table a reference landed on.
///
/// # Errors
///
/// Fails on the first reference naming an unregistered source, a key missing
/// from its source, or a chain that revisits a `source:key` pair.
pub(crate) fn resolve_all(store: &SharedStore, registry: &SourceRegistry) -> Result<usize> {
    let keys = store.read().keys();
    let mut rewritten = 0;

    for key in keys {
        let Some(raw) = store.lookup(&key) else {
            continue;
        };
        let Some(reference) = Reference::parse(&raw) else {
            continue;
        };

        let mut chain = vec![hop(SourceRegistry::THIS, &key)];
        let value = follow(reference, registry, &mut chain)?;
        tracing::debug!(key = %key, via = %raw, "resolved reference");

        store.write().set(&key, value);
        rewritten += 1;
    }

    Ok(rewritten)
}

/// Follow `reference` until it lands on a literal.
///
/// `chain` holds every `source:key` visited so far; its last entry is the
/// referrer.
fn follow(reference: Reference, registry: &SourceRegistry, chain: &mut Vec<String>) -> Result<Value> {
    let mut current = reference;
    loop {
        let referrer = chain.last().cloned().unwrap_or_default();
        let next_hop = hop(current.source(), current.key());
        if chain.contains(&next_hop) {
            chain.push(next_hop);
            return Err(ConfigError::CircularReference {
                chain: std::mem::take(chain),
            });
        }
        chain.push(next_hop);

        let source = registry
            .get(current.source())
            .ok_or_else(|| ConfigError::SourceNotFound {
                source_name: current.source().to_string(),
                key: referrer,
            })?;

        let value = source
            .lookup(current.key())
            .filter(|value| !matches!(value.kind, ValueKind::Nil))
            .ok_or_else(|| ConfigError::ReferenceKeyNotFound {
                source_name: current.source().to_string(),
                key: current.key().to_string(),
            })?;

        match Reference::parse(&value) {
            Some(next) => current = next,
            None => return resolve_nested(value, registry, chain),
        }
    }
}

/// Resolve references inside a table that a reference landed on. Arrays are
/// returned as they are.
fn resolve_nested(mut value: Value, registry: &SourceRegistry, chain: &[String]) -> Result<Value> {
    if let ValueKind::Table(table) = &mut value.kind {
        for entry in table.values_mut() {
            let resolved = match Reference::parse(entry) {
                Some(reference) => follow(reference, registry, &mut chain.to_vec())?,
                None => resolve_nested(entry.clone(), registry, chain)?,
            };
            *entry = resolved;
        }
    }
    Ok(value)
}

fn hop(source: &str, key: &str) -> String {
    format!("{}:{}", source, key)
}
