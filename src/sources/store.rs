//! In-memory key-value store addressed by dotted keys.

use super::ConfigSource;
use config::{Map, Value, ValueKind};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// A tree of configuration values addressed by dotted keys.
///
/// Nested tables are reached by joining segments with `.`: the key
/// `server.port` names the `port` entry of the `server` table. There is no
/// escaping for dots inside a segment.
///
/// Keys are case-insensitive. Every segment is stored lowercased, which is
/// also how file loading hands keys over, so `Server.Port` and `server.port`
/// address the same entry and [`keys`](Self::keys) reports lowercase paths.
///
/// # Examples
///
/// ```rust
/// use xref_config::sources::Store;
///
/// let store = Store::new()
///     .with("server.port", 8080)
///     .with("server.host", "localhost");
///
/// assert!(store.contains("server.port"));
/// assert_eq!(store.keys(), vec!["server.host", "server.port"]);
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    root: Value,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::from_map(Map::new())
    }

    /// Create a store from an already parsed table.
    ///
    /// Table keys at every depth are lowercased. When two keys differ only in
    /// case their subtrees are merged.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self {
            root: Value::new(None, ValueKind::Table(lowercase_table(map))),
        }
    }

    /// Set a value and return the store, for building fixtures inline.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Get the value stored at `key`.
    ///
    /// The empty key addresses the root table.
    pub fn get(&self, key: &str) -> Option<&Value> {
        if key.is_empty() {
            return Some(&self.root);
        }
        let mut current = &self.root;
        for segment in key.split('.') {
            match &current.kind {
                ValueKind::Table(table) => current = table.get(&segment.to_lowercase())?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Whether a non-nil value is stored at `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key)
            .is_some_and(|value| !matches!(value.kind, ValueKind::Nil))
    }

    /// Store `value` at `key`, overwriting whatever was there.
    ///
    /// Missing intermediate tables are created. An intermediate segment that
    /// holds a scalar is replaced by a table.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        let value = normalize(value.into());
        let mut segments: Vec<String> = key.split('.').map(str::to_lowercase).collect();
        let last = segments.pop().unwrap_or_default();

        let mut current = &mut self.root;
        for segment in segments {
            current = as_table_mut(current)
                .entry(segment)
                .or_insert_with(empty_table);
        }
        as_table_mut(current).insert(last, value);
    }

    /// Store `value` at `key` only when nothing is there yet.
    ///
    /// Returns `true` if the value was written.
    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) -> bool {
        if self.contains(key) {
            return false;
        }
        self.set(key, value);
        true
    }

    /// All leaf keys in the store, sorted.
    ///
    /// Tables are descended into; arrays and scalars are leaves.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if let ValueKind::Table(table) = &self.root.kind {
            collect_keys(table, "", &mut keys);
        }
        keys.sort();
        keys
    }

    /// Deep-merge `other` into this store. Leaves from `other` win.
    ///
    /// Both stores hold lowercased keys, so entries differing only in case
    /// land on the same slot.
    pub fn merge(&mut self, other: Store) {
        merge_value(&mut self.root, other.root);
    }

    /// Whether the store holds no keys at all.
    pub fn is_empty(&self) -> bool {
        matches!(&self.root.kind, ValueKind::Table(table) if table.is_empty())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Map<String, Value>> for Store {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_map(map)
    }
}

impl ConfigSource for Store {
    fn lookup(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }

    fn name(&self) -> String {
        "memory".to_string()
    }
}

fn empty_table() -> Value {
    Value::new(None, ValueKind::Table(Map::new()))
}

fn as_table_mut(value: &mut Value) -> &mut Map<String, Value> {
    if !matches!(value.kind, ValueKind::Table(_)) {
        value.kind = ValueKind::Table(Map::new());
    }
    match &mut value.kind {
        ValueKind::Table(table) => table,
        _ => unreachable!("value was just replaced by a table"),
    }
}

fn lowercase_table(table: Map<String, Value>) -> Map<String, Value> {
    let mut lowered: Map<String, Value> = Map::new();
    for (key, value) in table {
        let value = normalize(value);
        match lowered.get_mut(&key.to_lowercase()) {
            Some(existing) => merge_value(existing, value),
            None => {
                lowered.insert(key.to_lowercase(), value);
            }
        }
    }
    lowered
}

/// Lowercase the keys of `value` if it is a table. Arrays are left as given.
fn normalize(mut value: Value) -> Value {
    if let ValueKind::Table(table) = value.kind {
        value.kind = ValueKind::Table(lowercase_table(table));
    }
    value
}

fn collect_keys(table: &Map<String, Value>, prefix: &str, keys: &mut Vec<String>) {
    for (segment, value) in table {
        let key = if prefix.is_empty() {
            segment.clone()
        } else {
            format!("{}.{}", prefix, segment)
        };
        match &value.kind {
            ValueKind::Table(nested) => collect_keys(nested, &key, keys),
            _ => keys.push(key),
        }
    }
}

fn merge_value(target: &mut Value, source: Value) {
    match source.kind {
        ValueKind::Table(incoming) => match &mut target.kind {
            ValueKind::Table(existing) => {
                for (key, value) in incoming {
                    match existing.get_mut(&key) {
                        Some(slot) => merge_value(slot, value),
                        None => {
                            existing.insert(key, value);
                        }
                    }
                }
            }
            _ => target.kind = ValueKind::Table(incoming),
        },
        kind => target.kind = kind,
    }
}

/// A [`Store`] shared between a [`Config`](crate::core::Config), every prefix
/// view derived from it, and the reserved `this` source.
///
/// Writers take the lock exclusively, so a `set` is never observed half-done.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<Store>>,
}

impl SharedStore {
    /// Wrap a store for sharing.
    pub fn new(store: Store) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Acquire shared read access.
    pub fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.inner.read()
    }

    /// Acquire exclusive write access.
    pub fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.inner.write()
    }

    /// Whether two handles point at the same underlying store.
    pub fn ptr_eq(&self, other: &SharedStore) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl ConfigSource for SharedStore {
    fn lookup(&self, key: &str) -> Option<Value> {
        self.read().get(key).cloned()
    }

    fn name(&self) -> String {
        "this".to_string()
    }
}
