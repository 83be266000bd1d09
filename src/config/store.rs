//! Configuration stores keyed by namespace and key.

use std::collections::{BTreeMap, BTreeSet};

use super::entry::ConfigEntry;

/// A read-only mapping from `(namespace, key)` to a raw [`ConfigEntry`].
pub trait ConfigStore: Send + Sync + std::fmt::Debug {
    /// Returns a fresh copy of the entry, or `None` if the key is absent.
    fn get(&self, namespace: &str, key: &str) -> Option<ConfigEntry>;

    /// All keys stored under `namespace`.
    fn keys(&self, namespace: &str) -> BTreeSet<String>;

    fn contains(&self, namespace: &str, key: &str) -> bool {
        self.keys(namespace).contains(key)
    }
}

/// An in-memory store populated by the host before lookups begin.
///
/// ## Example
///
/// ```
/// use deferred_env::config::{ConfigEntry, ConfigStore, MemoryStore};
///
/// let table: toml::Table = toml::from_str(r#"
///     harcoded_value = "Some hardcoded value"
///     system_env = ["system", "MY_ENV"]
/// "#).unwrap();
///
/// let store = MemoryStore::new()
///     .with_table("app", table)
///     .with_entry("app", "port", ConfigEntry::env_or("PORT", "4000"));
///
/// assert_eq!(store.get("app", "system_env"), Some(ConfigEntry::env("MY_ENV")));
/// assert!(store.contains("app", "port"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    namespaces: BTreeMap<String, BTreeMap<String, ConfigEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `entry` under `(namespace, key)`, replacing any previous entry.
    pub fn with_entry(
        mut self,
        namespace: impl Into<String>,
        key: impl Into<String>,
        entry: impl Into<ConfigEntry>,
    ) -> Self {
        self.insert(namespace, key, entry);
        self
    }

    /// Stores every top-level key of `table` under `namespace`.
    ///
    /// Values are classified once here; see [`ConfigEntry`]'s `From<toml::Value>`.
    pub fn with_table(mut self, namespace: impl Into<String>, table: toml::Table) -> Self {
        let entries = self.namespaces.entry(namespace.into()).or_default();
        for (key, value) in table {
            entries.insert(key, ConfigEntry::from(value));
        }
        self
    }

    pub fn insert(
        &mut self,
        namespace: impl Into<String>,
        key: impl Into<String>,
        entry: impl Into<ConfigEntry>,
    ) {
        self.namespaces
            .entry(namespace.into())
            .or_default()
            .insert(key.into(), entry.into());
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, namespace: &str, key: &str) -> Option<ConfigEntry> {
        self.namespaces.get(namespace)?.get(key).cloned()
    }

    fn keys(&self, namespace: &str) -> BTreeSet<String> {
        self.namespaces
            .get(namespace)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn contains(&self, namespace: &str, key: &str) -> bool {
        self.namespaces
            .get(namespace)
            .is_some_and(|entries| entries.contains_key(key))
    }
}
