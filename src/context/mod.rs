//! Lookup facade over a configuration store.

use std::fmt;

use crate::config::{
    resolve, resolve_entry, BuildPhase, ConfigStore, Environment, ProcessEnv, Resolution,
    ResolveError, Runtime, Value,
};
use crate::Error;

/// Resolves configuration values from a store at the moment they are asked for.
///
/// Every call reads the store and the environment afresh; nothing is cached.
///
/// ## Example
///
/// ```
/// use deferred_env::config::{ConfigEntry, MapEnv, MemoryStore, Value};
/// use deferred_env::Lookup;
///
/// let lookup = Lookup::builder()
///     .with_store(
///         MemoryStore::new()
///             .with_entry("app", "harcoded_value", ConfigEntry::literal("Some hardcoded value"))
///             .with_entry("app", "system_env", ConfigEntry::env("MY_ENV")),
///     )
///     .with_env(MapEnv::new().with_var("MY_ENV", "value 1"))
///     .build()?;
///
/// assert_eq!(lookup.get_config("app", "system_env", None), Ok(Value::from("value 1")));
/// assert_eq!(
///     lookup.get_config_or_raise("app", "harcoded_value", None),
///     Value::from("Some hardcoded value")
/// );
/// # Ok::<(), deferred_env::Error>(())
/// ```
pub struct Lookup<S> {
    store: S,
    env: Box<dyn Environment>,
    phase: Box<dyn BuildPhase>,
}

impl<S: fmt::Debug> fmt::Debug for Lookup<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lookup")
            .field("store", &self.store)
            .field("env", &self.env)
            .finish_non_exhaustive()
    }
}

impl<S: ConfigStore> Lookup<S> {
    /// Resolves `(namespace, key)`.
    ///
    /// `default` is used when the key is absent from the store, and for any
    /// env reference without its own fallback whose variable is unset.
    pub fn get_config(&self, namespace: &str, key: &str, default: Option<Value>) -> Resolution {
        tracing::trace!(namespace, key, "config lookup");
        let entry = self.store.get(namespace, key);
        resolve(
            entry.as_ref(),
            namespace,
            key,
            default.as_ref(),
            self.env.as_ref(),
            self.phase.as_ref(),
        )
    }

    /// Like [`get_config`](Self::get_config), but returns the value directly.
    ///
    /// # Panics
    ///
    /// Panics with the [`ResolveError`] message if the value cannot be resolved,
    /// e.g. `Missing ENV variable: 'MISSING_ENV'`. The payload is the message
    /// string; use [`fetch`](Self::fetch) to get the typed [`Error`] instead.
    pub fn get_config_or_raise(&self, namespace: &str, key: &str, default: Option<Value>) -> Value {
        match self.get_config(namespace, key, default) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }

    /// Like [`get_config`](Self::get_config), with the crate-level [`Error`]
    /// for `?` propagation.
    pub fn fetch(&self, namespace: &str, key: &str, default: Option<Value>) -> Result<Value, Error> {
        Ok(self.get_config(namespace, key, default)?)
    }

    /// Resolves every key stored under `namespace` into a [`Value::Map`].
    ///
    /// Keys are resolved in order and the first failure is returned. An
    /// unknown namespace yields an empty map.
    pub fn get_all_config(&self, namespace: &str) -> Resolution {
        let mut resolved = std::collections::BTreeMap::new();
        for key in self.store.keys(namespace) {
            let entry = self
                .store
                .get(namespace, &key)
                .ok_or_else(|| ResolveError::MissingConfig {
                    namespace: namespace.to_string(),
                    key: key.clone(),
                })?;
            let value = resolve_entry(&entry, None, self.env.as_ref(), self.phase.as_ref())?;
            resolved.insert(key, value);
        }
        Ok(Value::Map(resolved))
    }

    /// Whether the store holds an entry for `(namespace, key)`, even a nil one.
    pub fn has_key(&self, namespace: &str, key: &str) -> bool {
        self.store.contains(namespace, key)
    }
}

impl Lookup<()> {
    /// Creates a new builder for constructing a `Lookup`.
    pub fn builder() -> LookupBuilder<()> {
        LookupBuilder {
            store: None,
            env: None,
            phase: None,
        }
    }
}

/// Builder for constructing a [`Lookup`].
///
/// The builder starts with no store (`LookupBuilder<()>`) and transitions to
/// `LookupBuilder<S>` when [`with_store`](Self::with_store) is called. The
/// environment defaults to [`ProcessEnv`] and the build phase to [`Runtime`].
#[must_use = "builders do nothing until .build() is called"]
pub struct LookupBuilder<S> {
    store: Option<S>,
    env: Option<Box<dyn Environment>>,
    phase: Option<Box<dyn BuildPhase>>,
}

impl<S: fmt::Debug> fmt::Debug for LookupBuilder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupBuilder")
            .field("store", &self.store)
            .field("env", &self.env)
            .finish_non_exhaustive()
    }
}

impl LookupBuilder<()> {
    /// Attaches the store entries are read from.
    pub fn with_store<S: ConfigStore>(self, store: S) -> LookupBuilder<S> {
        LookupBuilder {
            store: Some(store),
            env: self.env,
            phase: self.phase,
        }
    }
}

impl<S> LookupBuilder<S> {
    pub fn with_env(mut self, env: impl Environment + 'static) -> Self {
        self.env = Some(Box::new(env));
        self
    }

    /// Sets the predicate deciding whether env references may be read.
    ///
    /// Accepts any `Fn() -> bool`, a [`BuildGate`](crate::config::BuildGate),
    /// or [`Runtime`].
    pub fn with_build_phase(mut self, phase: impl BuildPhase + 'static) -> Self {
        self.phase = Some(Box::new(phase));
        self
    }

    /// Builds the `Lookup`.
    ///
    /// Returns an error if no store was provided.
    pub fn build(self) -> Result<Lookup<S>, Error> {
        Ok(Lookup {
            store: self.store.ok_or(Error::MissingStore)?,
            env: self.env.unwrap_or_else(|| Box::new(ProcessEnv)),
            phase: self.phase.unwrap_or_else(|| Box::new(Runtime)),
        })
    }
}
