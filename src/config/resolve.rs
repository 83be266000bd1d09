//! Resolution of raw entries into values.
//!
//! Any entry may be environment indirection, at any depth inside a mapping.
//! Resolution walks the entry once, reading the environment once per
//! reference reached, and stops at the first failure.

use std::collections::BTreeMap;

use super::entry::{ConfigEntry, Value};
use super::env::Environment;
use super::phase::BuildPhase;
use super::ResolveError;

/// Outcome of resolving one configuration lookup.
pub type Resolution = Result<Value, ResolveError>;

/// Resolves the entry stored under `(namespace, key)`.
///
/// `entry` is `None` when the store holds nothing for the key; the caller
/// `default` is then returned, or [`ResolveError::MissingConfig`] if there is
/// none. A stored [`Value::Nil`] is a present value and never falls back.
pub fn resolve(
    entry: Option<&ConfigEntry>,
    namespace: &str,
    key: &str,
    default: Option<&Value>,
    env: &dyn Environment,
    phase: &dyn BuildPhase,
) -> Resolution {
    match entry {
        Some(entry) => resolve_entry(entry, default, env, phase),
        None => match default {
            Some(default) => {
                tracing::debug!(namespace, key, "config key absent, using caller default");
                Ok(default.clone())
            }
            None => Err(ResolveError::MissingConfig {
                namespace: namespace.to_string(),
                key: key.to_string(),
            }),
        },
    }
}

/// Resolves a present entry.
///
/// `default` applies to every env reference reached without its own fallback,
/// including those nested inside mappings.
pub fn resolve_entry(
    entry: &ConfigEntry,
    default: Option<&Value>,
    env: &dyn Environment,
    phase: &dyn BuildPhase,
) -> Resolution {
    match entry {
        ConfigEntry::Literal(value) => Ok(value.clone()),
        ConfigEntry::EnvRefWithDefault(var, fallback) => {
            resolve_env(var, Some(fallback), env, phase)
        }
        ConfigEntry::EnvRef(var) => resolve_env(var, default, env, phase),
        ConfigEntry::OrderedMapping(pairs) => {
            let mut resolved = Vec::with_capacity(pairs.len());
            for (key, value) in pairs {
                resolved.push((key.clone(), resolve_entry(value, default, env, phase)?));
            }
            Ok(Value::OrderedMap(resolved))
        }
        ConfigEntry::UnorderedMapping(map) => {
            let mut resolved = BTreeMap::new();
            for (key, value) in map {
                resolved.insert(key.clone(), resolve_entry(value, default, env, phase)?);
            }
            Ok(Value::Map(resolved))
        }
    }
}

/// Reads `var`, unless the build phase forbids it.
///
/// The phase check comes first: a default never excuses a build-time read.
fn resolve_env(
    var: &str,
    default: Option<&Value>,
    env: &dyn Environment,
    phase: &dyn BuildPhase,
) -> Resolution {
    if !phase.env_allowed() {
        tracing::debug!(var, "env reference refused during build phase");
        return Err(ResolveError::EnvAtBuildTime(var.to_string()));
    }

    match env.var(var) {
        Some(value) => {
            tracing::trace!(var, "env reference resolved");
            Ok(Value::String(value))
        }
        None => match default {
            Some(default) => {
                tracing::debug!(var, "env variable unset, using default");
                Ok(default.clone())
            }
            None => Err(ResolveError::MissingEnvVar(var.to_string())),
        },
    }
}
