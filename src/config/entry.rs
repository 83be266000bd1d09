//! Raw configuration entries and the values they resolve to.

use std::collections::BTreeMap;

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Serialize, Serializer};

/// Tag marking a stored array as environment indirection.
pub const SYSTEM_TAG: &str = "system";

/// A fully resolved configuration value.
///
/// Deserializing never produces `OrderedMap`: maps come back as `Map`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    #[serde(serialize_with = "serialize_pairs")]
    OrderedMap(Vec<(String, Value)>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the string slice if this is a `Value::String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up `key` in either map shape.
    ///
    /// For ordered maps the first matching pair wins.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            Value::OrderedMap(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

fn serialize_pairs<S: Serializer>(pairs: &[(String, Value)], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(pairs.iter().map(|(k, v)| (k, v)))
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a configuration value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Nil)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Nil)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, i: i64) -> Result<Value, E> {
        Ok(Value::Integer(i))
    }

    fn visit_u64<E: de::Error>(self, u: u64) -> Result<Value, E> {
        i64::try_from(u)
            .map(Value::Integer)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(u), &"an integer within i64 range"))
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> Result<Value, E> {
        Ok(Value::Float(f))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Value, E> {
        Ok(Value::String(s.to_string()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Value, E> {
        Ok(Value::String(s))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            entries.insert(key, value);
        }
        Ok(Value::Map(entries))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}

/// Literal conversion: no indirection is recognized at this level.
impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Integer(i),
            toml::Value::Float(f) => Value::Float(f),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(arr) => Value::List(arr.into_iter().map(Value::from).collect()),
            toml::Value::Table(t) => {
                Value::Map(t.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// A raw value as held by a configuration store, before resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigEntry {
    Literal(Value),
    EnvRef(String),
    EnvRefWithDefault(String, Value),
    OrderedMapping(Vec<(String, ConfigEntry)>),
    UnorderedMapping(BTreeMap<String, ConfigEntry>),
}

impl ConfigEntry {
    pub fn literal(value: impl Into<Value>) -> Self {
        ConfigEntry::Literal(value.into())
    }

    /// Reads `var` from the environment at lookup time.
    pub fn env(var: impl Into<String>) -> Self {
        ConfigEntry::EnvRef(var.into())
    }

    /// Reads `var` from the environment, falling back to `fallback` when unset.
    pub fn env_or(var: impl Into<String>, fallback: impl Into<Value>) -> Self {
        ConfigEntry::EnvRefWithDefault(var.into(), fallback.into())
    }

    pub fn ordered<K: Into<String>>(pairs: impl IntoIterator<Item = (K, ConfigEntry)>) -> Self {
        ConfigEntry::OrderedMapping(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Builds an unordered mapping. Later duplicates replace earlier ones.
    pub fn unordered<K: Into<String>>(pairs: impl IntoIterator<Item = (K, ConfigEntry)>) -> Self {
        ConfigEntry::UnorderedMapping(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<Value> for ConfigEntry {
    fn from(value: Value) -> Self {
        ConfigEntry::Literal(value)
    }
}

/// Classifies a stored TOML value.
///
/// `["system", "VAR"]` and `["system", "VAR", fallback]` become env references,
/// tables become unordered mappings, and everything else is a literal.
impl From<toml::Value> for ConfigEntry {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::Array(arr) => match indirection(&arr) {
                Some(Indirection::Plain(var)) => ConfigEntry::EnvRef(var),
                Some(Indirection::WithDefault(var, fallback)) => {
                    ConfigEntry::EnvRefWithDefault(var, Value::from(fallback))
                }
                None => ConfigEntry::Literal(Value::from(toml::Value::Array(arr))),
            },
            toml::Value::Table(t) => ConfigEntry::UnorderedMapping(
                t.into_iter()
                    .map(|(k, v)| (k, ConfigEntry::from(v)))
                    .collect(),
            ),
            other => ConfigEntry::Literal(Value::from(other)),
        }
    }
}

enum Indirection {
    Plain(String),
    WithDefault(String, toml::Value),
}

fn indirection(arr: &[toml::Value]) -> Option<Indirection> {
    let (tag, var, rest) = match arr {
        [tag, var, rest @ ..] => (tag, var, rest),
        _ => return None,
    };
    if tag.as_str() != Some(SYSTEM_TAG) {
        return None;
    }
    let var = var.as_str()?.to_string();
    match rest {
        [] => Some(Indirection::Plain(var)),
        [fallback] => Some(Indirection::WithDefault(var, fallback.clone())),
        _ => None,
    }
}
