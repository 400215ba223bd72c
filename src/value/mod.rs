//! Dynamically shaped data addressed by field paths.
//!
//! [`Value`] is the closed set of shapes the walker understands: null,
//! scalars, sequences and string-keyed mappings. Mappings keep their insertion
//! order so walk results come out in document order.
//!
//! # Example
//!
//! ```
//! use fieldwalk::value::{Number, Value};
//! use indexmap::IndexMap;
//!
//! let mut user = IndexMap::new();
//! user.insert("name".to_string(), Value::from("Alice"));
//! user.insert("age".to_string(), Value::Number(Number::Integer(30)));
//! let value = Value::Mapping(user);
//!
//! assert!(value.is_mapping());
//! assert_eq!(value.get("name").and_then(Value::as_str), Some("Alice"));
//! ```

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Serialize;
use std::fmt;

/// Numbers are kept as integers when the source had no fractional part.
///
/// `Unsigned` only holds integers above `i64::MAX`; everything smaller is an
/// `Integer`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Unsigned(u64),
    Float(f64),
}

impl From<u64> for Number {
    fn from(u: u64) -> Self {
        match i64::try_from(u) {
            Ok(i) => Number::Integer(i),
            Err(_) => Number::Unsigned(u),
        }
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Unsigned(u) => write!(f, "{}", u),
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Unsigned(u) => *u as f64,
            Number::Float(f) => *f,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_) | Number::Unsigned(_))
    }
}

/// A dynamically typed value.
///
/// Deserializes from any self-describing serde format; both `serde_json` and
/// `serde_yaml` documents load directly into it. Scalar mapping keys such as
/// YAML's `200: ok` or `true: x` are stored as their string form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Value>),
    Mapping(IndexMap<String, Value>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    /// Returns true for sequences and mappings.
    pub fn is_container(&self) -> bool {
        self.is_mapping() || self.is_sequence()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up `key` if this is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Short name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON or YAML value")
    }

    fn visit_bool<E>(self, b: bool) -> Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E>(self, i: i64) -> Result<Value, E> {
        Ok(Value::Number(Number::Integer(i)))
    }

    fn visit_u64<E>(self, u: u64) -> Result<Value, E> {
        Ok(Value::Number(Number::from(u)))
    }

    fn visit_f64<E>(self, f: f64) -> Result<Value, E> {
        Ok(Value::Number(Number::Float(f)))
    }

    fn visit_str<E>(self, s: &str) -> Result<Value, E> {
        Ok(Value::String(s.to_string()))
    }

    fn visit_string<E>(self, s: String) -> Result<Value, E> {
        Ok(Value::String(s))
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(MapKey(key)) = map.next_key()? {
            let value = map.next_value()?;
            entries.insert(key, value);
        }
        Ok(Value::Mapping(entries))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

/// A mapping key in string form.
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MapKeyVisitor)
    }
}

struct MapKeyVisitor;

impl<'de> Visitor<'de> for MapKeyVisitor {
    type Value = MapKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar mapping key")
    }

    fn visit_bool<E>(self, b: bool) -> Result<MapKey, E> {
        Ok(MapKey(b.to_string()))
    }

    fn visit_i64<E>(self, i: i64) -> Result<MapKey, E> {
        Ok(MapKey(i.to_string()))
    }

    fn visit_u64<E>(self, u: u64) -> Result<MapKey, E> {
        Ok(MapKey(u.to_string()))
    }

    fn visit_f64<E>(self, f: f64) -> Result<MapKey, E> {
        Ok(MapKey(f.to_string()))
    }

    fn visit_str<E>(self, s: &str) -> Result<MapKey, E> {
        Ok(MapKey(s.to_string()))
    }

    fn visit_string<E>(self, s: String) -> Result<MapKey, E> {
        Ok(MapKey(s))
    }

    fn visit_unit<E>(self) -> Result<MapKey, E> {
        Ok(MapKey("null".to_string()))
    }

    fn visit_seq<A>(self, _seq: A) -> Result<MapKey, A::Error>
    where
        A: SeqAccess<'de>,
    {
        Err(de::Error::custom("sequence mapping keys are not supported"))
    }

    fn visit_map<A>(self, _map: A) -> Result<MapKey, A::Error>
    where
        A: MapAccess<'de>,
    {
        Err(de::Error::custom("mapping keys must be scalars"))
    }
}

impl std::fmt::Display for Value {
    /// Renders the value as compact JSON.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(std::fmt::Error),
        }
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
        Value::Number(Number::Integer(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(Number::Float(f))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Mapping(map)
    }
}
