//! Value model for filterable structures.
//!
//! A [`Value`] is either a primitive, a plain [`Object`] (an ordered
//! string-keyed mapping that the filter descends into), or an
//! [`OpaqueValue`] that the filter keeps or drops as a whole unit without
//! ever looking inside.
//!
//! JSON documents convert losslessly into this model: JSON arrays become
//! opaque sequences and JSON objects become [`Object`]s with their key order
//! preserved.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Number;

/// A value stored under a key of an [`Object`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Absent or null value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// String value.
    String(String),
    /// A plain container, eligible for recursive filtering.
    Object(Object),
    /// A container or scalar the filter never traverses.
    ///
    /// The payload is shared, so passing an opaque value through the filter
    /// never copies it.
    Opaque(Arc<OpaqueValue>),
}

/// Value kinds whose internals are never traversed or filtered.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum OpaqueValue {
    /// An ordered sequence (a JSON array).
    Seq(Vec<Value>),
    /// A set of unique values.
    Set(Vec<Value>),
    /// A dictionary with arbitrary keys, treated as an opaque hash map.
    Dict(Vec<(Value, Value)>),
    /// A point in time.
    DateTime(DateTime<Utc>),
    /// A fixed binary buffer.
    Bytes(Vec<u8>),
}

impl OpaqueValue {
    /// Short name of the opaque kind, used in diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Seq(_) => "seq",
            Self::Set(_) => "set",
            Self::Dict(_) => "dict",
            Self::DateTime(_) => "datetime",
            Self::Bytes(_) => "bytes",
        }
    }
}

impl Value {
    /// Build an opaque sequence.
    pub fn seq<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        OpaqueValue::Seq(items.into_iter().map(Into::into).collect()).into()
    }

    /// Build an opaque set. Duplicate items are dropped, keeping the first.
    pub fn set<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut unique: Vec<Value> = Vec::new();
        for item in items {
            let item = item.into();
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        OpaqueValue::Set(unique).into()
    }

    /// Build an opaque dictionary from key/value pairs.
    pub fn dict<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        OpaqueValue::Dict(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
        .into()
    }

    /// Build an opaque binary buffer.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        OpaqueValue::Bytes(bytes.into()).into()
    }

    /// Returns true for null, booleans, numbers and strings.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_)
        )
    }

    /// Returns true if this value is a plain [`Object`].
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Returns true if this value is an [`OpaqueValue`].
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        matches!(self, Self::Opaque(_))
    }

    /// Borrow the inner object, if this is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Consume the value, returning the inner object if this is one.
    #[must_use]
    pub fn into_object(self) -> Option<Object> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Borrow the inner opaque payload, if this is one.
    #[must_use]
    pub fn as_opaque(&self) -> Option<&OpaqueValue> {
        match self {
            Self::Opaque(opaque) => Some(opaque.as_ref()),
            _ => None,
        }
    }

    /// Borrow the inner string, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Convert into a `serde_json::Value`.
    ///
    /// Sets become arrays, dictionaries become arrays of `[key, value]`
    /// pairs, date/times become RFC 3339 strings and byte buffers become
    /// arrays of numbers.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Value::Number(n.clone()),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Object(object) => object.to_json(),
            Self::Opaque(opaque) => match opaque.as_ref() {
                OpaqueValue::Seq(items) | OpaqueValue::Set(items) => {
                    serde_json::Value::Array(items.iter().map(Self::to_json).collect())
                }
                OpaqueValue::Dict(pairs) => serde_json::Value::Array(
                    pairs
                        .iter()
                        .map(|(k, v)| serde_json::Value::Array(vec![k.to_json(), v.to_json()]))
                        .collect(),
                ),
                OpaqueValue::DateTime(dt) => serde_json::Value::String(format_datetime(dt)),
                OpaqueValue::Bytes(bytes) => {
                    serde_json::Value::Array(bytes.iter().map(|b| (*b).into()).collect())
                }
            },
        }
    }
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl From<OpaqueValue> for Value {
    fn from(opaque: OpaqueValue) -> Self {
        Self::Opaque(Arc::new(opaque))
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Self::Object(object)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        OpaqueValue::DateTime(dt).into()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

impl From<f64> for Value {
    /// Non-finite floats have no JSON representation and become `Null`.
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Self::Null, Self::Number)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => Self::seq(items),
            serde_json::Value::Object(map) => Self::Object(map.into_iter().collect()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Object(object) => object.serialize(serializer),
            Self::Opaque(opaque) => opaque.serialize(serializer),
        }
    }
}

impl Serialize for OpaqueValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Seq(items) | Self::Set(items) => serializer.collect_seq(items),
            Self::Dict(pairs) => serializer.collect_seq(pairs.iter().map(|(k, v)| [k, v])),
            Self::DateTime(dt) => serializer.serialize_str(&format_datetime(dt)),
            Self::Bytes(bytes) => serializer.collect_seq(bytes),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

/// An ordered mapping from string keys to [`Value`]s.
///
/// Keys are unique and keep their insertion order. Lookups are hashed.
/// Equality is order-sensitive.
#[derive(Debug, Clone, Default)]
pub struct Object {
    entries: IndexMap<String, Value>,
}

impl Object {
    /// Create an empty object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty object with room for `capacity` keys.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the object has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over key/value pairs in insertion order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter(self.entries.iter())
    }

    /// Look up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Look up a value by key, mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Returns true if the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert a value.
    ///
    /// An existing key keeps its position and its previous value is
    /// returned; a new key is appended.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove a key, shifting later keys down to keep their order.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Take the nested object stored under `key`, leaving an empty object
    /// in its place. Returns `None` if the key is absent or not an object.
    pub(crate) fn take_object(&mut self, key: &str) -> Option<Object> {
        match self.get_mut(key) {
            Some(Value::Object(object)) => Some(std::mem::take(object)),
            _ => None,
        }
    }

    /// Reorder the keys to follow their order in `source`. Keys absent from
    /// `source` move to the end.
    pub(crate) fn sort_like(&mut self, source: &Object) {
        let rank = |key: &str| source.entries.get_index_of(key).unwrap_or(usize::MAX);
        self.entries.sort_by(|a, _, b, _| rank(a).cmp(&rank(b)));
    }

    /// Convert into a `serde_json::Value` object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut object = Self::new();
        object.extend(iter);
        object
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Object {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over the entries of an [`Object`].
#[derive(Debug, Clone)]
pub struct Iter<'a>(indexmap::map::Iter<'a, String, Value>);

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (k.as_str(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl TryFrom<serde_json::Value> for Object {
    /// The converted value, handed back when it is not an object.
    type Error = Value;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match Value::from(value) {
            Value::Object(object) => Ok(object),
            other => Err(other),
        }
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for Object {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::try_from(value).map_err(|_| serde::de::Error::custom("expected a JSON object"))
    }
}
