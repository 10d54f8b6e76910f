use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A field value of a version record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A scalar with quotes stripped. Empty when the field had no value.
    Scalar(String),
    /// A sequence of scalars, e.g. `keywords`, `urls` or `maintainers`.
    Sequence(Vec<String>),
}

impl Value {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::Sequence(_) => None,
        }
    }

    #[must_use]
    pub fn as_sequence(&self) -> Option<&[String]> {
        match self {
            Self::Scalar(_) => None,
            Self::Sequence(items) => Some(items),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(s) => s.is_empty(),
            Self::Sequence(items) => items.is_empty(),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl<S: Into<String>> From<Vec<S>> for Value {
    fn from(items: Vec<S>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

/// Metadata of one released version of a chart.
///
/// Only fields present in the index are stored. Defaults for missing fields
/// are the consumer's business.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionRecord {
    fields: BTreeMap<String, Value>,
}

impl VersionRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The scalar value of `key`, if present and not a sequence.
    #[must_use]
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// The sequence value of `key`, if present and not a scalar.
    #[must_use]
    pub fn sequence(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(Value::as_sequence)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for VersionRecord
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parsed repository index: chart name to its version records.
///
/// Records keep the order of the index, which lists the newest version first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub entries: BTreeMap<String, Vec<VersionRecord>>,
}

impl Document {
    #[must_use]
    pub fn chart(&self, name: &str) -> Option<&[VersionRecord]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// The first record listed for `name`.
    #[must_use]
    pub fn latest(&self, name: &str) -> Option<&VersionRecord> {
        self.entries.get(name).and_then(|versions| versions.first())
    }

    pub fn charts(&self) -> impl Iterator<Item = (&str, &[VersionRecord])> {
        self.entries
            .iter()
            .map(|(name, versions)| (name.as_str(), versions.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
