// Opaque, language-specific tags attached to nodes and members.
// Values are a closed set of variants so equality, ordering and hashing stay
// structural; an attribute set is compared as a set.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single tag value ("this member is public", "custom serializer = Foo", ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttributeValue {
    /// Bare marker: `public`, `sealed`
    Flag(String),
    /// Keyed string payload: `serializer = "Foo"`
    Text { key: String, value: String },
    /// Keyed integer payload: `order = 3`
    Int { key: String, value: i64 },
    /// Keyed boolean payload: `nullable = true`
    Bool { key: String, value: bool },
    /// Named record of nested attribute values
    Structured {
        kind: String,
        fields: BTreeMap<String, AttributeValue>,
    },
}

impl AttributeValue {
    pub fn flag(name: impl Into<String>) -> Self {
        Self::Flag(name.into())
    }

    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::Int {
            key: key.into(),
            value,
        }
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::Bool {
            key: key.into(),
            value,
        }
    }

    pub fn structured<I, K>(kind: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, AttributeValue)>,
        K: Into<String>,
    {
        Self::Structured {
            kind: kind.into(),
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// The name a pattern refers to this attribute by: the flag name, the key,
    /// or the structured kind.
    pub fn key(&self) -> &str {
        match self {
            AttributeValue::Flag(name) => name,
            AttributeValue::Text { key, .. }
            | AttributeValue::Int { key, .. }
            | AttributeValue::Bool { key, .. } => key,
            AttributeValue::Structured { kind, .. } => kind,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Flag(name) => write!(f, "{name}"),
            AttributeValue::Text { key, value } => write!(f, "{key} = {value:?}"),
            AttributeValue::Int { key, value } => write!(f, "{key} = {value}"),
            AttributeValue::Bool { key, value } => write!(f, "{key} = {value}"),
            AttributeValue::Structured { kind, fields } => {
                write!(f, "{kind}(")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Set of attribute values; duplicates collapse and order is irrelevant
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSet {
    values: BTreeSet<AttributeValue>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if an equal value was already present
    pub fn insert(&mut self, value: AttributeValue) -> bool {
        self.values.insert(value)
    }

    pub fn remove(&mut self, value: &AttributeValue) -> bool {
        self.values.remove(value)
    }

    /// Remove every value whose [`AttributeValue::key`] equals `key`
    pub fn remove_key(&mut self, key: &str) -> usize {
        let before = self.values.len();
        self.values.retain(|value| value.key() != key);
        before - self.values.len()
    }

    pub fn contains(&self, value: &AttributeValue) -> bool {
        self.values.contains(value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.iter().any(|value| value.key() == key)
    }

    /// First value (in set order) carrying `key`
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.values.iter().find(|value| value.key() == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeValue> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl FromIterator<AttributeValue> for AttributeSet {
    fn from_iter<T: IntoIterator<Item = AttributeValue>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl Extend<AttributeValue> for AttributeSet {
    fn extend<T: IntoIterator<Item = AttributeValue>>(&mut self, iter: T) {
        self.values.extend(iter);
    }
}

impl IntoIterator for AttributeSet {
    type Item = AttributeValue;
    type IntoIter = std::collections::btree_set::IntoIter<AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a AttributeValue;
    type IntoIter = std::collections::btree_set::Iter<'a, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "]")
    }
}
