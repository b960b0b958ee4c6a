use crate::core::error::DocumentError;
use indexmap::IndexMap;
use serde_yaml::{Mapping as YamlMapping, Number, Value};
use std::fmt;

/// Mapping keyed by plain strings. New subtrees built by the pipeline use this shape.
pub type StrMap = IndexMap<String, Node>;

/// Mapping keyed by arbitrary scalars. The YAML decoder produces this shape.
pub type AnyMap = IndexMap<Key, Node>;

/// Scalar usable as a key of an [`AnyMap`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Null => write!(f, "~"),
            Key::Bool(value) => write!(f, "{}", value),
            Key::Int(value) => write!(f, "{}", value),
            Key::Str(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(value.to_string())
    }
}

/// A loosely typed manifest node.
///
/// Any position in a manifest may hold any variant at runtime; callers go
/// through [`crate::core::manifest::access`] rather than matching on the two
/// mapping variants themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<Node>),
    Map(StrMap),
    AnyMap(AnyMap),
}

impl Node {
    /// Empty string-keyed mapping.
    pub fn map() -> Node {
        Node::Map(StrMap::new())
    }

    /// String-keyed mapping built from `(key, value)` pairs in order.
    pub fn map_of<I, K>(entries: I) -> Node
    where
        I: IntoIterator<Item = (K, Node)>,
        K: Into<String>,
    {
        Node::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    pub fn seq_of<I>(items: I) -> Node
    where
        I: IntoIterator<Item = Node>,
    {
        Node::Seq(items.into_iter().collect())
    }

    /// Human readable name of the variant, used in type mismatch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "bool",
            Node::Int(_) => "integer",
            Node::Float(_) => "float",
            Node::Str(_) => "string",
            Node::Seq(_) => "sequence",
            Node::Map(_) => "string-keyed mapping",
            Node::AnyMap(_) => "mapping",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_seq_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// Convert into the YAML value model for encoding.
    ///
    /// Both mapping variants become plain YAML mappings, so a document that went
    /// through the pipeline re-decodes to the same structure.
    pub fn to_yaml(&self) -> Value {
        match self {
            Node::Null => Value::Null,
            Node::Bool(value) => Value::Bool(*value),
            Node::Int(value) => Value::Number(Number::from(*value)),
            Node::Float(value) => Value::Number(Number::from(*value)),
            Node::Str(value) => Value::String(value.clone()),
            Node::Seq(items) => Value::Sequence(items.iter().map(Node::to_yaml).collect()),
            Node::Map(map) => {
                let mut out = YamlMapping::with_capacity(map.len());
                for (key, value) in map {
                    out.insert(Value::String(key.clone()), value.to_yaml());
                }
                Value::Mapping(out)
            }
            Node::AnyMap(map) => {
                let mut out = YamlMapping::with_capacity(map.len());
                for (key, value) in map {
                    out.insert(key_to_yaml(key), value.to_yaml());
                }
                Value::Mapping(out)
            }
        }
    }
}

fn key_to_yaml(key: &Key) -> Value {
    match key {
        Key::Null => Value::Null,
        Key::Bool(value) => Value::Bool(*value),
        Key::Int(value) => Value::Number(Number::from(*value)),
        Key::Str(value) => Value::String(value.clone()),
    }
}

fn key_from_yaml(value: Value) -> Result<Key, DocumentError> {
    match value {
        Value::Null => Ok(Key::Null),
        Value::Bool(flag) => Ok(Key::Bool(flag)),
        Value::String(text) => Ok(Key::Str(text)),
        Value::Number(number) => number
            .as_i64()
            .map(Key::Int)
            .ok_or_else(|| DocumentError::UnsupportedKey(number.to_string())),
        other => Err(DocumentError::UnsupportedKey(format!("{:?}", other))),
    }
}

impl TryFrom<Value> for Node {
    type Error = DocumentError;

    /// Decoded YAML mappings always become [`Node::AnyMap`].
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Node::Null),
            Value::Bool(flag) => Ok(Node::Bool(flag)),
            Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    Ok(Node::Int(int))
                } else {
                    Ok(Node::Float(number.as_f64().unwrap_or(f64::NAN)))
                }
            }
            Value::String(text) => Ok(Node::Str(text)),
            Value::Sequence(items) => items
                .into_iter()
                .map(Node::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Node::Seq),
            Value::Mapping(mapping) => {
                let mut out = AnyMap::with_capacity(mapping.len());
                for (key, value) in mapping {
                    out.insert(key_from_yaml(key)?, Node::try_from(value)?);
                }
                Ok(Node::AnyMap(out))
            }
            Value::Tagged(tagged) => Err(DocumentError::UnsupportedTag(tagged.tag.to_string())),
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Str(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Str(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Int(value)
    }
}

impl From<u32> for Node {
    fn from(value: u32) -> Self {
        Node::Int(i64::from(value))
    }
}

impl From<u16> for Node {
    fn from(value: u16) -> Self {
        Node::Int(i64::from(value))
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Seq(items)
    }
}
