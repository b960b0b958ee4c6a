//! Uniform key/value access over both mapping representations.
//!
//! Higher layers never match on [`Node::Map`] or [`Node::AnyMap`]; they call the
//! free functions here, which resolve a node to a [`Mapping`] trying the
//! string-keyed representation first.

use crate::core::error::DocumentError;
use crate::core::manifest::node::{AnyMap, Key, Node, StrMap};

/// Keyed access shared by every concrete mapping representation.
pub trait Mapping {
    fn lookup(&self, key: &str) -> Option<&Node>;
    fn lookup_mut(&mut self, key: &str) -> Option<&mut Node>;
    fn assign(&mut self, key: &str, value: Node);
}

impl Mapping for StrMap {
    fn lookup(&self, key: &str) -> Option<&Node> {
        self.get(key)
    }

    fn lookup_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.get_mut(key)
    }

    fn assign(&mut self, key: &str, value: Node) {
        self.insert(key.to_string(), value);
    }
}

impl Mapping for AnyMap {
    fn lookup(&self, key: &str) -> Option<&Node> {
        self.get(&Key::from(key))
    }

    fn lookup_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.get_mut(&Key::from(key))
    }

    fn assign(&mut self, key: &str, value: Node) {
        self.insert(Key::from(key), value);
    }
}

impl Node {
    pub fn as_mapping(&self) -> Option<&dyn Mapping> {
        match self {
            Node::Map(map) => Some(map),
            Node::AnyMap(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut dyn Mapping> {
        match self {
            Node::Map(map) => Some(map),
            Node::AnyMap(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_mapping(&self) -> bool {
        self.as_mapping().is_some()
    }
}

/// Look up `key`, distinguishing an absent key from a node that is not a mapping.
pub fn get<'a>(node: &'a Node, key: &str) -> Result<&'a Node, DocumentError> {
    let mapping = node
        .as_mapping()
        .ok_or(DocumentError::Unpack { found: node.kind() })?;
    mapping
        .lookup(key)
        .ok_or_else(|| DocumentError::MissingKey(key.to_string()))
}

pub fn get_mut<'a>(node: &'a mut Node, key: &str) -> Result<&'a mut Node, DocumentError> {
    let found = node.kind();
    let mapping = node
        .as_mapping_mut()
        .ok_or(DocumentError::Unpack { found })?;
    mapping
        .lookup_mut(key)
        .ok_or_else(|| DocumentError::MissingKey(key.to_string()))
}

pub fn set(node: &mut Node, key: &str, value: Node) -> Result<(), DocumentError> {
    let found = node.kind();
    let mapping = node
        .as_mapping_mut()
        .ok_or(DocumentError::Unpack { found })?;
    mapping.assign(key, value);
    Ok(())
}

/// Push `value` onto a sequence node.
///
/// # Panics
///
/// Panics when `node` is not a sequence. Appending to anything else is a bug in
/// the calling step, not a data problem; the pipeline guard reports it as an
/// aborted step.
pub fn append(node: &mut Node, value: Node) {
    match node {
        Node::Seq(items) => items.push(value),
        other => panic!("input type not sequence: {}", other.kind()),
    }
}

/// Look up `key` and require a string value.
pub fn get_str<'a>(node: &'a Node, key: &str) -> Result<&'a str, DocumentError> {
    let value = get(node, key)?;
    value.as_str().ok_or_else(|| DocumentError::NotString {
        key: key.to_string(),
        found: value.kind(),
    })
}

/// Look up `key` and require a sequence value.
pub fn get_seq<'a>(node: &'a Node, key: &str) -> Result<&'a Vec<Node>, DocumentError> {
    let value = get(node, key)?;
    value.as_seq().ok_or_else(|| DocumentError::NotSequence {
        key: key.to_string(),
        found: value.kind(),
    })
}

pub fn get_seq_mut<'a>(node: &'a mut Node, key: &str) -> Result<&'a mut Vec<Node>, DocumentError> {
    let value = get_mut(node, key)?;
    let found = value.kind();
    value.as_seq_mut().ok_or_else(|| DocumentError::NotSequence {
        key: key.to_string(),
        found,
    })
}

/// Follow a dotted path such as `properties.diego.nsync`.
///
/// Traversal stops at the first segment that is missing or sits under a
/// non-mapping node, and that segment's failure is returned.
pub fn walk<'a>(node: &'a Node, path: &str) -> Result<&'a Node, DocumentError> {
    path.split('.')
        .try_fold(node, |current, segment| get(current, segment))
}

pub fn walk_mut<'a>(node: &'a mut Node, path: &str) -> Result<&'a mut Node, DocumentError> {
    let mut current = node;
    for segment in path.split('.') {
        current = get_mut(current, segment)?;
    }
    Ok(current)
}
