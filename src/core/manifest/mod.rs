//! Loosely typed manifest documents and the access layer the pipeline mutates them through.

pub mod access;
pub mod collections;
pub mod node;

pub use access::Mapping;
pub use node::{AnyMap, Key, Node, StrMap};
