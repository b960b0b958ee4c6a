use crate::core::error::AppError;
use crate::core::manifest::{Key, Node};
use crate::core::types::ErrorCategory;
use anyhow::{Context, Result};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Converts between encoded bytes and manifest documents.
///
/// Malformed or unrepresentable content is reported as an [`AppError`] with
/// [`ErrorCategory::SerializationError`].
pub trait DocumentCodec {
    fn decode(&self, data: &[u8]) -> Result<Node>;
    fn encode(&self, document: &Node) -> Result<Vec<u8>>;
}

fn serialization_error(message: &str, source: impl Into<anyhow::Error>) -> anyhow::Error {
    AppError::with_source(ErrorCategory::SerializationError, message, source).into()
}

pub struct YamlCodec;

impl DocumentCodec for YamlCodec {
    fn decode(&self, data: &[u8]) -> Result<Node> {
        let value: Value = serde_yaml::from_slice(data)
            .map_err(|err| serialization_error("unmarshalling yaml", err))?;
        Node::try_from(value).map_err(|err| serialization_error("unsupported yaml content", err))
    }

    fn encode(&self, document: &Node) -> Result<Vec<u8>> {
        let text = serde_yaml::to_string(&document.to_yaml())
            .map_err(|err| serialization_error("re-marshalling yaml", err))?;
        Ok(text.into_bytes())
    }
}

/// JSON codec. Mapping keys must be non-null scalars and floats must be finite;
/// anything else is rejected rather than silently rewritten.
pub struct JsonCodec;

impl DocumentCodec for JsonCodec {
    fn decode(&self, data: &[u8]) -> Result<Node> {
        let value: Value = serde_json::from_slice(data)
            .map_err(|err| serialization_error("unmarshalling json", err))?;
        Node::try_from(value).map_err(|err| serialization_error("unsupported json content", err))
    }

    fn encode(&self, document: &Node) -> Result<Vec<u8>> {
        check_json_representable(document, "$")
            .map_err(|reason| serialization_error("marshalling json", anyhow::anyhow!(reason)))?;
        let mut bytes = serde_json::to_vec_pretty(&document.to_yaml())
            .map_err(|err| serialization_error("marshalling json", err))?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

fn check_json_representable(node: &Node, path: &str) -> std::result::Result<(), String> {
    match node {
        Node::Float(value) if !value.is_finite() => {
            Err(format!("{} holds {} which JSON cannot represent", path, value))
        }
        Node::Seq(items) => items.iter().enumerate().try_for_each(|(index, item)| {
            check_json_representable(item, &format!("{}[{}]", path, index))
        }),
        Node::Map(map) => map
            .iter()
            .try_for_each(|(key, value)| check_json_representable(value, &format!("{}.{}", path, key))),
        Node::AnyMap(map) => map.iter().try_for_each(|(key, value)| {
            if *key == Key::Null {
                return Err(format!("{} has a null mapping key ({})", path, key));
            }
            check_json_representable(value, &format!("{}.{}", path, key))
        }),
        _ => Ok(()),
    }
}

/// Codec for an input file: `.json` files are read as JSON, everything else as YAML.
pub fn codec_for_path(path: &Path) -> Box<dyn DocumentCodec> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Box::new(JsonCodec),
        _ => Box::new(YamlCodec),
    }
}

pub struct FileUtils;

impl FileUtils {
    /// Read and decode the document at `path`.
    pub fn load_document<C: DocumentCodec + ?Sized>(path: &Path, codec: &C) -> Result<Node> {
        let content =
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        codec
            .decode(&content)
            .with_context(|| format!("failed to decode {}", path.display()))
    }
}
