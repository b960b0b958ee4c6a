//! Utility helpers: document codecs and file loading.
pub mod serialization;

pub use serialization::codec_for_path;
pub use serialization::DocumentCodec;
pub use serialization::FileUtils;
pub use serialization::JsonCodec;
pub use serialization::YamlCodec;
