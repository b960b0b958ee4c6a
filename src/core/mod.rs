pub mod config;
pub mod error;
pub mod manifest;
pub mod transform;
pub mod types;

pub use config::{ConfigLoader, ConfigValidator, TransformerConfig};
pub use error::{AppError, DocumentError};
pub use manifest::Node;
pub use transform::{TransformInputs, Transformer};
pub use types::{ErrorCategory, TemplateRef};
