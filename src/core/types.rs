use serde::{Deserialize, Serialize};

/// Error category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// A required key or path segment is missing.
    StructuralAbsence,
    /// A node has a different shape than the step expects.
    TypeMismatch,
    /// An anchored insertion found nothing to anchor on.
    AnchorNotFound,
    /// Arguments or input files supplied by the caller are unusable.
    CallerInput,
    ConfigurationError,
    SerializationError,
    IoError,
    InternalError,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A `{name, release}` pair naming a job template to colocate onto a job group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateRef {
    pub name: &'static str,
    pub release: &'static str,
}

impl TemplateRef {
    pub const fn new(name: &'static str, release: &'static str) -> Self {
        Self { name, release }
    }
}
