use crate::core::types::ErrorCategory;
use thiserror::Error;

/// Failures raised while reading or reshaping a manifest document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("map missing key {0}")]
    MissingKey(String),

    #[error("unable to unpack {found} as a mapping")]
    Unpack { found: &'static str },

    #[error("{key} is not a sequence (found {found})")]
    NotSequence { key: String, found: &'static str },

    #[error("{key} is not a string (found {found})")]
    NotString { key: String, found: &'static str },

    #[error("anchor job {anchor} not found: nowhere to place new job")]
    AnchorNotFound { anchor: String },

    #[error("network {0} not found")]
    MissingNetwork(String),

    #[error("invalid static ip range '{range}': {reason}")]
    InvalidStaticRange { range: String, reason: String },

    #[error("missing {0}")]
    MissingInput(&'static str),

    #[error("job {job}: {cause}")]
    InJob {
        job: String,
        cause: Box<DocumentError>,
    },

    #[error("unsupported mapping key {0}")]
    UnsupportedKey(String),

    #[error("unsupported tagged value {0}")]
    UnsupportedTag(String),
}

impl DocumentError {
    /// Attribute a failure to the named job group.
    pub fn in_job(job: impl Into<String>, cause: DocumentError) -> Self {
        DocumentError::InJob {
            job: job.into(),
            cause: Box::new(cause),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DocumentError::MissingKey(_)
            | DocumentError::MissingNetwork(_)
            | DocumentError::MissingInput(_) => ErrorCategory::StructuralAbsence,
            DocumentError::Unpack { .. }
            | DocumentError::NotSequence { .. }
            | DocumentError::NotString { .. }
            | DocumentError::InvalidStaticRange { .. }
            | DocumentError::UnsupportedKey(_)
            | DocumentError::UnsupportedTag(_) => ErrorCategory::TypeMismatch,
            DocumentError::AnchorNotFound { .. } => ErrorCategory::AnchorNotFound,
            DocumentError::InJob { cause, .. } => cause.category(),
        }
    }
}

/// Structured error surfaced by the transform pipeline and its callers.
///
/// `Display` renders a single human readable chain, `<message>: <cause>`, so an
/// outer layer can keep prefixing context without losing the inner failure.
#[derive(Debug)]
pub struct AppError {
    pub category: ErrorCategory,
    pub code: String,
    pub message: String,
    pub step: Option<String>,
    pub source: Option<anyhow::Error>,
}

impl AppError {
    pub fn new<T: Into<String>>(category: ErrorCategory, message: T) -> Self {
        AppError {
            category,
            code: default_code(category).to_string(),
            message: message.into(),
            step: None,
            source: None,
        }
    }

    pub fn with_source<T: Into<String>>(
        category: ErrorCategory,
        message: T,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        let mut error = AppError::new(category, message);
        error.source = Some(source.into());
        error
    }

    /// Wrap a document failure raised inside the named pipeline step.
    pub fn step_failed(step: &str, err: DocumentError) -> Self {
        AppError::with_source(err.category(), step, err).with_step(step)
    }

    /// Wrap a fault that aborted the named pipeline step.
    pub fn step_aborted<T: Into<String>>(step: &str, reason: T) -> Self {
        let reason = reason.into();
        AppError::with_source(
            ErrorCategory::InternalError,
            step,
            anyhow::anyhow!("step aborted: {}", reason),
        )
        .with_step(step)
    }

    pub fn with_step<T: Into<String>>(mut self, step: T) -> Self {
        self.step = Some(step.into());
        self
    }
}

fn default_code(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::StructuralAbsence => "DUC-DOC-001",
        ErrorCategory::TypeMismatch => "DUC-DOC-002",
        ErrorCategory::AnchorNotFound => "DUC-DOC-003",
        ErrorCategory::CallerInput => "DUC-IN-001",
        ErrorCategory::ConfigurationError => "DUC-CFG-001",
        ErrorCategory::SerializationError => "DUC-SER-001",
        ErrorCategory::IoError => "DUC-IO-001",
        ErrorCategory::InternalError => "DUC-INT-001",
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref source) = self.source {
            write!(f, ": {:#}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}
