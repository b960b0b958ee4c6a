#![allow(clippy::result_large_err)] // Transform pipeline returns AppError for structured diagnostics.

use crate::core::config::TransformerConfig;
use crate::core::error::AppError;
use crate::core::manifest::Node;

mod colocation;
mod jobs;
mod pipeline;
mod properties;

pub use colocation::{CC_BRIDGE_PREFIX, CELL_PREFIX, COLOCATED_PREFIX};
pub use jobs::{ACCEPTANCE_JOB_NAME, DB_JOB_NAME};
pub use pipeline::step_names;
pub use properties::ACCEPTANCE_PROPERTIES_KEY;

/// Release the grafted jobs ship in.
pub const SUBSYSTEM_RELEASE: &str = "ducati";

/// Caller supplied values the pipeline reads but never owns.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformInputs<'a> {
    /// Acceptance test configuration, attached verbatim under
    /// `properties.acceptance-with-cf`.
    pub acceptance_config: Option<&'a Node>,
    /// Domain suffix connet registers its route under.
    pub system_domain: Option<&'a str>,
}

/// Grafts ducati onto a Diego manifest.
///
/// The transformer holds configuration only; every call to [`Transformer::transform`]
/// works on the document it is handed and keeps nothing between runs.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    config: TransformerConfig,
}

impl Transformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TransformerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    /// Run every step in order against `manifest`, stopping at the first failure.
    ///
    /// Steps that completed before the failure keep their changes. Appends are
    /// not deduplicated, so running twice on the same document duplicates the
    /// grafted entries.
    pub fn transform(
        &self,
        manifest: &mut Node,
        inputs: &TransformInputs<'_>,
    ) -> Result<(), AppError> {
        pipeline::run(self, manifest, inputs)
    }
}
