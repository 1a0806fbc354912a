//! Application state management

use std::path::Path;

use crate::artifacts::{load_artifacts, Metadata};
use crate::error::Result;
use crate::training::WinPipeline;

use super::handlers::render_index;

/// Immutable context shared by every request.
///
/// Built once at startup from the artifact pair; handlers only read it, so
/// it is shared behind an `Arc` without locks.
pub struct AppState {
    pub pipeline: WinPipeline,
    pub metadata: Metadata,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
    index_html: String,
}

impl AppState {
    pub fn new(pipeline: WinPipeline, metadata: Metadata) -> Self {
        let index_html = render_index(&metadata);
        Self {
            pipeline,
            metadata,
            loaded_at: chrono::Utc::now(),
            index_html,
        }
    }

    /// Load the pipeline and metadata from `artifact_dir`.
    pub fn load(artifact_dir: impl AsRef<Path>) -> Result<Self> {
        let (pipeline, metadata) = load_artifacts(artifact_dir)?;
        Ok(Self::new(pipeline, metadata))
    }

    pub fn feature_order(&self) -> &[String] {
        &self.metadata.feature_order
    }

    pub fn index_html(&self) -> &str {
        &self.index_html
    }
}
