//! Persisted training artifacts
//!
//! A training run writes two files into the artifact directory: the bincode
//! pipeline and a JSON metadata document. The service trusts the metadata's
//! `feature_order` to rebuild input rows, so the two are loaded and checked
//! together.

use crate::error::{PredictorError, Result};
use crate::training::{ModelMetrics, WinPipeline};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const PIPELINE_FILE: &str = "lol_win_pipeline.bin";
pub const METADATA_FILE: &str = "metadata.json";

/// Metadata written next to the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub feature_order: Vec<String>,
    pub target: String,
    pub test_metrics: ModelMetrics,
}

/// Locations of a written artifact pair
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub pipeline: PathBuf,
    pub metadata: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(artifact_dir: impl AsRef<Path>) -> Self {
        let dir = artifact_dir.as_ref();
        Self {
            pipeline: dir.join(PIPELINE_FILE),
            metadata: dir.join(METADATA_FILE),
        }
    }
}

/// Write the fitted pipeline and its metadata, creating the directory if needed.
pub fn save_artifacts(
    pipeline: &WinPipeline,
    metrics: &ModelMetrics,
    features: &[String],
    target: &str,
    artifact_dir: impl AsRef<Path>,
) -> Result<ArtifactPaths> {
    let artifact_dir = artifact_dir.as_ref();
    std::fs::create_dir_all(artifact_dir)?;

    let paths = ArtifactPaths::in_dir(artifact_dir);
    pipeline.save(&paths.pipeline)?;

    let metadata = Metadata {
        feature_order: features.to_vec(),
        target: target.to_string(),
        test_metrics: *metrics,
    };
    std::fs::write(&paths.metadata, serde_json::to_string_pretty(&metadata)?)?;

    info!(
        pipeline = %paths.pipeline.display(),
        metadata = %paths.metadata.display(),
        "Saved artifacts"
    );
    Ok(paths)
}

pub fn load_metadata(path: impl AsRef<Path>) -> Result<Metadata> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Load the artifact pair written by [`save_artifacts`].
///
/// Fails if either file is missing, or if the pipeline was fitted on a
/// different feature order than the metadata describes.
pub fn load_artifacts(artifact_dir: impl AsRef<Path>) -> Result<(WinPipeline, Metadata)> {
    let artifact_dir = artifact_dir.as_ref();
    let paths = ArtifactPaths::in_dir(artifact_dir);
    if !paths.pipeline.exists() || !paths.metadata.exists() {
        return Err(PredictorError::ArtifactsNotFound(artifact_dir.to_path_buf()));
    }

    let pipeline = WinPipeline::load(&paths.pipeline)?;
    let metadata = load_metadata(&paths.metadata)?;

    if !pipeline.is_fitted() {
        return Err(PredictorError::ModelNotFitted);
    }
    if pipeline.feature_order != metadata.feature_order {
        return Err(PredictorError::ArtifactMismatch(format!(
            "pipeline was fitted on {:?} but metadata lists {:?}",
            pipeline.feature_order, metadata.feature_order
        )));
    }

    Ok((pipeline, metadata))
}
