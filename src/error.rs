//! Error types shared by the trainer and the prediction service

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Dataset not found at {}", .0.display())]
    DatasetNotFound(PathBuf),

    #[error("Dataset must contain a '{0}' target column")]
    MissingTarget(String),

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Model has not been fitted")]
    ModelNotFitted,

    #[error("Artifacts not found in {}. Run `train-win-model` to generate the trained pipeline.", .0.display())]
    ArtifactsNotFound(PathBuf),

    #[error("Artifact mismatch: {0}")]
    ArtifactMismatch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

pub type Result<T> = std::result::Result<T, PredictorError>;
