//! League of Legends win predictor
//!
//! Trains a standardized logistic-regression classifier on per-match
//! statistics and serves win probabilities over HTTP.
//!
//! # Modules
//!
//! - [`data`] - CSV loading and canonical feature order
//! - [`preprocessing`] - Feature scaling
//! - [`training`] - Pipeline construction, L-BFGS fit, held-out metrics
//! - [`artifacts`] - Pipeline + metadata persistence
//! - [`server`] - HTTP prediction service
//! - [`cli`] - Command-line entry points for both executables

pub mod error;

pub mod artifacts;
pub mod cli;
pub mod data;
pub mod preprocessing;
pub mod server;
pub mod training;

pub use artifacts::{load_artifacts, save_artifacts, Metadata};
pub use data::{load_dataset, Dataset};
pub use error::{PredictorError, Result};
pub use training::{build_pipeline, train, ModelMetrics, TrainingConfig, WinPipeline};

/// Probability at or above which a match is predicted as a win.
pub const DECISION_THRESHOLD: f64 = 0.5;
