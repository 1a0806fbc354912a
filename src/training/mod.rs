//! Model training module
//!
//! Builds the scaler + logistic regression pipeline, splits the dataset
//! with a seeded stratified split and evaluates on the held-out rows.

mod config;
mod engine;
mod models;
pub mod linear_models;
pub mod pipeline;
pub mod split;

pub use config::TrainingConfig;
pub use engine::{build_pipeline, train, TrainOutcome};
pub use linear_models::{LogisticRegression, Penalty};
pub use models::{accuracy, roc_auc, ModelMetrics};
pub use pipeline::WinPipeline;
pub use split::{stratified_split, TrainTestSplit};
