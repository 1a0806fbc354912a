//! Training run: split, fit, evaluate

use super::linear_models::LogisticRegression;
use super::models::ModelMetrics;
use super::pipeline::WinPipeline;
use super::split::stratified_split;
use super::TrainingConfig;
use crate::data::Dataset;
use crate::error::{PredictorError, Result};
use crate::preprocessing::Scaler;
use std::time::Instant;
use tracing::info;

/// Result of a training run
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub pipeline: WinPipeline,
    pub metrics: ModelMetrics,
}

/// Untrained pipeline: standard scaler followed by an L-BFGS logistic regression.
pub fn build_pipeline(config: &TrainingConfig) -> WinPipeline {
    let model = LogisticRegression::new()
        .with_penalty(config.penalty)
        .with_c(config.c)
        .with_max_iter(config.max_iter)
        .with_tol(config.tol);
    WinPipeline::new(Scaler::standard(), model)
}

/// Fit the pipeline on a stratified training split and score it on the rest.
///
/// The split is seeded by `config.random_state` and sized by
/// `config.test_size`, so identical data and config give identical metrics.
pub fn train(dataset: &Dataset, config: &TrainingConfig) -> Result<TrainOutcome> {
    config.validate()?;
    let start = Instant::now();

    let (x, y) = dataset.to_arrays()?;
    let split = stratified_split(&y, config.test_size, config.random_state)?;
    let (x_train, x_test, y_train, y_test) = split.apply(&x, &y);
    info!(
        train_rows = x_train.nrows(),
        test_rows = x_test.nrows(),
        features = x.ncols(),
        random_state = config.random_state,
        "Split dataset"
    );

    let mut pipeline = build_pipeline(config);
    pipeline.fit(&x_train, &y_train, &dataset.feature_order)?;

    let proba = pipeline.predict_proba(&x_test)?;
    let metrics = ModelMetrics::compute_classification(&y_test, &proba).ok_or_else(|| {
        PredictorError::DataError("Validation split contains a single class".to_string())
    })?;

    info!(
        accuracy = metrics.accuracy,
        roc_auc = metrics.roc_auc,
        iterations = pipeline.model.n_iter,
        converged = pipeline.model.converged,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Training complete"
    );

    Ok(TrainOutcome { pipeline, metrics })
}
