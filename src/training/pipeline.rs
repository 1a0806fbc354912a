//! Two-stage win pipeline: standard scaling followed by logistic regression

use super::linear_models::LogisticRegression;
use crate::error::{PredictorError, Result};
use crate::preprocessing::Scaler;
use crate::DECISION_THRESHOLD;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Scaler and classifier fitted and applied as a unit.
///
/// `feature_order` records the column order used at fit time so a persisted
/// pipeline can be checked against the metadata it ships with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinPipeline {
    pub scaler: Scaler,
    pub model: LogisticRegression,
    pub feature_order: Vec<String>,
}

impl WinPipeline {
    pub fn new(scaler: Scaler, model: LogisticRegression) -> Self {
        Self {
            scaler,
            model,
            feature_order: Vec::new(),
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.scaler.is_fitted() && self.model.is_fitted
    }

    pub fn n_features(&self) -> usize {
        self.feature_order.len()
    }

    /// Fit the scaler on `x`, then the classifier on the scaled rows.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>, feature_order: &[String]) -> Result<&mut Self> {
        if feature_order.len() != x.ncols() {
            return Err(PredictorError::ShapeError {
                expected: format!("{} named features", feature_order.len()),
                actual: format!("{} columns", x.ncols()),
            });
        }

        let scaled = self.scaler.fit_transform(x)?;
        self.model.fit(&scaled, y)?;
        self.feature_order = feature_order.to_vec();
        Ok(self)
    }

    /// Positive-class probability for each row of `x` (canonical feature order).
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let scaled = self.scaler.transform(x)?;
        self.model.predict_proba(&scaled)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p >= DECISION_THRESHOLD { 1.0 } else { 0.0 }))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Write the fitted pipeline as a bincode artifact
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        if !self.is_fitted() {
            return Err(PredictorError::ModelNotFitted);
        }
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn fitted() -> WinPipeline {
        let x = array![
            [2.0, 900.0],
            [3.0, 1100.0],
            [4.0, 1000.0],
            [8.0, 2100.0],
            [9.0, 1900.0],
            [10.0, 2000.0],
        ];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let names = vec!["kills".to_string(), "gold_earned".to_string()];
        let mut pipeline = WinPipeline::new(Scaler::standard(), LogisticRegression::new());
        pipeline.fit(&x, &y, &names).unwrap();
        pipeline
    }

    #[test]
    fn test_fit_predict() {
        let pipeline = fitted();
        assert!(pipeline.is_fitted());
        assert_eq!(pipeline.n_features(), 2);

        let proba = pipeline.predict_proba(&array![[1.0, 800.0], [12.0, 2400.0]]).unwrap();
        assert!(proba[0] < 0.5 && proba[1] > 0.5);
        assert_eq!(pipeline.predict(&array![[12.0, 2400.0]]).unwrap()[0], 1.0);
    }

    #[test]
    fn test_bytes_reproduce_predictions() {
        let pipeline = fitted();
        let restored = WinPipeline::from_bytes(&pipeline.to_bytes().unwrap()).unwrap();
        let x = array![[5.0, 1500.0], [7.0, 1200.0]];
        assert_eq!(pipeline.predict_proba(&x).unwrap(), restored.predict_proba(&x).unwrap());
        assert_eq!(restored.feature_order, pipeline.feature_order);
    }

    #[test]
    fn test_unfitted_pipeline_cannot_be_saved() {
        let pipeline = WinPipeline::new(Scaler::standard(), LogisticRegression::new());
        let dir = tempfile::tempdir().unwrap();
        let err = pipeline.save(dir.path().join("p.bin")).unwrap_err();
        assert!(matches!(err, PredictorError::ModelNotFitted));
    }

    #[test]
    fn test_feature_names_must_match_columns() {
        let mut pipeline = WinPipeline::new(Scaler::standard(), LogisticRegression::new());
        let err = pipeline
            .fit(&array![[1.0, 2.0], [3.0, 4.0]], &array![0.0, 1.0], &["only".to_string()])
            .unwrap_err();
        assert!(matches!(err, PredictorError::ShapeError { .. }));
    }
}
