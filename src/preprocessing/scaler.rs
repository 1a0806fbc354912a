//! Feature scaling

use crate::error::{PredictorError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Type of scaler to use
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScalerType {
    /// Standard scaling (z-score normalization): (x - mean) / std
    Standard,
    /// No scaling
    None,
}

/// Per-feature scaler fitted on a training matrix.
///
/// Standard scaling uses the population standard deviation. Constant
/// features keep a scale of 1.0 so they map to zero instead of NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    scaler_type: ScalerType,
    center: Option<Array1<f64>>,
    scale: Option<Array1<f64>>,
}

impl Scaler {
    /// Create a new, unfitted scaler
    pub fn new(scaler_type: ScalerType) -> Self {
        Self {
            scaler_type,
            center: None,
            scale: None,
        }
    }

    pub fn standard() -> Self {
        Self::new(ScalerType::Standard)
    }

    pub fn scaler_type(&self) -> ScalerType {
        self.scaler_type
    }

    pub fn is_fitted(&self) -> bool {
        self.center.is_some()
    }

    /// Fitted per-feature means (or zeros for `ScalerType::None`)
    pub fn center(&self) -> Option<&Array1<f64>> {
        self.center.as_ref()
    }

    pub fn scale(&self) -> Option<&Array1<f64>> {
        self.scale.as_ref()
    }

    /// Fit the scaler to the data
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        if x.nrows() == 0 {
            return Err(PredictorError::DataError(
                "Cannot fit scaler on an empty matrix".to_string(),
            ));
        }

        let n_features = x.ncols();
        let (center, scale) = match self.scaler_type {
            ScalerType::Standard => {
                let mean = x
                    .mean_axis(Axis(0))
                    .ok_or_else(|| PredictorError::DataError("Empty feature axis".to_string()))?;
                let std = x.std_axis(Axis(0), 0.0);
                let scale = std.mapv(|s| if s == 0.0 || !s.is_finite() { 1.0 } else { s });
                (mean, scale)
            }
            ScalerType::None => (Array1::zeros(n_features), Array1::ones(n_features)),
        };

        self.center = Some(center);
        self.scale = Some(scale);
        Ok(self)
    }

    /// Transform the data
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let (center, scale) = match (&self.center, &self.scale) {
            (Some(c), Some(s)) => (c, s),
            _ => return Err(PredictorError::ModelNotFitted),
        };

        if x.ncols() != center.len() {
            return Err(PredictorError::ShapeError {
                expected: format!("{} features", center.len()),
                actual: format!("{} features", x.ncols()),
            });
        }

        Ok((x - &center.view().insert_axis(Axis(0))) / &scale.view().insert_axis(Axis(0)))
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }

    /// Inverse transform the data
    pub fn inverse_transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let (center, scale) = match (&self.center, &self.scale) {
            (Some(c), Some(s)) => (c, s),
            _ => return Err(PredictorError::ModelNotFitted),
        };

        Ok(x * &scale.view().insert_axis(Axis(0)) + &center.view().insert_axis(Axis(0)))
    }
}
