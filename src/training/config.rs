//! Training configuration

use super::linear_models::Penalty;
use crate::error::{PredictorError, Result};
use serde::{Deserialize, Serialize};

/// Hyperparameters for one training run. Frozen once training starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Fraction of rows held out for validation
    pub test_size: f64,
    /// Seed for the stratified split
    pub random_state: u64,
    pub penalty: Penalty,
    /// Inverse regularization strength
    pub c: f64,
    pub max_iter: usize,
    pub tol: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            random_state: 42,
            penalty: Penalty::L2,
            c: 1.0,
            max_iter: 1000,
            tol: 1e-4,
        }
    }
}

impl TrainingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = random_state;
        self
    }

    pub fn with_penalty(mut self, penalty: Penalty) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(PredictorError::ConfigError(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if !(self.c > 0.0 && self.c.is_finite()) {
            return Err(PredictorError::ConfigError(format!(
                "C must be a positive number, got {}",
                self.c
            )));
        }
        if self.max_iter == 0 {
            return Err(PredictorError::ConfigError("max_iter must be at least 1".to_string()));
        }
        if !(self.tol > 0.0) {
            return Err(PredictorError::ConfigError(format!("tol must be positive, got {}", self.tol)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrainingConfig::default();
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.random_state, 42);
        assert_eq!(config.penalty, Penalty::L2);
        assert_eq!(config.c, 1.0);
        assert_eq!(config.max_iter, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(TrainingConfig::new().with_test_size(1.5).validate().is_err());
        assert!(TrainingConfig::new().with_c(0.0).validate().is_err());
        assert!(TrainingConfig::new().with_max_iter(0).validate().is_err());
        assert!(TrainingConfig::new().with_tol(-1.0).validate().is_err());
    }
}
