//! Logistic regression for binary classification, fitted with L-BFGS

use crate::error::{PredictorError, Result};
use crate::DECISION_THRESHOLD;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Number of correction pairs kept by the solver
const LBFGS_HISTORY: usize = 10;
/// Armijo sufficient-decrease constant
const ARMIJO_C1: f64 = 1e-4;
const MAX_LINE_SEARCH_STEPS: usize = 60;

/// Regularization applied to the weights (never to the intercept).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Penalty {
    L2,
    None,
}

impl Default for Penalty {
    fn default() -> Self {
        Penalty::L2
    }
}

impl fmt::Display for Penalty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Penalty::L2 => write!(f, "l2"),
            Penalty::None => write!(f, "none"),
        }
    }
}

impl FromStr for Penalty {
    type Err = PredictorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "l2" => Ok(Penalty::L2),
            "none" => Ok(Penalty::None),
            other => Err(PredictorError::ConfigError(format!(
                "Penalty '{}' is not supported by the lbfgs solver (use 'l2' or 'none')",
                other
            ))),
        }
    }
}

/// Logistic regression for binary classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Fitted coefficients
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept
    pub intercept: Option<f64>,
    pub penalty: Penalty,
    /// Inverse regularization strength
    pub c: f64,
    /// Maximum solver iterations
    pub max_iter: usize,
    /// Convergence tolerance on the largest gradient component
    pub tol: f64,
    /// Iterations used by the last fit
    pub n_iter: usize,
    pub converged: bool,
    pub is_fitted: bool,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    /// Create a new logistic regression model
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            penalty: Penalty::L2,
            c: 1.0,
            max_iter: 1000,
            tol: 1e-4,
            n_iter: 0,
            converged: false,
            is_fitted: false,
        }
    }

    pub fn with_penalty(mut self, penalty: Penalty) -> Self {
        self.penalty = penalty;
        self
    }

    /// Set inverse regularization strength
    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    fn sigmoid(z: f64) -> f64 {
        if z >= 0.0 {
            1.0 / (1.0 + (-z).exp())
        } else {
            let e = z.exp();
            e / (1.0 + e)
        }
    }

    /// log(1 + e^z) without overflow
    fn softplus(z: f64) -> f64 {
        z.max(0.0) + (-z.abs()).exp().ln_1p()
    }

    /// Objective value and gradient at `theta = [w..., b]`.
    fn objective(&self, theta: &Array1<f64>, x: &Array2<f64>, y: &Array1<f64>) -> (f64, Array1<f64>) {
        let n = x.nrows() as f64;
        let d = x.ncols();
        let w = theta.slice(ndarray::s![..d]);
        let b = theta[d];

        let z = x.dot(&w) + b;
        let loss = z
            .iter()
            .zip(y.iter())
            .map(|(&zi, &yi)| Self::softplus(zi) - yi * zi)
            .sum::<f64>()
            / n;
        let errors = z.mapv(Self::sigmoid) - y;

        let mut grad = Array1::zeros(d + 1);
        let gw = x.t().dot(&errors) / n;
        grad.slice_mut(ndarray::s![..d]).assign(&gw);
        grad[d] = errors.sum() / n;

        let mut value = loss;
        if self.penalty == Penalty::L2 {
            let lambda = 1.0 / (self.c * n);
            value += 0.5 * lambda * w.dot(&w);
            grad.slice_mut(ndarray::s![..d]).scaled_add(lambda, &w);
        }

        (value, grad)
    }

    fn max_abs(v: &Array1<f64>) -> f64 {
        v.iter().fold(0.0_f64, |m, x| m.max(x.abs()))
    }

    /// Two-loop recursion: approximate inverse-Hessian times gradient.
    fn search_direction(
        grad: &Array1<f64>,
        s_hist: &VecDeque<Array1<f64>>,
        y_hist: &VecDeque<Array1<f64>>,
    ) -> Array1<f64> {
        let k = s_hist.len();
        let mut q = grad.clone();
        let mut alphas = vec![0.0; k];
        let mut rhos = vec![0.0; k];

        for i in (0..k).rev() {
            rhos[i] = 1.0 / y_hist[i].dot(&s_hist[i]);
            alphas[i] = rhos[i] * s_hist[i].dot(&q);
            q.scaled_add(-alphas[i], &y_hist[i]);
        }

        let gamma = match (s_hist.back(), y_hist.back()) {
            (Some(s), Some(y)) => s.dot(y) / y.dot(y),
            _ => 1.0 / grad.dot(grad).sqrt().max(1.0),
        };
        let mut r = q * gamma;

        for i in 0..k {
            let beta = rhos[i] * y_hist[i].dot(&r);
            r.scaled_add(alphas[i] - beta, &s_hist[i]);
        }

        -r
    }

    /// Fit the model by minimizing the (optionally L2-penalized) mean log loss.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(PredictorError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(PredictorError::DataError("Cannot fit on zero samples".to_string()));
        }
        if !(self.c > 0.0) {
            return Err(PredictorError::ConfigError(format!("C must be positive, got {}", self.c)));
        }

        let mut theta = Array1::zeros(n_features + 1);
        let (mut value, mut grad) = self.objective(&theta, x, y);
        let mut s_hist: VecDeque<Array1<f64>> = VecDeque::with_capacity(LBFGS_HISTORY);
        let mut y_hist: VecDeque<Array1<f64>> = VecDeque::with_capacity(LBFGS_HISTORY);

        let mut converged = Self::max_abs(&grad) <= self.tol;
        let mut n_iter = 0;

        while !converged && n_iter < self.max_iter {
            let mut direction = Self::search_direction(&grad, &s_hist, &y_hist);
            let mut slope = grad.dot(&direction);
            if !(slope < 0.0) {
                // Curvature history produced an ascent direction; restart.
                s_hist.clear();
                y_hist.clear();
                direction = -&grad;
                slope = -grad.dot(&grad);
            }

            let mut step = 1.0;
            let mut accepted = None;
            for _ in 0..MAX_LINE_SEARCH_STEPS {
                let candidate = &theta + &(&direction * step);
                let (cand_value, cand_grad) = self.objective(&candidate, x, y);
                if cand_value.is_finite() && cand_value <= value + ARMIJO_C1 * step * slope {
                    accepted = Some((candidate, cand_value, cand_grad));
                    break;
                }
                step *= 0.5;
            }

            let Some((candidate, cand_value, cand_grad)) = accepted else {
                debug!(iteration = n_iter, "Line search made no progress");
                break;
            };

            let s = &candidate - &theta;
            let yk = &cand_grad - &grad;
            if s.dot(&yk) > 1e-10 {
                if s_hist.len() == LBFGS_HISTORY {
                    s_hist.pop_front();
                    y_hist.pop_front();
                }
                s_hist.push_back(s);
                y_hist.push_back(yk);
            }

            theta = candidate;
            value = cand_value;
            grad = cand_grad;
            n_iter += 1;
            converged = Self::max_abs(&grad) <= self.tol;
        }

        if !converged {
            warn!(
                max_iter = self.max_iter,
                iterations = n_iter,
                gradient = Self::max_abs(&grad),
                "lbfgs failed to converge; increase max_iter or scale the data"
            );
        }
        debug!(iterations = n_iter, loss = value, converged, "Logistic regression fitted");

        self.coefficients = Some(theta.slice(ndarray::s![..n_features]).to_owned());
        self.intercept = Some(theta[n_features]);
        self.n_iter = n_iter;
        self.converged = converged;
        self.is_fitted = true;

        Ok(self)
    }

    /// Predict probabilities of the positive class
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let (coefficients, intercept) = match (&self.coefficients, self.intercept) {
            (Some(c), Some(i)) if self.is_fitted => (c, i),
            _ => return Err(PredictorError::ModelNotFitted),
        };

        if x.ncols() != coefficients.len() {
            return Err(PredictorError::ShapeError {
                expected: format!("{} features", coefficients.len()),
                actual: format!("{} features", x.ncols()),
            });
        }

        Ok((x.dot(coefficients) + intercept).mapv(Self::sigmoid))
    }

    /// Predict class labels
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p >= DECISION_THRESHOLD { 1.0 } else { 0.0 }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn overlapping_data() -> (Array2<f64>, Array1<f64>) {
        let x = array![
            [-2.0, 0.5],
            [-1.5, -0.3],
            [-1.0, 0.8],
            [-0.5, -1.0],
            [0.2, 0.1],
            [-0.2, 0.4],
            [0.5, -0.6],
            [1.0, 0.9],
            [1.5, -0.2],
            [2.0, 0.3],
        ];
        let y = array![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        (x, y)
    }

    #[test]
    fn test_logistic_regression() {
        let x = array![[1.0, 1.0], [1.5, 1.5], [2.0, 2.0], [5.0, 5.0], [5.5, 5.5], [6.0, 6.0]];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];

        let mut model = LogisticRegression::new();
        model.fit(&x, &y).unwrap();
        assert!(model.is_fitted);

        let predictions = model.predict(&x).unwrap();
        assert_eq!(predictions, y);
    }

    #[test]
    fn test_predict_proba_is_ordered() {
        let (x, y) = overlapping_data();
        let mut model = LogisticRegression::new();
        model.fit(&x, &y).unwrap();

        let proba = model.predict_proba(&array![[-3.0, 0.0], [3.0, 0.0]]).unwrap();
        assert!(proba[0] < 0.5);
        assert!(proba[1] > 0.5);
        assert!(proba.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_converges_to_stationary_point() {
        let (x, y) = overlapping_data();
        let mut model = LogisticRegression::new().with_tol(1e-6).with_max_iter(500);
        model.fit(&x, &y).unwrap();
        assert!(model.converged);

        let mut theta = model.coefficients.clone().unwrap().to_vec();
        theta.push(model.intercept.unwrap());
        let (_, grad) = model.objective(&Array1::from(theta), &x, &y);
        assert!(LogisticRegression::max_abs(&grad) <= 1e-6);
    }

    #[test]
    fn test_l2_shrinks_weights() {
        let (x, y) = overlapping_data();
        let mut strong = LogisticRegression::new().with_c(0.01);
        let mut weak = LogisticRegression::new().with_c(100.0);
        strong.fit(&x, &y).unwrap();
        weak.fit(&x, &y).unwrap();

        let norm = |m: &LogisticRegression| m.coefficients.as_ref().unwrap().mapv(|v| v * v).sum();
        assert!(norm(&strong) < norm(&weak));
    }

    #[test]
    fn test_iteration_cap_is_respected() {
        let (x, y) = overlapping_data();
        let mut model = LogisticRegression::new().with_max_iter(1).with_tol(1e-12);
        model.fit(&x, &y).unwrap();
        assert_eq!(model.n_iter, 1);
        assert!(!model.converged);
        assert!(model.is_fitted);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (x, y) = overlapping_data();
        let mut a = LogisticRegression::new();
        let mut b = LogisticRegression::new();
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a.coefficients, b.coefficients);
        assert_eq!(a.intercept, b.intercept);
    }

    #[test]
    fn test_predict_requires_fit() {
        let model = LogisticRegression::new();
        assert!(matches!(model.predict_proba(&array![[1.0]]), Err(PredictorError::ModelNotFitted)));
    }

    #[test]
    fn test_penalty_parsing() {
        assert_eq!("l2".parse::<Penalty>().unwrap(), Penalty::L2);
        assert_eq!("None".parse::<Penalty>().unwrap(), Penalty::None);
        assert!(matches!("l1".parse::<Penalty>(), Err(PredictorError::ConfigError(_))));
    }
}
