//! Evaluation metrics

use crate::DECISION_THRESHOLD;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Held-out metrics stored alongside the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub roc_auc: f64,
}

impl ModelMetrics {
    /// Compute accuracy (at `DECISION_THRESHOLD`) and ROC-AUC from positive-class probabilities.
    ///
    /// Returns `None` when the labels contain a single class, since ROC-AUC is
    /// undefined there.
    pub fn compute_classification(y_true: &Array1<f64>, y_prob: &Array1<f64>) -> Option<Self> {
        let roc_auc = roc_auc(y_prob, y_true)?;
        Some(Self {
            accuracy: accuracy(y_true, y_prob),
            roc_auc,
        })
    }
}

/// Fraction of samples whose thresholded probability matches the label.
pub fn accuracy(y_true: &Array1<f64>, y_prob: &Array1<f64>) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true
        .iter()
        .zip(y_prob.iter())
        .filter(|(t, p)| (**p >= DECISION_THRESHOLD) == (**t >= 0.5))
        .count();
    correct as f64 / y_true.len() as f64
}

/// ROC-AUC for binary labels (labels >= 0.5 are positive), ties counted as half.
pub fn roc_auc(scores: &Array1<f64>, labels: &Array1<f64>) -> Option<f64> {
    let n = scores.len();
    if n == 0 || labels.len() != n {
        return None;
    }

    let mut items: Vec<(f64, bool)> = scores
        .iter()
        .zip(labels.iter())
        .map(|(&s, &y)| (s, y >= 0.5))
        .collect();
    items.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let n_pos = items.iter().filter(|(_, pos)| *pos).count() as f64;
    let n_neg = n as f64 - n_pos;
    if n_pos == 0.0 || n_neg == 0.0 {
        return None;
    }

    let mut auc_num = 0.0;
    let mut neg_below = 0.0;
    let mut i = 0;
    while i < n {
        let score = items[i].0;
        let mut pos_tied = 0.0;
        let mut neg_tied = 0.0;
        while i < n && items[i].0 == score {
            if items[i].1 {
                pos_tied += 1.0;
            } else {
                neg_tied += 1.0;
            }
            i += 1;
        }
        auc_num += pos_tied * neg_below + 0.5 * pos_tied * neg_tied;
        neg_below += neg_tied;
    }

    Some(auc_num / (n_pos * n_neg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_perfect_ranking() {
        let y = array![0.0, 0.0, 1.0, 1.0];
        let p = array![0.1, 0.4, 0.6, 0.9];
        let metrics = ModelMetrics::compute_classification(&y, &p).unwrap();
        assert_eq!(metrics.accuracy, 1.0);
        assert_eq!(metrics.roc_auc, 1.0);
    }

    #[test]
    fn test_roc_auc_known_value() {
        // One inverted pair out of four positive/negative pairs.
        let y = array![0.0, 1.0, 0.0, 1.0];
        let p = array![0.1, 0.35, 0.4, 0.8];
        assert!((roc_auc(&p, &y).unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_roc_auc_ties_count_half() {
        let y = array![0.0, 1.0];
        let p = array![0.5, 0.5];
        assert_eq!(roc_auc(&p, &y), Some(0.5));
    }

    #[test]
    fn test_single_class_is_undefined() {
        let y = array![1.0, 1.0, 1.0];
        let p = array![0.2, 0.7, 0.9];
        assert!(roc_auc(&p, &y).is_none());
        assert!(ModelMetrics::compute_classification(&y, &p).is_none());
    }

    #[test]
    fn test_accuracy_uses_threshold_inclusively() {
        let y = array![1.0, 0.0, 0.0];
        let p = array![0.5, 0.49, 0.7];
        assert!((accuracy(&y, &p) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_serialized_shape() {
        let metrics = ModelMetrics { accuracy: 0.8, roc_auc: 0.9 };
        let json = serde_json::to_value(metrics).unwrap();
        assert_eq!(json, serde_json::json!({"accuracy": 0.8, "roc_auc": 0.9}));
    }
}
