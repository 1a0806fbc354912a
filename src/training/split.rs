//! Seeded, stratified train/validation split

use crate::error::{PredictorError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// Row indices of a single train/validation split
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

impl TrainTestSplit {
    /// Gather `(x_train, x_test, y_train, y_test)` for this split.
    pub fn apply(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
    ) -> (Array2<f64>, Array2<f64>, Array1<f64>, Array1<f64>) {
        (
            x.select(Axis(0), &self.train_indices),
            x.select(Axis(0), &self.test_indices),
            y.select(Axis(0), &self.train_indices),
            y.select(Axis(0), &self.test_indices),
        )
    }
}

/// Split rows so that each class keeps its share in both subsets.
///
/// Each class is shuffled with a ChaCha8 stream seeded by `random_state`
/// and contributes `round(len * test_size)` rows to the test side, clamped
/// so both sides get at least one row of it. Classes are visited in label
/// order, which makes the split a pure function of `(y, test_size, random_state)`.
pub fn stratified_split(y: &Array1<f64>, test_size: f64, random_state: u64) -> Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(PredictorError::ConfigError(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let mut class_indices: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (i, &label) in y.iter().enumerate() {
        class_indices.entry(label.round() as i64).or_default().push(i);
    }

    if class_indices.len() < 2 {
        return Err(PredictorError::DataError(
            "Stratified split needs at least two classes in the target".to_string(),
        ));
    }
    if let Some((label, indices)) = class_indices.iter().find(|(_, idx)| idx.len() < 2) {
        return Err(PredictorError::DataError(format!(
            "The least populated class ({}) has only {} member; each class needs at least 2",
            label,
            indices.len()
        )));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(random_state);
    let mut train_indices = Vec::with_capacity(y.len());
    let mut test_indices = Vec::new();

    for indices in class_indices.values_mut() {
        indices.shuffle(&mut rng);
        let n = indices.len();
        let n_test = ((n as f64 * test_size).round() as usize).clamp(1, n - 1);
        test_indices.extend_from_slice(&indices[..n_test]);
        train_indices.extend_from_slice(&indices[n_test..]);
    }

    train_indices.shuffle(&mut rng);
    test_indices.shuffle(&mut rng);

    Ok(TrainTestSplit {
        train_indices,
        test_indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n_pos: usize, n_neg: usize) -> Array1<f64> {
        Array1::from_iter((0..n_pos + n_neg).map(|i| if i < n_pos { 1.0 } else { 0.0 }))
    }

    #[test]
    fn test_preserves_class_balance() {
        let y = labels(30, 70);
        let split = stratified_split(&y, 0.2, 42).unwrap();
        assert_eq!(split.test_indices.len(), 20);
        assert_eq!(split.train_indices.len(), 80);

        let test_pos = split.test_indices.iter().filter(|&&i| y[i] == 1.0).count();
        assert_eq!(test_pos, 6);
    }

    #[test]
    fn test_partitions_all_rows() {
        let y = labels(13, 29);
        let split = stratified_split(&y, 0.25, 7).unwrap();
        let mut all: Vec<usize> = split
            .train_indices
            .iter()
            .chain(split.test_indices.iter())
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..42).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let y = labels(40, 60);
        let a = stratified_split(&y, 0.3, 123).unwrap();
        let b = stratified_split(&y, 0.3, 123).unwrap();
        let c = stratified_split(&y, 0.3, 124).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_single_class_rejected() {
        let y = labels(10, 0);
        assert!(matches!(stratified_split(&y, 0.2, 1), Err(PredictorError::DataError(_))));
    }

    #[test]
    fn test_singleton_class_rejected() {
        let y = labels(1, 10);
        assert!(matches!(stratified_split(&y, 0.2, 1), Err(PredictorError::DataError(_))));
    }

    #[test]
    fn test_invalid_test_size() {
        let y = labels(5, 5);
        assert!(matches!(stratified_split(&y, 0.0, 1), Err(PredictorError::ConfigError(_))));
        assert!(matches!(stratified_split(&y, 1.0, 1), Err(PredictorError::ConfigError(_))));
    }
}
