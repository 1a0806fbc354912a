//! Dataset loading
//!
//! Reads the match-statistics CSV, checks for the `win` target column and
//! derives the canonical feature order (every column except the target, in
//! file order).

use crate::error::{PredictorError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use std::path::Path;
use tracing::info;

/// Name of the binary label column.
pub const TARGET_COLUMN: &str = "win";

/// A loaded dataset together with its canonical column roles.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub frame: DataFrame,
    pub feature_order: Vec<String>,
    pub target: String,
}

/// Load a CSV dataset and derive the feature order.
///
/// The existence check runs before any parsing so a bad path is reported
/// without touching the file system further.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PredictorError::DatasetNotFound(path.to_path_buf()));
    }

    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let columns: Vec<String> = frame
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();

    if !columns.iter().any(|c| c == TARGET_COLUMN) {
        return Err(PredictorError::MissingTarget(TARGET_COLUMN.to_string()));
    }

    let feature_order: Vec<String> = columns
        .into_iter()
        .filter(|c| c != TARGET_COLUMN)
        .collect();

    info!(
        path = %path.display(),
        rows = frame.height(),
        features = feature_order.len(),
        "Loaded dataset"
    );

    Ok(Dataset {
        frame,
        feature_order,
        target: TARGET_COLUMN.to_string(),
    })
}

impl Dataset {
    pub fn n_rows(&self) -> usize {
        self.frame.height()
    }

    /// Extract the feature matrix (canonical order) and the 0/1 label vector.
    pub fn to_arrays(&self) -> Result<(Array2<f64>, Array1<f64>)> {
        if self.feature_order.is_empty() {
            return Err(PredictorError::DataError(
                "Dataset has no feature columns besides the target".to_string(),
            ));
        }
        if self.frame.height() == 0 {
            return Err(PredictorError::DataError("Dataset has no rows".to_string()));
        }

        let x = columns_to_array2(&self.frame, &self.feature_order)?;
        let y = Array1::from(column_to_vec(&self.frame, &self.target)?);

        if let Some(bad) = y.iter().find(|v| **v != 0.0 && **v != 1.0) {
            return Err(PredictorError::DataError(format!(
                "Target column '{}' must be binary 0/1, found {}",
                self.target, bad
            )));
        }

        Ok((x, y))
    }
}

fn column_to_vec(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| PredictorError::FeatureNotFound(name.to_string()))?;
    let as_f64 = column.cast(&DataType::Float64)?;
    let values = as_f64
        .as_materialized_series()
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect::<Option<Vec<f64>>>();

    values.ok_or_else(|| {
        PredictorError::DataError(format!(
            "Column '{}' contains missing or non-numeric values",
            name
        ))
    })
}

/// Extract named columns into a row-major matrix.
fn columns_to_array2(df: &DataFrame, col_names: &[String]) -> Result<Array2<f64>> {
    let n_rows = df.height();
    let col_data: Vec<Vec<f64>> = col_names
        .iter()
        .map(|name| column_to_vec(df, name))
        .collect::<Result<_>>()?;

    Ok(Array2::from_shape_fn((n_rows, col_names.len()), |(r, c)| {
        col_data[c][r]
    }))
}
