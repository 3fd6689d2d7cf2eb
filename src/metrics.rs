//! Regression metrics for held-out evaluation.

use serde::{Deserialize, Serialize};

/// Metrics for evaluating regression models.
pub struct Metrics;

impl Metrics {
    /// Mean squared error, `mean((y_true - y_pred)^2)`.
    ///
    /// # Panics
    /// If the slices differ in length.
    pub fn mse(y_true: &[f64], y_pred: &[f64]) -> f64 {
        assert_eq!(
            y_true.len(),
            y_pred.len(),
            "Arrays must have the same length"
        );
        if y_true.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = y_true
            .iter()
            .zip(y_pred)
            .map(|(t, p)| (t - p).powi(2))
            .sum();
        sum_sq / y_true.len() as f64
    }

    /// Root mean squared error, in lakhs.
    pub fn rmse(y_true: &[f64], y_pred: &[f64]) -> f64 {
        Self::mse(y_true, y_pred).sqrt()
    }

    /// Mean absolute error, in lakhs.
    pub fn mae(y_true: &[f64], y_pred: &[f64]) -> f64 {
        assert_eq!(
            y_true.len(),
            y_pred.len(),
            "Arrays must have the same length"
        );
        if y_true.is_empty() {
            return 0.0;
        }
        let sum_abs: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).abs()).sum();
        sum_abs / y_true.len() as f64
    }

    /// Coefficient of determination, `1 - SS_res / SS_tot`.
    ///
    /// Negative when the model does worse than predicting the mean. A constant
    /// target has no variance to explain: the score is 1 for an exact fit and 0
    /// otherwise.
    pub fn r_squared(y_true: &[f64], y_pred: &[f64]) -> f64 {
        assert_eq!(
            y_true.len(),
            y_pred.len(),
            "Arrays must have the same length"
        );
        if y_true.is_empty() {
            return 0.0;
        }
        let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;
        let ss_res: f64 = y_true
            .iter()
            .zip(y_pred)
            .map(|(t, p)| (t - p).powi(2))
            .sum();
        let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();
        if ss_tot == 0.0 {
            return if ss_res == 0.0 { 1.0 } else { 0.0 };
        }
        1.0 - ss_res / ss_tot
    }
}

/// Scores of a model on one split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionReport {
    pub n_samples: usize,
    pub r_squared: f64,
    pub mae: f64,
    pub rmse: f64,
}

impl RegressionReport {
    pub fn evaluate(y_true: &[f64], y_pred: &[f64]) -> Self {
        Self {
            n_samples: y_true.len(),
            r_squared: Metrics::r_squared(y_true, y_pred),
            mae: Metrics::mae(y_true, y_pred),
            rmse: Metrics::rmse(y_true, y_pred),
        }
    }
}
