//! Ordinary least squares with an intercept.
//!
//! Fitting standardizes every feature column, solves the normal equations
//! `(ZᵀZ / n + λI) β = Zᵀ(y - ȳ) / n` by Gaussian elimination with partial
//! pivoting, and maps the coefficients back to the original feature scale.
//! Columns with zero variance get a zero weight and are left out of the system.
//!
//! A one-hot location block with no "other" rows sums to a constant and is
//! collinear with the intercept. The small ridge term `λ` keeps that system
//! solvable; predictions on the training rows are unaffected by the tie-break.

use std::marker::PhantomData;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Fitted, ModelError, RegressionModel, Unfitted};

/// Default ridge strength, in standardized units.
pub const DEFAULT_RIDGE: f64 = 1e-6;

const MIN_STD: f64 = 1e-12;
const MIN_PIVOT: f64 = 1e-14;

/// Inference parameters of a linear model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

/// Linear regression model parametrized by training state.
#[derive(Debug, Clone)]
pub struct LinearModel<S> {
    params: LinearParams,
    ridge: f64,
    _state: PhantomData<S>,
}

/// An unfitted linear model, configured but not yet trained.
pub type LinearRegression = LinearModel<Unfitted>;

impl Default for LinearModel<Unfitted> {
    fn default() -> Self {
        Self {
            params: LinearParams {
                weights: Vec::new(),
                intercept: 0.0,
            },
            ridge: DEFAULT_RIDGE,
            _state: PhantomData,
        }
    }
}

impl LinearModel<Unfitted> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ridge strength. Zero gives plain OLS.
    pub fn with_ridge(mut self, ridge: f64) -> Self {
        self.ridge = ridge;
        self
    }

    pub fn ridge(&self) -> f64 {
        self.ridge
    }

    /// Fit on a feature matrix and its target.
    ///
    /// # Errors
    /// Empty input, a row/target count mismatch, a negative or non-finite ridge,
    /// or a system that stays singular.
    pub fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<LinearModel<Fitted>, ModelError> {
        let (n_rows, n_features) = x.dim();
        if n_rows == 0 {
            return Err(ModelError::EmptyData(
                "Cannot fit LinearRegression on zero rows".to_string(),
            ));
        }
        if n_rows != y.len() {
            return Err(ModelError::DimensionMismatch {
                rows: n_rows,
                targets: y.len(),
            });
        }
        if !(self.ridge.is_finite() && self.ridge >= 0.0) {
            return Err(ModelError::InvalidParameter(format!(
                "ridge must be a non-negative finite number, got {}",
                self.ridge
            )));
        }

        let n = n_rows as f64;
        let means = x
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(n_features));
        let stds = x.std_axis(Axis(0), 0.0);
        let active: Vec<usize> = (0..n_features).filter(|&j| stds[j] > MIN_STD).collect();
        let y_mean = y.sum() / n;

        let mut weights = vec![0.0; n_features];
        if !active.is_empty() {
            let mut z = x.select(Axis(1), &active);
            for (mut column, &j) in z.axis_iter_mut(Axis(1)).zip(&active) {
                let (mean, std) = (means[j], stds[j]);
                column.mapv_inplace(|v| (v - mean) / std);
            }
            let centered = y.mapv(|v| v - y_mean);

            let mut gram = z.t().dot(&z) / n;
            for k in 0..active.len() {
                gram[[k, k]] += self.ridge;
            }
            let rhs = z.t().dot(&centered) / n;
            let beta = solve(gram, rhs)?;

            for (k, &j) in active.iter().enumerate() {
                weights[j] = beta[k] / stds[j];
            }
        }

        let intercept = y_mean
            - weights
                .iter()
                .zip(means.iter())
                .map(|(w, m)| w * m)
                .sum::<f64>();

        debug!(
            rows = n_rows,
            features = n_features,
            constant_columns = n_features - active.len(),
            "fitted linear regression"
        );

        Ok(LinearModel {
            params: LinearParams { weights, intercept },
            ridge: self.ridge,
            _state: PhantomData,
        })
    }
}

impl LinearModel<Fitted> {
    /// Restore a fitted model from its parameters.
    pub fn new(params: LinearParams) -> Result<Self, ModelError> {
        if !params.intercept.is_finite() || params.weights.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::InvalidParameter(
                "linear parameters must be finite".to_string(),
            ));
        }
        Ok(Self {
            params,
            ridge: 0.0,
            _state: PhantomData,
        })
    }

    pub fn weights(&self) -> &[f64] {
        &self.params.weights
    }

    pub fn intercept(&self) -> f64 {
        self.params.intercept
    }
}

impl RegressionModel for LinearModel<Fitted> {
    type Params = LinearParams;

    fn n_features(&self) -> usize {
        self.params.weights.len()
    }

    fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        debug_assert_eq!(row.len(), self.params.weights.len());
        row.iter()
            .zip(&self.params.weights)
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.params.intercept
    }

    fn predict_batch(&self, rows: ArrayView2<'_, f64>) -> Array1<f64> {
        rows.dot(&ArrayView1::from(self.params.weights.as_slice())) + self.params.intercept
    }

    fn extract_params(&self) -> LinearParams {
        self.params.clone()
    }

    fn from_params(params: LinearParams) -> Result<Self, ModelError> {
        Self::new(params)
    }
}

/// Solve `a · x = b` in place by Gaussian elimination with partial pivoting.
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Result<Array1<f64>, ModelError> {
    let n = b.len();
    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))
            .unwrap_or(col);
        let pivot = a[[pivot_row, col]];
        if !pivot.is_finite() || pivot.abs() < MIN_PIVOT {
            return Err(ModelError::Singular { column: col, pivot });
        }
        if pivot_row != col {
            for k in 0..n {
                a.swap([col, k], [pivot_row, k]);
            }
            b.swap(col, pivot_row);
        }

        for row in col + 1..n {
            let factor = a[[row, col]] / pivot;
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                let delta = factor * a[[col, k]];
                a[[row, k]] -= delta;
            }
            let delta = factor * b[col];
            b[row] -= delta;
        }
    }

    let mut x = Array1::zeros(n);
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[[row, k]] * x[k]).sum();
        x[row] = (b[row] - tail) / a[[row, row]];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() < tol, "{a} != {b}");
    }

    #[test]
    fn test_fit_with_bias() {
        // y = 2 * x + 1
        let x = array![[0.0], [1.0], [2.0]];
        let y = array![1.0, 3.0, 5.0];
        let fitted = LinearRegression::new().with_ridge(0.0).fit(x.view(), y.view()).unwrap();

        assert_close(fitted.weights()[0], 2.0, 1e-9);
        assert_close(fitted.intercept(), 1.0, 1e-9);
        assert_close(fitted.predict_row(array![3.0].view()), 7.0, 1e-9);
    }

    #[test]
    fn test_fit_two_features_on_different_scales() {
        // price = 0.05 * sqft + 4 * bath - 3
        let x = array![
            [1000.0, 2.0],
            [1500.0, 2.0],
            [1200.0, 3.0],
            [2400.0, 4.0],
            [800.0, 1.0],
        ];
        let y = x.map_axis(Axis(1), |r| 0.05 * r[0] + 4.0 * r[1] - 3.0);
        let fitted = LinearRegression::new().fit(x.view(), y.view()).unwrap();

        assert_close(fitted.weights()[0], 0.05, 1e-6);
        assert_close(fitted.weights()[1], 4.0, 1e-4);
        for (pred, truth) in fitted.predict_batch(x.view()).iter().zip(y.iter()) {
            assert_close(*pred, *truth, 1e-3);
        }
    }

    #[test]
    fn test_constant_column_gets_zero_weight() {
        let x = array![[1.0, 7.0], [2.0, 7.0], [3.0, 7.0]];
        let y = array![2.0, 4.0, 6.0];
        let fitted = LinearRegression::new().fit(x.view(), y.view()).unwrap();
        assert_eq!(fitted.weights()[1], 0.0);
        assert_close(fitted.predict_row(array![4.0, 7.0].view()), 8.0, 1e-4);
    }

    #[test]
    fn test_collinear_one_hot_block_is_solvable() {
        // Every row belongs to location a or b: the block sums to one.
        let x = array![
            [1.0, 1.0, 0.0],
            [2.0, 1.0, 0.0],
            [1.0, 0.0, 1.0],
            [2.0, 0.0, 1.0],
            [3.0, 0.0, 1.0],
        ];
        let y = x.map_axis(Axis(1), |r| 1.0 + 2.0 * r[0] + 5.0 * r[2]);
        let fitted = LinearRegression::new().fit(x.view(), y.view()).unwrap();

        for (pred, truth) in fitted.predict_batch(x.view()).iter().zip(y.iter()) {
            assert_close(*pred, *truth, 1e-3);
        }
        assert_close(fitted.weights()[2] - fitted.weights()[1], 5.0, 1e-3);
    }

    #[test]
    fn test_predict_row_matches_batch() {
        let x = array![[1.0, 0.0], [0.0, 1.0], [2.0, 3.0]];
        let y = array![1.0, 2.0, 9.0];
        let fitted = LinearRegression::new().fit(x.view(), y.view()).unwrap();
        let batch = fitted.predict_batch(x.view());
        for (i, row) in x.outer_iter().enumerate() {
            assert_close(fitted.predict_row(row), batch[i], 1e-12);
        }
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        let x = Array2::<f64>::zeros((0, 2));
        let y = Array1::<f64>::zeros(0);
        assert!(matches!(
            LinearRegression::new().fit(x.view(), y.view()),
            Err(ModelError::EmptyData(_))
        ));

        let x = array![[1.0], [2.0]];
        let y = array![1.0];
        assert!(matches!(
            LinearRegression::new().fit(x.view(), y.view()),
            Err(ModelError::DimensionMismatch { rows: 2, targets: 1 })
        ));

        let y = array![1.0, 2.0];
        assert!(matches!(
            LinearRegression::new().with_ridge(-1.0).fit(x.view(), y.view()),
            Err(ModelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_solve_reports_singular_system() {
        let a = array![[1.0, 2.0], [2.0, 4.0]];
        let b = array![1.0, 2.0];
        assert!(matches!(solve(a, b), Err(ModelError::Singular { column: 1, .. })));
    }

    #[test]
    fn test_params_round_trip() {
        let x = array![[0.0], [1.0], [2.0]];
        let y = array![1.0, 3.0, 5.0];
        let fitted = LinearRegression::new().fit(x.view(), y.view()).unwrap();

        let restored = LinearModel::<Fitted>::from_params(fitted.extract_params()).unwrap();
        assert_eq!(restored.weights(), fitted.weights());
        assert_eq!(restored.n_features(), 1);

        let bad = LinearParams {
            weights: vec![f64::NAN],
            intercept: 0.0,
        };
        assert!(LinearModel::<Fitted>::from_params(bad).is_err());
    }
}
