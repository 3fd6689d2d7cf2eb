/// Marker for a model that has not been fitted yet.
///
/// `LinearModel<Unfitted>` only exposes configuration and `fit`; prediction is
/// not available until fitting returns a `LinearModel<Fitted>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unfitted;

/// Marker for a fitted model.
///
/// A fitted model holds inference parameters only. It can be persisted with
/// [`RegressionModel::extract_params`](super::RegressionModel::extract_params) and
/// handed to the serving layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fitted;
