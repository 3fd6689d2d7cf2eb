use thiserror::Error;

/// Errors raised while fitting or restoring a model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Empty data: {0}")]
    EmptyData(String),
    #[error("Dimension mismatch: {rows} feature rows but {targets} targets")]
    DimensionMismatch { rows: usize, targets: usize },
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// The normal equations could not be solved, even with the ridge term.
    #[error("Singular system: pivot {pivot:e} in column {column}")]
    Singular { column: usize, pivot: f64 },
}
