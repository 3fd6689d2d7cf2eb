//! Error types for cleaning and encoding operations.

use thiserror::Error;

/// A raw listing field that could not be normalized into a number.
///
/// Rows producing this error are dropped by the cleaning pipeline; the error is
/// never propagated past it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The field was empty or contained only whitespace.
    #[error("empty {field} field")]
    Empty { field: &'static str },
    /// The field did not match any accepted numeric format.
    #[error("unparseable {field} value {raw:?}")]
    Unparseable { field: &'static str, raw: String },
    /// The field parsed but the value cannot describe a real listing.
    #[error("implausible {field} value {raw:?}")]
    OutOfRange { field: &'static str, raw: String },
}

impl ParseError {
    /// Name of the field that failed to parse.
    pub fn field(&self) -> &'static str {
        match self {
            ParseError::Empty { field }
            | ParseError::Unparseable { field, .. }
            | ParseError::OutOfRange { field, .. } => *field,
        }
    }

    pub(crate) fn unparseable(field: &'static str, raw: &str) -> Self {
        ParseError::Unparseable {
            field,
            raw: raw.to_string(),
        }
    }
}

/// Error type for preprocessing operations.
#[derive(Debug, Error)]
pub enum PreprocessingError {
    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),
    /// Invalid parameter or malformed fitted state.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Feature dimension mismatch.
    #[error("Feature mismatch: expected {expected_features} features, got {got_features}")]
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },
    /// Reading or writing tabular data failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_names_field() {
        let err = ParseError::unparseable("total_sqft", "34.46Sq. Meter");
        let msg = err.to_string();
        assert!(msg.contains("total_sqft"));
        assert!(msg.contains("34.46Sq. Meter"));
    }

    #[test]
    fn test_error_display_empty_data() {
        let err = PreprocessingError::EmptyData("no rows".to_string());
        assert!(err.to_string().contains("Empty data"));
    }

    #[test]
    fn test_error_display_feature_mismatch() {
        let err = PreprocessingError::FeatureMismatch {
            expected_features: 5,
            got_features: 3,
        };
        assert!(err.to_string().contains("Feature mismatch"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: PreprocessingError = io_err.into();
        assert!(matches!(err, PreprocessingError::IoError(_)));
    }
}
