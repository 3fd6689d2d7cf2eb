use thiserror::Error;

/// Serving-time request validation failure. Names the offending field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

impl QueryError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        QueryError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised while saving or loading artifacts.
#[derive(Debug, Error)]
pub enum ServingError {
    /// The persisted schema and model do not describe the same feature layout.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<bincode::Error> for ServingError {
    fn from(err: bincode::Error) -> Self {
        ServingError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for ServingError {
    fn from(err: serde_json::Error) -> Self {
        ServingError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_names_field() {
        let err = QueryError::invalid("bath", "must be a whole number");
        assert_eq!(err.to_string(), "invalid field `bath`: must be a whole number");
        assert_eq!(
            QueryError::MissingField("location").to_string(),
            "missing field `location`"
        );
    }
}
