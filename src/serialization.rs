//! Serialization of fitted pipeline state.
//!
//! Everything that crosses the training/serving boundary (the feature schema,
//! the collapser mapping, the fitted regression parameters) is persisted as plain
//! data through [`SerializableParams`], never as live objects.

use std::error::Error;
use std::path::Path;

/// A parameter representation that can be serialized to and from bytes.
///
/// Implementors should contain only plain data (`Vec<f64>`, `String`s, scalars).
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;

    /// Write the serialized parameters to `path`.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let bytes = self.to_bytes().map_err(std::io::Error::other)?;
        std::fs::write(path, bytes)
    }

    /// Read parameters previously written with [`SerializableParams::write_to`].
    fn read_from<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes).map_err(std::io::Error::other)
    }
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Params {
        weights: Vec<f64>,
        names: Vec<String>,
    }

    #[test]
    fn test_bytes_round_trip() {
        let params = Params {
            weights: vec![1.5, -2.0],
            names: vec!["total_sqft".to_string(), "bath".to_string()],
        };
        let bytes = params.to_bytes().unwrap();
        let restored = Params::from_bytes(&bytes).unwrap();
        assert_eq!(restored, params);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let result = Params::from_bytes(&[0xff, 0xff, 0xff, 0xff]);
        assert!(result.is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.bin");
        let params = Params {
            weights: vec![0.25],
            names: vec!["bhk".to_string()],
        };
        params.write_to(&path).unwrap();
        let restored = Params::read_from(&path).unwrap();
        assert_eq!(restored, params);
    }
}
