//! Listing records, CSV ingestion and the in-memory design matrix.

use std::path::Path;

use tracing::debug;

pub mod listing;
pub mod memory;

pub use self::listing::{CleanRecord, RawRecord, LAKH};
pub use self::memory::DesignMatrix;

use crate::preprocessing::error::PreprocessingError;

/// Read every row of a raw listing export.
///
/// Rows are matched by header name, so column order and extra columns do not matter.
pub fn read_raw_records<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>, PreprocessingError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path.as_ref())?;
    let records = reader
        .deserialize()
        .collect::<Result<Vec<RawRecord>, csv::Error>>()?;
    debug!(rows = records.len(), path = %path.as_ref().display(), "read raw listings");
    Ok(records)
}

/// Write the design matrix as CSV: schema columns followed by `price`.
pub fn write_design_matrix<P: AsRef<Path>>(
    path: P,
    matrix: &DesignMatrix,
) -> Result<(), PreprocessingError> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;

    let mut header = matrix.schema().columns();
    header.push("price".to_string());
    writer.write_record(&header)?;

    for (row, price) in matrix.features().rows().into_iter().zip(matrix.target().iter()) {
        let fields = row
            .iter()
            .chain(std::iter::once(price))
            .map(|value| value.to_string());
        writer.write_record(fields)?;
    }
    writer.flush()?;
    debug!(rows = matrix.n_rows(), path = %path.as_ref().display(), "wrote design matrix");
    Ok(())
}
