//! End-to-end cleaning of a raw listing export into a design matrix.
//!
//! Stages, in order:
//! 1. parse each raw row (missing or unparseable fields drop the row)
//! 2. collapse rare locations into "other"
//! 3. drop units with under 300 sqft per bedroom
//! 4. per-location price-density band filter
//! 5. per-location BHK monotonicity filter
//! 6. drop units with bath >= bhk + 2
//! 7. one-hot encode against the surviving vocabulary
//!
//! Row drops are never errors. They are tallied in a [`CleaningReport`] and logged
//! once per stage.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::dataset::{CleanRecord, DesignMatrix, RawRecord};
use crate::preprocessing::collapse::{CategoryCollapser, FittedCategoryCollapser};
use crate::preprocessing::encoding::{FeatureEncoder, FeatureSchema, FittedFeatureEncoder};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::outliers::{
    bhk_monotonicity_filter, price_density_band_filter, remove_cramped_units,
    remove_excess_bathrooms,
};
use crate::preprocessing::parsing::{parse_record, RowRejection};
use crate::preprocessing::traits::{FittedTransformer, Transformer};

/// Row counts removed by each cleaning stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub raw_rows: usize,
    pub missing_fields: usize,
    pub unparseable_size: usize,
    pub unparseable_sqft: usize,
    pub distinct_locations: usize,
    pub kept_locations: usize,
    pub cramped_units: usize,
    pub price_density_outliers: usize,
    pub bhk_outliers: usize,
    pub excess_bathrooms: usize,
    pub final_rows: usize,
}

impl CleaningReport {
    /// Rows dropped across all stages.
    pub fn dropped_rows(&self) -> usize {
        self.raw_rows - self.final_rows
    }
}

/// Everything the cleaning run produced.
#[derive(Debug, Clone)]
pub struct CleaningOutput {
    pub records: Vec<CleanRecord>,
    pub collapser: FittedCategoryCollapser,
    pub encoder: FittedFeatureEncoder,
    pub matrix: DesignMatrix,
    pub report: CleaningReport,
}

impl CleaningOutput {
    pub fn schema(&self) -> &FeatureSchema {
        self.encoder.schema()
    }
}

/// Runs the cleaning stages over a full in-memory table.
#[derive(Debug, Clone, Default)]
pub struct CleaningPipeline {
    collapser: CategoryCollapser,
}

impl CleaningPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every raw row, tallying rejections into `report`.
    pub fn parse(&self, raw: &[RawRecord], report: &mut CleaningReport) -> Vec<CleanRecord> {
        report.raw_rows = raw.len();
        let mut records = Vec::with_capacity(raw.len());
        for row in raw {
            match parse_record(row) {
                Ok(record) => records.push(record),
                Err(RowRejection::MissingField(_)) => report.missing_fields += 1,
                Err(RowRejection::Parse(err)) if err.field() == "size" => {
                    report.unparseable_size += 1
                }
                Err(RowRejection::Parse(_)) => report.unparseable_sqft += 1,
            }
        }
        debug!(
            parsed = records.len(),
            missing = report.missing_fields,
            bad_size = report.unparseable_size,
            bad_sqft = report.unparseable_sqft,
            "parsed raw listings"
        );
        records
    }

    /// Run every stage and encode the survivors.
    ///
    /// # Errors
    /// [`PreprocessingError::EmptyData`] if the input is empty or no row survives.
    pub fn run(&self, raw: &[RawRecord]) -> Result<CleaningOutput, PreprocessingError> {
        let mut report = CleaningReport::default();
        let mut records = self.parse(raw, &mut report);
        if records.is_empty() {
            return Err(PreprocessingError::EmptyData(format!(
                "none of {} raw rows could be parsed",
                raw.len()
            )));
        }

        let locations: Vec<String> = records.iter().map(|r| r.location.clone()).collect();
        let collapser = self.collapser.fit(&locations)?;
        for (record, collapsed) in records.iter_mut().zip(collapser.transform(&locations)?) {
            record.location = collapsed;
        }
        report.distinct_locations = collapser.n_distinct_seen();
        debug!(
            distinct = collapser.n_distinct_seen(),
            kept = collapser.vocabulary().len(),
            "collapsed rare locations"
        );

        let records = tally(records, remove_cramped_units, &mut report.cramped_units);
        let records = tally(records, price_density_band_filter, &mut report.price_density_outliers);
        let records = tally(records, bhk_monotonicity_filter, &mut report.bhk_outliers);
        let records = tally(records, remove_excess_bathrooms, &mut report.excess_bathrooms);

        if records.is_empty() {
            warn!("every listing was removed by the outlier filters");
            return Err(PreprocessingError::EmptyData(
                "no listings survived outlier filtering".to_string(),
            ));
        }

        let vocabulary = collapser
            .vocabulary()
            .restrict_to(records.iter().map(|r| r.location.as_str()));
        if vocabulary.len() < collapser.vocabulary().len() {
            debug!(
                emptied = collapser.vocabulary().len() - vocabulary.len(),
                "dropped location columns with no surviving rows"
            );
        }
        let encoder = FeatureEncoder::with_vocabulary(vocabulary);
        let matrix = encoder.transform(&records)?;

        report.kept_locations = encoder.schema().vocabulary().len();
        report.final_rows = records.len();
        info!(
            raw = report.raw_rows,
            kept = report.final_rows,
            dropped = report.dropped_rows(),
            features = matrix.n_features(),
            "cleaned listings"
        );

        Ok(CleaningOutput {
            records,
            collapser,
            encoder,
            matrix,
            report,
        })
    }
}

fn tally<F>(records: Vec<CleanRecord>, stage: F, removed: &mut usize) -> Vec<CleanRecord>
where
    F: FnOnce(Vec<CleanRecord>) -> Vec<CleanRecord>,
{
    let before = records.len();
    let after = stage(records);
    *removed = before - after.len();
    after
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::collapse::OTHER_LOCATION;

    fn raw(location: &str, size: &str, sqft: &str, bath: u32, price: f64) -> RawRecord {
        RawRecord {
            location: Some(location.to_string()),
            size: Some(size.to_string()),
            total_sqft: Some(sqft.to_string()),
            bath: Some(bath),
            price: Some(price),
        }
    }

    /// Twelve well-behaved 2 BHK rows per location at a narrow price band.
    fn neighbourhood(location: &str, base_price: f64) -> Vec<RawRecord> {
        (0..12)
            .map(|i| raw(location, "2 BHK", "1000", 2, base_price + f64::from(i % 3)))
            .collect()
    }

    #[test]
    fn test_run_counts_every_stage() {
        let mut rows = neighbourhood("Whitefield", 60.0);
        rows.extend(neighbourhood("Hebbal", 80.0));
        rows.push(raw("Rare Lane", "2 BHK", "1100", 2, 50.0));
        rows.push(raw("Hebbal", "2 BHK", "34.46Sq. Meter", 2, 50.0));
        rows.push(raw("Hebbal", "BHK", "1000", 2, 50.0));
        rows.push(RawRecord::default());
        rows.push(raw("Whitefield", "6 Bedroom", "1020", 2, 60.0));

        let output = CleaningPipeline::new().run(&rows).unwrap();
        let report = &output.report;

        assert_eq!(report.raw_rows, 29);
        assert_eq!(report.missing_fields, 1);
        assert_eq!(report.unparseable_sqft, 1);
        assert_eq!(report.unparseable_size, 1);
        assert_eq!(report.distinct_locations, 3);
        assert_eq!(report.cramped_units, 1);
        assert_eq!(report.kept_locations, 2);
        assert_eq!(report.final_rows, output.records.len());
        assert_eq!(output.matrix.n_rows(), output.records.len());
        assert_eq!(
            output.schema().columns(),
            vec!["total_sqft", "bath", "bhk", "Hebbal", "Whitefield"]
        );
        assert!(output
            .records
            .iter()
            .all(|r| r.location != "Rare Lane"));
    }

    #[test]
    fn test_rare_locations_become_other() {
        let mut rows = neighbourhood("Whitefield", 60.0);
        rows.push(raw("Rare Lane", "2 BHK", "1000", 2, 61.0));
        let output = CleaningPipeline::new().run(&rows).unwrap();
        assert!(output.records.iter().any(|r| r.location == OTHER_LOCATION));
        let other_row = output
            .records
            .iter()
            .position(|r| r.location == OTHER_LOCATION)
            .unwrap();
        assert_eq!(output.matrix.features()[[other_row, 3]], 0.0);
    }

    #[test]
    fn test_records_satisfy_clean_invariants() {
        let mut rows = neighbourhood("Whitefield", 60.0);
        // Lands alone in "other", so only the bathroom rule can remove it.
        rows.push(raw("Solo Street", "1 BHK", "600", 4, 30.0));
        let output = CleaningPipeline::new().run(&rows).unwrap();
        for record in &output.records {
            assert!(record.sqft_per_bedroom() >= 300.0);
            assert!(record.bath.saturating_sub(record.bhk) < 2);
        }
        assert_eq!(output.report.excess_bathrooms, 1);
    }

    #[test]
    fn test_overflowing_price_does_not_empty_its_location() {
        let mut rows = neighbourhood("Whitefield", 60.0);
        rows.extend(neighbourhood("Hebbal", 80.0));
        let baseline = CleaningPipeline::new().run(&rows).unwrap();

        rows.push(raw("Hebbal", "2 BHK", "1000", 2, 1e304));
        let output = CleaningPipeline::new().run(&rows).unwrap();

        let hebbal = |out: &CleaningOutput| {
            out.records.iter().filter(|r| r.location == "Hebbal").count()
        };
        assert!(hebbal(&baseline) > 0);
        assert_eq!(hebbal(&output), hebbal(&baseline));
        assert_eq!(output.report.missing_fields, 1);
    }

    #[test]
    fn test_largest_bedroom_count_survives_every_stage() {
        let mut rows = neighbourhood("Whitefield", 60.0);
        rows.push(raw("Solo Street", "4294967295 BHK", "1300000000000", 3, 50.0));
        let output = CleaningPipeline::new().run(&rows).unwrap();
        assert!(output.records.iter().any(|r| r.bhk == u32::MAX));
        assert_eq!(output.report.excess_bathrooms, 0);
    }

    #[test]
    fn test_run_rejects_unusable_input() {
        let rows = vec![raw("Whitefield", "2 BHK", "34.46Sq. Meter", 2, 60.0)];
        assert!(matches!(
            CleaningPipeline::new().run(&rows),
            Err(PreprocessingError::EmptyData(_))
        ));
        assert!(CleaningPipeline::new().run(&[]).is_err());
    }
}
