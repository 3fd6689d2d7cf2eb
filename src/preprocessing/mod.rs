//! Cleaning and encoding of raw Bengaluru listings.
//!
//! Fitted components follow the same type-state split as the model:
//!
//! - [`Transformer`]: unfitted, learns from data
//! - [`FittedTransformer`]: frozen state, applied to new data
//!
//! # Stages
//!
//! - [`parsing`]: normalize the `size` and `total_sqft` text fields
//! - [`collapse`]: merge rare locations into [`OTHER_LOCATION`]
//! - [`outliers`]: per-location price-density and BHK filters, plausibility rules
//! - [`encoding`]: one-hot layout, the [`FeatureSchema`]
//! - [`pipeline`]: all of the above, in order, with a [`CleaningReport`]
//!
//! # Example
//!
//! ```ignore
//! use homeprice::dataset::read_raw_records;
//! use homeprice::preprocessing::CleaningPipeline;
//!
//! let raw = read_raw_records("bengaluru_house_prices.csv")?;
//! let output = CleaningPipeline::new().run(&raw)?;
//! println!("{} rows, {} features", output.matrix.n_rows(), output.matrix.n_features());
//! ```

pub mod collapse;
pub mod encoding;
pub mod error;
pub mod outliers;
pub mod parsing;
pub mod pipeline;
pub mod traits;

pub use collapse::{
    CategoryCollapser, FittedCategoryCollapser, LocationVocabulary, MIN_LOCATION_COUNT,
    OTHER_LOCATION,
};
pub use encoding::{FeatureEncoder, FeatureSchema, FittedFeatureEncoder, NUMERIC_COLUMNS};
pub use error::{ParseError, PreprocessingError};
pub use outliers::{
    bhk_monotonicity_filter, price_density_band_filter, remove_cramped_units,
    remove_excess_bathrooms, GroupStats,
};
pub use parsing::{parse_bedroom_count, parse_record, parse_square_footage, RowRejection};
pub use pipeline::{CleaningOutput, CleaningPipeline, CleaningReport};
pub use traits::{FittedTransformer, Transformer};
