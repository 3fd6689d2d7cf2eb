//! Listing records as they move through the cleaning pipeline.

use serde::{Deserialize, Deserializer, Serialize};

/// Multiplier converting a price in lakhs to rupees.
pub const LAKH: f64 = 100_000.0;

/// One row of the raw listing export.
///
/// Every field is optional because the export contains blanks. Columns other than
/// these five (area_type, society, balcony, availability) are ignored on read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub total_sqft: Option<String>,
    #[serde(default, deserialize_with = "count_from_real")]
    pub bath: Option<u32>,
    #[serde(default, deserialize_with = "real_or_none")]
    pub price: Option<f64>,
}

/// A parsed listing with numeric features.
///
/// `price_per_sqft` only feeds the outlier filters; it never reaches the
/// feature schema.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub location: String,
    pub total_sqft: f64,
    pub bath: u32,
    pub bhk: u32,
    /// Price in lakhs.
    pub price: f64,
    pub price_per_sqft: f64,
}

impl CleanRecord {
    /// Build a record and derive its price per square foot.
    pub fn new(
        location: impl Into<String>,
        total_sqft: f64,
        bath: u32,
        bhk: u32,
        price: f64,
    ) -> Self {
        Self {
            location: location.into(),
            total_sqft,
            bath,
            bhk,
            price,
            price_per_sqft: price * LAKH / total_sqft,
        }
    }

    /// Square feet available per bedroom.
    pub fn sqft_per_bedroom(&self) -> f64 {
        self.total_sqft / f64::from(self.bhk)
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

// Exports write counts as reals ("2.0") because the column contains blanks.
fn count_from_real<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = real_or_none(deserializer)?;
    Ok(value
        .filter(|v| *v >= 0.0 && v.fract() == 0.0 && *v <= f64::from(u32::MAX))
        .map(|v| v as u32))
}

fn real_or_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite()))
}
