//! Normalization of irregular raw listing fields.
//!
//! Listing exports carry bedroom counts as free text ("2 BHK", "4 Bedroom") and
//! areas either as plain numbers, as "N - M" ranges, or with unit suffixes that
//! cannot be converted reliably. These parsers turn the usable shapes into numbers
//! and reject everything else with a [`ParseError`].

use crate::dataset::{CleanRecord, RawRecord};
use crate::preprocessing::error::ParseError;

const SIZE_FIELD: &str = "size";
const SQFT_FIELD: &str = "total_sqft";

/// Parse the bedroom count from a size label such as `"2 BHK"` or `"4 Bedroom"`.
///
/// Only the leading whitespace-delimited token is considered.
///
/// # Errors
/// [`ParseError`] if the field is empty, the token is not an unsigned integer, or
/// the count is zero.
pub fn parse_bedroom_count(raw: &str) -> Result<u32, ParseError> {
    let token = raw
        .split_whitespace()
        .next()
        .ok_or(ParseError::Empty { field: SIZE_FIELD })?;
    let count: u32 = token
        .parse()
        .map_err(|_| ParseError::unparseable(SIZE_FIELD, raw))?;
    if count == 0 {
        return Err(ParseError::OutOfRange {
            field: SIZE_FIELD,
            raw: raw.to_string(),
        });
    }
    Ok(count)
}

/// Parse a square-footage field.
///
/// A plain real number is returned as is. A `"W - H"` range with exactly one dash
/// resolves to the mean of both ends. Anything else, including unit-suffixed values
/// like `"34.46Sq. Meter"`, is rejected.
///
/// # Example
/// ```
/// use homeprice::preprocessing::parse_square_footage;
///
/// assert_eq!(parse_square_footage("1200").unwrap(), 1200.0);
/// assert_eq!(parse_square_footage("2100 - 2850").unwrap(), 2475.0);
/// assert!(parse_square_footage("34.46Sq. Meter").is_err());
/// ```
pub fn parse_square_footage(raw: &str) -> Result<f64, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty { field: SQFT_FIELD });
    }

    let area = match trimmed.parse::<f64>() {
        Ok(value) => value,
        Err(_) => parse_range_midpoint(trimmed)
            .ok_or_else(|| ParseError::unparseable(SQFT_FIELD, raw))?,
    };

    if !area.is_finite() || area <= 0.0 {
        return Err(ParseError::OutOfRange {
            field: SQFT_FIELD,
            raw: raw.to_string(),
        });
    }
    Ok(area)
}

fn parse_range_midpoint(text: &str) -> Option<f64> {
    if text.matches('-').count() != 1 {
        return None;
    }
    let (low, high) = text.split_once('-')?;
    let low: f64 = low.trim().parse().ok()?;
    let high: f64 = high.trim().parse().ok()?;
    Some((low + high) / 2.0)
}

/// Why a raw listing did not become a [`CleanRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum RowRejection {
    /// A required column was blank.
    MissingField(&'static str),
    /// A text column could not be parsed.
    Parse(ParseError),
}

impl From<ParseError> for RowRejection {
    fn from(err: ParseError) -> Self {
        RowRejection::Parse(err)
    }
}

/// Turn one raw listing into a typed record.
///
/// The location is trimmed. Price and area must be strictly positive, and a price
/// so large that its price per square foot overflows counts as unusable.
pub fn parse_record(raw: &RawRecord) -> Result<CleanRecord, RowRejection> {
    let location = raw
        .location
        .as_deref()
        .map(str::trim)
        .filter(|loc| !loc.is_empty())
        .ok_or(RowRejection::MissingField("location"))?;
    let size = raw
        .size
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(RowRejection::MissingField(SIZE_FIELD))?;
    let sqft = raw
        .total_sqft
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(RowRejection::MissingField(SQFT_FIELD))?;
    let bath = raw.bath.ok_or(RowRejection::MissingField("bath"))?;
    let price = raw
        .price
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or(RowRejection::MissingField("price"))?;

    let bhk = parse_bedroom_count(size)?;
    let total_sqft = parse_square_footage(sqft)?;

    let record = CleanRecord::new(location, total_sqft, bath, bhk, price);
    if !record.price_per_sqft.is_finite() {
        return Err(RowRejection::MissingField("price"));
    }
    Ok(record)
}
