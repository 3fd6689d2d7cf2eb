//! Request and response bodies of the price-estimate endpoint.
//!
//! Request: `{"location": "Hebbal", "sqft": 1200, "bath": 2, "bhk": 2}`. Numeric
//! fields may also arrive as strings (`"1200"`), as HTML forms send them.
//! Response: `{"estimated_price": 74.3}`, in lakhs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::serving::error::QueryError;

/// A validated price query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuery {
    pub location: String,
    pub sqft: f64,
    pub bath: u32,
    pub bhk: u32,
}

impl PriceQuery {
    /// Validate already-typed fields.
    ///
    /// The location is kept verbatim, since lookup is exact and case-sensitive.
    /// `sqft` must be finite and positive and `bhk` non-zero.
    pub fn new(location: &str, sqft: f64, bath: u32, bhk: u32) -> Result<Self, QueryError> {
        if location.trim().is_empty() {
            return Err(QueryError::invalid("location", "must not be blank"));
        }
        if !sqft.is_finite() || sqft <= 0.0 {
            return Err(QueryError::invalid("sqft", "must be a positive number"));
        }
        if bhk == 0 {
            return Err(QueryError::invalid("bhk", "must be at least 1"));
        }
        Ok(Self {
            location: location.to_string(),
            sqft,
            bath,
            bhk,
        })
    }

    /// Parse and validate a JSON request body.
    pub fn from_json_str(body: &str) -> Result<Self, QueryError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|err| QueryError::MalformedRequest(err.to_string()))?;
        Self::from_json(&value)
    }

    pub fn from_json(value: &Value) -> Result<Self, QueryError> {
        let body = value
            .as_object()
            .ok_or_else(|| QueryError::MalformedRequest("expected a JSON object".to_string()))?;

        let location = match field(body, "location")? {
            Value::String(s) => s.as_str(),
            _ => return Err(QueryError::invalid("location", "must be a string")),
        };
        let sqft = real(body, "sqft")?;
        let bath = count(body, "bath")?;
        let bhk = count(body, "bhk")?;

        Self::new(location, sqft, bath, bhk)
    }
}

/// The estimate returned for a query, in lakhs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub estimated_price: f64,
}

fn field<'a>(body: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value, QueryError> {
    match body.get(name) {
        None | Some(Value::Null) => Err(QueryError::MissingField(name)),
        Some(value) => Ok(value),
    }
}

fn real(body: &Map<String, Value>, name: &'static str) -> Result<f64, QueryError> {
    let parsed = match field(body, name)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| QueryError::invalid(name, "must be a number"))
}

fn count(body: &Map<String, Value>, name: &'static str) -> Result<u32, QueryError> {
    let value = real(body, name)?;
    if value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
        return Err(QueryError::invalid(name, "must be a non-negative whole number"));
    }
    Ok(value as u32)
}
