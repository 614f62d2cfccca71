//! Data-topic payload decoder.
//!
//! Wire contract (field names are fixed by the sensor firmware):
//!
//! ```json
//! {"suhu": 25.1, "kelembaban_udara": 60, "kelembaban_tanah": 80,
//!  "ldr": 1, "waktu": "2025-03-01 08:30:00"}
//! ```
//!
//! Decoding never panics: every malformed input maps to a [`DecodeError`]
//! that the caller logs and discards.

use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value};

use super::reading::SensorReading;
use crate::error::DecodeError;

pub const FIELD_TEMPERATURE: &str = "suhu";
pub const FIELD_AIR_HUMIDITY: &str = "kelembaban_udara";
pub const FIELD_SOIL_HUMIDITY: &str = "kelembaban_tanah";
pub const FIELD_LIGHT: &str = "ldr";
pub const FIELD_TIMESTAMP: &str = "waktu";

/// Naive formats tried in order after RFC 3339.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse one data-topic payload into a [`SensorReading`].
pub fn decode(payload: &[u8]) -> Result<SensorReading, DecodeError> {
    let text = core::str::from_utf8(payload).map_err(|_| DecodeError::Utf8)?;
    let value: Value =
        serde_json::from_str(text).map_err(|e| DecodeError::Json(e.to_string()))?;
    let Value::Object(obj) = value else {
        return Err(DecodeError::Json("payload is not an object".to_string()));
    };

    let temperature = number(&obj, FIELD_TEMPERATURE)?;
    let air_humidity = number(&obj, FIELD_AIR_HUMIDITY)?;
    let soil_humidity = number(&obj, FIELD_SOIL_HUMIDITY)?;
    let light = light(&obj)?;
    let timestamp = timestamp(&obj)?;

    Ok(SensorReading::new(
        timestamp,
        temperature,
        air_humidity,
        soil_humidity,
        light,
    ))
}

/// Parse a `waktu` string in any accepted format.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, DecodeError> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| DecodeError::InvalidTimestamp(raw.to_string()))
}

// ── Field helpers ─────────────────────────────────────────────

fn field<'a>(obj: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value, DecodeError> {
    match obj.get(name) {
        None | Some(Value::Null) => Err(DecodeError::MissingField(name)),
        Some(v) => Ok(v),
    }
}

fn number(obj: &Map<String, Value>, name: &'static str) -> Result<f32, DecodeError> {
    let v = field(obj, name)?
        .as_f64()
        .ok_or(DecodeError::InvalidField(name))?;
    let v = v as f32;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(DecodeError::InvalidField(name))
    }
}

fn light(obj: &Map<String, Value>) -> Result<bool, DecodeError> {
    match field(obj, FIELD_LIGHT)? {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(DecodeError::InvalidField(FIELD_LIGHT)),
        },
        _ => Err(DecodeError::InvalidField(FIELD_LIGHT)),
    }
}

fn timestamp(obj: &Map<String, Value>) -> Result<NaiveDateTime, DecodeError> {
    match field(obj, FIELD_TIMESTAMP)? {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => {
            let secs = n.as_f64().ok_or(DecodeError::InvalidField(FIELD_TIMESTAMP))?;
            if !secs.is_finite() || secs < 0.0 {
                return Err(DecodeError::InvalidField(FIELD_TIMESTAMP));
            }
            let whole = secs.trunc();
            let nanos = ((secs - whole) * 1e9) as u32;
            DateTime::from_timestamp(whole as i64, nanos)
                .map(|dt| dt.naive_utc())
                .ok_or(DecodeError::InvalidField(FIELD_TIMESTAMP))
        }
        _ => Err(DecodeError::InvalidField(FIELD_TIMESTAMP)),
    }
}
