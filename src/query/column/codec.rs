//! Value marshalling between the application and the MySQL wire format.
//!
//! `encode` runs on every value written by INSERT/UPDATE and `decode` on every
//! value read back by SELECT. Only booleans, JSON and datetimes are converted;
//! every other type passes through unchanged.

use super::definition::Column;
use super::type_mapping::DataType;
use crate::error::{QueryError, Result};
use crate::value::Datum;
use chrono::{DateTime, NaiveDate, Utc};

/// Wire format of datetime values: millisecond precision, zero padded
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS.mmm` (UTC)
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Parse `YYYY-MM-DD HH:MM:SS[.frac]` as a UTC timestamp.
///
/// The fractional part is a decimal fraction of a second; digits past
/// nanosecond precision are ignored.
pub fn parse_datetime(text: &str) -> Result<DateTime<Utc>> {
    let malformed = || QueryError::Deserialization(format!("malformed datetime '{text}'"));

    let parts: Vec<&str> = text.trim().split(['-', ' ', ':', '.']).collect();
    if parts.len() != 6 && parts.len() != 7 {
        return Err(malformed());
    }
    let field = |idx: usize| parts[idx].parse::<u32>().map_err(|_| malformed());

    let year = parts[0].parse::<i32>().map_err(|_| malformed())?;
    let nanos = match parts.get(6) {
        Some(frac) if !frac.is_empty() && frac.bytes().all(|b| b.is_ascii_digit()) => {
            let digits: String = frac.chars().chain(std::iter::repeat('0')).take(9).collect();
            digits.parse::<u32>().map_err(|_| malformed())?
        }
        Some(_) => return Err(malformed()),
        None => 0,
    };

    let (month, day) = (field(1)?, field(2)?);
    let (hour, minute, second) = (field(3)?, field(4)?, field(5)?);

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_nano_opt(hour, minute, second, nanos))
        .map(|naive| naive.and_utc())
        .ok_or_else(malformed)
}

impl Column {
    /// Convert an application value into its wire representation.
    ///
    /// `Null` is replaced by the configured default (if any) first.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Serialization` when a JSON column receives a value
    /// JSON cannot represent (non-finite floats).
    pub fn encode(&self, value: Datum) -> Result<Datum> {
        let value = self.substitute_default(value);
        match self.data_type() {
            DataType::Boolean => Ok(Datum::Int(i64::from(value.is_truthy()))),
            DataType::Json => {
                let json = value.to_json().ok_or_else(|| {
                    QueryError::Serialization(format!(
                        "column '{}': value {value:?} cannot be represented as JSON",
                        self.name()
                    ))
                })?;
                serde_json::to_string(&json)
                    .map(Datum::Text)
                    .map_err(|e| QueryError::Serialization(format!("column '{}': {e}", self.name())))
            }
            DataType::DateTime(_) => encode_datetime(value).ok_or_else(|| {
                QueryError::Serialization(format!(
                    "column '{}': epoch milliseconds out of datetime range",
                    self.name()
                ))
            }),
            _ => Ok(value),
        }
    }

    /// Convert a wire value back into its application representation.
    ///
    /// `Null` is replaced by the configured default (if any) before decoding,
    /// so with a default set `decode` does not invert `encode` for nulls.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Deserialization` for malformed JSON or datetime text.
    pub fn decode(&self, value: Datum) -> Result<Datum> {
        let value = self.substitute_default(value);
        match self.data_type() {
            DataType::Boolean => Ok(Datum::Bool(value.is_truthy())),
            DataType::Json => match value {
                Datum::Text(text) => serde_json::from_str(&text).map(Datum::Json).map_err(|e| {
                    QueryError::Deserialization(format!("column '{}': {e}", self.name()))
                }),
                other => Ok(other),
            },
            DataType::DateTime(_) => match value {
                Datum::Text(text) => parse_datetime(&text).map(Datum::DateTime),
                other => Ok(other),
            },
            _ => Ok(value),
        }
    }

    fn substitute_default(&self, value: Datum) -> Datum {
        match (value, self.default_value()) {
            (Datum::Null, Some(default)) => default.clone(),
            (value, _) => value,
        }
    }
}

/// `None` when epoch milliseconds fall outside the representable range
fn encode_datetime(value: Datum) -> Option<Datum> {
    let millis = match value {
        Datum::Int(ms) => ms,
        // `as` saturates, so an out-of-range float lands on an i64 bound and fails below
        Datum::Float(ms) if ms.is_finite() => ms.trunc() as i64,
        Datum::Float(_) => return None,
        Datum::DateTime(dt) => return Some(Datum::Text(format_datetime(&dt))),
        other => return Some(other),
    };
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| Datum::Text(format_datetime(&dt)))
}
