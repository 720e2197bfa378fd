//! Dynamic values and rows.
//!
//! [`Datum`] is the value type that flows through the crate in both directions:
//! application values handed to [`Table`](crate::Table) operations, the encoded
//! values bound to statements, and the values returned by the executor.
//! [`Row`] is an insertion-ordered set of named datums.
//!
//! ```rust
//! use schemaquery::{Datum, Row};
//! use serde_json::json;
//!
//! let row = Row::try_from(json!({ "id": 7, "name": "Ada" })).unwrap();
//! assert_eq!(row.get("id"), Some(&Datum::Int(7)));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// A single SQL-facing value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Datum {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Structured value destined for (or parsed from) a JSON column
    Json(serde_json::Value),
    DateTime(DateTime<Utc>),
}

impl Datum {
    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    /// Loose truthiness used by the boolean codec and stamp population.
    ///
    /// `Null`, `false`, `0`, `0.0`, `NaN` and the empty string are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Datum::Null => false,
            Datum::Bool(b) => *b,
            Datum::Int(i) => *i != 0,
            Datum::Float(f) => *f != 0.0 && !f.is_nan(),
            Datum::Text(s) => !s.is_empty(),
            Datum::Json(_) | Datum::DateTime(_) => true,
        }
    }

    /// Convert into a `serde_json::Value`.
    ///
    /// Returns `None` for non-finite floats, which JSON cannot represent.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        Some(match self {
            Datum::Null => serde_json::Value::Null,
            Datum::Bool(b) => serde_json::Value::Bool(*b),
            Datum::Int(i) => serde_json::Value::from(*i),
            Datum::Float(f) => serde_json::Value::Number(serde_json::Number::from_f64(*f)?),
            Datum::Text(s) => serde_json::Value::String(s.clone()),
            Datum::Json(v) => v.clone(),
            Datum::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
        })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Datum::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Datum {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Datum::Null,
            serde_json::Value::Bool(b) => Datum::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Datum::Int(i),
                None => Datum::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Datum::Text(s),
            other => Datum::Json(other),
        }
    }
}

impl From<bool> for Datum {
    fn from(v: bool) -> Self {
        Datum::Bool(v)
    }
}

impl From<i32> for Datum {
    fn from(v: i32) -> Self {
        Datum::Int(i64::from(v))
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Datum::Int(v)
    }
}

impl From<u32> for Datum {
    fn from(v: u32) -> Self {
        Datum::Int(i64::from(v))
    }
}

impl From<f64> for Datum {
    fn from(v: f64) -> Self {
        Datum::Float(v)
    }
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Datum::Text(v.to_string())
    }
}

impl From<String> for Datum {
    fn from(v: String) -> Self {
        Datum::Text(v)
    }
}

impl From<DateTime<Utc>> for Datum {
    fn from(v: DateTime<Utc>) -> Self {
        Datum::DateTime(v)
    }
}

impl<T: Into<Datum>> From<Option<T>> for Datum {
    fn from(v: Option<T>) -> Self {
        v.map_or(Datum::Null, Into::into)
    }
}

impl<'de> Deserialize<'de> for Datum {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Datum::from)
    }
}

/// Render through sea-query's value model (used by the MySQL escaper)
impl From<&Datum> for sea_query::Value {
    fn from(datum: &Datum) -> Self {
        match datum {
            Datum::Null => sea_query::Value::String(None),
            Datum::Bool(b) => sea_query::Value::from(*b),
            Datum::Int(i) => sea_query::Value::from(*i),
            // MySQL has no NaN or infinity
            Datum::Float(f) if !f.is_finite() => sea_query::Value::Double(None),
            Datum::Float(f) => sea_query::Value::from(*f),
            Datum::Text(s) => sea_query::Value::from(s.clone()),
            Datum::Json(v) => sea_query::Value::from(v.to_string()),
            Datum::DateTime(dt) => sea_query::Value::from(crate::query::column::format_datetime(dt)),
        }
    }
}

/// An insertion-ordered mapping from field name to [`Datum`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    entries: Vec<(String, Datum)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Datum>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Datum> {
        self.entries.iter().find(|(name, _)| name == field).map(|(_, v)| v)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == field)
    }

    /// Insert a value, replacing an existing entry in place (keeps its position).
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Datum>) {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    pub fn remove(&mut self, field: &str) -> Option<Datum> {
        let idx = self.entries.iter().position(|(name, _)| name == field)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Datum)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl<K: Into<String>, V: Into<Datum>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (field, value) in iter {
            row.insert(field, value);
        }
        row
    }
}

impl IntoIterator for Row {
    type Item = (String, Datum);
    type IntoIter = std::vec::IntoIter<(String, Datum)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Row {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().collect()
    }
}

impl TryFrom<serde_json::Value> for Row {
    type Error = crate::QueryError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Object(map) => Ok(Row::from(map)),
            other => Err(crate::QueryError::InvalidQuery(format!(
                "row data must be a JSON object, got {other}"
            ))),
        }
    }
}
