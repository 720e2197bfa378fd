//! Declared data types and their MySQL physical types.
//!
//! [`DataType`] is parsed from the type string a schema declares. The logical
//! types (`boolean`, `json`, `string`, `number`, the stamps) map onto a fixed
//! physical type; the SQL families (`int(11)`, `varchar(64)`, `text`, ...)
//! and anything unrecognized are passed to the server verbatim.

use serde::Deserialize;
use std::fmt;

/// Width of an unindexed `string` column
pub const VARCHAR_DEFAULT_WIDTH: u32 = 255;
/// Width of an indexed or primary `string` column; keeps the key within the
/// engine's index length limit for utf8mb4.
pub const VARCHAR_INDEXED_WIDTH: u32 = 119;

/// Logical data type of a column
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum DataType {
    Boolean,
    Json,
    String,
    Number,
    Stamp,
    CreatedStamp,
    UpdatedStamp,
    /// `datetime`, optionally with fractional-second precision (`datetime(3)`)
    DateTime(Option<u8>),
    /// `int`, `tinyint(4)`, `bigint(20)`, ...
    Integer(String),
    /// `varchar(N)`
    Varchar(u32),
    /// `tinytext`, `text`, `mediumtext`, `longtext`
    Text(String),
    /// Any other SQL type, used as-is
    Raw(String),
}

impl DataType {
    /// Resolve the physical MySQL type for this logical type
    pub fn physical(&self, indexed: bool) -> String {
        match self {
            DataType::Boolean => "tinyint(1)".to_string(),
            DataType::Json => "text".to_string(),
            DataType::String if indexed => format!("varchar({VARCHAR_INDEXED_WIDTH})"),
            DataType::String => format!("varchar({VARCHAR_DEFAULT_WIDTH})"),
            DataType::Number
            | DataType::Stamp
            | DataType::CreatedStamp
            | DataType::UpdatedStamp => "int(11)".to_string(),
            DataType::DateTime(None) => "datetime".to_string(),
            DataType::DateTime(Some(fsp)) => format!("datetime({fsp})"),
            DataType::Integer(raw) | DataType::Text(raw) | DataType::Raw(raw) => raw.clone(),
            DataType::Varchar(width) => format!("varchar({width})"),
        }
    }
}

fn is_integer_family(lower: &str) -> bool {
    const FAMILY: [&str; 5] = ["tinyint", "smallint", "mediumint", "bigint", "int"];
    FAMILY.iter().any(|base| match lower.strip_prefix(base) {
        Some("") => true,
        Some(rest) => parse_width(rest).is_some(),
        None => false,
    })
}

fn parse_width(rest: &str) -> Option<u32> {
    rest.strip_prefix('(')?.strip_suffix(')')?.trim().parse().ok()
}

impl From<&str> for DataType {
    fn from(declared: &str) -> Self {
        let trimmed = declared.trim();
        match trimmed {
            "boolean" | "bool" => return DataType::Boolean,
            "json" => return DataType::Json,
            "string" => return DataType::String,
            "number" => return DataType::Number,
            "stamp" => return DataType::Stamp,
            "createdStamp" => return DataType::CreatedStamp,
            "updatedStamp" => return DataType::UpdatedStamp,
            _ => {}
        }

        let lower = trimmed.to_lowercase();
        let verbatim = || trimmed.to_string();
        if lower == "datetime" {
            DataType::DateTime(None)
        } else if let Some(fsp) = lower.strip_prefix("datetime").and_then(parse_width) {
            match u8::try_from(fsp) {
                Ok(fsp) => DataType::DateTime(Some(fsp)),
                Err(_) => DataType::Raw(verbatim()),
            }
        } else if let Some(width) = trimmed.strip_prefix("varchar").and_then(parse_width) {
            // only the canonical spelling, so `physical` reproduces it exactly
            if format!("varchar({width})") == trimmed {
                DataType::Varchar(width)
            } else {
                DataType::Raw(verbatim())
            }
        } else if matches!(lower.as_str(), "tinytext" | "text" | "mediumtext" | "longtext") {
            DataType::Text(verbatim())
        } else if is_integer_family(&lower) {
            DataType::Integer(verbatim())
        } else {
            DataType::Raw(verbatim())
        }
    }
}

impl From<String> for DataType {
    fn from(declared: String) -> Self {
        DataType::from(declared.as_str())
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Boolean => f.write_str("boolean"),
            DataType::Json => f.write_str("json"),
            DataType::String => f.write_str("string"),
            DataType::Number => f.write_str("number"),
            DataType::Stamp => f.write_str("stamp"),
            DataType::CreatedStamp => f.write_str("createdStamp"),
            DataType::UpdatedStamp => f.write_str("updatedStamp"),
            DataType::DateTime(None) => f.write_str("datetime"),
            DataType::DateTime(Some(fsp)) => write!(f, "datetime({fsp})"),
            DataType::Varchar(width) => write!(f, "varchar({width})"),
            DataType::Integer(raw) | DataType::Text(raw) | DataType::Raw(raw) => f.write_str(raw),
        }
    }
}
