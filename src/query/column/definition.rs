//! Column definition metadata.
//!
//! This module provides [`Column`], the immutable descriptor of one field of a
//! table, and [`ColumnConfig`], the constraint flags it is declared with.

use super::type_mapping::DataType;
use crate::value::Datum;
use serde::Deserialize;

/// Constraint flags for a column
///
/// Field names also accept the camelCase spelling so schema files written for
/// the JSON-style declaration format load unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Whether UPDATE may change the column (forced off for primary keys)
    pub mutable: bool,
    pub nullable: bool,
    pub unsigned: bool,
    #[serde(alias = "autoIncrement")]
    pub auto_increment: bool,
    /// Substituted for `Null` on both encode and decode
    #[serde(alias = "defaultValue")]
    pub default_value: Option<Datum>,
    #[serde(alias = "primaryKey")]
    pub primary_key: bool,
    pub index: bool,
    pub unique: bool,
    /// Overwrite a `createdStamp` column on insert even if a value was supplied
    #[serde(alias = "alwaysSetCreatedStamp")]
    pub always_set_created_stamp: bool,
    /// Overwrite an `updatedStamp` column on update even if a value was supplied
    #[serde(alias = "alwaysSetUpdatedStamp")]
    pub always_set_updated_stamp: bool,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            mutable: true,
            nullable: false,
            unsigned: false,
            auto_increment: false,
            default_value: None,
            primary_key: false,
            index: false,
            unique: false,
            always_set_created_stamp: false,
            always_set_updated_stamp: false,
        }
    }
}

/// One field of a table: its declared type, constraints and derived MySQL type
///
/// Columns are immutable once constructed; the physical type is resolved here
/// and never recomputed.
///
/// # Example
///
/// ```rust
/// use schemaquery::{Column, ColumnConfig};
///
/// let id = Column::new("id", "string", ColumnConfig {
///     primary_key: true,
///     ..Default::default()
/// });
/// assert_eq!(id.physical_type(), "varchar(119)");
/// assert!(!id.is_mutable());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data_type: DataType,
    physical_type: String,
    config: ColumnConfig,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<DataType>, mut config: ColumnConfig) -> Self {
        let data_type = data_type.into();
        if config.primary_key {
            config.mutable = false;
        }
        let physical_type = data_type.physical(config.index || config.primary_key);
        Self {
            name: name.into(),
            data_type,
            physical_type,
            config,
        }
    }

    /// Column with default constraints
    pub fn simple(name: impl Into<String>, data_type: impl Into<DataType>) -> Self {
        Self::new(name, data_type, ColumnConfig::default())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn physical_type(&self) -> &str {
        &self.physical_type
    }

    pub fn config(&self) -> &ColumnConfig {
        &self.config
    }

    pub fn is_mutable(&self) -> bool {
        self.config.mutable
    }

    pub fn is_nullable(&self) -> bool {
        self.config.nullable
    }

    pub fn is_unsigned(&self) -> bool {
        self.config.unsigned
    }

    pub fn is_primary_key(&self) -> bool {
        self.config.primary_key
    }

    pub fn has_index(&self) -> bool {
        self.config.index
    }

    pub fn is_unique(&self) -> bool {
        self.config.unique
    }

    pub fn is_auto_increment(&self) -> bool {
        self.config.auto_increment
    }

    pub fn default_value(&self) -> Option<&Datum> {
        self.config.default_value.as_ref()
    }

    pub fn always_set_created_stamp(&self) -> bool {
        self.config.always_set_created_stamp
    }

    pub fn always_set_updated_stamp(&self) -> bool {
        self.config.always_set_updated_stamp
    }
}

/// Declarative column entry, as found in schema files
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(alias = "dataType")]
    pub data_type: DataType,
    #[serde(default)]
    pub config: ColumnConfig,
}

impl From<ColumnSpec> for Column {
    fn from(spec: ColumnSpec) -> Self {
        Column::new(spec.name, spec.data_type, spec.config)
    }
}
