//! Typed columns and value marshalling.
//!
//! # Structure
//!
//! - `definition`: `Column`, `ColumnConfig` and the declarative `ColumnSpec`
//! - `type_mapping`: declared data types and their physical MySQL types
//! - `codec`: `Column::encode` / `Column::decode` and the datetime wire format

mod codec;
pub mod definition;
pub mod type_mapping;

pub use codec::{format_datetime, parse_datetime};
pub use definition::{Column, ColumnConfig, ColumnSpec};
pub use type_mapping::DataType;
