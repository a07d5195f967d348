//! Response mapper
//!
//! Turns raw response bodies into typed values. Shapes are declared as
//! [`FieldSpec`] tables; one parser applies defaults and invariants for
//! every shape, nested ones included.

pub mod field;
pub mod record;

pub use field::{DefaultValue, FieldSpec, FieldType, FieldValue, Invariant};
pub use record::{
    map_keyed, map_list, map_record, map_rows_list, parse_json, parse_record, parse_rows_list, FromRecord,
    Record, RowsList,
};
