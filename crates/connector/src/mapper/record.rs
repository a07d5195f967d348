//! Generic record parser driven by [`FieldSpec`] tables

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

use super::field::{FieldSpec, FieldType, FieldValue};
use crate::errors::{ConnectorError, Result};

/// Parsed JSON object, fields kept in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(&'static str, FieldValue)>,
}

/// Paginated `{ "total": n, "rows": [...] }` response
///
/// `total` counts every matching row on the server; `rows` is one page and
/// is usually shorter.
#[derive(Debug, Clone, PartialEq)]
pub struct RowsList<T> {
    pub total: u64,
    pub rows: Vec<T>,
}

impl<T> RowsList<T> {
    /// Convert every row, keeping `total`
    pub fn try_map<U, F>(self, f: F) -> Result<RowsList<U>>
    where
        F: FnMut(T) -> Result<U>,
    {
        Ok(RowsList {
            total: self.total,
            rows: self.rows.into_iter().map(f).collect::<Result<Vec<_>>>()?,
        })
    }
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    fn value(&self, name: &str, expected: &str) -> Result<&FieldValue> {
        self.get(name).ok_or_else(|| ConnectorError::parse(name, expected))
    }

    pub fn get_str(&self, name: &str) -> Result<&str> {
        match self.value(name, "string")? {
            FieldValue::Str(s) => Ok(s),
            _ => Err(ConnectorError::parse(name, "string")),
        }
    }

    pub fn opt_str(&self, name: &str) -> Result<Option<&str>> {
        match self.value(name, "string")? {
            FieldValue::Null => Ok(None),
            FieldValue::Str(s) => Ok(Some(s)),
            _ => Err(ConnectorError::parse(name, "string")),
        }
    }

    pub fn get_i64(&self, name: &str) -> Result<i64> {
        self.opt_i64(name)?.ok_or_else(|| ConnectorError::parse(name, "integer"))
    }

    pub fn opt_i64(&self, name: &str) -> Result<Option<i64>> {
        match self.value(name, "integer")? {
            FieldValue::Null => Ok(None),
            FieldValue::Int(i) => Ok(Some(*i)),
            _ => Err(ConnectorError::parse(name, "integer")),
        }
    }

    pub fn get_f64(&self, name: &str) -> Result<f64> {
        match self.value(name, "number")? {
            FieldValue::Float(f) => Ok(*f),
            FieldValue::Int(i) => Ok(*i as f64),
            _ => Err(ConnectorError::parse(name, "number")),
        }
    }

    pub fn get_decimal(&self, name: &str) -> Result<Decimal> {
        self.opt_decimal(name)?.ok_or_else(|| ConnectorError::parse(name, "decimal"))
    }

    pub fn opt_decimal(&self, name: &str) -> Result<Option<Decimal>> {
        match self.value(name, "decimal")? {
            FieldValue::Null => Ok(None),
            FieldValue::Decimal(d) => Ok(Some(*d)),
            _ => Err(ConnectorError::parse(name, "decimal")),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        match self.value(name, "boolean")? {
            FieldValue::Bool(b) => Ok(*b),
            _ => Err(ConnectorError::parse(name, "boolean")),
        }
    }

    pub fn get_record(&self, name: &str) -> Result<&Record> {
        match self.value(name, "object")? {
            FieldValue::Record(r) => Ok(r),
            _ => Err(ConnectorError::parse(name, "object")),
        }
    }

    pub fn get_list(&self, name: &str) -> Result<&[Record]> {
        match self.value(name, "array of objects")? {
            FieldValue::List(rows) => Ok(rows),
            _ => Err(ConnectorError::parse(name, "array of objects")),
        }
    }

    /// Map a nested list through a typed record
    pub fn list_of<T: FromRecord>(&self, name: &str) -> Result<Vec<T>> {
        self.get_list(name)?.iter().map(T::from_record).collect()
    }
}

/// A typed value built from a declared record shape
pub trait FromRecord: Sized {
    /// Shape of the JSON object this type is built from
    const FIELDS: &'static [FieldSpec];

    fn from_record(record: &Record) -> Result<Self>;

    fn from_json(json: &Value) -> Result<Self> {
        Self::from_record(&parse_record(json, Self::FIELDS)?)
    }
}

/// Parse a JSON object against a field table
///
/// Absent or null fields take their default; without one the call fails
/// with a parse error naming the field. Invariants are checked after
/// conversion and never clamp.
pub fn parse_record(json: &Value, fields: &[FieldSpec]) -> Result<Record> {
    match json {
        Value::Object(map) => parse_object(map, fields, ""),
        _ => Err(ConnectorError::parse("<root>", "object")),
    }
}

/// Parse a `{ total, rows }` page; row count is not checked against `total`
pub fn parse_rows_list(json: &Value, row_fields: &[FieldSpec]) -> Result<RowsList<Record>> {
    let map = json
        .as_object()
        .ok_or_else(|| ConnectorError::parse("<root>", "object"))?;

    let total = match map.get("total") {
        None | Some(Value::Null) => return Err(ConnectorError::parse("total", "integer")),
        Some(value) => match convert(value, FieldType::Int, "total")? {
            FieldValue::Int(n) if n >= 0 => n as u64,
            other => {
                return Err(ConnectorError::ValidationError {
                    field: "total".to_string(),
                    value: other.to_string(),
                    constraint: "non-negative".to_string(),
                });
            }
        },
    };

    let rows = match map.get("rows") {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => parse_list(value, row_fields, "rows")?,
    };

    Ok(RowsList { total, rows })
}

/// Parse raw body text as JSON
pub fn parse_json(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(ConnectorError::from)
}

/// Raw body to a single typed record
pub fn map_record<T: FromRecord>(raw: &str) -> Result<T> {
    T::from_json(&parse_json(raw)?)
}

/// Raw body to a typed `{ total, rows }` page
pub fn map_rows_list<T: FromRecord>(raw: &str) -> Result<RowsList<T>> {
    parse_rows_list(&parse_json(raw)?, T::FIELDS)?.try_map(|row| T::from_record(&row))
}

/// Raw top-level JSON array to typed records
pub fn map_list<T: FromRecord>(raw: &str) -> Result<Vec<T>> {
    parse_list(&parse_json(raw)?, T::FIELDS, "")?
        .iter()
        .map(T::from_record)
        .collect()
}

/// Raw JSON object keyed by name (e.g. asset) to typed records
pub fn map_keyed<T: FromRecord>(raw: &str) -> Result<std::collections::BTreeMap<String, T>> {
    let json = parse_json(raw)?;
    let map = json
        .as_object()
        .ok_or_else(|| ConnectorError::parse("<root>", "object"))?;

    map.iter()
        .map(|(key, value)| {
            let record = match value {
                Value::Object(inner) => parse_object(inner, T::FIELDS, key)?,
                _ => return Err(ConnectorError::parse(key.as_str(), "object")),
            };
            Ok((key.clone(), T::from_record(&record)?))
        })
        .collect()
}

fn field_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn parse_object(map: &Map<String, Value>, fields: &[FieldSpec], prefix: &str) -> Result<Record> {
    let mut record = Record {
        fields: Vec::with_capacity(fields.len()),
    };

    for entry in fields {
        let path = field_path(prefix, entry.name);

        let value = match map.get(entry.name) {
            None | Some(Value::Null) => match entry.default {
                Some(default) => default.to_value(),
                None => return Err(ConnectorError::parse(path, entry.ty.name())),
            },
            Some(raw) => convert(raw, entry.ty, &path)?,
        };

        if let Some(invariant) = entry.invariant {
            if !invariant.holds(&value) {
                return Err(ConnectorError::ValidationError {
                    field: path,
                    value: value.to_string(),
                    constraint: invariant.to_string(),
                });
            }
        }

        record.fields.push((entry.name, value));
    }

    Ok(record)
}

fn parse_list(json: &Value, fields: &[FieldSpec], path: &str) -> Result<Vec<Record>> {
    let items = json
        .as_array()
        .ok_or_else(|| ConnectorError::parse(if path.is_empty() { "<root>" } else { path }, "array of objects"))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let item_path = format!("{path}[{i}]");
            match item {
                Value::Object(map) => parse_object(map, fields, &item_path),
                _ => Err(ConnectorError::parse(item_path, "object")),
            }
        })
        .collect()
}

/// Convert one JSON value, accepting numeric strings for numeric types
fn convert(raw: &Value, ty: FieldType, path: &str) -> Result<FieldValue> {
    let mismatch = || ConnectorError::parse(path, ty.name());

    match ty {
        FieldType::Str => raw.as_str().map(|s| FieldValue::Str(s.to_string())).ok_or_else(mismatch),
        FieldType::Int => match raw {
            Value::Number(n) => n.as_i64().map(FieldValue::Int).ok_or_else(mismatch),
            Value::String(s) => s.trim().parse::<i64>().map(FieldValue::Int).map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },
        FieldType::Float => match raw {
            Value::Number(n) => n.as_f64().map(FieldValue::Float).ok_or_else(mismatch),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(FieldValue::Float)
                .ok_or_else(mismatch),
            _ => Err(mismatch()),
        },
        FieldType::Decimal => match raw {
            Value::Number(n) => parse_decimal(&n.to_string()).map(FieldValue::Decimal).ok_or_else(mismatch),
            Value::String(s) => parse_decimal(s.trim()).map(FieldValue::Decimal).ok_or_else(mismatch),
            _ => Err(mismatch()),
        },
        FieldType::Bool => match raw {
            Value::Bool(b) => Ok(FieldValue::Bool(*b)),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(FieldValue::Bool(true)),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(FieldValue::Bool(false)),
            _ => Err(mismatch()),
        },
        FieldType::Record(fields) => match raw {
            Value::Object(map) => parse_object(map, fields, path).map(FieldValue::Record),
            _ => Err(mismatch()),
        },
        FieldType::RecordList(fields) => parse_list(raw, fields, path)
            .map(FieldValue::List)
            .map_err(|err| match err {
                ConnectorError::ParseError { field, .. } if field == path => mismatch(),
                other => other,
            }),
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}
