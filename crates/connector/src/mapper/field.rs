//! Declarative field specifications
//!
//! A record shape is a `&'static [FieldSpec]` table: name, type, optional
//! default, optional invariant. Typed records declare their table as data
//! and a single parser in [`super::record`] consumes it.

use rust_decimal::Decimal;
use std::fmt;

use super::record::Record;

/// Expected JSON type of a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldType {
    Str,
    Int,
    Float,
    /// Exact decimal; Binance sends amounts as strings
    Decimal,
    Bool,
    /// Nested object with its own shape
    Record(&'static [FieldSpec]),
    /// Array of objects sharing one shape
    RecordList(&'static [FieldSpec]),
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Str => "string",
            FieldType::Int => "integer",
            FieldType::Float => "number",
            FieldType::Decimal => "decimal",
            FieldType::Bool => "boolean",
            FieldType::Record(_) => "object",
            FieldType::RecordList(_) => "array of objects",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value used when a field is absent or null
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Null,
    Str(&'static str),
    Int(i64),
    Float(f64),
    /// Mantissa and scale, as in `Decimal::new`
    Decimal(i64, u32),
    Bool(bool),
    EmptyList,
}

impl DefaultValue {
    pub fn to_value(self) -> FieldValue {
        match self {
            DefaultValue::Null => FieldValue::Null,
            DefaultValue::Str(s) => FieldValue::Str(s.to_string()),
            DefaultValue::Int(i) => FieldValue::Int(i),
            DefaultValue::Float(f) => FieldValue::Float(f),
            DefaultValue::Decimal(mantissa, scale) => FieldValue::Decimal(Decimal::new(mantissa, scale)),
            DefaultValue::Bool(b) => FieldValue::Bool(b),
            DefaultValue::EmptyList => FieldValue::List(Vec::new()),
        }
    }
}

/// Domain constraint checked after a field is parsed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Invariant {
    NonNegative,
    Positive,
    NonEmpty,
    OneOf(&'static [&'static str]),
}

impl Invariant {
    pub fn holds(&self, value: &FieldValue) -> bool {
        // Null only reaches here through an explicit Null default
        if value.is_null() {
            return true;
        }

        match self {
            Invariant::NonNegative => value.sign().is_none_or(|s| s >= 0),
            Invariant::Positive => value.sign().is_none_or(|s| s > 0),
            Invariant::NonEmpty => match value {
                FieldValue::Str(s) => !s.is_empty(),
                FieldValue::List(rows) => !rows.is_empty(),
                _ => true,
            },
            Invariant::OneOf(allowed) => match value {
                FieldValue::Str(s) => allowed.contains(&s.as_str()),
                _ => true,
            },
        }
    }
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invariant::NonNegative => f.write_str("non-negative"),
            Invariant::Positive => f.write_str("positive"),
            Invariant::NonEmpty => f.write_str("non-empty"),
            Invariant::OneOf(allowed) => write!(f, "one of [{}]", allowed.join(", ")),
        }
    }
}

/// One entry of a record shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub default: Option<DefaultValue>,
    pub invariant: Option<Invariant>,
}

impl FieldSpec {
    /// Field that must be present
    pub const fn required(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            default: None,
            invariant: None,
        }
    }

    /// Field that falls back to `default` when absent or null
    pub const fn with_default(name: &'static str, ty: FieldType, default: DefaultValue) -> Self {
        Self {
            name,
            ty,
            default: Some(default),
            invariant: None,
        }
    }

    /// Field that is null when absent
    pub const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self::with_default(name, ty, DefaultValue::Null)
    }

    pub const fn check(mut self, invariant: Invariant) -> Self {
        self.invariant = Some(invariant);
        self
    }
}

/// Parsed field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Str(String),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Bool(bool),
    Record(Record),
    List(Vec<Record>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// -1, 0 or 1 for numeric values
    fn sign(&self) -> Option<i8> {
        let sign = |negative: bool, zero: bool| if zero { 0 } else if negative { -1 } else { 1 };
        match self {
            FieldValue::Int(i) => Some(i.signum() as i8),
            FieldValue::Float(f) => Some(sign(*f < 0.0, *f == 0.0)),
            FieldValue::Decimal(d) => Some(sign(d.is_sign_negative(), d.is_zero())),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Str(s) => write!(f, "\"{s}\""),
            FieldValue::Int(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Decimal(d) => write!(f, "{d}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Record(_) => f.write_str("{..}"),
            FieldValue::List(rows) => write!(f, "[{} rows]", rows.len()),
        }
    }
}
