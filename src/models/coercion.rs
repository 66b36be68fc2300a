//! Coercion rules: one external text cell → one typed SQL value.
//!
//! A cell is `None` when the source has no such header, `Some("")` when the
//! header exists but the row left it blank. Neither ever fails for optional
//! rules; only malformed present input does.

use crate::db::session::SqlValue;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("invalid integer for '{field}': '{value}'")]
    InvalidInteger { field: &'static str, value: String },

    #[error("invalid number for '{field}': '{value}'")]
    InvalidFloat { field: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coercion {
    /// Required integer.
    Int,
    /// Integer, blank → 0.
    IntOrZero,
    /// Blank → NULL.
    OptionalString,
    /// Integer string read as a flag (non-zero = true), blank → `default`.
    BoolFromInt { default: bool },
    FloatOrZero,
    FloatOrNone,
    /// Required, copied as is (blank stays an empty string).
    Passthrough,
    /// Blank → the given literal.
    StringOr(&'static str),
    /// Required string with legacy labels substituted.
    Remap(&'static [(&'static str, &'static str)]),
}

impl Coercion {
    pub fn apply(&self, field: &'static str, cell: Option<&str>) -> Result<SqlValue, CoercionError> {
        let blank = cell.is_none_or(|c| c.is_empty());

        match self {
            Coercion::Int => {
                let raw = cell.ok_or(CoercionError::MissingField(field))?;
                parse_int(field, raw).map(SqlValue::Int)
            }
            Coercion::IntOrZero => match cell {
                Some(raw) if !blank => parse_int(field, raw).map(SqlValue::Int),
                _ => Ok(SqlValue::Int(0)),
            },
            Coercion::OptionalString => Ok(match cell {
                Some(c) if !c.is_empty() => SqlValue::Text(c.to_string()),
                _ => SqlValue::Null,
            }),
            Coercion::BoolFromInt { default } => match cell {
                Some(raw) if !blank => parse_int(field, raw).map(|v| SqlValue::Bool(v != 0)),
                _ => Ok(SqlValue::Bool(*default)),
            },
            Coercion::FloatOrZero => match cell {
                Some(raw) if !blank => parse_float(field, raw).map(SqlValue::Float),
                _ => Ok(SqlValue::Float(0.0)),
            },
            Coercion::FloatOrNone => match cell {
                Some(raw) if !blank => parse_float(field, raw).map(SqlValue::Float),
                _ => Ok(SqlValue::Null),
            },
            Coercion::Passthrough => cell
                .map(|c| SqlValue::Text(c.to_string()))
                .ok_or(CoercionError::MissingField(field)),
            Coercion::StringOr(default) => Ok(match cell {
                Some(c) if !c.is_empty() => SqlValue::Text(c.to_string()),
                _ => SqlValue::Text((*default).to_string()),
            }),
            Coercion::Remap(table) => {
                let raw = cell.ok_or(CoercionError::MissingField(field))?;
                Ok(SqlValue::Text(remap(table, raw).to_string()))
            }
        }
    }
}

/// Substitute a legacy label; unknown values pass through.
pub fn remap<'a>(table: &[(&'static str, &'static str)], value: &'a str) -> &'a str {
    table
        .iter()
        .find(|(from, _)| *from == value)
        .map(|(_, to)| *to)
        .unwrap_or(value)
}

fn parse_int(field: &'static str, raw: &str) -> Result<i64, CoercionError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| CoercionError::InvalidInteger {
            field,
            value: raw.to_string(),
        })
}

fn parse_float(field: &'static str, raw: &str) -> Result<f64, CoercionError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CoercionError::InvalidFloat {
            field,
            value: raw.to_string(),
        })
}
