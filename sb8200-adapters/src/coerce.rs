//! Conversion of raw table cell text into numbers.
//!
//! The status page renders values for humans: `549000000 Hz`, `0.6 dBmV`,
//! `QAM256`, or just `Other`. Each column declares a [`FieldKind`] and
//! [`coerce`] applies the matching rule. Failures are errors, never defaults:
//! a misread signal value is worse than a missing scrape.

use sb8200_types::MODULATION_OTHER;

use crate::CoerceError;

/// Scheme name that prefixes modulation cells.
pub const SCHEME_PREFIX: &str = "QAM";

/// Literal the modem shows for an unrecognized modulation.
pub const SENTINEL_OTHER: &str = "Other";

/// Parsing rule for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Base-10 integer, trailing unit text ignored.
    Integer,
    /// Integer behind an optional `QAM` prefix, with `Other` mapped to -1.
    SchemeInteger,
    /// Float with trailing unit text ignored.
    UnitFloat,
}

/// A coerced cell value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    /// The value as an integer, or `None` for a float.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(v) => Some(v),
            Value::Float(_) => None,
        }
    }

    /// The value as a float.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Int(v) => v as f64,
            Value::Float(v) => v,
        }
    }
}

/// Coerce a raw cell according to `kind`.
pub fn coerce(raw: &str, kind: FieldKind) -> Result<Value, CoerceError> {
    match kind {
        FieldKind::Integer => parse_int(raw).map(Value::Int),
        FieldKind::SchemeInteger => parse_scheme_int(raw).map(Value::Int),
        FieldKind::UnitFloat => parse_unit_float(raw).map(Value::Float),
    }
}

/// Parse the leading token of `raw` as an integer.
pub fn parse_int(raw: &str) -> Result<i64, CoerceError> {
    let token = leading_token(raw)?;
    token
        .parse::<i64>()
        .map_err(|_| CoerceError::Integer(token.to_string()))
}

/// Parse a modulation cell such as `QAM256`, `QAM-256` or `Other`.
pub fn parse_scheme_int(raw: &str) -> Result<i64, CoerceError> {
    let trimmed = raw.trim();
    let stripped = match trimmed.strip_prefix(SCHEME_PREFIX) {
        Some(rest) => {
            let rest = rest.trim_start();
            rest.strip_prefix('-').unwrap_or(rest).trim()
        }
        None => trimmed,
    };

    if stripped == SENTINEL_OTHER {
        return Ok(MODULATION_OTHER);
    }
    parse_int(stripped)
}

/// Parse the leading token of `raw` as a float, dropping any unit.
pub fn parse_unit_float(raw: &str) -> Result<f64, CoerceError> {
    let token = leading_token(raw)?;
    token
        .parse::<f64>()
        .map_err(|_| CoerceError::Float(token.to_string()))
}

fn leading_token(raw: &str) -> Result<&str, CoerceError> {
    raw.split_whitespace().next().ok_or(CoerceError::Empty)
}
