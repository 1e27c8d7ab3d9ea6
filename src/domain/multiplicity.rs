//! Multiplicity ranges attached to aggregation ends.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

const RANGE_SEPARATOR: &str = "..";

/// Cardinality constraint `(min, max)` parsed from `"N"` or `"N..M"`.
///
/// `min <= max` is not enforced; the source document owns that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Multiplicity {
    pub min: i64,
    pub max: i64,
}

impl Multiplicity {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn exactly(value: i64) -> Self {
        Self::new(value, value)
    }

    /// Parse a multiplicity token.
    ///
    /// - `"3"` → `(3, 3)`
    /// - `"1..4"` → `(1, 4)`
    ///
    /// Anything else (non-integer parts, empty segments, `"1...3"`, `"1..2..3"`)
    /// fails with [`DomainError::MalformedMultiplicity`].
    pub fn parse(token: &str) -> Result<Self, DomainError> {
        if token.contains(RANGE_SEPARATOR) {
            let parts: Vec<&str> = token.split(RANGE_SEPARATOR).collect();
            return match parts.as_slice() {
                [min, max] => Ok(Self::new(
                    parse_segment(min, token)?,
                    parse_segment(max, token)?,
                )),
                _ => Err(malformed(token)),
            };
        }
        Ok(Self::exactly(parse_segment(token, token)?))
    }
}

fn parse_segment(segment: &str, token: &str) -> Result<i64, DomainError> {
    let segment = segment.trim();
    if segment.is_empty() {
        return Err(malformed(token));
    }
    segment.parse::<i64>().map_err(|_| malformed(token))
}

fn malformed(token: &str) -> DomainError {
    DomainError::MalformedMultiplicity {
        token: token.to_string(),
    }
}

impl FromStr for Multiplicity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}{}{}", self.min, RANGE_SEPARATOR, self.max)
        }
    }
}
