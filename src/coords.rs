//! Coordinate normalization: geo-point strings to quantized grid cells.
//!
//! Producers encode trip endpoints as strings like `"POINT (50.112 8.681)"`,
//! with the envelope and decoration varying by system. This module strips
//! the decoration, extracts the two numeric tokens and quantizes them onto
//! a 0.1-degree grid (~11 km at the equator) so nearby points share a cell.
//!
//! The parser is order-agnostic: it returns the tokens in input order.
//! Consumers in this crate interpret token one as latitude and token two as
//! longitude.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, TripError};

/// A coordinate pair as parsed from a geo-point string, unrounded.
///
/// `first` and `second` keep the input token order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPoint {
    pub first: f64,
    pub second: f64,
}

impl RawPoint {
    /// Quantize onto the 0.1-degree grid, reading `first` as latitude.
    pub fn to_cell(self) -> GridCell {
        GridCell::from_degrees(self.first, self.second)
    }
}

/// A spatial bucket: latitude and longitude rounded to one decimal place.
///
/// Stored as tenths of a degree in integers so equal cells compare exactly
/// and the cell can serve directly as an ordered, hashable grouping key.
/// Rounding is half-away-from-zero (`f64::round` on the scaled value):
/// `50.15` becomes `50.2`, `-50.15` becomes `-50.2`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GridCell {
    lat_tenths: i64,
    lon_tenths: i64,
}

impl GridCell {
    /// Build a cell from unrounded degrees.
    pub fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Self {
            lat_tenths: (latitude * 10.0).round() as i64,
            lon_tenths: (longitude * 10.0).round() as i64,
        }
    }

    /// Cell latitude in degrees (one decimal place).
    pub fn latitude(&self) -> f64 {
        self.lat_tenths as f64 / 10.0
    }

    /// Cell longitude in degrees (one decimal place).
    pub fn longitude(&self) -> f64 {
        self.lon_tenths as f64 / 10.0
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.latitude(), self.longitude())
    }
}

/// Parse a geo-point string into its two numeric tokens.
///
/// Every character that is not a digit, decimal point, minus sign or
/// whitespace becomes a token separator, then the first two whitespace-split
/// tokens are read as `f64`. Tokens past the second are ignored.
///
/// Fails with [`TripError::PointParse`] when fewer than two tokens remain
/// and [`TripError::PointToken`] when a token is not a valid float, so a
/// malformed point is rejected rather than silently mis-parsed.
///
/// # Example
/// ```
/// use tripmatch::parse_point;
///
/// let a = parse_point("POINT (8.681 50.112)").unwrap();
/// let b = parse_point(" 8.681   50.112 ").unwrap();
/// assert_eq!(a.to_cell(), b.to_cell());
/// ```
pub fn parse_point(input: &str) -> Result<RawPoint> {
    let cleaned: String = input
        .chars()
        .map(|c| {
            if c.is_ascii_digit() || c == '.' || c == '-' {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut tokens = cleaned.split_whitespace();
    let first = match tokens.next() {
        Some(t) => t,
        None => {
            return Err(TripError::PointParse {
                input: input.to_string(),
                tokens_found: 0,
            })
        }
    };
    let second = match tokens.next() {
        Some(t) => t,
        None => {
            return Err(TripError::PointParse {
                input: input.to_string(),
                tokens_found: 1,
            })
        }
    };

    Ok(RawPoint {
        first: parse_token(input, first)?,
        second: parse_token(input, second)?,
    })
}

fn parse_token(input: &str, token: &str) -> Result<f64> {
    token.parse::<f64>().map_err(|_| TripError::PointToken {
        input: input.to_string(),
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_away_from_zero() {
        let cell = GridCell::from_degrees(50.15, -8.25);
        assert_eq!(cell.latitude(), 50.2);
        assert_eq!(cell.longitude(), -8.3);
    }

    #[test]
    fn test_rounding_idempotent() {
        let cell = GridCell::from_degrees(50.1, 8.7);
        let again = GridCell::from_degrees(cell.latitude(), cell.longitude());
        assert_eq!(cell, again);
    }

    #[test]
    fn test_decorated_separators_do_not_merge_tokens() {
        // A deleted comma would glue the tokens into one bogus number
        let point = parse_point("8.681,50.112").unwrap();
        assert_eq!(point.first, 8.681);
        assert_eq!(point.second, 50.112);
    }

    #[test]
    fn test_display_one_decimal() {
        let cell = GridCell::from_degrees(50.0, 8.0);
        assert_eq!(cell.to_string(), "(50.0, 8.0)");
    }
}
