//! Unified error handling for the tripmatch library.
//!
//! Parse failures are local-recoverable (the caller's `ParsePolicy` decides
//! whether a bad record skips or aborts the batch); argument validation
//! failures are always surfaced before any computation runs.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, TripError>;

/// All errors produced by tripmatch operations.
#[derive(Debug, Error)]
pub enum TripError {
    /// A geo-point string yielded fewer than two numeric tokens.
    #[error(
        "malformed geo-point {input:?}: expected two numeric tokens, found {tokens_found}"
    )]
    PointParse { input: String, tokens_found: usize },

    /// A geo-point token is not a valid floating-point literal.
    #[error("malformed geo-point {input:?}: {token:?} is not a valid number")]
    PointToken { input: String, token: String },

    /// `location_filter` must be one of the listed values.
    #[error(
        "invalid location_filter {value:?}: choose \"origin\", \"destination\", or \"both\""
    )]
    InvalidLocationFilter { value: String },

    /// A bounding-box argument did not parse.
    #[error("invalid bounding box {value:?}: expected min_lat,max_lat,min_lon,max_lon")]
    InvalidBoundingBox { value: String },

    /// A timestamp field did not parse under any supported format.
    #[error("row {row}: unparseable timestamp {value:?}")]
    Timestamp { value: String, row: usize },

    /// A record was rejected under `ParsePolicy::Strict`.
    #[error("record {index} rejected: {source}")]
    BadRecord {
        index: usize,
        #[source]
        source: Box<TripError>,
    },

    /// CSV-level failure from the loader.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
