//! # Trip Matcher
//!
//! Analytics core for ride-hailing trip records.
//!
//! This library provides:
//! - Coordinate normalization of geo-point strings into ~11 km grid cells
//! - Grouping of trips that look like the same real-world journey
//!   (shared region, time-of-day bucket and origin/destination cells)
//! - Weekly trip averages with bounding-box and region filters
//! - A CSV loader and plain-text report rendering for the CLI
//!
//! ## Features
//!
//! - **`parallel`** - Enable chunked grouping with rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use tripmatch::{group_trips, ParsePolicy, TripRecord};
//! use chrono::NaiveDate;
//!
//! let stamp = NaiveDate::from_ymd_opt(2018, 5, 28)
//!     .unwrap()
//!     .and_hms_opt(9, 3, 40)
//!     .unwrap();
//!
//! let records = vec![
//!     TripRecord::new(stamp, "Prague", "POINT (50.12 8.68)", "POINT (50.23 8.75)", "funny_car"),
//!     TripRecord::new(stamp, "Prague", "POINT (50.08 8.72)", "POINT (50.19 8.81)", "cheap_mobile"),
//! ];
//!
//! let result = group_trips(&records, ParsePolicy::Skip).unwrap();
//! assert_eq!(result.groups.len(), 1);
//! assert_eq!(result.groups[0].trip_count, 2);
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use std::str::FromStr;

// Unified error handling
pub mod error;
pub use error::{Result, TripError};

// Coordinate normalization (geo-point strings to grid cells)
pub mod coords;
pub use coords::{parse_point, GridCell, RawPoint};

// Time-of-day classification
pub mod timeofday;
pub use timeofday::TimeOfDay;

// Trip grouping (same-trip detection)
pub mod grouping;
pub use grouping::group_trips;
#[cfg(feature = "parallel")]
pub use grouping::group_trips_chunked;

// Weekly average aggregation
pub mod weekly;
pub use weekly::weekly_average;

// CSV record loading
pub mod loader;
pub use loader::{load_trips, load_trips_from_reader};

// Plain-text report rendering
pub mod report;

// Synthetic trip generator for benchmarks and stress tests
pub mod synthetic;

// ============================================================================
// Core Types
// ============================================================================

/// A single reported trip.
///
/// The geo-points stay as raw strings until a consumer normalizes them;
/// this keeps loading cheap and leaves the malformed-coordinate policy to
/// the grouping/aggregation call sites.
///
/// Timestamps are naive: any timezone offset is dropped at load time and the
/// wall-clock value kept, so week bucketing applies one uniform convention.
///
/// Token order: the first numeric token of a geo-point string is latitude,
/// the second longitude. Producers that emit longitude-first strings must
/// swap before handing records to this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    /// When the trip was reported (naive, offset stripped)
    pub timestamp: NaiveDateTime,
    /// Region label, e.g. "Prague"
    pub region: String,
    /// Raw origin geo-point string, e.g. "POINT (50.12 8.68)"
    pub origin_point: String,
    /// Raw destination geo-point string
    pub destination_point: String,
    /// Reporting system, e.g. a telematics vendor or mobile app
    pub data_source: String,
}

impl TripRecord {
    /// Create a trip record.
    pub fn new(
        timestamp: NaiveDateTime,
        region: impl Into<String>,
        origin_point: impl Into<String>,
        destination_point: impl Into<String>,
        data_source: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            region: region.into(),
            origin_point: origin_point.into(),
            destination_point: destination_point.into(),
            data_source: data_source.into(),
        }
    }
}

/// What to do with a record whose geo-point fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Drop the record, count it as skipped and keep going (default).
    #[default]
    Skip,
    /// Abort the whole batch with the parse error.
    Strict,
}

/// An aggregate of trip reports believed to be the same real-world trip.
///
/// One `GroupedTrip` exists per distinct
/// (region, time-of-day, origin cell, destination cell) tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedTrip {
    pub region: String,
    pub time_of_day: TimeOfDay,
    /// Origin grid cell (~11 km bucket)
    pub origin: GridCell,
    /// Destination grid cell
    pub destination: GridCell,
    /// Number of raw reports in this bucket (>= 1)
    pub trip_count: usize,
    /// Distinct contributing data sources, sorted
    pub datasources: Vec<String>,
}

impl GroupedTrip {
    /// The de-duplicated, comma-joined data source rendering.
    pub fn datasources_joined(&self) -> String {
        self.datasources.join(", ")
    }
}

/// Result of grouping a record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingResult {
    /// All groups, ordered lexicographically on
    /// (region, time-of-day, origin cell, destination cell)
    pub groups: Vec<GroupedTrip>,
    /// Records excluded for unparseable coordinates (Skip policy only)
    pub skipped: usize,
}

impl GroupingResult {
    /// Groups with more than one report: the likely-same-trip subset.
    pub fn duplicates(&self) -> Vec<&GroupedTrip> {
        self.groups.iter().filter(|g| g.trip_count > 1).collect()
    }

    /// Total raw reports across all groups.
    pub fn total_trips(&self) -> usize {
        self.groups.iter().map(|g| g.trip_count).sum()
    }
}

/// A rectangular filter region, inclusive on all four bounds.
///
/// Containment is tested against *grid cells*, i.e. after rounding, so a
/// point at latitude 50.04 lands in cell 50.0 and a box with
/// `max_lat = 50.0` still contains it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Inclusive containment test, latitude first.
    pub fn contains(&self, cell: GridCell) -> bool {
        cell.latitude() >= self.min_lat
            && cell.latitude() <= self.max_lat
            && cell.longitude() >= self.min_lon
            && cell.longitude() <= self.max_lon
    }
}

/// Which trip endpoint(s) a bounding box is tested against.
///
/// `Either` keeps a record when its origin *or* its destination is in the
/// box. Historical producers call this mode `both`; that string still
/// parses, but the OR semantics are the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LocationFilter {
    #[default]
    Origin,
    Destination,
    Either,
}

impl FromStr for LocationFilter {
    type Err = TripError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "origin" => Ok(LocationFilter::Origin),
            "destination" => Ok(LocationFilter::Destination),
            "both" | "either" => Ok(LocationFilter::Either),
            other => Err(TripError::InvalidLocationFilter {
                value: other.to_string(),
            }),
        }
    }
}

/// Configuration for one weekly-average query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeeklyQuery {
    /// Optional spatial filter
    pub bounding_box: Option<BoundingBox>,
    /// Optional exact, case-sensitive region match (applied after the box)
    pub region: Option<String>,
    /// Which endpoint(s) the box is tested against
    pub location_filter: LocationFilter,
}

impl WeeklyQuery {
    /// Query over the full record set, origin filtering.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_location_filter(mut self, location_filter: LocationFilter) -> Self {
        self.location_filter = location_filter;
        self
    }
}

/// Result of a weekly-average query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAverage {
    /// Mean trip count across observed ISO weeks; `0.0` when nothing matched
    pub average: f64,
    /// Number of distinct ISO weeks observed
    pub weeks: usize,
    /// Records that survived the filters
    pub matched: usize,
    /// Records excluded because a filtered endpoint failed to parse
    pub skipped: usize,
}

impl WeeklyAverage {
    /// True when no record matched the filters.
    ///
    /// Distinguishes "no data" from a genuine average of zero.
    pub fn is_empty(&self) -> bool {
        self.matched == 0
    }
}
