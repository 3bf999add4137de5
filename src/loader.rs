//! CSV trip loading.
//!
//! Reads the `trips.csv` column layout produced by the upstream pipeline:
//! `region, origin_coord, destination_coord, datetime, datasource`.
//! Geo-point strings are kept raw (the grouping and weekly passes own the
//! coordinate policy); only the timestamp is parsed here, since a record
//! without a valid instant is not well-formed for any consumer.
//!
//! Timestamps may carry an RFC 3339 offset; it is dropped and the
//! wall-clock value kept, so the whole record set shares one naive
//! timestamp convention.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use log::{info, warn};
use serde::Deserialize;

use crate::error::{Result, TripError};
use crate::{ParsePolicy, TripRecord};

/// One raw CSV row, before timestamp parsing.
#[derive(Debug, Deserialize)]
struct RawTrip {
    region: String,
    origin_coord: String,
    destination_coord: String,
    datetime: String,
    datasource: String,
}

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a timestamp string, dropping any timezone offset.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(value) {
        // keep the local wall-clock time, not the UTC conversion
        return Some(stamp.naive_local());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Load trip records from a CSV file.
pub fn load_trips(path: impl AsRef<Path>, policy: ParsePolicy) -> Result<Vec<TripRecord>> {
    let file = std::fs::File::open(path.as_ref())?;
    let records = load_trips_from_reader(file, policy)?;
    info!(
        "loaded {} trip records from {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(records)
}

/// Load trip records from any CSV reader.
///
/// Rows with an unparseable timestamp are dropped under
/// [`ParsePolicy::Skip`] and abort the load under [`ParsePolicy::Strict`].
pub fn load_trips_from_reader(reader: impl Read, policy: ParsePolicy) -> Result<Vec<TripRecord>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for (row, raw) in csv_reader.deserialize::<RawTrip>().enumerate() {
        let raw = raw?;
        let timestamp = match parse_timestamp(&raw.datetime) {
            Some(stamp) => stamp,
            None => match policy {
                ParsePolicy::Skip => {
                    warn!("row {}: dropping unparseable timestamp {:?}", row, raw.datetime);
                    continue;
                }
                ParsePolicy::Strict => {
                    return Err(TripError::Timestamp {
                        value: raw.datetime,
                        row,
                    })
                }
            },
        };

        records.push(TripRecord {
            timestamp,
            region: raw.region,
            origin_point: raw.origin_coord,
            destination_point: raw.destination_coord,
            data_source: raw.datasource,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_timestamp_plain() {
        let stamp = parse_timestamp("2018-05-28 09:03:40").unwrap();
        assert_eq!(stamp.hour(), 9);
        assert_eq!(stamp.day(), 28);
    }

    #[test]
    fn test_parse_timestamp_offset_keeps_wall_clock() {
        let stamp = parse_timestamp("2018-05-28T09:03:40+02:00").unwrap();
        assert_eq!(stamp.hour(), 9);
    }

    #[test]
    fn test_parse_timestamp_garbage() {
        assert!(parse_timestamp("yesterday-ish").is_none());
    }
}
