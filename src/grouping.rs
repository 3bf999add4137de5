//! Trip grouping algorithms.
//!
//! This module buckets raw trip reports that are likely the same real-world
//! trip: same region, same time-of-day bucket, and origin/destination
//! points that quantize to the same ~11 km grid cells.
//!
//! Grouping is a pure single pass over the record set. Groups are kept in a
//! `BTreeMap` keyed on (region, time-of-day, origin cell, destination cell),
//! so the output order is lexicographic on the key tuple and identical
//! across runs regardless of input row order.

use std::collections::{BTreeMap, BTreeSet};

use log::{info, warn};

use crate::coords::GridCell;
use crate::error::{Result, TripError};
use crate::timeofday::TimeOfDay;
use crate::{parse_point, GroupedTrip, GroupingResult, ParsePolicy, TripRecord};

use chrono::Timelike;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Composite grouping key, ordered region-first.
type GroupKey = (String, TimeOfDay, GridCell, GridCell);

/// Per-key accumulator: report count and distinct data sources.
type GroupAccumulator = BTreeMap<GroupKey, (usize, BTreeSet<String>)>;

/// Group a record set into likely-same-trip buckets.
///
/// Records whose origin or destination fails to parse are excluded under
/// [`ParsePolicy::Skip`] (counted in `skipped`) or abort the batch under
/// [`ParsePolicy::Strict`]; a bad coordinate never poisons a group.
///
/// # Example
/// ```
/// use tripmatch::{group_trips, ParsePolicy, TripRecord};
/// use chrono::NaiveDate;
///
/// let stamp = NaiveDate::from_ymd_opt(2018, 5, 28)
///     .unwrap()
///     .and_hms_opt(9, 3, 40)
///     .unwrap();
/// let records = vec![
///     TripRecord::new(stamp, "Turin", "POINT (45.07 7.68)", "POINT (45.12 7.72)", "pt_search_app"),
/// ];
///
/// let result = group_trips(&records, ParsePolicy::Skip).unwrap();
/// assert_eq!(result.groups.len(), 1);
/// ```
pub fn group_trips(records: &[TripRecord], policy: ParsePolicy) -> Result<GroupingResult> {
    let (buckets, skipped) = accumulate(records, policy, 0)?;
    let result = finish(buckets, skipped);
    info!(
        "grouped {} records into {} buckets ({} duplicates, {} skipped)",
        result.total_trips(),
        result.groups.len(),
        result.duplicates().len(),
        result.skipped,
    );
    Ok(result)
}

/// Chunked map-reduce variant of [`group_trips`].
///
/// Splits the record set into chunks, accumulates each chunk on its own
/// and merges the partial maps by key. Produces results identical to the
/// single-pass form.
#[cfg(feature = "parallel")]
pub fn group_trips_chunked(
    records: &[TripRecord],
    policy: ParsePolicy,
    chunk_size: usize,
) -> Result<GroupingResult> {
    let chunk_size = chunk_size.max(1);

    let partials: Vec<(GroupAccumulator, usize)> = records
        .par_chunks(chunk_size)
        .enumerate()
        .map(|(chunk_index, chunk)| accumulate(chunk, policy, chunk_index * chunk_size))
        .collect::<Result<_>>()?;

    let mut merged: GroupAccumulator = BTreeMap::new();
    let mut skipped = 0;
    for (partial, partial_skipped) in partials {
        skipped += partial_skipped;
        for (key, (count, sources)) in partial {
            let entry = merged.entry(key).or_default();
            entry.0 += count;
            entry.1.extend(sources);
        }
    }

    Ok(finish(merged, skipped))
}

/// Derive the composite key for one record.
fn record_key(record: &TripRecord) -> Result<GroupKey> {
    let origin = parse_point(&record.origin_point)?.to_cell();
    let destination = parse_point(&record.destination_point)?.to_cell();
    Ok((
        record.region.clone(),
        TimeOfDay::from_hour(record.timestamp.hour()),
        origin,
        destination,
    ))
}

/// Single accumulation pass over a slice of records.
///
/// `base_index` offsets record indexes in strict-mode errors so chunked
/// accumulation reports the position in the full record set.
fn accumulate(
    records: &[TripRecord],
    policy: ParsePolicy,
    base_index: usize,
) -> Result<(GroupAccumulator, usize)> {
    let mut buckets: GroupAccumulator = BTreeMap::new();
    let mut skipped = 0;

    for (offset, record) in records.iter().enumerate() {
        let key = match record_key(record) {
            Ok(key) => key,
            Err(err) => match policy {
                ParsePolicy::Skip => {
                    warn!("skipping record {}: {}", base_index + offset, err);
                    skipped += 1;
                    continue;
                }
                ParsePolicy::Strict => {
                    return Err(TripError::BadRecord {
                        index: base_index + offset,
                        source: Box::new(err),
                    })
                }
            },
        };

        let entry = buckets.entry(key).or_default();
        entry.0 += 1;
        entry.1.insert(record.data_source.clone());
    }

    Ok((buckets, skipped))
}

/// Turn the ordered accumulator into the public result.
fn finish(buckets: GroupAccumulator, skipped: usize) -> GroupingResult {
    let groups = buckets
        .into_iter()
        .map(
            |((region, time_of_day, origin, destination), (trip_count, sources))| GroupedTrip {
                region,
                time_of_day,
                origin,
                destination,
                trip_count,
                datasources: sources.into_iter().collect(),
            },
        )
        .collect();

    GroupingResult { groups, skipped }
}
