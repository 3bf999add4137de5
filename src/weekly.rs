//! Weekly trip averages.
//!
//! Filters a record set by an optional bounding box (against origin,
//! destination, or either endpoint's grid cell) and an optional region,
//! buckets the survivors into ISO calendar weeks and returns the mean
//! trip count per observed week.
//!
//! The pass is pure over its inputs; concurrent queries against the same
//! record set never observe each other's filtering.

use std::collections::BTreeMap;

use chrono::Datelike;
use log::{debug, warn};

use crate::error::Result;
use crate::{parse_point, LocationFilter, TripRecord, WeeklyAverage, WeeklyQuery};

/// Compute the mean trips per ISO week for records matching `query`.
///
/// The bounding-box test is inclusive on all bounds and runs against the
/// *grid cell* of the chosen endpoint; `LocationFilter::Either` keeps a
/// record when origin or destination is in the box (logical OR). The region
/// filter then narrows the box-filtered set with an exact, case-sensitive
/// match.
///
/// An empty filtered set is a valid result, not an error: the returned
/// [`WeeklyAverage`] has `average == 0.0` and [`WeeklyAverage::is_empty`]
/// reports true. Records whose filtered endpoint fails to parse are
/// excluded and counted in `skipped`; without a bounding box no coordinate
/// is parsed at all.
///
/// # Example
/// ```
/// use tripmatch::{weekly_average, TripRecord, WeeklyQuery};
/// use chrono::NaiveDate;
///
/// let stamp = NaiveDate::from_ymd_opt(2018, 5, 28)
///     .unwrap()
///     .and_hms_opt(9, 0, 0)
///     .unwrap();
/// let records = vec![TripRecord::new(
///     stamp, "Prague", "POINT (50.1 8.7)", "POINT (50.2 8.8)", "funny_car",
/// )];
///
/// let result = weekly_average(&records, &WeeklyQuery::new()).unwrap();
/// assert_eq!(result.average, 1.0);
/// assert_eq!(result.weeks, 1);
/// ```
pub fn weekly_average(records: &[TripRecord], query: &WeeklyQuery) -> Result<WeeklyAverage> {
    let mut per_week: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    let mut matched = 0;
    let mut skipped = 0;

    for (index, record) in records.iter().enumerate() {
        match record_matches(record, query) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(err) => {
                warn!("excluding record {index} from weekly average: {err}");
                skipped += 1;
                continue;
            }
        }

        matched += 1;
        let week = record.timestamp.iso_week();
        *per_week.entry((week.year(), week.week())).or_default() += 1;
    }

    if matched == 0 {
        debug!("no trips matched the weekly-average filters");
        return Ok(WeeklyAverage {
            average: 0.0,
            weeks: 0,
            matched: 0,
            skipped,
        });
    }

    let weeks = per_week.len();
    let average = matched as f64 / weeks as f64;

    Ok(WeeklyAverage {
        average,
        weeks,
        matched,
        skipped,
    })
}

/// Apply the box-then-region filter chain to one record.
fn record_matches(record: &TripRecord, query: &WeeklyQuery) -> Result<bool> {
    if let Some(bbox) = &query.bounding_box {
        let in_box = match query.location_filter {
            LocationFilter::Origin => bbox.contains(parse_point(&record.origin_point)?.to_cell()),
            LocationFilter::Destination => {
                bbox.contains(parse_point(&record.destination_point)?.to_cell())
            }
            LocationFilter::Either => {
                let origin = parse_point(&record.origin_point)?.to_cell();
                let destination = parse_point(&record.destination_point)?.to_cell();
                bbox.contains(origin) || bbox.contains(destination)
            }
        };
        if !in_box {
            return Ok(false);
        }
    }

    if let Some(region) = &query.region {
        if record.region != *region {
            return Ok(false);
        }
    }

    Ok(true)
}
