//! Tests for the weekly average aggregator

use chrono::{NaiveDate, NaiveDateTime};
use tripmatch::{
    weekly_average, BoundingBox, LocationFilter, TripRecord, WeeklyQuery,
};

fn stamp(month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2018, month, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn trip(timestamp: NaiveDateTime, region: &str, origin: &str, destination: &str) -> TripRecord {
    TripRecord::new(timestamp, region, origin, destination, "funny_car")
}

/// Three ISO weeks with 3, 5 and 4 trips.
fn three_week_records() -> Vec<TripRecord> {
    let mut records = Vec::new();
    // 2018-05-07 .. 2018-05-13 is one ISO week; the next two follow
    for (day, count) in [(7, 3), (14, 5), (21, 4)] {
        for i in 0..count {
            records.push(trip(
                stamp(5, day + (i % 3), 9),
                "Prague",
                "POINT (50.1 8.7)",
                "POINT (50.2 8.8)",
            ));
        }
    }
    records
}

#[test]
fn test_unfiltered_mean_over_weeks() {
    let result = weekly_average(&three_week_records(), &WeeklyQuery::new()).unwrap();

    assert_eq!(result.average, 4.0);
    assert_eq!(result.weeks, 3);
    assert_eq!(result.matched, 12);
    assert!(!result.is_empty());
}

#[test]
fn test_empty_box_is_a_valid_result() {
    let query = WeeklyQuery::new().with_bounding_box(BoundingBox::new(0.0, 1.0, 0.0, 1.0));
    let result = weekly_average(&three_week_records(), &query).unwrap();

    assert_eq!(result.average, 0.0);
    assert_eq!(result.weeks, 0);
    assert!(result.is_empty());
}

#[test]
fn test_origin_filter_ignores_destination() {
    let records = vec![
        // origin in box, destination far outside
        trip(stamp(5, 7, 9), "Prague", "POINT (50.1 8.7)", "POINT (10.0 10.0)"),
        // origin outside
        trip(stamp(5, 7, 9), "Prague", "POINT (10.0 10.0)", "POINT (50.2 8.8)"),
    ];
    let query = WeeklyQuery::new()
        .with_bounding_box(BoundingBox::new(49.0, 51.0, 8.0, 9.0))
        .with_location_filter(LocationFilter::Origin);

    let result = weekly_average(&records, &query).unwrap();
    assert_eq!(result.matched, 1);
}

#[test]
fn test_destination_filter_ignores_origin() {
    let records = vec![
        trip(stamp(5, 7, 9), "Prague", "POINT (50.1 8.7)", "POINT (10.0 10.0)"),
        trip(stamp(5, 7, 9), "Prague", "POINT (10.0 10.0)", "POINT (50.2 8.8)"),
    ];
    let query = WeeklyQuery::new()
        .with_bounding_box(BoundingBox::new(49.0, 51.0, 8.0, 9.0))
        .with_location_filter(LocationFilter::Destination);

    let result = weekly_average(&records, &query).unwrap();
    assert_eq!(result.matched, 1);
}

#[test]
fn test_either_filter_is_logical_or() {
    // Origin in box, destination far outside: still included under Either
    let records = vec![trip(
        stamp(5, 7, 9),
        "Prague",
        "POINT (50.1 8.7)",
        "POINT (10.0 10.0)",
    )];
    let query = WeeklyQuery::new()
        .with_bounding_box(BoundingBox::new(49.0, 51.0, 8.0, 9.0))
        .with_location_filter(LocationFilter::Either);

    let result = weekly_average(&records, &query).unwrap();
    assert_eq!(result.matched, 1);

    // And the mirror image: only the destination is in the box
    let records = vec![trip(
        stamp(5, 7, 9),
        "Prague",
        "POINT (10.0 10.0)",
        "POINT (50.1 8.7)",
    )];
    let result = weekly_average(&records, &query).unwrap();
    assert_eq!(result.matched, 1);
}

#[test]
fn test_box_bounds_inclusive() {
    // The origin cell is exactly (50.0, 8.0); a box ending there keeps it
    let records = vec![trip(
        stamp(5, 7, 9),
        "Prague",
        "POINT (50.04 7.96)",
        "POINT (51.0 9.0)",
    )];
    let query =
        WeeklyQuery::new().with_bounding_box(BoundingBox::new(49.0, 50.0, 7.0, 8.0));

    let result = weekly_average(&records, &query).unwrap();
    assert_eq!(result.matched, 1);
}

#[test]
fn test_region_narrows_the_box_filter() {
    let mut records = three_week_records();
    records.push(trip(
        stamp(5, 7, 9),
        "Turin",
        "POINT (50.1 8.7)",
        "POINT (50.2 8.8)",
    ));

    let box_only = WeeklyQuery::new().with_bounding_box(BoundingBox::new(49.0, 51.0, 8.0, 9.0));
    let box_and_region = box_only.clone().with_region("Prague");

    let wide = weekly_average(&records, &box_only).unwrap();
    let narrow = weekly_average(&records, &box_and_region).unwrap();

    assert_eq!(wide.matched, 13);
    assert_eq!(narrow.matched, 12);
    assert!(narrow.matched <= wide.matched);
}

#[test]
fn test_region_match_is_case_sensitive() {
    let query = WeeklyQuery::new().with_region("prague");
    let result = weekly_average(&three_week_records(), &query).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_region_only_filter() {
    let mut records = three_week_records();
    records.push(trip(
        stamp(5, 7, 9),
        "Turin",
        "POINT (45.1 7.7)",
        "POINT (45.2 7.8)",
    ));

    let query = WeeklyQuery::new()
        .with_region("Turin")
        .with_location_filter(LocationFilter::Either);
    let result = weekly_average(&records, &query).unwrap();

    assert_eq!(result.matched, 1);
    assert_eq!(result.average, 1.0);
}

#[test]
fn test_malformed_point_skipped_when_box_applies() {
    let records = vec![
        trip(stamp(5, 7, 9), "Prague", "POINT (50.1 8.7)", "POINT (50.2 8.8)"),
        trip(stamp(5, 7, 9), "Prague", "broken", "POINT (50.2 8.8)"),
    ];
    let query = WeeklyQuery::new().with_bounding_box(BoundingBox::new(49.0, 51.0, 8.0, 9.0));

    let result = weekly_average(&records, &query).unwrap();
    assert_eq!(result.matched, 1);
    assert_eq!(result.skipped, 1);
}

#[test]
fn test_no_box_means_no_coordinate_parsing() {
    // Without a bounding box the raw point strings are never touched
    let records = vec![trip(stamp(5, 7, 9), "Prague", "broken", "also broken")];

    let result = weekly_average(&records, &WeeklyQuery::new()).unwrap();
    assert_eq!(result.matched, 1);
    assert_eq!(result.skipped, 0);
}

#[test]
fn test_weeks_spanning_a_year_boundary() {
    // 2018-12-31 is ISO week 1 of 2019; the buckets must not collide with
    // week 1 of 2018
    let records = vec![
        trip(stamp(1, 1, 9), "Prague", "POINT (50.1 8.7)", "POINT (50.2 8.8)"),
        trip(stamp(12, 31, 9), "Prague", "POINT (50.1 8.7)", "POINT (50.2 8.8)"),
    ];

    let result = weekly_average(&records, &WeeklyQuery::new()).unwrap();
    assert_eq!(result.weeks, 2);
    assert_eq!(result.average, 1.0);
}
