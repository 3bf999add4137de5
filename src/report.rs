//! Plain-text report rendering.
//!
//! Formats the grouping and weekly-average results the way the CLI prints
//! them: a fixed-width table for the likely-same-trip groups and one-line
//! summaries for weekly queries.

use crate::{GroupedTrip, GroupingResult, WeeklyAverage, WeeklyQuery};

const HEADERS: [&str; 6] = [
    "region",
    "time_of_day",
    "origin",
    "destination",
    "trips",
    "datasources",
];

/// Render the `trip_count > 1` groups as a fixed-width table.
///
/// Returns a note instead of an empty table when no group has more than
/// one report.
pub fn duplicate_trips_table(result: &GroupingResult) -> String {
    let duplicates = result.duplicates();
    if duplicates.is_empty() {
        return "No trips share an origin, destination and time of day.\n".to_string();
    }
    render_table(&duplicates)
}

/// Render every group as a fixed-width table.
pub fn grouped_trips_table(result: &GroupingResult) -> String {
    render_table(&result.groups.iter().collect::<Vec<_>>())
}

fn render_table(groups: &[&GroupedTrip]) -> String {
    let rows: Vec<[String; 6]> = groups
        .iter()
        .map(|g| {
            [
                g.region.clone(),
                g.time_of_day.to_string(),
                g.origin.to_string(),
                g.destination.to_string(),
                g.trip_count.to_string(),
                g.datasources_joined(),
            ]
        })
        .collect();

    let mut widths: [usize; 6] = HEADERS.map(str::len);
    for row in &rows {
        for (width, value) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(value.len());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &widths, &HEADERS.map(str::to_string));
    for row in &rows {
        push_row(&mut out, &widths, row);
    }
    out
}

fn push_row(out: &mut String, widths: &[usize; 6], row: &[String; 6]) {
    for (index, (value, width)) in row.iter().zip(widths.iter()).enumerate() {
        if index > 0 {
            out.push_str("  ");
        }
        out.push_str(value);
        out.extend(std::iter::repeat(' ').take(width - value.len()));
    }
    // trim trailing pad from the last column
    while out.ends_with(' ') {
        out.pop();
    }
    out.push('\n');
}

/// One-line summary of a weekly-average query and its result.
pub fn weekly_summary(query: &WeeklyQuery, result: &WeeklyAverage) -> String {
    let mut scope = Vec::new();
    if let Some(bbox) = &query.bounding_box {
        scope.push(format!(
            "box lat {} to {}, lon {} to {}",
            bbox.min_lat, bbox.max_lat, bbox.min_lon, bbox.max_lon
        ));
    }
    if let Some(region) = &query.region {
        scope.push(format!("region {region}"));
    }
    let scope = if scope.is_empty() {
        "all records".to_string()
    } else {
        scope.join(", ")
    };

    if result.is_empty() {
        return format!("{scope}: no trips found for the given area and filter criteria");
    }

    format!(
        "{scope}: {:.2} trips/week ({} trips over {} weeks)",
        result.average, result.matched, result.weeks
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoundingBox, LocationFilter};

    #[test]
    fn test_empty_duplicates_note() {
        let result = GroupingResult {
            groups: vec![],
            skipped: 0,
        };
        assert!(duplicate_trips_table(&result).contains("No trips"));
    }

    #[test]
    fn test_weekly_summary_no_match() {
        let query = WeeklyQuery::new()
            .with_bounding_box(BoundingBox::new(0.0, 1.0, 0.0, 1.0))
            .with_location_filter(LocationFilter::Either);
        let result = WeeklyAverage {
            average: 0.0,
            weeks: 0,
            matched: 0,
            skipped: 0,
        };
        assert!(weekly_summary(&query, &result).contains("no trips found"));
    }
}
