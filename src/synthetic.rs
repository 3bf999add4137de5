//! Synthetic trip data generator for stress testing and benchmarking.
//!
//! Generates seeded trip record sets with a known number of duplicate
//! buckets, providing ground truth for validating the grouping and
//! weekly-average passes at scale.
//!
//! # Example
//!
//! ```rust
//! use tripmatch::synthetic::SyntheticScenario;
//! use tripmatch::{group_trips, ParsePolicy};
//!
//! let scenario = SyntheticScenario {
//!     weeks: 4,
//!     singles_per_week: 50,
//!     duplicate_pairs: 10,
//!     seed: 42,
//! };
//!
//! let dataset = scenario.generate();
//! let result = group_trips(&dataset.records, ParsePolicy::Skip).unwrap();
//! assert_eq!(result.duplicates().len(), 10);
//! ```

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::TripRecord;

const REGIONS: [&str; 3] = ["Prague", "Turin", "Hamburg"];
const DATA_SOURCES: [&str; 4] = ["funny_car", "cheap_mobile", "baba_car", "pt_search_app"];

/// Configuration for a synthetic trip dataset.
#[derive(Debug, Clone)]
pub struct SyntheticScenario {
    /// Number of calendar weeks the records span.
    pub weeks: u32,
    /// Unique (non-duplicated) trips generated per week.
    pub singles_per_week: usize,
    /// Same-trip pairs: two reports from different sources landing in one
    /// bucket. Each pair forms exactly one duplicate group.
    pub duplicate_pairs: usize,
    /// RNG seed for reproducible datasets.
    pub seed: u64,
}

/// A generated dataset with ground truth.
#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    pub records: Vec<TripRecord>,
    /// Exact number of groups with `trip_count > 1` the grouping pass
    /// must produce.
    pub expected_duplicate_groups: usize,
    /// Number of distinct ISO weeks covered.
    pub weeks: u32,
}

impl SyntheticScenario {
    /// Generate the dataset.
    ///
    /// Singles are placed on a synthetic unique-cell grid so they can never
    /// collide with each other or with a duplicate pair; the ground truth
    /// is exact, not probabilistic.
    pub fn generate(&self) -> SyntheticDataset {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut records = Vec::new();

        // Monday of an arbitrary fixed start week
        let start = NaiveDate::from_ymd_opt(2018, 4, 2)
            .expect("valid start date")
            .and_hms_opt(0, 0, 0)
            .expect("valid start time");

        let mut unique_cell = 0usize;
        for week in 0..self.weeks {
            for _ in 0..self.singles_per_week {
                let origin = unique_cell_point(unique_cell, 0.0);
                let destination = unique_cell_point(unique_cell, 30.0);
                unique_cell += 1;
                records.push(TripRecord::new(
                    random_stamp(&mut rng, start, week),
                    REGIONS[rng.gen_range(0..REGIONS.len())],
                    origin,
                    destination,
                    DATA_SOURCES[rng.gen_range(0..DATA_SOURCES.len())],
                ));
            }
        }

        for pair in 0..self.duplicate_pairs {
            // negative latitudes keep pair cells disjoint from the singles grid
            let origin_lat = -10.0 - (pair as f64) * 0.3;
            let week = pair as u32 % self.weeks.max(1);
            let day_stamp = random_stamp(&mut rng, start, week);
            let region = REGIONS[pair % REGIONS.len()];

            for source_offset in 0..2 {
                // jitter stays inside the 0.1-degree cell
                let jitter = rng.gen_range(-0.04..0.04);
                records.push(TripRecord::new(
                    day_stamp,
                    region,
                    format!("POINT ({:.4} {:.4})", origin_lat + jitter, 7.5 + jitter),
                    format!("POINT ({:.4} {:.4})", origin_lat + jitter, 12.5 - jitter),
                    DATA_SOURCES[source_offset],
                ));
            }
        }

        SyntheticDataset {
            records,
            expected_duplicate_groups: self.duplicate_pairs,
            weeks: self.weeks,
        }
    }
}

/// Deterministic unique grid cell for single trips.
fn unique_cell_point(index: usize, lon_base: f64) -> String {
    let lat = 10.0 + (index / 300) as f64 * 0.3;
    let lon = lon_base + (index % 300) as f64 * 0.3 - 150.0;
    format!("POINT ({lat:.4} {lon:.4})")
}

/// Random timestamp inside the given week.
fn random_stamp(rng: &mut StdRng, start: NaiveDateTime, week: u32) -> NaiveDateTime {
    start
        + Duration::days(week as i64 * 7 + rng.gen_range(0..7))
        + Duration::hours(rng.gen_range(0..24))
        + Duration::minutes(rng.gen_range(0..60))
}
