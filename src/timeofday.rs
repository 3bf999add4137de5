//! Time-of-day classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Time-of-day bucket derived from the hour of a trip's timestamp.
///
/// Boundaries: Morning covers hours `[5, 12)`, Afternoon `[12, 18]`
/// (the upper bound is inclusive), Night everything else. The variant
/// order follows the day so grouped output sorts Morning, Afternoon,
/// Night.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Night,
}

impl TimeOfDay {
    /// Classify an hour in `0..24`.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=18 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Night => "Night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
