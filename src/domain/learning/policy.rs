//! Tunable learning parameters.

use serde::{Deserialize, Serialize};

/// Inclusive cost range, in dollars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRange {
    pub min: f64,
    pub max: f64,
}

impl CostRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Parameters for knowledge updates and recommendations.
#[derive(Debug, Clone, PartialEq)]
pub struct LearningPolicy {
    /// Maximum patterns kept, including the permanent first one.
    pub pattern_history_limit: usize,
    /// Age in days after which the contractor profile is recomputed.
    pub profile_refresh_days: i64,
    /// Markup used when nothing has been learned, or the base cost is zero.
    pub default_markup: f64,
    /// Cost range used when no pattern of the type exists.
    pub default_cost_range: CostRange,
    /// Lower clamp for the size ratio applied to historical totals.
    pub min_size_ratio: f64,
    /// Upper clamp for the size ratio applied to historical totals.
    pub max_size_ratio: f64,
}

impl Default for LearningPolicy {
    fn default() -> Self {
        Self {
            pattern_history_limit: 100,
            profile_refresh_days: 14,
            default_markup: 0.25,
            default_cost_range: CostRange::new(1000.0, 5000.0),
            min_size_ratio: 0.5,
            max_size_ratio: 2.0,
        }
    }
}
