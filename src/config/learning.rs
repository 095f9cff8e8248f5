//! Learning engine configuration

use serde::Deserialize;

use crate::domain::learning::{CostRange, LearningPolicy};

use super::error::ValidationError;

/// Tunables for knowledge updates and recommendations
#[derive(Debug, Clone, Deserialize)]
pub struct LearningConfig {
    /// Patterns kept per contractor, including the permanent first one
    #[serde(default = "default_pattern_history_limit")]
    pub pattern_history_limit: usize,

    /// Days before the contractor profile is recomputed
    #[serde(default = "default_profile_refresh_days")]
    pub profile_refresh_days: i64,

    #[serde(default = "default_markup")]
    pub default_markup: f64,

    #[serde(default = "default_cost_min")]
    pub default_cost_min: f64,

    #[serde(default = "default_cost_max")]
    pub default_cost_max: f64,

    #[serde(default = "default_min_size_ratio")]
    pub min_size_ratio: f64,

    #[serde(default = "default_max_size_ratio")]
    pub max_size_ratio: f64,
}

impl LearningConfig {
    /// Validate learning configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.pattern_history_limit < 2 {
            return Err(ValidationError::PatternHistoryTooSmall(
                self.pattern_history_limit,
            ));
        }
        if self.profile_refresh_days <= 0 {
            return Err(ValidationError::InvalidRefreshInterval(
                self.profile_refresh_days,
            ));
        }
        if !(self.default_markup.is_finite() && self.default_markup >= 0.0) {
            return Err(ValidationError::InvalidMarkup);
        }
        if !(self.default_cost_min >= 0.0 && self.default_cost_min <= self.default_cost_max) {
            return Err(ValidationError::InvalidCostRange {
                min: self.default_cost_min,
                max: self.default_cost_max,
            });
        }
        if !(self.min_size_ratio > 0.0 && self.min_size_ratio <= self.max_size_ratio) {
            return Err(ValidationError::InvalidSizeRatio {
                min: self.min_size_ratio,
                max: self.max_size_ratio,
            });
        }
        Ok(())
    }

    /// Domain policy built from these values
    pub fn policy(&self) -> LearningPolicy {
        LearningPolicy {
            pattern_history_limit: self.pattern_history_limit,
            profile_refresh_days: self.profile_refresh_days,
            default_markup: self.default_markup,
            default_cost_range: CostRange::new(self.default_cost_min, self.default_cost_max),
            min_size_ratio: self.min_size_ratio,
            max_size_ratio: self.max_size_ratio,
        }
    }
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            pattern_history_limit: default_pattern_history_limit(),
            profile_refresh_days: default_profile_refresh_days(),
            default_markup: default_markup(),
            default_cost_min: default_cost_min(),
            default_cost_max: default_cost_max(),
            min_size_ratio: default_min_size_ratio(),
            max_size_ratio: default_max_size_ratio(),
        }
    }
}

fn default_pattern_history_limit() -> usize {
    100
}

fn default_profile_refresh_days() -> i64 {
    14
}

fn default_markup() -> f64 {
    0.25
}

fn default_cost_min() -> f64 {
    1000.0
}

fn default_cost_max() -> f64 {
    5000.0
}

fn default_min_size_ratio() -> f64 {
    0.5
}

fn default_max_size_ratio() -> f64 {
    2.0
}
