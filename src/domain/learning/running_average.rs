//! Incremental weighted mean.

/// Folds a new observation into a running weighted average.
///
/// Computes `(old_avg * old_weight + new_value * new_weight) / (old_weight + new_weight)`.
/// When the combined weight is not positive the new value is returned.
pub fn weighted_average(old_avg: f64, old_weight: f64, new_value: f64, new_weight: f64) -> f64 {
    let total = old_weight + new_weight;
    if total <= 0.0 {
        return new_value;
    }
    (old_avg * old_weight + new_value * new_weight) / total
}
