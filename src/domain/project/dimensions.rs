//! Named project measurements.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A measurable dimension of a construction project.
///
/// Linear dimensions are in feet, `Depth` in inches and `SquareFeet` in
/// square feet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Length,
    Width,
    Height,
    Depth,
    SquareFeet,
}

impl Dimension {
    /// Spanish label used in chat responses.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Length => "largo",
            Self::Width => "ancho",
            Self::Height => "alto",
            Self::Depth => "grosor",
            Self::SquareFeet => "área",
        }
    }

    /// Unit the value is stored in.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Depth => "pulgadas",
            Self::SquareFeet => "pies cuadrados",
            _ => "pies",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Dimension name to numeric value.
///
/// Only finite, strictly positive values are ever stored; anything else is
/// silently dropped on insert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dimensions(BTreeMap<Dimension, f64>);

impl Dimensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning false if it was rejected.
    pub fn insert(&mut self, dimension: Dimension, value: f64) -> bool {
        if value.is_finite() && value > 0.0 {
            self.0.insert(dimension, value);
            true
        } else {
            false
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, dimension: Dimension, value: f64) -> Self {
        self.insert(dimension, value);
        self
    }

    pub fn get(&self, dimension: Dimension) -> Option<f64> {
        self.0.get(&dimension).copied()
    }

    pub fn contains(&self, dimension: Dimension) -> bool {
        self.0.contains_key(&dimension)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Key-by-key merge; values in `other` win.
    pub fn merge(&mut self, other: &Dimensions) {
        for (dimension, value) in other.iter() {
            self.insert(dimension, value);
        }
    }

    /// The size used to compare projects: square feet first, else length.
    pub fn size_measure(&self) -> Option<(Dimension, f64)> {
        self.get(Dimension::SquareFeet)
            .map(|v| (Dimension::SquareFeet, v))
            .or_else(|| self.get(Dimension::Length).map(|v| (Dimension::Length, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_and_non_finite_values() {
        let mut dims = Dimensions::new();
        assert!(!dims.insert(Dimension::Length, 0.0));
        assert!(!dims.insert(Dimension::Length, -4.0));
        assert!(!dims.insert(Dimension::Length, f64::NAN));
        assert!(!dims.insert(Dimension::Length, f64::INFINITY));
        assert!(dims.is_empty());
    }

    #[test]
    fn merge_overwrites_per_key_and_keeps_others() {
        let mut dims = Dimensions::new()
            .with(Dimension::Length, 100.0)
            .with(Dimension::Height, 6.0);
        let update = Dimensions::new().with(Dimension::Height, 8.0);

        dims.merge(&update);

        assert_eq!(dims.get(Dimension::Length), Some(100.0));
        assert_eq!(dims.get(Dimension::Height), Some(8.0));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let dims = Dimensions::new().with(Dimension::SquareFeet, 600.0);
        let json = serde_json::to_string(&dims).unwrap();
        assert_eq!(json, r#"{"squareFeet":600.0}"#);
    }

    #[test]
    fn size_measure_prefers_square_feet() {
        let dims = Dimensions::new()
            .with(Dimension::Length, 50.0)
            .with(Dimension::SquareFeet, 300.0);
        assert_eq!(dims.size_measure(), Some((Dimension::SquareFeet, 300.0)));

        let only_length = Dimensions::new().with(Dimension::Length, 50.0);
        assert_eq!(only_length.size_measure(), Some((Dimension::Length, 50.0)));
    }
}
