//! Contractor profile: a materialized view over the pattern history.
//!
//! The profile is never updated incrementally. It is rebuilt from
//! `projectPatterns` either when it is stale or on explicit request.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::domain::foundation::Timestamp;
use crate::domain::project::ProjectType;

use super::knowledge_base::ProjectPattern;

/// How many specialties and preferred materials to keep.
pub const PROFILE_TOP_N: usize = 3;

/// What the contractor does most, derived from past estimates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractorProfile {
    /// Project types by frequency, most frequent first.
    #[serde(default)]
    pub specialties: Vec<ProjectType>,
    /// Most used materials per project type.
    #[serde(default)]
    pub preferred_materials: BTreeMap<ProjectType, Vec<String>>,
    /// Mean effective markup per project type.
    #[serde(default)]
    pub typical_markups: BTreeMap<ProjectType, f64>,
    /// When the view was last rebuilt; `None` if never.
    #[serde(default)]
    pub last_updated: Option<Timestamp>,
}

impl ContractorProfile {
    /// Returns true if the view was never built or is at least
    /// `refresh_days` old at `now`.
    pub fn is_stale(&self, now: Timestamp, refresh_days: i64) -> bool {
        match self.last_updated {
            None => true,
            Some(updated) => now.days_since(&updated) >= refresh_days,
        }
    }

    /// Rebuilds the view from `patterns`.
    pub fn recompute(patterns: &[ProjectPattern], now: Timestamp) -> Self {
        let specialties = top_by_frequency(patterns.iter().map(|p| p.project_type), PROFILE_TOP_N);

        let mut materials_by_type: BTreeMap<ProjectType, Vec<&str>> = BTreeMap::new();
        let mut markups_by_type: BTreeMap<ProjectType, Vec<f64>> = BTreeMap::new();
        for pattern in patterns {
            materials_by_type
                .entry(pattern.project_type)
                .or_default()
                .extend(pattern.materials.iter().map(String::as_str));
            markups_by_type
                .entry(pattern.project_type)
                .or_default()
                .push(pattern.markup);
        }

        let preferred_materials = materials_by_type
            .into_iter()
            .filter(|(_, materials)| !materials.is_empty())
            .map(|(project_type, materials)| {
                let top = top_by_frequency(materials.into_iter(), PROFILE_TOP_N)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                (project_type, top)
            })
            .collect();

        let typical_markups = markups_by_type
            .into_iter()
            .filter_map(|(project_type, markups)| mean(&markups).map(|m| (project_type, m)))
            .collect();

        Self {
            specialties,
            preferred_materials,
            typical_markups,
            last_updated: Some(now),
        }
    }
}

/// The `n` most frequent items, ties broken by natural order.
pub fn top_by_frequency<T, I>(items: I, n: usize) -> Vec<T>
where
    T: Eq + Hash + Ord + Copy,
    I: Iterator<Item = T>,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    for item in items {
        *counts.entry(item).or_default() += 1;
    }
    let mut ranked: Vec<(T, usize)> = counts.into_iter().collect();
    ranked.sort_by(|(a, count_a), (b, count_b)| count_b.cmp(count_a).then_with(|| a.cmp(b)));
    ranked.into_iter().take(n).map(|(item, _)| item).collect()
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::Dimensions;

    fn pattern(project_type: ProjectType, materials: &[&str], markup: f64) -> ProjectPattern {
        ProjectPattern {
            project_type,
            subtype: None,
            dimensions: Dimensions::new(),
            material_cost: 0.0,
            labor_cost: 0.0,
            total_estimated_cost: 0.0,
            was_accepted: true,
            markup,
            materials: materials.iter().map(|m| m.to_string()).collect(),
            key_features: Vec::new(),
            timestamp: Timestamp::now(),
        }
    }

    mod staleness {
        use super::*;

        #[test]
        fn never_built_profile_is_stale() {
            assert!(ContractorProfile::default().is_stale(Timestamp::now(), 14));
        }

        #[test]
        fn stale_after_refresh_window() {
            let built = Timestamp::now();
            let profile = ContractorProfile {
                last_updated: Some(built),
                ..Default::default()
            };
            assert!(!profile.is_stale(built.plus_days(13), 14));
            assert!(profile.is_stale(built.plus_days(14), 14));
        }
    }

    mod recompute {
        use super::*;

        #[test]
        fn ranks_specialties_by_frequency() {
            let patterns = vec![
                pattern(ProjectType::Roofing, &[], 0.2),
                pattern(ProjectType::Fencing, &[], 0.2),
                pattern(ProjectType::Fencing, &[], 0.2),
                pattern(ProjectType::Decking, &[], 0.2),
                pattern(ProjectType::Concrete, &[], 0.2),
                pattern(ProjectType::Concrete, &[], 0.2),
                pattern(ProjectType::Concrete, &[], 0.2),
            ];
            let profile = ContractorProfile::recompute(&patterns, Timestamp::now());

            // Decking and roofing tie; declaration order breaks it.
            assert_eq!(
                profile.specialties,
                vec![ProjectType::Concrete, ProjectType::Fencing, ProjectType::Decking]
            );
        }

        #[test]
        fn keeps_top_three_materials_per_type() {
            let patterns = vec![
                pattern(ProjectType::Fencing, &["wood", "nails", "concrete"], 0.2),
                pattern(ProjectType::Fencing, &["wood", "nails"], 0.2),
                pattern(ProjectType::Fencing, &["wood", "stain"], 0.2),
                pattern(ProjectType::Fencing, &["vinyl"], 0.2),
            ];
            let profile = ContractorProfile::recompute(&patterns, Timestamp::now());

            assert_eq!(
                profile.preferred_materials[&ProjectType::Fencing],
                vec!["wood", "nails", "concrete"]
            );
        }

        #[test]
        fn averages_markup_per_type() {
            let patterns = vec![
                pattern(ProjectType::Decking, &[], 0.2),
                pattern(ProjectType::Decking, &[], 0.4),
                pattern(ProjectType::Roofing, &[], 0.1),
            ];
            let profile = ContractorProfile::recompute(&patterns, Timestamp::now());

            assert!((profile.typical_markups[&ProjectType::Decking] - 0.3).abs() < 1e-12);
            assert!((profile.typical_markups[&ProjectType::Roofing] - 0.1).abs() < 1e-12);
        }

        #[test]
        fn empty_history_gives_empty_view() {
            let now = Timestamp::now();
            let profile = ContractorProfile::recompute(&[], now);
            assert!(profile.specialties.is_empty());
            assert!(profile.preferred_materials.is_empty());
            assert_eq!(profile.last_updated, Some(now));
        }
    }

    #[test]
    fn serializes_type_keys_as_strings() {
        let mut profile = ContractorProfile::default();
        profile.typical_markups.insert(ProjectType::Fencing, 0.25);
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["typicalMarkups"]["fencing"], 0.25);
    }
}
