//! Recommendations for a new project, read from a knowledge base.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ClientId;
use crate::domain::project::{
    Dimension, Dimensions, ProjectDetails, ProjectType, GENERIC_FALLBACK_MATERIALS,
};

use super::knowledge_base::KnowledgeBase;
use super::policy::{CostRange, LearningPolicy};
use super::profile::{mean, top_by_frequency, PROFILE_TOP_N};

const LOW_ACCEPTANCE: f64 = 0.5;
const HIGH_ACCEPTANCE: f64 = 0.8;

/// Suggested materials, price range and markup for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub recommended_materials: Vec<String>,
    pub estimated_costs: CostRange,
    pub suggested_markup: f64,
    /// Present only when the client is known to the knowledge base.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_specific_tips: Option<Vec<String>>,
}

/// Builds recommendations for `project_type` from what `kb` has learned.
///
/// Never fails: every part degrades to a fixed default when nothing
/// relevant has been learned.
pub fn generate_recommendations(
    kb: &KnowledgeBase,
    project_type: ProjectType,
    details: &ProjectDetails,
    client_id: Option<&ClientId>,
    policy: &LearningPolicy,
) -> Recommendations {
    Recommendations {
        recommended_materials: recommended_materials(kb, project_type),
        estimated_costs: estimated_costs(kb, project_type, &details.dimensions, policy),
        suggested_markup: suggested_markup(kb, project_type, policy),
        client_specific_tips: client_id.and_then(|id| client_tips(kb, id, project_type)),
    }
}

/// Cached profile first, then pattern frequency, then fixed lists.
fn recommended_materials(kb: &KnowledgeBase, project_type: ProjectType) -> Vec<String> {
    if let Some(cached) = kb
        .contractor_profile
        .preferred_materials
        .get(&project_type)
        .filter(|m| !m.is_empty())
    {
        return cached.clone();
    }

    let from_patterns: Vec<String> = top_by_frequency(
        kb.patterns_for(project_type)
            .flat_map(|p| p.materials.iter().map(String::as_str)),
        PROFILE_TOP_N,
    )
    .into_iter()
    .map(str::to_string)
    .collect();
    if !from_patterns.is_empty() {
        return from_patterns;
    }

    let defaults = project_type.profile().default_materials;
    let fallback = if defaults.is_empty() {
        GENERIC_FALLBACK_MATERIALS
    } else {
        defaults
    };
    fallback.iter().map(|m| m.to_string()).collect()
}

/// Ratio of the requested size to a stored pattern's size: square feet
/// first, then length, else 1.
pub fn size_ratio(requested: &Dimensions, stored: &Dimensions) -> f64 {
    for dimension in [Dimension::SquareFeet, Dimension::Length] {
        if let (Some(wanted), Some(had)) = (requested.get(dimension), stored.get(dimension)) {
            return wanted / had;
        }
    }
    1.0
}

fn estimated_costs(
    kb: &KnowledgeBase,
    project_type: ProjectType,
    requested: &Dimensions,
    policy: &LearningPolicy,
) -> CostRange {
    let scaled: Vec<f64> = kb
        .patterns_for(project_type)
        .map(|p| {
            let ratio = size_ratio(requested, &p.dimensions)
                .clamp(policy.min_size_ratio, policy.max_size_ratio);
            p.total_estimated_cost * ratio
        })
        .collect();

    if scaled.is_empty() {
        return policy.default_cost_range;
    }
    let min = scaled.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scaled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    CostRange::new(min, max)
}

fn suggested_markup(kb: &KnowledgeBase, project_type: ProjectType, policy: &LearningPolicy) -> f64 {
    if let Some(cached) = kb.contractor_profile.typical_markups.get(&project_type) {
        return *cached;
    }
    let markups: Vec<f64> = kb.patterns_for(project_type).map(|p| p.markup).collect();
    mean(&markups).unwrap_or(policy.default_markup)
}

fn client_tips(
    kb: &KnowledgeBase,
    client_id: &ClientId,
    project_type: ProjectType,
) -> Option<Vec<String>> {
    let record = kb.client(client_id)?;
    let label = project_type.label();
    let mut tips = Vec::new();

    if let Some(material) = record.material_preference(project_type) {
        tips.push(format!(
            "El cliente eligió {} en su último proyecto de {}.",
            material, label
        ));
    }
    if let Some(style) = record.style_preference(project_type) {
        tips.push(format!("El cliente prefiere el estilo {} para {}.", style, label));
    }
    if let Some(rate) = record.acceptance_rate(project_type) {
        let percent = (rate * 100.0).round();
        if rate < LOW_ACCEPTANCE {
            tips.push(format!(
                "El cliente aceptó solo el {}% de los estimados de {}; considera un precio más competitivo.",
                percent, label
            ));
        } else if rate > HIGH_ACCEPTANCE {
            tips.push(format!(
                "El cliente aceptó el {}% de los estimados de {}; puedes mantener tu margen habitual.",
                percent, label
            ));
        }
    }

    Some(tips)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::learning::estimate::{ClientInfo, Estimate, MaterialLine};

    fn details(dimensions: Dimensions) -> ProjectDetails {
        ProjectDetails {
            project_type: Some(ProjectType::Fencing),
            dimensions,
            ..Default::default()
        }
    }

    fn kb_with_fence(square_feet: f64, total: f64, materials: &[&str]) -> KnowledgeBase {
        let mut kb = KnowledgeBase::new();
        let mut estimate = Estimate::new(ProjectType::Fencing, total * 0.6, total * 0.2, total);
        for material in materials {
            estimate = estimate.with_material(MaterialLine::new(*material, 10.0, 5.0));
        }
        kb.update_project_patterns(
            &estimate,
            &details(Dimensions::new().with(Dimension::SquareFeet, square_feet)),
            true,
            None,
            &LearningPolicy::default(),
            Timestamp::now(),
        );
        kb
    }

    mod costs {
        use super::*;

        #[test]
        fn scenario_d_ratio_is_clamped_to_two() {
            let kb = kb_with_fence(100.0, 1000.0, &[]);
            let recs = generate_recommendations(
                &kb,
                ProjectType::Fencing,
                &details(Dimensions::new().with(Dimension::SquareFeet, 200.0)),
                None,
                &LearningPolicy::default(),
            );
            assert_eq!(recs.estimated_costs, CostRange::new(2000.0, 2000.0));
        }

        #[test]
        fn large_requests_are_clamped() {
            let kb = kb_with_fence(100.0, 1000.0, &[]);
            let recs = generate_recommendations(
                &kb,
                ProjectType::Fencing,
                &details(Dimensions::new().with(Dimension::SquareFeet, 1000.0)),
                None,
                &LearningPolicy::default(),
            );
            assert_eq!(recs.estimated_costs.max, 2000.0);
        }

        #[test]
        fn small_requests_are_clamped_at_half() {
            let kb = kb_with_fence(1000.0, 8000.0, &[]);
            let recs = generate_recommendations(
                &kb,
                ProjectType::Fencing,
                &details(Dimensions::new().with(Dimension::SquareFeet, 10.0)),
                None,
                &LearningPolicy::default(),
            );
            assert_eq!(recs.estimated_costs.min, 4000.0);
        }

        #[test]
        fn default_range_without_patterns() {
            let recs = generate_recommendations(
                &KnowledgeBase::new(),
                ProjectType::Roofing,
                &ProjectDetails::default(),
                None,
                &LearningPolicy::default(),
            );
            assert_eq!(recs.estimated_costs, CostRange::new(1000.0, 5000.0));
            assert_eq!(recs.suggested_markup, 0.25);
        }

        #[test]
        fn size_ratio_falls_back_to_length_then_one() {
            let by_length = size_ratio(
                &Dimensions::new().with(Dimension::Length, 150.0),
                &Dimensions::new().with(Dimension::Length, 100.0),
            );
            assert!((by_length - 1.5).abs() < 1e-12);
            assert_eq!(size_ratio(&Dimensions::new(), &Dimensions::new()), 1.0);
        }
    }

    mod materials {
        use super::*;

        #[test]
        fn uses_patterns_when_profile_is_empty() {
            let kb = kb_with_fence(100.0, 1000.0, &["Cedar Picket", "Post"]);
            let recs = generate_recommendations(
                &kb,
                ProjectType::Fencing,
                &ProjectDetails::default(),
                None,
                &LearningPolicy::default(),
            );
            assert_eq!(recs.recommended_materials, vec!["cedar_picket", "post"]);
        }

        #[test]
        fn cached_profile_wins() {
            let mut kb = kb_with_fence(100.0, 1000.0, &["Cedar Picket"]);
            kb.contractor_profile
                .preferred_materials
                .insert(ProjectType::Fencing, vec!["vinyl".to_string()]);
            let recs = generate_recommendations(
                &kb,
                ProjectType::Fencing,
                &ProjectDetails::default(),
                None,
                &LearningPolicy::default(),
            );
            assert_eq!(recs.recommended_materials, vec!["vinyl"]);
        }

        #[test]
        fn falls_back_to_type_defaults() {
            let recs = generate_recommendations(
                &KnowledgeBase::new(),
                ProjectType::Decking,
                &ProjectDetails::default(),
                None,
                &LearningPolicy::default(),
            );
            assert_eq!(recs.recommended_materials, vec!["wood", "composite", "fasteners"]);
        }
    }

    mod tips {
        use super::*;

        fn client() -> ClientInfo {
            ClientInfo::new(ClientId::new("acme").unwrap())
        }

        fn learn(kb: &mut KnowledgeBase, accepted: bool) {
            let details = ProjectDetails {
                material: Some("cedar".to_string()),
                ..details(Dimensions::new())
            };
            kb.update_client_preferences(
                &client(),
                &Estimate::new(ProjectType::Fencing, 100.0, 0.0, 125.0),
                &details,
                accepted,
                Timestamp::now(),
            );
        }

        #[test]
        fn unknown_client_has_no_tips() {
            let recs = generate_recommendations(
                &KnowledgeBase::new(),
                ProjectType::Fencing,
                &ProjectDetails::default(),
                Some(&client().id),
                &LearningPolicy::default(),
            );
            assert_eq!(recs.client_specific_tips, None);
        }

        #[test]
        fn warns_on_low_acceptance() {
            let mut kb = KnowledgeBase::new();
            learn(&mut kb, false);
            learn(&mut kb, false);
            learn(&mut kb, true);

            let tips = generate_recommendations(
                &kb,
                ProjectType::Fencing,
                &ProjectDetails::default(),
                Some(&client().id),
                &LearningPolicy::default(),
            )
            .client_specific_tips
            .unwrap();

            assert!(tips[0].contains("cedar"));
            assert!(tips.iter().any(|t| t.contains("precio más competitivo")));
        }

        #[test]
        fn confidence_note_on_high_acceptance() {
            let mut kb = KnowledgeBase::new();
            for _ in 0..5 {
                learn(&mut kb, true);
            }
            let tips = generate_recommendations(
                &kb,
                ProjectType::Fencing,
                &ProjectDetails::default(),
                Some(&client().id),
                &LearningPolicy::default(),
            )
            .client_specific_tips
            .unwrap();

            assert!(tips.iter().any(|t| t.contains("margen habitual")));
        }
    }
}
