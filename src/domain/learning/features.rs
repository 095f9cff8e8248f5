//! Key-feature tags recorded on each project pattern.

use crate::domain::project::{Dimension, ProjectDetails};

use super::estimate::{normalize_id, Estimate};

/// Description words that mark a notable job feature.
const FEATURE_KEYWORDS: &[(&str, &[&str])] = &[
    ("gate", &["gate", "puerta", "portón", "porton"]),
    ("stairs", &["stairs", "steps", "escalera", "escalones"]),
    ("railing", &["railing", "baranda", "barandal"]),
    ("demolition", &["demolition", "demolición", "demolicion", "demoler"]),
    ("removal", &["removal", "remove", "retirar", "quitar"]),
    ("permit", &["permit", "permiso"]),
    ("slope", &["slope", "pendiente", "inclinado"]),
    ("custom", &["custom", "personalizado", "a medida"]),
];

const SMALL_MAX_SQFT: f64 = 200.0;
const MEDIUM_MAX_SQFT: f64 = 1000.0;

/// Size bucket by square feet: small below 200, medium up to 1000.
pub fn size_bucket(square_feet: f64) -> &'static str {
    if square_feet < SMALL_MAX_SQFT {
        "small"
    } else if square_feet <= MEDIUM_MAX_SQFT {
        "medium"
    } else {
        "large"
    }
}

/// Tags such as `material:wood`, `size:medium` and `gate`.
pub fn extract_key_features(details: &ProjectDetails, estimate: &Estimate) -> Vec<String> {
    let mut features = Vec::new();

    if let Some(material) = &details.material {
        features.push(format!("material:{}", normalize_id(material)));
    }

    if let Some(square_feet) = details.dimensions.get(Dimension::SquareFeet) {
        features.push(format!("size:{}", size_bucket(square_feet)));
    }

    let text = [estimate.description.as_deref(), estimate.subtype.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    for (feature, words) in FEATURE_KEYWORDS {
        if words.iter().any(|w| text.contains(w)) {
            features.push(feature.to_string());
        }
    }

    features
}
