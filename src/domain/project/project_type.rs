//! Project types and their per-type rules.
//!
//! Every project type has exactly one [`ProjectTypeProfile`] in a static
//! table. The profile carries everything the dialogue and the learning
//! engine need to know about the type: the words that name it, which
//! dimensions make an estimate possible, which questions to ask and which
//! materials to fall back on. Adding a project type means adding a table
//! entry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::dimensions::Dimension;
use super::slot::Slot;

/// Construction project categories the estimator recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Fencing,
    Decking,
    Roofing,
    Concrete,
    Painting,
}

/// Static rules for one project type.
#[derive(Debug)]
pub struct ProjectTypeProfile {
    pub project_type: ProjectType,
    /// Lower-case English/Spanish words that name this type in free text.
    pub synonyms: &'static [&'static str],
    /// Any one of these dimensions is enough to estimate. `None` means the
    /// type is recognised but has no estimating rules yet.
    pub estimate_requirement: Option<&'static [Dimension]>,
    /// Slots to ask about, in asking order, with the question text.
    pub questions: &'static [(Slot, &'static str)],
    /// Materials suggested when nothing has been learned for the type.
    pub default_materials: &'static [&'static str],
    /// Whether `length * height` gives the area (vertical surfaces).
    pub area_from_length_and_height: bool,
}

const LOCATION_QUESTION: (Slot, &str) =
    (Slot::Location, "¿En qué ciudad y estado se encuentra el proyecto?");

static PROFILES: [ProjectTypeProfile; 5] = [
    ProjectTypeProfile {
        project_type: ProjectType::Fencing,
        synonyms: &["cerca", "fence", "fencing", "valla", "verja", "reja"],
        estimate_requirement: Some(&[Dimension::Length, Dimension::SquareFeet]),
        questions: &[
            (Slot::Length, "¿Cuál es el largo de la cerca en pies?"),
            (Slot::Height, "¿Qué altura necesitas para la cerca?"),
            (Slot::Material, "¿Qué material prefieres para la cerca (madera, vinilo, metal o malla ciclón)?"),
            LOCATION_QUESTION,
        ],
        default_materials: &["wood", "vinyl", "chain_link"],
        area_from_length_and_height: true,
    },
    ProjectTypeProfile {
        project_type: ProjectType::Decking,
        synonyms: &["deck", "decking", "terraza", "plataforma"],
        estimate_requirement: Some(&[Dimension::SquareFeet]),
        questions: &[
            (Slot::Area, "¿Cuántos pies cuadrados tendrá la terraza?"),
            (Slot::Material, "¿Qué material prefieres para la terraza (madera o compuesto)?"),
            LOCATION_QUESTION,
        ],
        default_materials: &["wood", "composite", "fasteners"],
        area_from_length_and_height: false,
    },
    ProjectTypeProfile {
        project_type: ProjectType::Roofing,
        synonyms: &["roof", "roofing", "techo", "tejado"],
        estimate_requirement: Some(&[Dimension::SquareFeet]),
        questions: &[
            (Slot::Area, "¿Cuál es el área del techo en pies cuadrados?"),
            (Slot::Material, "¿Qué material prefieres para el techo (shingles, metal o teja)?"),
            LOCATION_QUESTION,
        ],
        default_materials: &["asphalt_shingle", "underlayment", "flashing"],
        area_from_length_and_height: false,
    },
    ProjectTypeProfile {
        project_type: ProjectType::Concrete,
        synonyms: &["concrete", "concreto", "cemento", "hormigón", "losa", "slab"],
        estimate_requirement: Some(&[Dimension::SquareFeet]),
        questions: &[
            (Slot::Area, "¿Cuántos pies cuadrados de concreto necesitas?"),
            LOCATION_QUESTION,
        ],
        default_materials: &["concrete", "rebar", "gravel"],
        area_from_length_and_height: false,
    },
    ProjectTypeProfile {
        project_type: ProjectType::Painting,
        synonyms: &["pintura", "pintar", "paint"],
        estimate_requirement: None,
        questions: &[
            (Slot::Area, "¿Cuántos pies cuadrados hay que pintar?"),
            (Slot::Material, "¿Qué material o tipo de pintura prefieres?"),
            LOCATION_QUESTION,
        ],
        default_materials: &["paint", "primer"],
        area_from_length_and_height: true,
    },
];

/// Question used while the project type itself is unknown.
pub const PROJECT_TYPE_QUESTION: &str =
    "¿Qué tipo de proyecto necesitas? Por ejemplo: cerca, terraza, techo o concreto.";

/// Materials suggested when neither the type nor any history is known.
pub const GENERIC_FALLBACK_MATERIALS: &[&str] = &["lumber", "fasteners", "concrete"];

impl ProjectType {
    /// All project types in table order.
    pub fn all() -> impl Iterator<Item = ProjectType> {
        PROFILES.iter().map(|p| p.project_type)
    }

    /// All profiles in table order.
    pub fn profiles() -> &'static [ProjectTypeProfile] {
        &PROFILES
    }

    /// Returns the static rules for this type.
    pub fn profile(&self) -> &'static ProjectTypeProfile {
        // The table holds one entry per variant, in declaration order.
        &PROFILES[*self as usize]
    }

    /// Canonical identifier used as a knowledge-base key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fencing => "fencing",
            Self::Decking => "decking",
            Self::Roofing => "roofing",
            Self::Concrete => "concrete",
            Self::Painting => "painting",
        }
    }

    /// Spanish noun used in chat responses.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fencing => "cerca",
            Self::Decking => "terraza",
            Self::Roofing => "techo",
            Self::Concrete => "concreto",
            Self::Painting => "pintura",
        }
    }

    /// Returns true if the type has estimating rules.
    pub fn supports_estimates(&self) -> bool {
        self.profile().estimate_requirement.is_some()
    }

    /// Types that can currently reach an estimate, for user-facing lists.
    pub fn estimable() -> Vec<ProjectType> {
        Self::all().filter(|t| t.supports_estimates()).collect()
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::all()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| format!("unknown project type: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_table_is_indexed_by_variant() {
        for project_type in ProjectType::all() {
            assert_eq!(project_type.profile().project_type, project_type);
        }
    }

    #[test]
    fn parses_canonical_names_case_insensitively() {
        assert_eq!("Fencing".parse::<ProjectType>(), Ok(ProjectType::Fencing));
        assert_eq!(" roofing ".parse::<ProjectType>(), Ok(ProjectType::Roofing));
        assert!("landscaping".parse::<ProjectType>().is_err());
    }

    #[test]
    fn serializes_to_snake_case() {
        let json = serde_json::to_string(&ProjectType::Decking).unwrap();
        assert_eq!(json, "\"decking\"");
    }

    #[test]
    fn painting_is_recognised_but_not_estimable() {
        assert!(!ProjectType::Painting.supports_estimates());
        assert!(!ProjectType::estimable().contains(&ProjectType::Painting));
        assert_eq!(ProjectType::estimable().len(), 4);
    }

    #[test]
    fn every_profile_asks_for_location_last() {
        for profile in ProjectType::profiles() {
            let last = profile.questions.last().map(|(slot, _)| *slot);
            assert_eq!(last, Some(Slot::Location), "{:?}", profile.project_type);
        }
    }

    #[test]
    fn synonyms_are_lower_case() {
        for profile in ProjectType::profiles() {
            for synonym in profile.synonyms {
                assert_eq!(*synonym, synonym.to_lowercase());
            }
        }
    }
}
