//! Slots: the fields the dialogue fills in.

use serde::{Deserialize, Serialize};

use super::details::ProjectDetails;
use super::dimensions::Dimension;
use super::words::contains_exact_word;

/// One fillable piece of project information.
///
/// Also serves as the topic of a question: every generated question is
/// about exactly one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Type,
    Length,
    Height,
    Area,
    Material,
    Location,
}

impl Slot {
    /// All slots, in topic-table order.
    pub const ALL: [Slot; 6] = [
        Slot::Type,
        Slot::Length,
        Slot::Height,
        Slot::Area,
        Slot::Material,
        Slot::Location,
    ];

    /// The dimension this slot fills, if it is a dimension slot.
    pub fn dimension(&self) -> Option<Dimension> {
        match self {
            Self::Length => Some(Dimension::Length),
            Self::Height => Some(Dimension::Height),
            Self::Area => Some(Dimension::SquareFeet),
            _ => None,
        }
    }

    /// Returns true for length, height and area.
    pub fn is_dimension(&self) -> bool {
        self.dimension().is_some()
    }

    /// Spanish description used when naming a missing slot.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Type => "el tipo de proyecto",
            Self::Length => "el largo en pies",
            Self::Height => "la altura",
            Self::Area => "el área en pies cuadrados",
            Self::Material => "el material",
            Self::Location => "la ubicación (ciudad y estado)",
        }
    }

    /// Lower-case keywords that identify this topic in a question or answer.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Type => &[
                "tipo de proyecto",
                "project type",
                "type of project",
                "kind of project",
            ],
            Self::Length => &["largo", "longitud", "length", "long"],
            Self::Height => &["altura", "alto", "height", "tall", "high"],
            Self::Area => &[
                "área",
                "area",
                "cuadrados",
                "square feet",
                "sq ft",
                "sqft",
            ],
            Self::Material => &[
                "material",
                "madera",
                "wood",
                "vinilo",
                "vinyl",
                "metal",
                "compuesto",
                "composite",
                "teja",
                "shingle",
            ],
            Self::Location => &[
                "ciudad",
                "city",
                "estado",
                "state",
                "ubicación",
                "ubicacion",
                "location",
            ],
        }
    }

    /// Returns true if `text` (already lower-cased) mentions this topic as
    /// whole words.
    pub fn mentioned_in(&self, lower_text: &str) -> bool {
        self.keywords().iter().any(|k| contains_exact_word(lower_text, k))
    }

    /// Returns true if the slot already has a value in `details`.
    pub fn is_filled(&self, details: &ProjectDetails) -> bool {
        match self {
            Self::Type => details.project_type.is_some(),
            Self::Material => details.material.is_some(),
            Self::Location => details.location.as_ref().is_some_and(|l| !l.is_empty()),
            _ => self
                .dimension()
                .is_some_and(|d| details.dimensions.contains(d)),
        }
    }
}
