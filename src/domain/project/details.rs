//! Accumulated project details and the deltas that update them.

use serde::{Deserialize, Serialize};

use super::dimensions::{Dimension, Dimensions};
use super::project_type::ProjectType;
use super::slot::Slot;

/// City/state of the job site. State is a two-letter US code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: Option<String>,
    pub state: Option<String>,
}

impl Location {
    pub fn new(city: Option<String>, state: Option<String>) -> Self {
        Self { city, state }
    }

    pub fn is_empty(&self) -> bool {
        self.city.is_none() && self.state.is_none()
    }

    /// Field-level merge; present fields in `other` win.
    pub fn merge(&mut self, other: &Location) {
        if other.city.is_some() {
            self.city = other.city.clone();
        }
        if other.state.is_some() {
            self.state = other.state.clone();
        }
    }

    /// "Austin, TX", "Austin" or "TX".
    pub fn display(&self) -> String {
        match (&self.city, &self.state) {
            (Some(city), Some(state)) => format!("{}, {}", city, state),
            (Some(city), None) => city.clone(),
            (None, Some(state)) => state.clone(),
            (None, None) => String::new(),
        }
    }
}

/// Partially-filled description of the project being estimated.
///
/// Fields start empty and are filled by merging [`ProjectDetailsDelta`]s;
/// the struct is never replaced wholesale during a conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    #[serde(rename = "type")]
    pub project_type: Option<ProjectType>,
    pub material: Option<String>,
    #[serde(default)]
    pub dimensions: Dimensions,
    pub location: Option<Location>,
}

/// Fields newly determined from one message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetailsDelta {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub project_type: Option<ProjectType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Dimensions::is_empty")]
    pub dimensions: Dimensions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl ProjectDetailsDelta {
    pub fn is_empty(&self) -> bool {
        self.project_type.is_none()
            && self.material.is_none()
            && self.dimensions.is_empty()
            && self.location.is_none()
    }

    /// Slots this delta provides a value for.
    pub fn filled_slots(&self) -> Vec<Slot> {
        let mut slots = Vec::new();
        if self.project_type.is_some() {
            slots.push(Slot::Type);
        }
        for slot in [Slot::Length, Slot::Height, Slot::Area] {
            if slot.dimension().is_some_and(|d| self.dimensions.contains(d)) {
                slots.push(slot);
            }
        }
        if self.material.is_some() {
            slots.push(Slot::Material);
        }
        if self.location.as_ref().is_some_and(|l| !l.is_empty()) {
            slots.push(Slot::Location);
        }
        slots
    }
}

impl ProjectDetails {
    /// Merges a delta: scalar overwrite for type/material, key-wise merge
    /// for dimensions and location.
    pub fn merge(&mut self, delta: &ProjectDetailsDelta) {
        if let Some(project_type) = delta.project_type {
            self.project_type = Some(project_type);
        }
        if let Some(material) = &delta.material {
            self.material = Some(material.clone());
        }
        self.dimensions.merge(&delta.dimensions);
        if let Some(location) = &delta.location {
            self.location
                .get_or_insert_with(Location::default)
                .merge(location);
        }
    }

    /// Returns true once the project type is known and its minimum
    /// dimension set is present. Types without estimating rules never
    /// qualify.
    pub fn can_generate_estimate(&self) -> bool {
        let Some(project_type) = self.project_type else {
            return false;
        };
        match project_type.profile().estimate_requirement {
            Some(any_of) => any_of.iter().any(|d| self.dimensions.contains(*d)),
            None => false,
        }
    }

    /// Slots still empty, in asking order. Only the type slot is reported
    /// while the type is unknown.
    pub fn missing_slots(&self) -> Vec<Slot> {
        match self.project_type {
            None => vec![Slot::Type],
            Some(project_type) => project_type
                .profile()
                .questions
                .iter()
                .map(|(slot, _)| *slot)
                .filter(|slot| !slot.is_filled(self))
                .collect(),
        }
    }

    /// Short Spanish summary of what is known, e.g.
    /// "cerca de madera, 100 pies de largo, 6 pies de alto en Austin, TX".
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        let mut head = String::new();
        if let Some(project_type) = self.project_type {
            head.push_str(project_type.label());
        }
        if let Some(material) = &self.material {
            if head.is_empty() {
                head.push_str(material);
            } else {
                head.push_str(&format!(" de {}", material));
            }
        }
        if !head.is_empty() {
            parts.push(head);
        }

        for (dimension, value) in self.dimensions.iter() {
            let text = match dimension {
                Dimension::SquareFeet => format!("{} {}", format_number(value), dimension.unit()),
                _ => format!(
                    "{} {} de {}",
                    format_number(value),
                    dimension.unit(),
                    dimension.label()
                ),
            };
            parts.push(text);
        }

        let mut summary = parts.join(", ");
        if let Some(location) = self.location.as_ref().filter(|l| !l.is_empty()) {
            if summary.is_empty() {
                summary = format!("en {}", location.display());
            } else {
                summary.push_str(&format!(" en {}", location.display()));
            }
        }
        summary
    }
}

/// Renders 100.0 as "100" and 12.5 as "12.5".
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}
