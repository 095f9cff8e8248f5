//! Completed estimates handed to the learning engine.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ClientId, ValidationError};
use crate::domain::project::ProjectType;

/// Lower-cases and replaces every non-alphanumeric character with `_`.
///
/// "Cedar Pickets 6ft" becomes "cedar_pickets_6ft".
pub fn normalize_id(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// One priced material in an estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialLine {
    /// Catalogue id; the name is used when absent.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub quantity: f64,
    pub unit_price: f64,
    #[serde(default = "default_material_unit")]
    pub unit: String,
}

fn default_material_unit() -> String {
    "unit".to_string()
}

impl MaterialLine {
    pub fn new(name: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            quantity,
            unit_price,
            unit: default_material_unit(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Knowledge-base key for this material.
    pub fn material_id(&self) -> String {
        normalize_id(self.id.as_deref().unwrap_or(&self.name))
    }
}

/// One labor service in an estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborLine {
    pub service: String,
    pub hours: f64,
    pub rate: f64,
    #[serde(default = "default_labor_unit")]
    pub unit: String,
}

fn default_labor_unit() -> String {
    "hour".to_string()
}

impl LaborLine {
    pub fn new(service: impl Into<String>, hours: f64, rate: f64) -> Self {
        Self {
            service: service.into(),
            hours,
            rate,
            unit: default_labor_unit(),
        }
    }
}

/// A completed estimate, as produced by the (external) estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub project_type: ProjectType,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub materials: Vec<MaterialLine>,
    #[serde(default)]
    pub labor: Vec<LaborLine>,
    pub material_cost: f64,
    pub labor_cost: f64,
    pub total_cost: f64,
}

impl Estimate {
    /// Creates an estimate with the three cost totals and no line items.
    pub fn new(
        project_type: ProjectType,
        material_cost: f64,
        labor_cost: f64,
        total_cost: f64,
    ) -> Self {
        Self {
            project_type,
            subtype: None,
            description: None,
            materials: Vec::new(),
            labor: Vec::new(),
            material_cost,
            labor_cost,
            total_cost,
        }
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_material(mut self, line: MaterialLine) -> Self {
        self.materials.push(line);
        self
    }

    pub fn with_labor(mut self, line: LaborLine) -> Self {
        self.labor.push(line);
        self
    }

    /// Material plus labor, before markup.
    pub fn base_cost(&self) -> f64 {
        self.material_cost + self.labor_cost
    }

    /// Checks that every cost total is a finite, non-negative number.
    ///
    /// Line items are not checked here; lines with non-positive quantities
    /// or hours are skipped during learning instead.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("material_cost", self.material_cost),
            ("labor_cost", self.labor_cost),
            ("total_cost", self.total_cost),
        ] {
            validate_amount(field, value)?;
        }
        Ok(())
    }
}

/// Rejects negative and non-finite money amounts.
pub fn validate_amount(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::out_of_range(field, 0.0, f64::MAX, value))
    }
}

/// The client an estimate was prepared for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub id: ClientId,
    #[serde(default)]
    pub name: Option<String>,
}

impl ClientInfo {
    pub fn new(id: ClientId) -> Self {
        Self { id, name: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_id_replaces_non_alphanumerics() {
        assert_eq!(normalize_id("Cedar Pickets 6ft"), "cedar_pickets_6ft");
        assert_eq!(normalize_id("2x4 Lumber (treated)"), "2x4_lumber__treated_");
        assert_eq!(normalize_id("  PVC "), "pvc");
    }

    #[test]
    fn material_id_prefers_explicit_id() {
        let line = MaterialLine::new("Cedar Pickets", 10.0, 3.0).with_id("CEDAR-01");
        assert_eq!(line.material_id(), "cedar_01");
        assert_eq!(MaterialLine::new("Cedar Pickets", 10.0, 3.0).material_id(), "cedar_pickets");
    }

    #[test]
    fn validate_rejects_negative_and_nan_costs() {
        assert!(Estimate::new(ProjectType::Fencing, 800.0, 200.0, 1250.0).validate().is_ok());
        assert!(Estimate::new(ProjectType::Fencing, -1.0, 200.0, 1250.0).validate().is_err());
        assert!(Estimate::new(ProjectType::Fencing, 800.0, f64::NAN, 1250.0)
            .validate()
            .is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{
            "projectType": "decking",
            "materials": [{"name": "Composite Board", "quantity": 40, "unitPrice": 45}],
            "materialCost": 1800,
            "laborCost": 900,
            "totalCost": 3375
        }"#;
        let estimate: Estimate = serde_json::from_str(json).unwrap();
        assert_eq!(estimate.project_type, ProjectType::Decking);
        assert_eq!(estimate.materials[0].unit, "unit");
        assert!(estimate.labor.is_empty());
        assert_eq!(estimate.base_cost(), 2700.0);
    }
}
