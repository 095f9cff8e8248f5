//! A contractor's learned knowledge and the updates that grow it.
//!
//! One [`KnowledgeBase`] exists per contractor. It is persisted as a single
//! JSON document with five sections: contractor profile, material prices,
//! labor rates, project patterns and client preferences.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::foundation::{ClientId, Timestamp, ValidationError};
use crate::domain::project::{Dimensions, ProjectDetails, ProjectType};

use super::estimate::{normalize_id, validate_amount, ClientInfo, Estimate};
use super::features::extract_key_features;
use super::policy::LearningPolicy;
use super::profile::ContractorProfile;
use super::running_average::weighted_average;

/// Current on-disk layout version.
pub const KNOWLEDGE_SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    KNOWLEDGE_SCHEMA_VERSION
}

/// Learned price of one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialKnowledge {
    pub name: String,
    /// Running average unit price, weighted by quantity.
    pub price: f64,
    /// Total quantity observed; the weight of `price`.
    pub quantity: f64,
    pub unit: String,
    pub occurrences: u32,
    #[serde(default)]
    pub project_types: BTreeSet<ProjectType>,
    pub last_updated: Timestamp,
}

/// Learned hourly rate of one service for one project type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborKnowledge {
    pub service: String,
    /// Running average rate, weighted by hours.
    pub rate: f64,
    /// Total hours observed; the weight of `rate`.
    pub hours: f64,
    pub unit: String,
    pub occurrences: u32,
    pub last_updated: Timestamp,
}

/// Immutable snapshot of one completed estimate and its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPattern {
    pub project_type: ProjectType,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub dimensions: Dimensions,
    pub material_cost: f64,
    pub labor_cost: f64,
    pub total_estimated_cost: f64,
    pub was_accepted: bool,
    /// Effective markup over material plus labor.
    pub markup: f64,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub key_features: Vec<String>,
    pub timestamp: Timestamp,
}

/// One entry in a client's project history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProject {
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    #[serde(default)]
    pub subtype: Option<String>,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub was_accepted: bool,
}

/// What is remembered about one client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub project_history: Vec<ClientProject>,
    /// `"<type>:material"` and `"<type>:style"`; most recent wins.
    #[serde(default)]
    pub preferences: BTreeMap<String, String>,
    pub last_updated: Timestamp,
}

impl ClientRecord {
    fn new(now: Timestamp) -> Self {
        Self {
            name: None,
            project_history: Vec::new(),
            preferences: BTreeMap::new(),
            last_updated: now,
        }
    }

    pub fn material_preference(&self, project_type: ProjectType) -> Option<&str> {
        self.preferences
            .get(&preference_key(project_type, "material"))
            .map(String::as_str)
    }

    pub fn style_preference(&self, project_type: ProjectType) -> Option<&str> {
        self.preferences
            .get(&preference_key(project_type, "style"))
            .map(String::as_str)
    }

    /// Share of accepted estimates of `project_type`; `None` without history.
    pub fn acceptance_rate(&self, project_type: ProjectType) -> Option<f64> {
        let relevant: Vec<&ClientProject> = self
            .project_history
            .iter()
            .filter(|p| p.project_type == project_type)
            .collect();
        if relevant.is_empty() {
            return None;
        }
        let accepted = relevant.iter().filter(|p| p.was_accepted).count();
        Some(accepted as f64 / relevant.len() as f64)
    }
}

fn preference_key(project_type: ProjectType, kind: &str) -> String {
    format!("{}:{}", project_type.as_str(), kind)
}

/// Key of a labor rate: `"<type>:<service>"`.
pub fn labor_key(project_type: ProjectType, service: &str) -> String {
    format!("{}:{}", project_type.as_str(), normalize_id(service))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialPrices {
    #[serde(default)]
    pub items: BTreeMap<String, MaterialKnowledge>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaborRates {
    #[serde(default)]
    pub rates: BTreeMap<String, LaborKnowledge>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPatterns {
    #[serde(default)]
    pub patterns: Vec<ProjectPattern>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientPreferences {
    #[serde(default)]
    pub clients: BTreeMap<ClientId, ClientRecord>,
}

/// Everything learned for one contractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBase {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub contractor_profile: ContractorProfile,
    #[serde(default)]
    pub material_prices: MaterialPrices,
    #[serde(default)]
    pub labor_rates: LaborRates,
    #[serde(default)]
    pub project_patterns: ProjectPatterns,
    #[serde(default)]
    pub client_preferences: ClientPreferences,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self {
            schema_version: KNOWLEDGE_SCHEMA_VERSION,
            contractor_profile: ContractorProfile::default(),
            material_prices: MaterialPrices::default(),
            labor_rates: LaborRates::default(),
            project_patterns: ProjectPatterns::default(),
            client_preferences: ClientPreferences::default(),
        }
    }
}

/// What one learning event changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LearningReport {
    pub materials_updated: usize,
    pub labor_rates_updated: usize,
    pub lines_skipped: usize,
    pub patterns_evicted: usize,
    pub pattern_count: usize,
    pub client_updated: bool,
    pub profile_recomputed: bool,
}

/// Counts and outcome rate over a knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSummary {
    pub schema_version: u32,
    pub materials: usize,
    pub labor_rates: usize,
    pub patterns: usize,
    pub clients: usize,
    /// Accepted share of all patterns; `None` without patterns.
    pub acceptance_rate: Option<f64>,
    pub specialties: Vec<ProjectType>,
    pub profile_last_updated: Option<Timestamp>,
}

impl KnowledgeBase {
    /// Creates an empty knowledge base at the current schema version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one completed estimate to every knowledge section.
    ///
    /// # Steps
    /// 1. Material prices
    /// 2. Labor rates
    /// 3. Pattern history
    /// 4. Client preferences (if a client is given)
    /// 5. Contractor profile, only when stale at `now`
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for negative or non-finite costs; nothing
    /// is changed in that case.
    #[allow(clippy::too_many_arguments)]
    pub fn learn_from_estimate(
        &mut self,
        estimate: &Estimate,
        details: &ProjectDetails,
        client: Option<&ClientInfo>,
        was_accepted: bool,
        final_price: Option<f64>,
        policy: &LearningPolicy,
        now: Timestamp,
    ) -> Result<LearningReport, ValidationError> {
        estimate.validate()?;
        if let Some(price) = final_price {
            validate_amount("final_price", price)?;
        }

        let mut report = LearningReport::default();

        let (updated, skipped) = self.update_material_knowledge(estimate, now);
        report.materials_updated = updated;
        report.lines_skipped += skipped;

        let (updated, skipped) = self.update_labor_knowledge(estimate, now);
        report.labor_rates_updated = updated;
        report.lines_skipped += skipped;

        report.patterns_evicted = self.update_project_patterns(
            estimate,
            details,
            was_accepted,
            final_price,
            policy,
            now,
        );
        report.pattern_count = self.project_patterns.patterns.len();

        if let Some(client) = client {
            self.update_client_preferences(client, estimate, details, was_accepted, now);
            report.client_updated = true;
        }

        if self
            .contractor_profile
            .is_stale(now, policy.profile_refresh_days)
        {
            self.refresh_profile(now);
            report.profile_recomputed = true;
        }

        Ok(report)
    }

    /// Folds each material line into the running price averages.
    ///
    /// Returns `(updated, skipped)`; lines with a non-positive quantity or
    /// an invalid price are skipped.
    pub fn update_material_knowledge(
        &mut self,
        estimate: &Estimate,
        now: Timestamp,
    ) -> (usize, usize) {
        let mut updated = 0;
        let mut skipped = 0;
        for line in &estimate.materials {
            if !(line.quantity.is_finite() && line.quantity > 0.0)
                || validate_amount("unit_price", line.unit_price).is_err()
            {
                skipped += 1;
                continue;
            }

            let id = line.material_id();
            let entry = self
                .material_prices
                .items
                .entry(id)
                .or_insert_with(|| MaterialKnowledge {
                    name: line.name.clone(),
                    price: 0.0,
                    quantity: 0.0,
                    unit: line.unit.clone(),
                    occurrences: 0,
                    project_types: BTreeSet::new(),
                    last_updated: now,
                });
            entry.price =
                weighted_average(entry.price, entry.quantity, line.unit_price, line.quantity);
            entry.quantity += line.quantity;
            entry.occurrences += 1;
            entry.project_types.insert(estimate.project_type);
            entry.last_updated = now;
            updated += 1;
        }
        (updated, skipped)
    }

    /// Folds each labor line into the running rate averages, keyed by
    /// project type and service.
    pub fn update_labor_knowledge(
        &mut self,
        estimate: &Estimate,
        now: Timestamp,
    ) -> (usize, usize) {
        let mut updated = 0;
        let mut skipped = 0;
        for line in &estimate.labor {
            if !(line.hours.is_finite() && line.hours > 0.0)
                || validate_amount("rate", line.rate).is_err()
            {
                skipped += 1;
                continue;
            }

            let key = labor_key(estimate.project_type, &line.service);
            let entry = self.labor_rates.rates.entry(key).or_insert_with(|| LaborKnowledge {
                service: line.service.clone(),
                rate: 0.0,
                hours: 0.0,
                unit: line.unit.clone(),
                occurrences: 0,
                last_updated: now,
            });
            entry.rate = weighted_average(entry.rate, entry.hours, line.rate, line.hours);
            entry.hours += line.hours;
            entry.occurrences += 1;
            entry.last_updated = now;
            updated += 1;
        }
        (updated, skipped)
    }

    /// Appends a pattern and truncates the history, keeping the first
    /// pattern ever recorded. Returns how many patterns were evicted.
    pub fn update_project_patterns(
        &mut self,
        estimate: &Estimate,
        details: &ProjectDetails,
        was_accepted: bool,
        final_price: Option<f64>,
        policy: &LearningPolicy,
        now: Timestamp,
    ) -> usize {
        let total = final_price.unwrap_or(estimate.total_cost);
        let base = estimate.base_cost();
        let markup = if base > 0.0 {
            ((total - base) / base).max(0.0)
        } else {
            policy.default_markup
        };

        self.project_patterns.patterns.push(ProjectPattern {
            project_type: estimate.project_type,
            subtype: estimate.subtype.clone(),
            dimensions: details.dimensions.clone(),
            material_cost: estimate.material_cost,
            labor_cost: estimate.labor_cost,
            total_estimated_cost: total,
            was_accepted,
            markup,
            materials: estimate.materials.iter().map(|m| m.material_id()).collect(),
            key_features: extract_key_features(details, estimate),
            timestamp: now,
        });

        truncate_keeping_first(&mut self.project_patterns.patterns, policy.pattern_history_limit)
    }

    /// Records the project in the client's history and overwrites their
    /// material/style preference for the type.
    pub fn update_client_preferences(
        &mut self,
        client: &ClientInfo,
        estimate: &Estimate,
        details: &ProjectDetails,
        was_accepted: bool,
        now: Timestamp,
    ) {
        let record = self
            .client_preferences
            .clients
            .entry(client.id.clone())
            .or_insert_with(|| ClientRecord::new(now));

        if client.name.is_some() {
            record.name = client.name.clone();
        }
        record.project_history.push(ClientProject {
            project_type: estimate.project_type,
            subtype: estimate.subtype.clone(),
            date: now.date_string(),
            was_accepted,
        });

        let material = details
            .material
            .as_deref()
            .map(normalize_id)
            .or_else(|| estimate.materials.first().map(|m| m.material_id()));
        if let Some(material) = material {
            record
                .preferences
                .insert(preference_key(estimate.project_type, "material"), material);
        }
        if let Some(style) = &estimate.subtype {
            record
                .preferences
                .insert(preference_key(estimate.project_type, "style"), style.clone());
        }
        record.last_updated = now;
    }

    /// Rebuilds the contractor profile from the pattern history.
    pub fn refresh_profile(&mut self, now: Timestamp) {
        self.contractor_profile =
            ContractorProfile::recompute(&self.project_patterns.patterns, now);
    }

    pub fn patterns_for(&self, project_type: ProjectType) -> impl Iterator<Item = &ProjectPattern> {
        self.project_patterns
            .patterns
            .iter()
            .filter(move |p| p.project_type == project_type)
    }

    pub fn client(&self, id: &ClientId) -> Option<&ClientRecord> {
        self.client_preferences.clients.get(id)
    }

    pub fn summary(&self) -> KnowledgeSummary {
        let patterns = &self.project_patterns.patterns;
        let acceptance_rate = if patterns.is_empty() {
            None
        } else {
            let accepted = patterns.iter().filter(|p| p.was_accepted).count();
            Some(accepted as f64 / patterns.len() as f64)
        };
        KnowledgeSummary {
            schema_version: self.schema_version,
            materials: self.material_prices.items.len(),
            labor_rates: self.labor_rates.rates.len(),
            patterns: patterns.len(),
            clients: self.client_preferences.clients.len(),
            acceptance_rate,
            specialties: self.contractor_profile.specialties.clone(),
            profile_last_updated: self.contractor_profile.last_updated,
        }
    }
}

/// Drops the oldest entries after index 0 until `limit` remain.
fn truncate_keeping_first<T>(items: &mut Vec<T>, limit: usize) -> usize {
    let limit = limit.max(2);
    if items.len() <= limit {
        return 0;
    }
    let excess = items.len() - limit;
    items.drain(1..1 + excess);
    excess
}
