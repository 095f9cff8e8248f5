//! Price lookups that always produce a number.
//!
//! A requested material or service is priced from learned knowledge when
//! its key is known, from a similarly named known entry otherwise, and
//! finally from a fixed table keyed by name fragments.

use serde::{Deserialize, Serialize};

use crate::domain::project::ProjectType;

use super::estimate::normalize_id;
use super::knowledge_base::{labor_key, KnowledgeBase};

const MATERIAL_FALLBACK_PRICES: &[(&str, f64)] = &[
    ("wood", 25.0),
    ("concrete", 120.0),
    ("paint", 35.0),
    ("metal", 40.0),
    ("vinyl", 30.0),
    ("composite", 45.0),
    ("shingle", 90.0),
];
const GENERIC_MATERIAL_PRICE: f64 = 50.0;

const LABOR_FALLBACK_RATES: &[(&str, f64)] = &[
    ("install", 65.0),
    ("demol", 55.0),
    ("paint", 45.0),
    ("pint", 45.0),
];
const GENERIC_LABOR_RATE: f64 = 60.0;

/// Where a quoted price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    /// Exact key found in the knowledge base.
    Learned,
    /// Borrowed from a known entry whose name overlaps the request.
    Similar,
    /// Fixed table or generic default.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub quantity: f64,
}

impl MaterialRequest {
    pub fn new(name: impl Into<String>, quantity: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            quantity,
        }
    }

    fn key(&self) -> String {
        normalize_id(self.id.as_deref().unwrap_or(&self.name))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedMaterial {
    pub id: String,
    pub name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub unit: String,
    pub total: f64,
    pub source: PriceSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborRequest {
    pub service: String,
    pub hours: f64,
}

impl LaborRequest {
    pub fn new(service: impl Into<String>, hours: f64) -> Self {
        Self {
            service: service.into(),
            hours,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborRateQuote {
    pub service: String,
    pub hours: f64,
    pub rate: f64,
    pub unit: String,
    pub total: f64,
    pub source: PriceSource,
}

/// Prices every requested material; never fails.
pub fn price_materials(kb: &KnowledgeBase, requests: &[MaterialRequest]) -> Vec<PricedMaterial> {
    requests
        .iter()
        .map(|request| {
            let id = request.key();
            let (unit_price, unit, source) = lookup_material(kb, &id);
            PricedMaterial {
                id,
                name: request.name.clone(),
                quantity: request.quantity,
                unit_price,
                unit,
                total: unit_price * request.quantity,
                source,
            }
        })
        .collect()
}

fn lookup_material(kb: &KnowledgeBase, id: &str) -> (f64, String, PriceSource) {
    let items = &kb.material_prices.items;
    if let Some(known) = items.get(id) {
        return (known.price, known.unit.clone(), PriceSource::Learned);
    }

    // Most observed overlapping entry; map order breaks ties.
    let similar = items
        .iter()
        .filter(|(key, known)| overlaps(id, key) || overlaps(id, &normalize_id(&known.name)))
        .max_by(|(key_a, a), (key_b, b)| {
            a.occurrences
                .cmp(&b.occurrences)
                .then_with(|| key_b.cmp(key_a))
        });
    if let Some((_, known)) = similar {
        return (known.price, known.unit.clone(), PriceSource::Similar);
    }

    let price = table_lookup(MATERIAL_FALLBACK_PRICES, id).unwrap_or(GENERIC_MATERIAL_PRICE);
    (price, "unit".to_string(), PriceSource::Fallback)
}

/// Quotes an hourly rate for every requested service of `project_type`;
/// never fails.
pub fn quote_labor_rates(
    kb: &KnowledgeBase,
    project_type: ProjectType,
    requests: &[LaborRequest],
) -> Vec<LaborRateQuote> {
    requests
        .iter()
        .map(|request| {
            let (rate, unit, source) = lookup_labor(kb, project_type, &request.service);
            LaborRateQuote {
                service: request.service.clone(),
                hours: request.hours,
                rate,
                unit,
                total: rate * request.hours,
                source,
            }
        })
        .collect()
}

fn lookup_labor(
    kb: &KnowledgeBase,
    project_type: ProjectType,
    service: &str,
) -> (f64, String, PriceSource) {
    let rates = &kb.labor_rates.rates;
    if let Some(known) = rates.get(&labor_key(project_type, service)) {
        return (known.rate, known.unit.clone(), PriceSource::Learned);
    }

    let wanted = normalize_id(service);
    let type_prefix = format!("{}:", project_type.as_str());
    // Same project type first, then the most observed.
    let similar = rates
        .iter()
        .filter(|(_, known)| overlaps(&wanted, &normalize_id(&known.service)))
        .max_by_key(|(key, known)| (key.starts_with(&type_prefix), known.occurrences));
    if let Some((_, known)) = similar {
        return (known.rate, known.unit.clone(), PriceSource::Similar);
    }

    let rate = table_lookup(LABOR_FALLBACK_RATES, &wanted).unwrap_or(GENERIC_LABOR_RATE);
    (rate, "hour".to_string(), PriceSource::Fallback)
}

/// True when either normalized name contains the other.
fn overlaps(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

fn table_lookup(table: &[(&str, f64)], name: &str) -> Option<f64> {
    table
        .iter()
        .find(|(fragment, _)| name.contains(fragment))
        .map(|(_, value)| *value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::learning::estimate::{Estimate, LaborLine, MaterialLine};

    fn learned() -> KnowledgeBase {
        let mut kb = KnowledgeBase::new();
        let estimate = Estimate::new(ProjectType::Fencing, 500.0, 300.0, 1000.0)
            .with_material(MaterialLine::new("Cedar Picket", 100.0, 4.5).with_unit("piece"))
            .with_labor(LaborLine::new("Fence Installation", 10.0, 70.0));
        kb.update_material_knowledge(&estimate, Timestamp::now());
        kb.update_labor_knowledge(&estimate, Timestamp::now());
        kb
    }

    mod materials {
        use super::*;

        #[test]
        fn learned_price_is_used_for_a_known_id() {
            let priced = price_materials(&learned(), &[MaterialRequest::new("cedar picket", 20.0)]);
            assert_eq!(priced[0].id, "cedar_picket");
            assert_eq!(priced[0].unit_price, 4.5);
            assert_eq!(priced[0].unit, "piece");
            assert_eq!(priced[0].total, 90.0);
            assert_eq!(priced[0].source, PriceSource::Learned);
        }

        #[test]
        fn similar_name_borrows_learned_price() {
            let priced = price_materials(&learned(), &[MaterialRequest::new("Picket", 10.0)]);
            assert_eq!(priced[0].unit_price, 4.5);
            assert_eq!(priced[0].source, PriceSource::Similar);
        }

        #[test]
        fn fallback_table_by_name_fragment() {
            let priced = price_materials(
                &KnowledgeBase::new(),
                &[
                    MaterialRequest::new("Pressure treated wood post", 2.0),
                    MaterialRequest::new("Ready-mix concrete", 1.0),
                    MaterialRequest::new("Gravel", 3.0),
                ],
            );
            assert_eq!(priced[0].unit_price, 25.0);
            assert_eq!(priced[0].total, 50.0);
            assert_eq!(priced[1].unit_price, 120.0);
            assert_eq!(priced[2].unit_price, GENERIC_MATERIAL_PRICE);
            assert!(priced.iter().all(|p| p.source == PriceSource::Fallback));
        }
    }

    mod labor {
        use super::*;

        #[test]
        fn learned_rate_for_type_and_service() {
            let quotes = quote_labor_rates(
                &learned(),
                ProjectType::Fencing,
                &[LaborRequest::new("fence installation", 8.0)],
            );
            assert_eq!(quotes[0].rate, 70.0);
            assert_eq!(quotes[0].total, 560.0);
            assert_eq!(quotes[0].source, PriceSource::Learned);
        }

        #[test]
        fn other_type_borrows_similar_service() {
            let quotes = quote_labor_rates(
                &learned(),
                ProjectType::Decking,
                &[LaborRequest::new("installation", 4.0)],
            );
            assert_eq!(quotes[0].rate, 70.0);
            assert_eq!(quotes[0].source, PriceSource::Similar);
        }

        #[test]
        fn fallback_rates() {
            let quotes = quote_labor_rates(
                &KnowledgeBase::new(),
                ProjectType::Painting,
                &[
                    LaborRequest::new("Demolición", 2.0),
                    LaborRequest::new("Pintura exterior", 2.0),
                    LaborRequest::new("Cleanup", 1.0),
                ],
            );
            assert_eq!(quotes[0].rate, 55.0);
            assert_eq!(quotes[1].rate, 45.0);
            assert_eq!(quotes[2].rate, GENERIC_LABOR_RATE);
            assert_eq!(quotes[2].unit, "hour");
        }
    }
}
