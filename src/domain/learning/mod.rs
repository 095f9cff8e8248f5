//! Learning domain module.
//!
//! A contractor's knowledge base grows with every completed estimate:
//! running price and rate averages, a capped pattern history, client
//! preferences and a periodically rebuilt contractor profile. The same
//! knowledge answers recommendation and pricing queries.

mod estimate;
mod features;
mod knowledge_base;
mod policy;
mod pricing;
mod profile;
mod recommendations;
mod running_average;

pub use estimate::{normalize_id, validate_amount, ClientInfo, Estimate, LaborLine, MaterialLine};
pub use features::{extract_key_features, size_bucket};
pub use knowledge_base::{
    labor_key, ClientPreferences, ClientProject, ClientRecord, KnowledgeBase, KnowledgeSummary,
    LaborKnowledge, LaborRates, LearningReport, MaterialKnowledge, MaterialPrices,
    ProjectPattern, ProjectPatterns, KNOWLEDGE_SCHEMA_VERSION,
};
pub use policy::{CostRange, LearningPolicy};
pub use pricing::{
    price_materials, quote_labor_rates, LaborRateQuote, LaborRequest, MaterialRequest,
    PriceSource, PricedMaterial,
};
pub use profile::{ContractorProfile, PROFILE_TOP_N};
pub use recommendations::{generate_recommendations, size_ratio, Recommendations};
pub use running_average::weighted_average;
