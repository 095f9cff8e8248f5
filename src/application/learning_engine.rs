//! Adaptive learning engine: knowledge updates and queries per contractor.
//!
//! Every call is load-modify-save against the [`KnowledgeStore`]. Two
//! concurrent writes for the same contractor race and the last save wins;
//! callers are expected to process one contractor's estimates serially.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::foundation::{ClientId, ContractorId, Timestamp, ValidationError};
use crate::domain::learning::{
    generate_recommendations, price_materials, quote_labor_rates, validate_amount, ClientInfo,
    ContractorProfile, Estimate, KnowledgeBase, KnowledgeSummary, LaborRateQuote, LaborRequest,
    LearningPolicy, LearningReport, MaterialRequest, PriceSource, PricedMaterial,
    Recommendations,
};
use crate::domain::project::{ProjectDetails, ProjectType};
use crate::ports::{KnowledgeStore, KnowledgeStoreError};

/// Errors surfaced by the learning engine.
#[derive(Debug, Clone, Error)]
pub enum LearningError {
    /// The knowledge store failed for a reason other than a missing or
    /// corrupt document.
    #[error("Knowledge storage error: {0}")]
    Storage(String),

    /// The estimate carried invalid amounts; nothing was learned.
    #[error("Invalid estimate: {0}")]
    Validation(#[from] ValidationError),
}

impl From<KnowledgeStoreError> for LearningError {
    fn from(err: KnowledgeStoreError) -> Self {
        LearningError::Storage(err.to_string())
    }
}

/// A completed estimate and what the client did with it.
#[derive(Debug, Clone)]
pub struct EstimateOutcome {
    pub estimate: Estimate,
    pub details: ProjectDetails,
    pub client: Option<ClientInfo>,
    pub was_accepted: bool,
    /// Price actually agreed, when it differs from the estimate total.
    pub final_price: Option<f64>,
}

impl EstimateOutcome {
    pub fn new(estimate: Estimate, details: ProjectDetails, was_accepted: bool) -> Self {
        Self {
            estimate,
            details,
            client: None,
            was_accepted,
            final_price: None,
        }
    }

    pub fn with_client(mut self, client: ClientInfo) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_final_price(mut self, price: f64) -> Self {
        self.final_price = Some(price);
        self
    }
}

/// Learns from completed estimates and answers recommendation queries.
pub struct AdaptiveLearningEngine {
    store: Arc<dyn KnowledgeStore>,
    policy: LearningPolicy,
}

impl AdaptiveLearningEngine {
    pub fn new(store: Arc<dyn KnowledgeStore>, policy: LearningPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &LearningPolicy {
        &self.policy
    }

    /// Folds one estimate outcome into the contractor's knowledge.
    ///
    /// # Errors
    ///
    /// - `Validation` for negative or non-finite amounts; nothing is saved
    /// - `Storage` if the knowledge base cannot be read or written
    pub async fn learn_from_estimate(
        &self,
        contractor_id: &ContractorId,
        outcome: &EstimateOutcome,
    ) -> Result<LearningReport, LearningError> {
        outcome.estimate.validate()?;
        if let Some(price) = outcome.final_price {
            validate_amount("final_price", price)?;
        }

        let mut knowledge = self.load_or_init(contractor_id).await?;
        let report = knowledge.learn_from_estimate(
            &outcome.estimate,
            &outcome.details,
            outcome.client.as_ref(),
            outcome.was_accepted,
            outcome.final_price,
            &self.policy,
            Timestamp::now(),
        )?;
        self.store.save(contractor_id, &knowledge).await?;

        info!(
            contractor_id = %contractor_id,
            project_type = outcome.estimate.project_type.as_str(),
            accepted = outcome.was_accepted,
            materials = report.materials_updated,
            labor_rates = report.labor_rates_updated,
            patterns = report.pattern_count,
            "Learned from estimate"
        );
        if report.lines_skipped > 0 {
            warn!(
                contractor_id = %contractor_id,
                skipped = report.lines_skipped,
                "Skipped estimate lines with non-positive quantity or hours"
            );
        }
        if report.profile_recomputed {
            info!(contractor_id = %contractor_id, "Recomputed contractor profile");
        }

        Ok(report)
    }

    /// Recommendations for a new project of `project_type`.
    pub async fn generate_recommendations(
        &self,
        contractor_id: &ContractorId,
        project_type: ProjectType,
        details: &ProjectDetails,
        client_id: Option<&ClientId>,
    ) -> Result<Recommendations, LearningError> {
        let knowledge = self.load_or_init(contractor_id).await?;
        let recommendations =
            generate_recommendations(&knowledge, project_type, details, client_id, &self.policy);

        debug!(
            contractor_id = %contractor_id,
            project_type = project_type.as_str(),
            min = recommendations.estimated_costs.min,
            max = recommendations.estimated_costs.max,
            markup = recommendations.suggested_markup,
            "Generated recommendations"
        );
        Ok(recommendations)
    }

    /// Prices materials from learned knowledge, degrading to fallbacks.
    pub async fn get_estimated_material_costs(
        &self,
        contractor_id: &ContractorId,
        materials: &[MaterialRequest],
    ) -> Result<Vec<PricedMaterial>, LearningError> {
        let knowledge = self.load_or_init(contractor_id).await?;
        let priced = price_materials(&knowledge, materials);

        for item in priced.iter().filter(|p| p.source != PriceSource::Learned) {
            warn!(
                contractor_id = %contractor_id,
                material = %item.id,
                source = ?item.source,
                unit_price = item.unit_price,
                "No learned price for material; using fallback estimation"
            );
        }
        Ok(priced)
    }

    /// Quotes hourly rates for services, degrading to fallbacks.
    pub async fn get_recommended_labor_rates(
        &self,
        contractor_id: &ContractorId,
        project_type: ProjectType,
        services: &[LaborRequest],
    ) -> Result<Vec<LaborRateQuote>, LearningError> {
        let knowledge = self.load_or_init(contractor_id).await?;
        let quotes = quote_labor_rates(&knowledge, project_type, services);

        for quote in quotes.iter().filter(|q| q.source != PriceSource::Learned) {
            warn!(
                contractor_id = %contractor_id,
                service = %quote.service,
                source = ?quote.source,
                rate = quote.rate,
                "No learned rate for service; using fallback estimation"
            );
        }
        Ok(quotes)
    }

    /// Rebuilds the contractor profile now, regardless of its age.
    pub async fn refresh_contractor_profile(
        &self,
        contractor_id: &ContractorId,
    ) -> Result<ContractorProfile, LearningError> {
        let mut knowledge = self.load_or_init(contractor_id).await?;
        knowledge.refresh_profile(Timestamp::now());
        self.store.save(contractor_id, &knowledge).await?;

        info!(
            contractor_id = %contractor_id,
            specialties = ?knowledge.contractor_profile.specialties,
            "Recomputed contractor profile"
        );
        Ok(knowledge.contractor_profile)
    }

    /// Counts and acceptance rate over the contractor's knowledge.
    pub async fn knowledge_summary(
        &self,
        contractor_id: &ContractorId,
    ) -> Result<KnowledgeSummary, LearningError> {
        Ok(self.load_or_init(contractor_id).await?.summary())
    }

    /// Loads the knowledge base, creating it on first use and replacing it
    /// when the stored document is corrupt.
    async fn load_or_init(
        &self,
        contractor_id: &ContractorId,
    ) -> Result<KnowledgeBase, LearningError> {
        match self.store.load(contractor_id).await {
            Ok(knowledge) => Ok(knowledge),
            Err(KnowledgeStoreError::NotFound(_)) => {
                let knowledge = KnowledgeBase::new();
                self.store.save(contractor_id, &knowledge).await?;
                info!(contractor_id = %contractor_id, "Initialized empty knowledge base");
                Ok(knowledge)
            }
            Err(KnowledgeStoreError::Corrupt { reason, .. }) => {
                warn!(
                    contractor_id = %contractor_id,
                    reason = %reason,
                    "Knowledge base is corrupt; reinitializing"
                );
                let knowledge = KnowledgeBase::new();
                self.store.save(contractor_id, &knowledge).await?;
                Ok(knowledge)
            }
            Err(other) => Err(other.into()),
        }
    }
}
