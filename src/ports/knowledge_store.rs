//! Knowledge store port.
//!
//! Persists one [`KnowledgeBase`] per contractor. The store is a plain
//! load/save interface: callers do load-modify-save, so two concurrent
//! writers for the same contractor race and the last save wins.

use async_trait::async_trait;

use crate::domain::foundation::ContractorId;
use crate::domain::learning::KnowledgeBase;

/// Errors that can occur during knowledge store operations
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeStoreError {
    #[error("Knowledge base not found for contractor: {0}")]
    NotFound(ContractorId),

    #[error("Knowledge base for contractor {contractor_id} is corrupt: {reason}")]
    Corrupt {
        contractor_id: ContractorId,
        reason: String,
    },

    #[error("Failed to serialize knowledge base: {0}")]
    SerializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for persisting and loading contractor knowledge bases
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Load a contractor's knowledge base
    ///
    /// # Errors
    /// - `NotFound` if nothing was ever saved for the contractor
    /// - `Corrupt` if the stored document cannot be decoded
    async fn load(
        &self,
        contractor_id: &ContractorId,
    ) -> Result<KnowledgeBase, KnowledgeStoreError>;

    /// Save a contractor's knowledge base, replacing any previous one
    async fn save(
        &self,
        contractor_id: &ContractorId,
        knowledge: &KnowledgeBase,
    ) -> Result<(), KnowledgeStoreError>;

    /// Check if a knowledge base exists for a contractor
    async fn exists(&self, contractor_id: &ContractorId) -> Result<bool, KnowledgeStoreError>;

    /// Delete a contractor's knowledge base; deleting a missing one is not an error
    async fn delete(&self, contractor_id: &ContractorId) -> Result<(), KnowledgeStoreError>;
}
