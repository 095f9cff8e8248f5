//! In-Memory Knowledge Store Adapter
//!
//! Keeps knowledge bases in memory. Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::ContractorId;
use crate::domain::learning::KnowledgeBase;
use crate::ports::{KnowledgeStore, KnowledgeStoreError};

/// In-memory storage for knowledge bases
#[derive(Debug, Clone, Default)]
pub struct InMemoryKnowledgeStore {
    knowledge: Arc<RwLock<HashMap<ContractorId, KnowledgeBase>>>,
}

impl InMemoryKnowledgeStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored knowledge bases
    pub async fn len(&self) -> usize {
        self.knowledge.read().await.len()
    }

    /// Check if nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.knowledge.read().await.is_empty()
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryKnowledgeStore {
    async fn load(
        &self,
        contractor_id: &ContractorId,
    ) -> Result<KnowledgeBase, KnowledgeStoreError> {
        self.knowledge
            .read()
            .await
            .get(contractor_id)
            .cloned()
            .ok_or_else(|| KnowledgeStoreError::NotFound(contractor_id.clone()))
    }

    async fn save(
        &self,
        contractor_id: &ContractorId,
        knowledge: &KnowledgeBase,
    ) -> Result<(), KnowledgeStoreError> {
        self.knowledge
            .write()
            .await
            .insert(contractor_id.clone(), knowledge.clone());
        Ok(())
    }

    async fn exists(&self, contractor_id: &ContractorId) -> Result<bool, KnowledgeStoreError> {
        Ok(self.knowledge.read().await.contains_key(contractor_id))
    }

    async fn delete(&self, contractor_id: &ContractorId) -> Result<(), KnowledgeStoreError> {
        self.knowledge.write().await.remove(contractor_id);
        Ok(())
    }
}
