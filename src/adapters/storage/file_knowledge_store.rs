//! File-based Knowledge Store Adapter
//!
//! Stores each contractor's knowledge base as one pretty-printed JSON
//! document, `{base_path}/{contractor_id}.json`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::ContractorId;
use crate::domain::learning::KnowledgeBase;
use crate::ports::{KnowledgeStore, KnowledgeStoreError};

/// File-based storage for knowledge bases
#[derive(Debug, Clone)]
pub struct FileKnowledgeStore {
    base_path: PathBuf,
}

impl FileKnowledgeStore {
    /// Create a new file store rooted at `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileKnowledgeStore::new("./data/knowledge");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the document path for a contractor
    pub fn file_path(&self, contractor_id: &ContractorId) -> PathBuf {
        self.base_path.join(format!("{}.json", contractor_id))
    }

    fn temp_path(&self, contractor_id: &ContractorId) -> PathBuf {
        self.base_path.join(format!("{}.json.tmp", contractor_id))
    }
}

#[async_trait]
impl KnowledgeStore for FileKnowledgeStore {
    async fn load(
        &self,
        contractor_id: &ContractorId,
    ) -> Result<KnowledgeBase, KnowledgeStoreError> {
        let file_path = self.file_path(contractor_id);

        if !file_path.exists() {
            return Err(KnowledgeStoreError::NotFound(contractor_id.clone()));
        }

        let json = fs::read_to_string(&file_path)
            .await
            .map_err(|e| KnowledgeStoreError::IoError(e.to_string()))?;

        serde_json::from_str(&json).map_err(|e| KnowledgeStoreError::Corrupt {
            contractor_id: contractor_id.clone(),
            reason: e.to_string(),
        })
    }

    async fn save(
        &self,
        contractor_id: &ContractorId,
        knowledge: &KnowledgeBase,
    ) -> Result<(), KnowledgeStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| KnowledgeStoreError::IoError(e.to_string()))?;

        let json = serde_json::to_string_pretty(knowledge)
            .map_err(|e| KnowledgeStoreError::SerializationFailed(e.to_string()))?;

        // Write aside then rename so readers never see a half-written file.
        let temp_path = self.temp_path(contractor_id);
        fs::write(&temp_path, json)
            .await
            .map_err(|e| KnowledgeStoreError::IoError(e.to_string()))?;
        fs::rename(&temp_path, self.file_path(contractor_id))
            .await
            .map_err(|e| KnowledgeStoreError::IoError(e.to_string()))?;

        Ok(())
    }

    async fn exists(&self, contractor_id: &ContractorId) -> Result<bool, KnowledgeStoreError> {
        Ok(self.file_path(contractor_id).exists())
    }

    async fn delete(&self, contractor_id: &ContractorId) -> Result<(), KnowledgeStoreError> {
        let file_path = self.file_path(contractor_id);

        if file_path.exists() {
            fs::remove_file(&file_path)
                .await
                .map_err(|e| KnowledgeStoreError::IoError(e.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::learning::{Estimate, MaterialLine};
    use crate::domain::project::ProjectType;
    use tempfile::TempDir;

    fn contractor() -> ContractorId {
        ContractorId::new("acme-builders").unwrap()
    }

    fn knowledge() -> KnowledgeBase {
        let mut kb = KnowledgeBase::new();
        let estimate = Estimate::new(ProjectType::Fencing, 450.0, 0.0, 600.0)
            .with_material(MaterialLine::new("Cedar Picket", 100.0, 4.5));
        kb.update_material_knowledge(&estimate, Timestamp::now());
        kb
    }

    #[tokio::test]
    async fn test_file_store_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKnowledgeStore::new(temp_dir.path());
        let kb = knowledge();

        store.save(&contractor(), &kb).await.unwrap();
        let loaded = store.load(&contractor()).await.unwrap();

        assert_eq!(loaded, kb);
        assert!(temp_dir.path().join("acme-builders.json").exists());
        assert!(!temp_dir.path().join("acme-builders.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_file_store_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKnowledgeStore::new(temp_dir.path().join("nested").join("knowledge"));

        store.save(&contractor(), &KnowledgeBase::new()).await.unwrap();

        assert!(store.exists(&contractor()).await.unwrap());
    }

    #[tokio::test]
    async fn test_file_store_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKnowledgeStore::new(temp_dir.path());

        let result = store.load(&contractor()).await;

        assert!(matches!(result, Err(KnowledgeStoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_file_store_reports_corrupt_document() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKnowledgeStore::new(temp_dir.path());
        std::fs::write(store.file_path(&contractor()), "{ not json").unwrap();

        let result = store.load(&contractor()).await;

        assert!(matches!(result, Err(KnowledgeStoreError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_file_store_reads_document_without_schema_version() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKnowledgeStore::new(temp_dir.path());
        std::fs::write(
            store.file_path(&contractor()),
            r#"{"materialPrices":{"items":{}}}"#,
        )
        .unwrap();

        let loaded = store.load(&contractor()).await.unwrap();

        assert_eq!(loaded.schema_version, 1);
    }

    #[tokio::test]
    async fn test_file_store_delete() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKnowledgeStore::new(temp_dir.path());

        store.save(&contractor(), &knowledge()).await.unwrap();
        store.delete(&contractor()).await.unwrap();

        assert!(!store.exists(&contractor()).await.unwrap());
        // Deleting again is fine.
        store.delete(&contractor()).await.unwrap();
    }
}
