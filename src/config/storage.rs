//! Knowledge storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Which knowledge store backend to wire
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON document per contractor under `knowledge_dir`
    #[default]
    File,
    /// Process memory; nothing survives a restart
    Memory,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory holding `{contractor_id}.json` documents
    #[serde(default = "default_knowledge_dir")]
    pub knowledge_dir: PathBuf,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == StorageBackend::File && self.knowledge_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("storage.knowledge_dir"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            knowledge_dir: default_knowledge_dir(),
        }
    }
}

fn default_knowledge_dir() -> PathBuf {
    PathBuf::from("./data/knowledge")
}
