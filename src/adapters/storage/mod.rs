//! Storage Adapters
//!
//! Implementations of the KnowledgeStore port.
//!
//! ## Available Adapters
//!
//! - **FileKnowledgeStore** - One JSON document per contractor on disk
//! - **InMemoryKnowledgeStore** - Stores knowledge in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileKnowledgeStore, InMemoryKnowledgeStore};
//!
//! // Production: file-based storage
//! let store = FileKnowledgeStore::new("./data/knowledge");
//!
//! // Testing: in-memory storage
//! let store = InMemoryKnowledgeStore::new();
//! ```

mod file_knowledge_store;
mod in_memory_knowledge_store;

pub use file_knowledge_store::FileKnowledgeStore;
pub use in_memory_knowledge_store::InMemoryKnowledgeStore;
