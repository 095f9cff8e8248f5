//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `KnowledgeStore` - Per-contractor knowledge base persistence
//! - `SessionRepository` - Chat session storage between turns

mod knowledge_store;
mod session_repository;

pub use knowledge_store::{KnowledgeStore, KnowledgeStoreError};
pub use session_repository::SessionRepository;
