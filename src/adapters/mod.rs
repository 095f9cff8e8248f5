//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - Process-local session storage
//! - `storage` - Knowledge base persistence (file, in-memory)

pub mod memory;
pub mod storage;

pub use memory::InMemorySessionRepository;
pub use storage::{FileKnowledgeStore, InMemoryKnowledgeStore};
