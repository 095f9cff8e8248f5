//! In-memory adapters for state that lives only as long as the process.

mod in_memory_session_repository;

pub use in_memory_session_repository::InMemorySessionRepository;
