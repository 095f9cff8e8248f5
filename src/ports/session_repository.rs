//! Session repository port.
//!
//! Holds chat sessions between turns. Sessions are owned by the single
//! caller driving that chat, so there is no cross-session contention.

use async_trait::async_trait;

use crate::domain::conversation::Session;
use crate::domain::foundation::{DomainError, SessionId};

/// Repository port for chat session persistence.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Save a new session.
    ///
    /// # Errors
    ///
    /// - `StorageError` on persistence failure
    async fn save(&self, session: &Session) -> Result<(), DomainError>;

    /// Update an existing session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if session doesn't exist
    async fn update(&self, session: &Session) -> Result<(), DomainError>;

    /// Find a session by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError>;

    /// Check if a session exists.
    async fn exists(&self, id: &SessionId) -> Result<bool, DomainError>;

    /// Delete a session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if session doesn't exist
    async fn delete(&self, id: &SessionId) -> Result<(), DomainError>;
}
