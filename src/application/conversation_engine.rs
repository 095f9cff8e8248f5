//! Conversation engine: session lifecycle around the dialogue policy.
//!
//! Sessions live behind the [`SessionRepository`] port; each call loads the
//! session, applies one turn and stores it back.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::conversation::{
    ConversationResult, DialoguePolicy, Message, Session, GREETING,
};
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::project::ProjectDetails;
use crate::ports::SessionRepository;

/// Errors surfaced by the conversation engine.
#[derive(Debug, Clone, Error)]
pub enum ConversationError {
    /// No session with this id exists.
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    /// The session repository failed.
    #[error("Session storage error: {0}")]
    Storage(String),
}

impl ConversationError {
    fn from_repository(id: SessionId, err: DomainError) -> Self {
        match err.code {
            ErrorCode::SessionNotFound => ConversationError::SessionNotFound(id),
            _ => ConversationError::Storage(err.to_string()),
        }
    }
}

/// Drives slot-filling chats, one session per conversation.
pub struct ConversationEngine {
    sessions: Arc<dyn SessionRepository>,
    policy: DialoguePolicy,
}

impl ConversationEngine {
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self {
            sessions,
            policy: DialoguePolicy::new(),
        }
    }

    /// Opens a session and stores the greeting as its first message.
    pub async fn start_session(&self) -> Result<SessionId, ConversationError> {
        let id = SessionId::new();
        let mut session = Session::new(id);
        session.add_message(Message::assistant(GREETING));

        self.sessions
            .save(&session)
            .await
            .map_err(|e| ConversationError::Storage(e.to_string()))?;

        info!(session_id = %id, "Started conversation session");
        Ok(id)
    }

    /// Applies one user message and returns the assistant's reply.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if `session_id` is unknown
    /// - `Storage` if the session cannot be read or written
    pub async fn process_message(
        &self,
        session_id: SessionId,
        text: &str,
    ) -> Result<ConversationResult, ConversationError> {
        let mut session = self.load(session_id).await?;

        let outcome = self.policy.take_turn(&mut session, text);

        if !outcome.delta.is_empty() {
            debug!(
                session_id = %session_id,
                slots = ?outcome.delta.filled_slots(),
                "Extracted project details"
            );
        }
        for (from, to) in &outcome.transitions {
            debug!(
                session_id = %session_id,
                from = ?from,
                to = ?to,
                "Conversation state transition"
            );
        }
        if outcome.result.is_action_required {
            info!(
                session_id = %session_id,
                project_type = ?session.project_details().project_type,
                "Project details ready for estimate"
            );
        }

        self.sessions
            .update(&session)
            .await
            .map_err(|e| ConversationError::from_repository(session_id, e))?;

        Ok(outcome.result)
    }

    /// Returns the details gathered so far.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if `session_id` is unknown
    pub async fn get_project_details(
        &self,
        session_id: SessionId,
    ) -> Result<ProjectDetails, ConversationError> {
        let session = self.load(session_id).await?;
        Ok(session.project_details().clone())
    }

    /// Returns the whole session, transcript included.
    pub async fn get_session(&self, session_id: SessionId) -> Result<Session, ConversationError> {
        self.load(session_id).await
    }

    /// Discards a session.
    pub async fn end_session(&self, session_id: SessionId) -> Result<(), ConversationError> {
        self.sessions
            .delete(&session_id)
            .await
            .map_err(|e| ConversationError::from_repository(session_id, e))?;
        debug!(session_id = %session_id, "Ended conversation session");
        Ok(())
    }

    async fn load(&self, session_id: SessionId) -> Result<Session, ConversationError> {
        self.sessions
            .find_by_id(&session_id)
            .await
            .map_err(|e| ConversationError::from_repository(session_id, e))?
            .ok_or(ConversationError::SessionNotFound(session_id))
    }
}
