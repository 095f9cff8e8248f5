//! Conversation domain module.
//!
//! Slot-filling chat that gathers project details for an estimate:
//! session state, free-text extraction and the dialogue policy.

mod dialogue;
mod extractor;
mod message;
mod session;
mod state;
pub mod vocabulary;

pub use dialogue::{
    ConversationAction, ConversationResult, DialoguePolicy, TurnOutcome, GREETING,
};
pub use extractor::{pending_slot, InformationExtractor};
pub use message::{Message, Role};
pub use session::{normalize_question, QuestionRecord, Session};
pub use state::ConversationState;
