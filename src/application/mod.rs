//! Application layer - services that combine domain logic with ports.
//!
//! - `ConversationEngine` - Session lifecycle around the dialogue policy
//! - `AdaptiveLearningEngine` - Knowledge updates and recommendation queries

mod conversation_engine;
mod learning_engine;

pub use conversation_engine::{ConversationEngine, ConversationError};
pub use learning_engine::{AdaptiveLearningEngine, EstimateOutcome, LearningError};
