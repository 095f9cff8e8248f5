//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `project` - Project types, dimensions and accumulated details
//! - `conversation` - Slot-filling chat sessions and extraction
//! - `learning` - Knowledge base updates, recommendations and pricing

pub mod conversation;
pub mod foundation;
pub mod learning;
pub mod project;
