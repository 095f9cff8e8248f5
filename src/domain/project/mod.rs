//! Project domain module.
//!
//! Describes the construction project being estimated: its type, the
//! per-type rules table, its dimensions and the partially-filled details
//! gathered during a conversation.

mod details;
mod dimensions;
mod project_type;
mod slot;
mod words;

pub use details::{format_number, Location, ProjectDetails, ProjectDetailsDelta};
pub use dimensions::{Dimension, Dimensions};
pub use project_type::{
    ProjectType, ProjectTypeProfile, GENERIC_FALLBACK_MATERIALS, PROJECT_TYPE_QUESTION,
};
pub use slot::Slot;
pub use words::find_word;
