//! Conversation state machine.
//!
//! Defines the lifecycle states of an estimating conversation and the
//! valid transitions between them.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// The lifecycle state of a conversation.
///
/// Conversations only move forward:
/// - `InitialGreeting`: Session opened, project type not yet known
/// - `CollectingProjectDetails`: Type known, gathering dimensions and extras
/// - `ReadyForEstimate`: Minimum information for the type is present
/// - `EstimateGenerated`: The estimate-ready response has been sent
///
/// A correction made after reaching `ReadyForEstimate` updates the project
/// details but does not move the state back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    /// Waiting for the user to say what they want built.
    #[default]
    InitialGreeting,

    /// Project type known, asking for the remaining slots.
    CollectingProjectDetails,

    /// Enough information to produce an estimate.
    ReadyForEstimate,

    /// Estimate announced to the user; terminal.
    EstimateGenerated,
}

impl ConversationState {
    /// Returns true once the minimum estimate information has been seen.
    pub fn has_reached_ready(&self) -> bool {
        matches!(self, Self::ReadyForEstimate | Self::EstimateGenerated)
    }

    /// Position in the forward-only order.
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::InitialGreeting => 0,
            Self::CollectingProjectDetails => 1,
            Self::ReadyForEstimate => 2,
            Self::EstimateGenerated => 3,
        }
    }
}

impl StateMachine for ConversationState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConversationState::*;
        matches!(
            (self, target),
            (InitialGreeting, CollectingProjectDetails)
                | (CollectingProjectDetails, ReadyForEstimate)
                | (ReadyForEstimate, EstimateGenerated)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConversationState::*;
        match self {
            InitialGreeting => vec![CollectingProjectDetails],
            CollectingProjectDetails => vec![ReadyForEstimate],
            ReadyForEstimate => vec![EstimateGenerated],
            EstimateGenerated => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ConversationState; 4] = [
        ConversationState::InitialGreeting,
        ConversationState::CollectingProjectDetails,
        ConversationState::ReadyForEstimate,
        ConversationState::EstimateGenerated,
    ];

    mod state_definition {
        use super::*;

        #[test]
        fn default_state_is_initial_greeting() {
            assert_eq!(ConversationState::default(), ConversationState::InitialGreeting);
        }

        #[test]
        fn serializes_to_snake_case() {
            let json = serde_json::to_string(&ConversationState::ReadyForEstimate).unwrap();
            assert_eq!(json, "\"ready_for_estimate\"");
        }

        #[test]
        fn deserializes_from_snake_case() {
            let state: ConversationState =
                serde_json::from_str("\"collecting_project_details\"").unwrap();
            assert_eq!(state, ConversationState::CollectingProjectDetails);
        }
    }

    mod state_machine_trait {
        use super::*;

        #[test]
        fn only_single_forward_steps_are_allowed() {
            for from in ALL {
                for to in ALL {
                    let expected = to.ordinal() == from.ordinal() + 1;
                    assert_eq!(
                        from.can_transition_to(&to),
                        expected,
                        "{:?} -> {:?}",
                        from,
                        to
                    );
                }
            }
        }

        #[test]
        fn no_regression_out_of_ready() {
            let state = ConversationState::ReadyForEstimate;
            assert!(state
                .transition_to(ConversationState::CollectingProjectDetails)
                .is_err());
        }

        #[test]
        fn estimate_generated_is_terminal() {
            assert!(ConversationState::EstimateGenerated.is_terminal());
        }

        #[test]
        fn valid_transitions_matches_can_transition_to() {
            for state in ALL {
                for target in state.valid_transitions() {
                    assert!(state.can_transition_to(&target));
                }
            }
        }
    }

    #[test]
    fn has_reached_ready_covers_last_two_states() {
        assert!(!ConversationState::CollectingProjectDetails.has_reached_ready());
        assert!(ConversationState::ReadyForEstimate.has_reached_ready());
        assert!(ConversationState::EstimateGenerated.has_reached_ready());
    }
}
