//! Slot-filling dialogue policy.
//!
//! [`DialoguePolicy::take_turn`] applies one user message to a session:
//! extraction, merge, forward-only state transitions, question selection
//! without repeats, answer reconciliation and response selection.

use serde::{Deserialize, Serialize};

use crate::domain::project::{
    ProjectDetails, ProjectDetailsDelta, ProjectType, Slot, PROJECT_TYPE_QUESTION,
};

use super::extractor::InformationExtractor;
use super::message::Message;
use super::session::Session;
use super::state::ConversationState;
use super::vocabulary::asks_for_estimate;

/// Opening assistant message for a new session.
pub const GREETING: &str = "¡Hola! Soy tu asistente de estimados. Cuéntame sobre tu proyecto: \
     qué necesitas construir, sus medidas y dónde se encuentra.";

/// Follow-up the caller is expected to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationAction {
    /// Enough information is present; produce and review the estimate.
    ReviewEstimate,
}

/// What one processed message returns to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResult {
    pub response: String,
    pub questions: Vec<String>,
    pub project_details: ProjectDetails,
    pub is_action_required: bool,
    pub action: Option<ConversationAction>,
}

/// A processed turn, with the extraction and transitions behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub result: ConversationResult,
    pub delta: ProjectDetailsDelta,
    pub transitions: Vec<(ConversationState, ConversationState)>,
}

/// Drives the slot-filling conversation for one session at a time.
#[derive(Debug, Clone, Default)]
pub struct DialoguePolicy {
    extractor: InformationExtractor,
}

impl DialoguePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes one user message against `session`.
    ///
    /// # Steps
    /// 1. Append the user message
    /// 2. Extract a delta and merge it
    /// 3. Advance the state machine
    /// 4. Select questions not asked before (by text or topic)
    /// 5. Reconcile open questions, then record the new ones
    /// 6. Pick the response
    pub fn take_turn(&self, session: &mut Session, text: &str) -> TurnOutcome {
        session.add_message(Message::user(text));

        let delta = self
            .extractor
            .extract(text, session.project_details(), session.messages());
        session.merge_details(&delta);

        let mut transitions = advance(session);
        let questions = next_questions(session);

        session.reconcile_answers(text, &delta.filled_slots());
        for (slot, question) in &questions {
            session.record_question(*slot, question);
        }
        let questions: Vec<String> = questions.into_iter().map(|(_, q)| q).collect();

        let lower = text.to_lowercase();
        let mut action = None;
        let response = if session.state() == ConversationState::ReadyForEstimate
            && !session.estimate_generated()
        {
            session.mark_estimate_generated();
            if session.advance_to(ConversationState::EstimateGenerated).is_ok() {
                transitions.push((
                    ConversationState::ReadyForEstimate,
                    ConversationState::EstimateGenerated,
                ));
            }
            action = Some(ConversationAction::ReviewEstimate);
            estimate_ready_response(session.project_details())
        } else if asks_for_estimate(&lower) && !session.project_details().can_generate_estimate() {
            need_more_info_response(session.project_details())
        } else {
            contextual_response(session)
        };

        session.add_message(Message::assistant(assistant_text(&response, &questions)));

        TurnOutcome {
            result: ConversationResult {
                response,
                questions,
                project_details: session.project_details().clone(),
                is_action_required: action.is_some(),
                action,
            },
            delta,
            transitions,
        }
    }
}

/// Applies every forward transition the current details allow.
fn advance(session: &mut Session) -> Vec<(ConversationState, ConversationState)> {
    let mut transitions = Vec::new();
    loop {
        let from = session.state();
        let target = match from {
            ConversationState::InitialGreeting
                if session.project_details().project_type.is_some() =>
            {
                ConversationState::CollectingProjectDetails
            }
            ConversationState::CollectingProjectDetails
                if session.project_details().can_generate_estimate() =>
            {
                ConversationState::ReadyForEstimate
            }
            _ => break,
        };
        if session.advance_to(target).is_err() {
            break;
        }
        transitions.push((from, target));
    }
    transitions
}

/// Question text for a missing slot, given the known project type.
fn question_for(slot: Slot, project_type: Option<ProjectType>) -> Option<&'static str> {
    match (slot, project_type) {
        (Slot::Type, _) => Some(PROJECT_TYPE_QUESTION),
        (_, Some(project_type)) => project_type
            .profile()
            .questions
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, q)| *q),
        (_, None) => None,
    }
}

/// Missing-slot questions whose text and topic were never asked.
fn next_questions(session: &Session) -> Vec<(Slot, String)> {
    let details = session.project_details();
    details
        .missing_slots()
        .into_iter()
        .filter_map(|slot| question_for(slot, details.project_type).map(|q| (slot, q)))
        .filter(|(slot, question)| !session.has_asked(question) && !session.has_asked_about(*slot))
        .map(|(slot, question)| (slot, question.to_string()))
        .collect()
}

fn assistant_text(response: &str, questions: &[String]) -> String {
    if questions.is_empty() {
        response.to_string()
    } else {
        format!("{}\n{}", response, questions.join("\n"))
    }
}

fn supported_types_text() -> String {
    let labels: Vec<&str> = ProjectType::estimable().iter().map(|t| t.label()).collect();
    match labels.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} y {}", rest.join(", "), last),
        Some((last, _)) => last.to_string(),
        None => String::new(),
    }
}

fn labels_of(slots: &[Slot]) -> String {
    slots.iter().map(|s| s.label()).collect::<Vec<_>>().join(", ")
}

fn estimate_ready_response(details: &ProjectDetails) -> String {
    format!(
        "¡Excelente! Ya tengo la información necesaria para tu estimado de {}. \
         Estoy preparando el estimado para que lo revises.",
        details.summary()
    )
}

fn unsupported_type_response(details: &ProjectDetails) -> String {
    format!(
        "Tengo registrado: {}. Por ahora solo puedo preparar estimados de {}.",
        details.summary(),
        supported_types_text()
    )
}

fn need_more_info_response(details: &ProjectDetails) -> String {
    let missing = details.missing_slots();
    if missing.is_empty() {
        return unsupported_type_response(details);
    }
    format!(
        "Con gusto preparo tu estimado, pero primero necesito algunos datos más: {}.",
        labels_of(&missing)
    )
}

fn contextual_response(session: &Session) -> String {
    let details = session.project_details();
    let summary = details.summary();
    let missing = details.missing_slots();

    match missing.first() {
        Some(Slot::Type) if summary.is_empty() => {
            "Para preparar tu estimado necesito saber el tipo de proyecto."
                .to_string()
        }
        Some(next) if summary.is_empty() => format!("Ahora necesito saber {}.", next.label()),
        Some(next) => format!("Entendido: {}. Ahora necesito saber {}.", summary, next.label()),
        None if session.estimate_generated() => format!(
            "Tu estimado de {} ya está listo para revisión. Si algo cambió, actualicé los datos.",
            summary
        ),
        None if details.project_type.is_some_and(|t| !t.supports_estimates()) => {
            unsupported_type_response(details)
        }
        None => format!("Tengo registrado: {}.", summary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::domain::project::Dimension;
    use std::collections::BTreeSet;

    fn session() -> Session {
        let mut session = Session::new(SessionId::new());
        session.add_message(Message::assistant(GREETING));
        session
    }

    mod transitions {
        use super::*;

        #[test]
        fn type_moves_to_collecting() {
            let mut s = session();
            let outcome = DialoguePolicy::new().take_turn(&mut s, "Quiero una terraza");

            assert_eq!(s.state(), ConversationState::CollectingProjectDetails);
            assert_eq!(
                outcome.transitions,
                vec![(
                    ConversationState::InitialGreeting,
                    ConversationState::CollectingProjectDetails
                )]
            );
            assert!(!outcome.result.is_action_required);
        }

        #[test]
        fn complete_first_message_reaches_estimate_generated() {
            let mut s = session();
            let outcome = DialoguePolicy::new()
                .take_turn(&mut s, "Necesito una cerca de 100 pies de largo y 6 pies de alto");

            assert_eq!(s.state(), ConversationState::EstimateGenerated);
            assert!(s.estimate_generated());
            assert_eq!(outcome.transitions.len(), 3);
            assert!(outcome.result.is_action_required);
            assert_eq!(outcome.result.action, Some(ConversationAction::ReviewEstimate));
        }

        #[test]
        fn estimate_ready_fires_once() {
            let policy = DialoguePolicy::new();
            let mut s = session();
            policy.take_turn(&mut s, "una terraza de 200 pies cuadrados");
            let second = policy.take_turn(&mut s, "de madera");

            assert!(!second.result.is_action_required);
            assert_eq!(second.result.action, None);
            assert_eq!(s.state(), ConversationState::EstimateGenerated);
        }

        #[test]
        fn corrections_after_ready_do_not_regress() {
            let policy = DialoguePolicy::new();
            let mut s = session();
            policy.take_turn(&mut s, "una terraza de 200 pies cuadrados");
            policy.take_turn(&mut s, "mejor 300 pies cuadrados");

            assert_eq!(s.state(), ConversationState::EstimateGenerated);
            assert_eq!(
                s.project_details().dimensions.get(Dimension::SquareFeet),
                Some(300.0)
            );
        }
    }

    mod questions {
        use super::*;

        #[test]
        fn only_type_question_while_type_unknown() {
            let mut s = session();
            let outcome = DialoguePolicy::new().take_turn(&mut s, "hola, necesito un estimado");
            assert_eq!(outcome.result.questions, vec![PROJECT_TYPE_QUESTION.to_string()]);
        }

        #[test]
        fn asks_every_missing_slot_once() {
            let policy = DialoguePolicy::new();
            let mut s = session();
            let first = policy.take_turn(&mut s, "Quiero una cerca");
            assert_eq!(first.result.questions.len(), 4);

            let second = policy.take_turn(&mut s, "no estoy seguro");
            assert!(second.result.questions.is_empty());
        }

        #[test]
        fn no_two_asked_questions_share_a_topic() {
            let policy = DialoguePolicy::new();
            let mut s = session();
            for message in ["hola", "una cerca", "no sé", "120", "de madera", "Austin, TX"] {
                policy.take_turn(&mut s, message);
            }
            let topics: BTreeSet<Slot> = s
                .asked_questions()
                .iter()
                .filter_map(|q| Slot::ALL.into_iter().find(|slot| slot.mentioned_in(q)))
                .collect();
            assert_eq!(topics.len(), s.asked_questions().len());
        }

        #[test]
        fn answers_flag_history() {
            let policy = DialoguePolicy::new();
            let mut s = session();
            policy.take_turn(&mut s, "Quiero una cerca");
            policy.take_turn(&mut s, "120");

            let length = s
                .question_history()
                .iter()
                .find(|r| r.slot == Slot::Length)
                .unwrap();
            assert!(length.answered);
        }
    }

    mod responses {
        use super::*;

        #[test]
        fn names_next_missing_field() {
            let mut s = session();
            let outcome = DialoguePolicy::new().take_turn(&mut s, "Quiero una cerca");
            assert!(outcome.result.response.contains("el largo en pies"));
        }

        #[test]
        fn cost_question_lists_missing_fields() {
            let policy = DialoguePolicy::new();
            let mut s = session();
            policy.take_turn(&mut s, "Quiero un techo");
            let outcome = policy.take_turn(&mut s, "¿Cuánto me costaría?");

            assert!(outcome.result.response.contains("el área en pies cuadrados"));
            assert!(!outcome.result.is_action_required);
        }

        #[test]
        fn unsupported_type_names_supported_types() {
            let policy = DialoguePolicy::new();
            let mut s = session();
            policy.take_turn(&mut s, "Quiero pintar mi casa, 900 pies cuadrados");
            policy.take_turn(&mut s, "latex");
            let outcome = policy.take_turn(&mut s, "Austin, TX");

            assert_eq!(s.state(), ConversationState::CollectingProjectDetails);
            assert!(outcome.result.response.contains("cerca, terraza, techo y concreto"));
        }

        #[test]
        fn responses_never_contain_question_marks() {
            let policy = DialoguePolicy::new();
            let mut s = session();
            for message in ["hola", "una cerca", "¿cuánto cuesta?", "100 pies de largo"] {
                let outcome = policy.take_turn(&mut s, message);
                assert!(!outcome.result.response.contains('?'), "{}", outcome.result.response);
            }
        }
    }

    #[test]
    fn result_serializes_in_camel_case() {
        let mut s = session();
        let outcome = DialoguePolicy::new().take_turn(&mut s, "una terraza de 200 pies cuadrados");
        let json = serde_json::to_value(&outcome.result).unwrap();

        assert_eq!(json["isActionRequired"], true);
        assert_eq!(json["action"], "review_estimate");
        assert_eq!(json["projectDetails"]["type"], "decking");
    }
}
