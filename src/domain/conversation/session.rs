//! Per-session dialogue state.
//!
//! A [`Session`] tracks everything the dialogue needs between turns:
//! the transcript, the accumulated project details, which questions have
//! been asked (and whether they were answered) and the conversation state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, StateMachine, Timestamp};
use crate::domain::project::{ProjectDetails, ProjectDetailsDelta, Slot};

use super::message::Message;
use super::state::ConversationState;

/// A question the assistant asked, and whether it has been addressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    pub slot: Slot,
    pub answered: bool,
    pub timestamp: Timestamp,
}

/// Lower-cases and trims a question for duplicate detection.
pub fn normalize_question(question: &str) -> String {
    question.trim().to_lowercase()
}

/// One active chat conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    messages: Vec<Message>,
    project_details: ProjectDetails,
    asked_questions: BTreeSet<String>,
    question_history: Vec<QuestionRecord>,
    state: ConversationState,
    estimate_generated: bool,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Session {
    /// Creates an empty session in `InitialGreeting`.
    pub fn new(id: SessionId) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            messages: Vec::new(),
            project_details: ProjectDetails::default(),
            asked_questions: BTreeSet::new(),
            question_history: Vec::new(),
            state: ConversationState::default(),
            estimate_generated: false,
            created_at: now,
            updated_at: now,
        }
    }

    // === Accessors ===

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn project_details(&self) -> &ProjectDetails {
        &self.project_details
    }

    pub fn asked_questions(&self) -> &BTreeSet<String> {
        &self.asked_questions
    }

    pub fn question_history(&self) -> &[QuestionRecord] {
        &self.question_history
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn estimate_generated(&self) -> bool {
        self.estimate_generated
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Most recent assistant message, if any.
    pub fn last_assistant_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_assistant())
    }

    // === Mutations ===

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
        self.touch();
    }

    /// Merges newly extracted fields into the accumulated details.
    pub fn merge_details(&mut self, delta: &ProjectDetailsDelta) {
        self.project_details.merge(delta);
        self.touch();
    }

    /// Moves one step forward in the state machine.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_STATE_TRANSITION` if `target` is not the next state.
    pub fn advance_to(&mut self, target: ConversationState) -> Result<(), DomainError> {
        let from = self.state;
        self.state = from.transition_to(target).map_err(|err| {
            DomainError::new(ErrorCode::InvalidStateTransition, err.to_string())
                .with_detail("from", format!("{:?}", from))
                .with_detail("to", format!("{:?}", target))
        })?;
        self.touch();
        Ok(())
    }

    /// Returns true if this exact question (normalized) was asked before.
    pub fn has_asked(&self, question: &str) -> bool {
        self.asked_questions.contains(&normalize_question(question))
    }

    /// Returns true if any asked question mentions the slot's topic.
    pub fn has_asked_about(&self, slot: Slot) -> bool {
        self.asked_questions.iter().any(|q| slot.mentioned_in(q))
    }

    /// Registers a question as asked.
    pub fn record_question(&mut self, slot: Slot, question: &str) {
        self.asked_questions.insert(normalize_question(question));
        self.question_history.push(QuestionRecord {
            question: question.to_string(),
            slot,
            answered: false,
            timestamp: Timestamp::now(),
        });
        self.touch();
    }

    /// Flags open questions that the latest user message addresses.
    ///
    /// A question counts as answered when the message mentions its topic,
    /// when the message filled its slot, or (for dimension questions) when
    /// the message contains any digit. Returns how many were flagged.
    pub fn reconcile_answers(&mut self, message: &str, filled: &[Slot]) -> usize {
        let lower = message.to_lowercase();
        let has_digit = lower.chars().any(|c| c.is_ascii_digit());
        let mut flagged = 0;

        for record in self.question_history.iter_mut().filter(|r| !r.answered) {
            let addressed = record.slot.mentioned_in(&lower)
                || filled.contains(&record.slot)
                || (record.slot.is_dimension() && has_digit);
            if addressed {
                record.answered = true;
                flagged += 1;
            }
        }
        if flagged > 0 {
            self.touch();
        }
        flagged
    }

    /// Records that the estimate-ready response went out.
    pub fn mark_estimate_generated(&mut self) {
        self.estimate_generated = true;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::ProjectType;

    fn session() -> Session {
        Session::new(SessionId::new())
    }

    mod questions {
        use super::*;

        #[test]
        fn asked_questions_are_normalized() {
            let mut s = session();
            s.record_question(Slot::Height, "  ¿Qué ALTURA necesitas para la cerca?  ");
            assert!(s.has_asked("¿qué altura necesitas para la cerca?"));
            assert!(s.has_asked_about(Slot::Height));
            assert!(!s.has_asked_about(Slot::Length));
        }

        #[test]
        fn history_keeps_original_text_in_order() {
            let mut s = session();
            s.record_question(Slot::Length, "¿Cuál es el largo de la cerca en pies?");
            s.record_question(Slot::Height, "¿Qué altura necesitas para la cerca?");

            let slots: Vec<Slot> = s.question_history().iter().map(|r| r.slot).collect();
            assert_eq!(slots, vec![Slot::Length, Slot::Height]);
            assert!(s.question_history().iter().all(|r| !r.answered));
        }
    }

    mod reconcile_answers {
        use super::*;

        #[test]
        fn digits_answer_dimension_questions_only() {
            let mut s = session();
            s.record_question(Slot::Length, "¿Cuál es el largo de la cerca en pies?");
            s.record_question(
                Slot::Location,
                "¿En qué ciudad y estado se encuentra el proyecto?",
            );

            let flagged = s.reconcile_answers("120", &[]);

            assert_eq!(flagged, 1);
            assert!(s.question_history()[0].answered);
            assert!(!s.question_history()[1].answered);
        }

        #[test]
        fn topic_keyword_answers_question() {
            let mut s = session();
            s.record_question(Slot::Material, "¿Qué material prefieres para la cerca?");
            s.reconcile_answers("La quiero de madera", &[]);
            assert!(s.question_history()[0].answered);
        }

        #[test]
        fn keyword_inside_longer_word_does_not_answer() {
            let mut s = session();
            s.record_question(
                Slot::Location,
                "¿En qué ciudad y estado se encuentra el proyecto?",
            );
            assert_eq!(s.reconcile_answers("Vivo en Estados Unidos", &[]), 0);
            assert_eq!(s.reconcile_answers("ask my real estate agent", &[]), 0);
            assert!(!s.question_history()[0].answered);
        }

        #[test]
        fn filled_slot_answers_question() {
            let mut s = session();
            s.record_question(Slot::Type, "¿Qué tipo de proyecto necesitas?");
            s.reconcile_answers("una cerca", &[Slot::Type]);
            assert!(s.question_history()[0].answered);
        }

        #[test]
        fn answered_questions_are_not_counted_again() {
            let mut s = session();
            s.record_question(Slot::Area, "¿Cuántos pies cuadrados tendrá la terraza?");
            assert_eq!(s.reconcile_answers("200", &[]), 1);
            assert_eq!(s.reconcile_answers("300", &[]), 0);
        }
    }

    mod state {
        use super::*;

        #[test]
        fn advances_forward_one_step_at_a_time() {
            let mut s = session();
            s.advance_to(ConversationState::CollectingProjectDetails).unwrap();
            s.advance_to(ConversationState::ReadyForEstimate).unwrap();
            assert_eq!(s.state(), ConversationState::ReadyForEstimate);
        }

        #[test]
        fn rejects_skipping_and_regression() {
            let mut s = session();
            let err = s.advance_to(ConversationState::ReadyForEstimate).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidStateTransition);
            assert_eq!(err.details.get("from"), Some(&"InitialGreeting".to_string()));
            assert_eq!(err.details.get("to"), Some(&"ReadyForEstimate".to_string()));
            assert_eq!(s.state(), ConversationState::InitialGreeting);
        }
    }

    #[test]
    fn last_assistant_message_skips_user_messages() {
        let mut s = session();
        s.add_message(Message::assistant("primero"));
        s.add_message(Message::assistant("segundo"));
        s.add_message(Message::user("respuesta"));

        assert_eq!(s.last_assistant_message().map(|m| m.content()), Some("segundo"));
    }

    #[test]
    fn merge_details_accumulates() {
        let mut s = session();
        s.merge_details(&ProjectDetailsDelta {
            project_type: Some(ProjectType::Roofing),
            ..Default::default()
        });
        s.merge_details(&ProjectDetailsDelta {
            material: Some("metal".to_string()),
            ..Default::default()
        });
        assert_eq!(s.project_details().project_type, Some(ProjectType::Roofing));
        assert_eq!(s.project_details().material.as_deref(), Some("metal"));
    }

    #[test]
    fn round_trips_through_json() {
        let mut s = session();
        s.add_message(Message::user("Necesito un techo"));
        s.record_question(Slot::Area, "¿Cuál es el área del techo en pies cuadrados?");
        let json = serde_json::to_string(&s).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
