//! Conversational session state.
//!
//! An append-only message log plus the pedagogical context (level, subject,
//! explanation mode) and the per-turn state machine. Appends are pure state
//! transitions; all I/O lives in the wire client.

use chrono::{DateTime, Utc};

use crate::error::MentorError;
use crate::prompts;
use crate::types::{
    EducationLevel, ExplanationMode, Message, QuickAction, Role, Subject, UserProfile,
};

/// Pedagogical framing for the current conversation.
///
/// `subject` and `mode` are swappable independently; changing the subject
/// (or picking a quick action) resets the message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub level: EducationLevel,
    pub subject: Option<Subject>,
    pub mode: ExplanationMode,
}

/// Per-turn state machine; `Sending` substitutes for a mutex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    Sending,
}

impl TurnState {
    pub fn is_sending(&self) -> bool {
        *self == TurnState::Sending
    }
}

/// Handle for an in-flight turn, tagged with the session generation it was
/// started under. A completion whose ticket is stale (the session was reset
/// while the request was in flight) is dropped as a no-op.
#[derive(Debug, Clone, Copy)]
pub struct TurnTicket {
    generation: u64,
}

/// Ordered message log and context for one tutoring view.
///
/// Ephemeral: created when a tutoring view is entered, replaced wholesale
/// when the student switches subject or quick action. Nothing here is
/// persisted across restarts.
#[derive(Debug)]
pub struct SessionState {
    context: SessionContext,
    messages: Vec<Message>,
    turn: TurnState,
    generation: u64,
    next_id: u64,
    last_timestamp: DateTime<Utc>,
}

impl SessionState {
    /// New general-purpose session greeting the student at the given level
    pub fn new(level: EducationLevel) -> Self {
        let mut session = Self {
            context: SessionContext {
                level,
                subject: None,
                mode: ExplanationMode::Standard,
            },
            messages: Vec::new(),
            turn: TurnState::Idle,
            generation: 0,
            next_id: 1,
            last_timestamp: Utc::now(),
        };
        session.reset(&prompts::initial_greeting(level));
        session
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn turn_state(&self) -> TurnState {
        self.turn
    }

    /// Replace the log with a single model-authored greeting.
    ///
    /// Invalidates any in-flight turn ticket and returns to `Idle`.
    pub fn reset(&mut self, greeting: &str) {
        self.generation += 1;
        self.messages.clear();
        self.turn = TurnState::Idle;
        self.push(Role::Model, greeting, false);
    }

    /// Open a tutoring session on a catalog subject.
    ///
    /// Resets the mode to `Standard` and the log to a personalized greeting.
    pub fn start_subject(&mut self, subject: Subject, profile: Option<&UserProfile>) {
        let greeting = prompts::subject_greeting(&subject, profile);
        self.context.subject = Some(subject);
        self.context.mode = ExplanationMode::Standard;
        self.reset(&greeting);
    }

    /// Open a general session from a dashboard quick action
    pub fn start_quick_action(&mut self, action: QuickAction, profile: Option<&UserProfile>) {
        self.context.subject = None;
        self.context.mode = ExplanationMode::Standard;
        self.reset(&prompts::quick_action_greeting(action, profile));
    }

    /// Swap the explanation mode; the log is untouched
    pub fn set_mode(&mut self, mode: ExplanationMode) {
        self.context.mode = mode;
    }

    /// Change the level for sessions started after returning to the picker
    pub fn set_level(&mut self, level: EducationLevel) {
        self.context.level = level;
    }

    /// Append a student message. Precondition: `text` is not blank; the UI
    /// boundary filters empty submissions before they reach the core.
    pub fn append_user(&mut self, text: &str) -> &Message {
        debug_assert!(
            !text.trim().is_empty(),
            "empty submissions are filtered at the UI boundary"
        );
        self.push(Role::User, text, false)
    }

    pub fn append_model(&mut self, text: &str) -> &Message {
        self.push(Role::Model, text, false)
    }

    /// Append a locally synthesized error notice. The only constructor for
    /// `System` messages, so `role == System` always implies `is_error`.
    pub fn append_system_error(&mut self, text: &str) -> &Message {
        self.push(Role::System, text, true)
    }

    /// Enter the `Sending` state for a new turn.
    ///
    /// Returns `None` while another turn is in flight (the submission is
    /// rejected, log unchanged). Otherwise appends the user message and
    /// hands back a ticket for [`SessionState::complete_turn`].
    pub fn begin_turn(&mut self, text: &str) -> Option<TurnTicket> {
        if self.turn.is_sending() {
            return None;
        }
        self.append_user(text);
        self.turn = TurnState::Sending;
        Some(TurnTicket {
            generation: self.generation,
        })
    }

    /// Settle an in-flight turn.
    ///
    /// A stale ticket (session reset while the request was in flight) is a
    /// no-op. On success the reply is appended as a model message; on
    /// failure the fixed connection notice is appended instead and the
    /// underlying error is only logged. Either way the turn returns to
    /// `Idle` and the student's message stays in the log for a manual retry.
    pub fn complete_turn(
        &mut self,
        ticket: TurnTicket,
        outcome: Result<String, MentorError>,
    ) -> Option<&Message> {
        if ticket.generation != self.generation {
            tracing::debug!("dropping completion for a torn-down session");
            return None;
        }
        self.turn = TurnState::Idle;
        match outcome {
            Ok(text) => Some(self.append_model(&text)),
            Err(error) => {
                tracing::warn!(%error, "tutoring turn failed");
                Some(self.append_system_error(prompts::CONNECTION_ERROR_TEXT))
            }
        }
    }

    fn push(&mut self, role: Role, text: &str, is_error: bool) -> &Message {
        // Clamp so timestamps stay non-decreasing if the clock steps back
        let timestamp = Utc::now().max(self.last_timestamp);
        self.last_timestamp = timestamp;

        let message = Message {
            id: self.next_id,
            role,
            text: text.to_string(),
            timestamp,
            is_error,
        };
        self.next_id += 1;
        self.messages.push(message);
        self.messages.last().expect("just pushed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subjects;
    use crate::types::SubjectCategory;

    fn session() -> SessionState {
        SessionState::new(EducationLevel::Bachillerato)
    }

    #[test]
    fn test_new_session_has_single_greeting() {
        let s = session();
        assert_eq!(s.messages().len(), 1);
        assert_eq!(s.messages()[0].role, Role::Model);
        assert!(s.messages()[0].text.contains("Bachillerato"));
        assert!(!s.turn_state().is_sending());
    }

    #[test]
    fn test_appends_grow_log_by_one_and_never_mutate() {
        let mut s = session();
        s.append_user("hola");
        let snapshot = s.messages().to_vec();

        s.append_model("respuesta");
        assert_eq!(s.messages().len(), snapshot.len() + 1);
        assert_eq!(&s.messages()[..snapshot.len()], snapshot.as_slice());

        s.append_system_error("fallo");
        assert_eq!(s.messages().len(), snapshot.len() + 2);
        assert_eq!(&s.messages()[..snapshot.len()], snapshot.as_slice());
    }

    #[test]
    fn test_ids_monotonic_timestamps_non_decreasing() {
        let mut s = session();
        s.append_user("uno");
        s.append_model("dos");
        s.append_user("tres");
        for pair in s.messages().windows(2) {
            assert!(pair[1].id > pair[0].id);
            assert!(pair[1].timestamp >= pair[0].timestamp);
        }
    }

    #[test]
    fn test_system_messages_always_flag_error() {
        let mut s = session();
        let msg = s.append_system_error("sin conexión");
        assert_eq!(msg.role, Role::System);
        assert!(msg.is_error);
    }

    #[test]
    fn test_reset_yields_single_model_greeting() {
        let mut s = session();
        s.append_user("hola");
        s.append_model("respuesta");
        s.reset("nuevo saludo");
        assert_eq!(s.messages().len(), 1);
        assert_eq!(s.messages()[0].role, Role::Model);
        assert_eq!(s.messages()[0].text, "nuevo saludo");
    }

    #[test]
    fn test_start_subject_resets_log_and_mode() {
        let mut s = session();
        s.set_mode(ExplanationMode::Socratic);
        s.append_user("pregunta vieja");

        let physics = subjects::find("sci_phys").unwrap().clone();
        s.start_subject(physics, None);

        assert_eq!(s.messages().len(), 1);
        assert_eq!(s.context().mode, ExplanationMode::Standard);
        assert_eq!(
            s.context().subject.as_ref().map(|s| s.category),
            Some(SubjectCategory::Science)
        );
    }

    #[test]
    fn test_quick_action_clears_subject() {
        let mut s = session();
        let physics = subjects::find("sci_phys").unwrap().clone();
        s.start_subject(physics, None);
        s.start_quick_action(QuickAction::Solve, None);

        assert!(s.context().subject.is_none());
        assert_eq!(s.messages().len(), 1);
        assert!(s.messages()[0].text.contains("Resolución de Problemas"));
    }

    #[test]
    fn test_mode_swap_keeps_log() {
        let mut s = session();
        s.append_user("hola");
        s.set_mode(ExplanationMode::ExamPrep);
        assert_eq!(s.messages().len(), 2);
    }

    #[test]
    fn test_submission_while_sending_is_rejected() {
        let mut s = session();
        let ticket = s.begin_turn("primera").unwrap();
        let len = s.messages().len();

        assert!(s.begin_turn("segunda").is_none());
        assert_eq!(s.messages().len(), len);

        s.complete_turn(ticket, Ok("respuesta".to_string()));
        assert!(!s.turn_state().is_sending());
    }

    #[test]
    fn test_failed_turn_appends_one_error_and_returns_to_idle() {
        let mut s = session();
        let ticket = s.begin_turn("pregunta").unwrap();
        let len = s.messages().len();

        let notice = s
            .complete_turn(
                ticket,
                Err(MentorError::Api {
                    status: 500,
                    message: "boom".to_string(),
                }),
            )
            .unwrap();
        assert_eq!(notice.role, Role::System);
        assert!(notice.is_error);

        assert_eq!(s.messages().len(), len + 1);
        assert!(!s.turn_state().is_sending());
        // The student's message stays in the log for a manual retry
        assert_eq!(s.messages()[len - 1].text, "pregunta");
    }

    #[test]
    fn test_late_completion_after_reset_is_noop() {
        let mut s = session();
        let ticket = s.begin_turn("pregunta").unwrap();

        let physics = subjects::find("sci_phys").unwrap().clone();
        s.start_subject(physics, None);
        let snapshot = s.messages().to_vec();

        assert!(s.complete_turn(ticket, Ok("respuesta tardía".to_string())).is_none());
        assert_eq!(s.messages(), snapshot.as_slice());
        assert!(!s.turn_state().is_sending());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            User(String),
            Model(String),
            SystemError(String),
        }

        fn arb_op() -> impl Strategy<Value = Op> {
            prop_oneof![
                "[a-zñáéíóú ]{1,20}".prop_map(Op::User),
                ".{0,20}".prop_map(Op::Model),
                ".{0,20}".prop_map(Op::SystemError),
            ]
        }

        proptest! {
            #[test]
            fn append_only_law(ops in prop::collection::vec(arb_op(), 1..24)) {
                let mut s = session();
                for op in ops {
                    let before = s.messages().to_vec();
                    match op {
                        Op::User(text) => {
                            // Respect the non-blank precondition
                            let text = if text.trim().is_empty() { "x".to_string() } else { text };
                            s.append_user(&text);
                        }
                        Op::Model(text) => { s.append_model(&text); }
                        Op::SystemError(text) => { s.append_system_error(&text); }
                    }
                    prop_assert_eq!(s.messages().len(), before.len() + 1);
                    prop_assert_eq!(&s.messages()[..before.len()], before.as_slice());
                }
            }
        }
    }
}
