use tokio::runtime::Runtime;

use crate::client::GenAiClient;
use crate::error::Result;
use crate::policy;
use crate::session::SessionState;
use crate::types::{
    EducationLevel, ExplanationMode, Message, QuickAction, Subject, TutorConfig, UserProfile,
};

/// Tutoring facade: owns the session state, the wire client and a runtime.
///
/// One `Tutor` per active tutoring view. The API is synchronous; the
/// `Sending` turn state plus `&mut self` keep at most one remote call in
/// flight per session.
pub struct Tutor {
    client: GenAiClient,
    runtime: Runtime,
    session: SessionState,
}

impl Tutor {
    /// Create a tutor for the given student level.
    ///
    /// Fails when no API key can be resolved or the runtime cannot start.
    pub fn new(config: TutorConfig, level: EducationLevel) -> Result<Self> {
        let client = GenAiClient::new(&config)?;
        let runtime = Runtime::new()?;
        Ok(Self {
            client,
            runtime,
            session: SessionState::new(level),
        })
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Open a tutoring session on a catalog subject
    pub fn start_subject(&mut self, subject: Subject, profile: Option<&UserProfile>) {
        self.session.start_subject(subject, profile);
    }

    /// Open a general session from a dashboard quick action
    pub fn start_quick_action(&mut self, action: QuickAction, profile: Option<&UserProfile>) {
        self.session.start_quick_action(action, profile);
    }

    pub fn set_mode(&mut self, mode: ExplanationMode) {
        self.session.set_mode(mode);
    }

    pub fn set_level(&mut self, level: EducationLevel) {
        self.session.set_level(level);
    }

    /// Execute one conversational turn.
    ///
    /// Returns the appended reply: the model's message, or the local error
    /// notice when the collaborator fails (the underlying error is logged,
    /// not surfaced). Blank submissions and submissions while a turn is in
    /// flight are rejected with `None`, leaving the log unchanged.
    pub fn send(&mut self, text: &str) -> Option<&Message> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let ticket = self.session.begin_turn(text)?;

        // The turn's own user message rides as the latest turn, not as context
        let prior = &self.session.messages()[..self.session.messages().len() - 1];
        let request = policy::build_request(self.session.context(), prior, text);

        tracing::debug!(
            model = ?request.model,
            mode = ?self.session.context().mode,
            turns = request.context.len(),
            "dispatching tutoring turn"
        );
        let outcome = self.runtime.block_on(self.client.generate(&request));
        self.session.complete_turn(ticket, outcome)
    }
}
