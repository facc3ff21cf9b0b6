//! # MentorIA tutoring engine
//!
//! Conversational session state, prompt-construction policy and turn
//! execution for a tutoring assistant backed by a hosted generative-AI
//! chat API.

pub mod client;
pub mod error;
pub mod policy;
pub mod profile;
pub mod session;
pub mod subjects;
pub mod types;

mod prompts;
mod tutor;

// Re-exports
pub use error::{MentorError, Result};
pub use policy::{build_request, ChatRequest, ContextTurn, Speaker};
pub use profile::ProfileStore;
pub use session::{SessionContext, SessionState, TurnState, TurnTicket};
pub use tutor::Tutor;
pub use types::{
    EducationLevel, ExplanationMode, Message, ModelTier, QuickAction, Role, Subject,
    SubjectCategory, TutorConfig, UserProfile,
};
