//! Prompt-construction policy.
//!
//! [`build_request`] is the one pure decision point of the engine: given the
//! session context, the prior message log and the new user text it derives
//! the instruction, the model tier, the generation parameters and the
//! context window forwarded to the remote service. It performs no I/O and
//! never consults the clock.

use crate::prompts;
use crate::session::SessionContext;
use crate::types::{ExplanationMode, Message, ModelTier, Role, SubjectCategory};

/// Sampling temperature for explanation turns
pub const TEMPERATURE_DEFAULT: f32 = 0.7;
/// More exploratory sampling for exam drills
pub const TEMPERATURE_EXAM: f32 = 0.9;
/// Thinking-token budget granted to the high-capability tier
pub const REASONING_BUDGET: u32 = 2048;

/// Speaker tag of a forwarded context turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Model,
}

impl Speaker {
    /// Wire role tag expected by the remote protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Model => "model",
        }
    }
}

/// One (speaker, text) pair of forwarded conversation history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextTurn {
    pub speaker: Speaker,
    pub text: String,
}

/// Everything needed to call the remote chat service for one turn.
///
/// This is an in-memory design contract, not a serialization format; the
/// wire client owns the mapping to the remote protocol.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub instruction: String,
    pub model: ModelTier,
    pub temperature: f32,
    pub reasoning_budget: Option<u32>,
    pub context: Vec<ContextTurn>,
    pub latest_user_text: String,
}

/// Derive the full request for one turn.
///
/// `history` is the log *before* the new user text; the new text rides as
/// `latest_user_text`, never duplicated into `context`. System/error
/// entries are filtered out; the relative order of the rest is preserved.
pub fn build_request(context: &SessionContext, history: &[Message], user_text: &str) -> ChatRequest {
    let reasoning_heavy = is_reasoning_heavy(context);

    let mut instruction = String::from(prompts::SYSTEM_INSTRUCTION_BASE);
    instruction.push_str("\nCONTEXTO ACTUAL:\n");
    instruction.push_str(&format!("Nivel del estudiante: {}\n", context.level.label()));

    if let Some(subject) = &context.subject {
        instruction.push_str(&format!(
            "Materia actual: {} ({})\n",
            subject.name, subject.description
        ));
    }

    match context.mode {
        ExplanationMode::Child => instruction.push_str(prompts::DIRECTIVE_CHILD),
        ExplanationMode::StepByStep => instruction.push_str(prompts::DIRECTIVE_STEP_BY_STEP),
        ExplanationMode::Socratic => instruction.push_str(prompts::DIRECTIVE_SOCRATIC),
        ExplanationMode::ExamPrep => instruction.push_str(prompts::DIRECTIVE_EXAM_PREP),
        ExplanationMode::Standard => {}
    }

    let turns = history
        .iter()
        .filter(|m| m.role != Role::System && !m.is_error)
        .map(|m| ContextTurn {
            speaker: match m.role {
                Role::User => Speaker::User,
                _ => Speaker::Model,
            },
            text: m.text.clone(),
        })
        .collect();

    ChatRequest {
        instruction,
        model: if reasoning_heavy {
            ModelTier::HighCapability
        } else {
            ModelTier::Fast
        },
        temperature: if context.mode == ExplanationMode::ExamPrep {
            TEMPERATURE_EXAM
        } else {
            TEMPERATURE_DEFAULT
        },
        reasoning_budget: reasoning_heavy.then_some(REASONING_BUDGET),
        context: turns,
        latest_user_text: user_text.to_string(),
    }
}

/// Math, science and full derivations go to the high-capability tier
fn is_reasoning_heavy(context: &SessionContext) -> bool {
    let heavy_subject = context
        .subject
        .as_ref()
        .is_some_and(|s| matches!(s.category, SubjectCategory::Math | SubjectCategory::Science));
    heavy_subject || context.mode == ExplanationMode::StepByStep
}
