use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of one message in the conversation log
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    /// Reserved for locally synthesized notices (e.g. connectivity errors).
    /// Never forwarded to the remote service.
    System,
}

/// One turn in the conversation.
///
/// Messages are never mutated after being appended; ids are a per-session
/// monotonic counter and timestamps are non-decreasing within a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub is_error: bool,
}

/// Student education level, set from onboarding or the dashboard toggle
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum EducationLevel {
    #[default]
    Bachillerato,
    Universidad,
}

impl EducationLevel {
    /// Student-facing label, used verbatim inside prompts
    pub fn label(&self) -> &'static str {
        match self {
            EducationLevel::Bachillerato => "Bachillerato",
            EducationLevel::Universidad => "Universidad",
        }
    }
}

impl std::fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Subject grouping used for model selection and profile matching
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubjectCategory {
    Math,
    Science,
    Humanities,
    Languages,
    Tech,
    Other,
}

impl SubjectCategory {
    pub fn label(&self) -> &'static str {
        match self {
            SubjectCategory::Math => "Matemáticas",
            SubjectCategory::Science => "Ciencias",
            SubjectCategory::Humanities => "Sociales y Humanidades",
            SubjectCategory::Languages => "Idiomas",
            SubjectCategory::Tech => "Tecnología",
            SubjectCategory::Other => "Otras",
        }
    }

    pub const ALL: [SubjectCategory; 6] = [
        SubjectCategory::Math,
        SubjectCategory::Science,
        SubjectCategory::Humanities,
        SubjectCategory::Languages,
        SubjectCategory::Tech,
        SubjectCategory::Other,
    ];
}

impl std::fmt::Display for SubjectCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A catalog subject the student can open a tutoring session on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub category: SubjectCategory,
    pub description: String,
    /// Levels this subject is offered for
    pub levels: Vec<EducationLevel>,
}

/// Explanation style for the current session.
///
/// Resets to `Standard` on every subject or quick-action change.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationMode {
    #[default]
    Standard,
    Child,
    StepByStep,
    Socratic,
    ExamPrep,
}

impl ExplanationMode {
    /// Parse a user-typed mode keyword (Spanish or canonical form)
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.trim().to_lowercase().as_str() {
            "standard" | "normal" => Some(ExplanationMode::Standard),
            "child" | "sencillo" => Some(ExplanationMode::Child),
            "step_by_step" | "pasos" => Some(ExplanationMode::StepByStep),
            "socratic" | "socratico" | "socrático" => Some(ExplanationMode::Socratic),
            "exam_prep" | "examen" => Some(ExplanationMode::ExamPrep),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExplanationMode::Standard => "Normal",
            ExplanationMode::Child => "Sencillo",
            ExplanationMode::StepByStep => "Paso a paso",
            ExplanationMode::Socratic => "Socrático",
            ExplanationMode::ExamPrep => "Examen",
        }
    }
}

/// Dashboard quick actions; each starts a general-purpose session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuickAction {
    Solve,
    Explain,
    Exam,
    Create,
}

impl QuickAction {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.trim().to_lowercase().as_str() {
            "solve" | "resolver" => Some(QuickAction::Solve),
            "explain" | "explicar" => Some(QuickAction::Explain),
            "exam" | "practicar" => Some(QuickAction::Exam),
            "create" | "crear" => Some(QuickAction::Create),
            _ => None,
        }
    }
}

/// Remote model tier, decided per turn by the prompt policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    Fast,
    HighCapability,
}

/// Student profile collected by the onboarding wizard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub strongest: Option<SubjectCategory>,
    pub focus: Option<SubjectCategory>,
    pub onboarding_completed: bool,
}

/// Configuration for the tutoring engine
#[derive(Debug, Clone)]
pub struct TutorConfig {
    /// Model id used for general chat
    pub fast_model: String,
    /// Model id used for math/science and step-by-step work
    pub reasoning_model: String,
    /// Base URL for the generative-AI API (optional, for custom endpoints)
    pub base_url: Option<String>,
    /// API key (optional, can use env vars)
    pub api_key: Option<String>,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            fast_model: "gemini-3-flash-preview".to_string(),
            reasoning_model: "gemini-3-pro-preview".to_string(),
            base_url: None,
            api_key: None,
        }
    }
}

impl TutorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fast_model(mut self, model: impl Into<String>) -> Self {
        self.fast_model = model.into();
        self
    }

    pub fn with_reasoning_model(mut self, model: impl Into<String>) -> Self {
        self.reasoning_model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}
