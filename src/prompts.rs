//! Instruction and greeting text for the tutoring sessions.
//!
//! Everything here is plain string assembly; the prompt policy in
//! [`crate::policy`] decides which pieces are combined for a given turn.

use crate::types::{EducationLevel, QuickAction, Subject, UserProfile};

/// Base persona and pedagogy rules, prepended to every instruction
pub const SYSTEM_INSTRUCTION_BASE: &str = "\
Eres MentorIA, un tutor de IA de clase mundial, sofisticado y altamente pedagógico.
Tu tono es profesional pero cercano, motivador y claro.

REGLAS DE ORO:
1. ADÁPTATE ESTRICTAMENTE al nivel educativo:
   - Si es BACHILLERATO: Usa lenguaje accesible, ejemplos cotidianos y fomenta la curiosidad.
   - Si es UNIVERSIDAD: Usa terminología técnica precisa, rigor académico y profundidad teórica.
2. En MATEMÁTICAS/CIENCIAS: Prioriza el razonamiento. Usa LaTeX para fórmulas.
3. En HUMANIDADES/SOCIALES: Fomenta el pensamiento crítico y el análisis de contexto.
4. FORMATO: Usa Markdown elegante. Negritas para conceptos clave. Listas para claridad.
5. PEDAGOGÍA: No des solo la respuesta. Guía al estudiante.
";

/// Mode-specific directives appended after the context block
pub(crate) const DIRECTIVE_CHILD: &str =
    "MODO: Explica como si el estudiante tuviera 10 años. Usa analogías divertidas.\n";
pub(crate) const DIRECTIVE_STEP_BY_STEP: &str =
    "MODO: Resolución paso a paso detallada. Numera los pasos lógicos. No te saltes nada.\n";
pub(crate) const DIRECTIVE_SOCRATIC: &str =
    "MODO: Socrático. NO des la respuesta. Haz preguntas guía para que el estudiante llegue a la conclusión.\n";
pub(crate) const DIRECTIVE_EXAM_PREP: &str =
    "MODO: Preparación de examen. Genera una pregunta difícil sobre el tema y espera la respuesta del usuario, o corrige su respuesta anterior.\n";

/// Shown to the student when a turn fails; the underlying error is only logged
pub const CONNECTION_ERROR_TEXT: &str = "Hubo un pequeño problema de conexión. Intenta de nuevo.";

/// Substituted when the service answers with no usable candidate text
pub(crate) const EMPTY_REPLY_TEXT: &str =
    "Lo siento, no pude generar una respuesta. Intenta de nuevo.";

/// Default greeting for a general-purpose session
pub fn initial_greeting(level: EducationLevel) -> String {
    format!(
        "¡Bienvenido a MentorIA!\nEstás en el modo **{}**. Selecciona una materia del panel para comenzar una sesión de aprendizaje personalizada.",
        level.label()
    )
}

/// Personalized greeting when the student opens a subject.
///
/// Three variants: the subject matches the profile's focus category, its
/// strongest category, or neither.
pub fn subject_greeting(subject: &Subject, profile: Option<&UserProfile>) -> String {
    let name = profile
        .filter(|p| !p.name.trim().is_empty())
        .map(|p| format!(" {}", p.name))
        .unwrap_or_default();

    let mut greeting = format!("Hola{}, soy tu tutor de **{}**.", name, subject.name);

    let focus_match = profile.and_then(|p| p.focus).is_some_and(|c| c == subject.category);
    let strongest_match = profile
        .and_then(|p| p.strongest)
        .is_some_and(|c| c == subject.category);

    if focus_match {
        greeting.push_str(&format!(
            "\n\nVeo que tu objetivo es mejorar en **{}**. ¡Excelente elección! Vamos a reforzar esos conceptos.",
            subject.category.label()
        ));
    } else if strongest_match {
        greeting.push_str(&format!(
            "\n\nSé que **{}** es tu fuerte. Vamos a profundizar en temas avanzados.",
            subject.category.label()
        ));
    } else {
        greeting.push_str(
            "\n\n¿En qué puedo ayudarte hoy? Podemos repasar teoría, resolver problemas o prepararnos para un examen.",
        );
    }

    greeting
}

/// Greeting for a dashboard quick action (general session, no subject)
pub fn quick_action_greeting(action: QuickAction, profile: Option<&UserProfile>) -> String {
    let name = profile
        .filter(|p| !p.name.trim().is_empty())
        .map(|p| format!(", {}", p.name))
        .unwrap_or_default();

    match action {
        QuickAction::Solve => format!(
            "### 🧮 Resolución de Problemas\nListo{}. Pega el problema aquí. Lo analizaremos paso a paso.",
            name
        ),
        QuickAction::Explain => format!(
            "### 📖 Explicación Conceptual\nDime el tema{}. Usaré analogías y ejemplos claros.",
            name
        ),
        QuickAction::Exam => format!(
            "### 📝 Modo Examen\n¿Qué materia repasamos hoy{}? Te haré preguntas difíciles.",
            name
        ),
        QuickAction::Create => {
            "### ✨ Generador de Ejercicios\nDime el tema y el nivel de dificultad.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subjects;
    use crate::types::SubjectCategory;

    fn profile(strongest: Option<SubjectCategory>, focus: Option<SubjectCategory>) -> UserProfile {
        UserProfile {
            name: "Sofía".to_string(),
            strongest,
            focus,
            onboarding_completed: true,
        }
    }

    #[test]
    fn test_initial_greeting_mentions_level() {
        let greeting = initial_greeting(EducationLevel::Universidad);
        assert!(greeting.contains("**Universidad**"));
    }

    #[test]
    fn test_subject_greeting_focus_variant() {
        let calc = subjects::find("math_calc1").unwrap();
        let p = profile(None, Some(SubjectCategory::Math));
        let greeting = subject_greeting(calc, Some(&p));
        assert!(greeting.contains("Hola Sofía"));
        assert!(greeting.contains("tu objetivo es mejorar"));
    }

    #[test]
    fn test_subject_greeting_strongest_variant() {
        let calc = subjects::find("math_calc1").unwrap();
        let p = profile(Some(SubjectCategory::Math), None);
        let greeting = subject_greeting(calc, Some(&p));
        assert!(greeting.contains("es tu fuerte"));
    }

    #[test]
    fn test_subject_greeting_focus_wins_over_strongest() {
        let calc = subjects::find("math_calc1").unwrap();
        let p = profile(Some(SubjectCategory::Math), Some(SubjectCategory::Math));
        let greeting = subject_greeting(calc, Some(&p));
        assert!(greeting.contains("tu objetivo es mejorar"));
        assert!(!greeting.contains("es tu fuerte"));
    }

    #[test]
    fn test_subject_greeting_anonymous() {
        let bio = subjects::find("sci_bio").unwrap();
        let greeting = subject_greeting(bio, None);
        assert!(greeting.starts_with("Hola, soy tu tutor de **Biología**."));
        assert!(greeting.contains("¿En qué puedo ayudarte hoy?"));
    }

    #[test]
    fn test_quick_action_greetings() {
        let p = profile(None, None);
        assert!(quick_action_greeting(QuickAction::Solve, Some(&p)).contains("Listo, Sofía"));
        assert!(quick_action_greeting(QuickAction::Exam, None).contains("Modo Examen"));
        // The exercise generator never addresses the student by name
        assert!(!quick_action_greeting(QuickAction::Create, Some(&p)).contains("Sofía"));
    }
}
