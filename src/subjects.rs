//! Built-in subject catalog.
//!
//! The catalog is fixed at compile time; the dashboard filters it by the
//! student's level and an optional category tab.

use std::sync::LazyLock;

use crate::types::{EducationLevel, Subject, SubjectCategory};

const BOTH: [EducationLevel; 2] = [EducationLevel::Bachillerato, EducationLevel::Universidad];
const SCHOOL: [EducationLevel; 1] = [EducationLevel::Bachillerato];
const UNI: [EducationLevel; 1] = [EducationLevel::Universidad];

fn subject(
    id: &str,
    name: &str,
    icon: &str,
    category: SubjectCategory,
    description: &str,
    levels: &[EducationLevel],
) -> Subject {
    Subject {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        category,
        description: description.to_string(),
        levels: levels.to_vec(),
    }
}

static CATALOG: LazyLock<Vec<Subject>> = LazyLock::new(|| {
    use SubjectCategory::*;
    vec![
        // Matemáticas
        subject("math_basic", "Aritmética y Pre-Álgebra", "➗", Math, "Operaciones fundamentales.", &SCHOOL),
        subject("math_geo", "Geometría", "📐", Math, "Formas, ángulos y espacio.", &SCHOOL),
        subject("math_trig", "Trigonometría", "⊿", Math, "Triángulos y funciones periódicas.", &SCHOOL),
        subject("math_calc1", "Cálculo Diferencial", "∫", Math, "Límites y derivadas.", &BOTH),
        subject("math_calc2", "Cálculo Integral/Multivariado", "∬", Math, "Integrales y series.", &UNI),
        subject("math_diff_eq", "Ecuaciones Diferenciales", "∂", Math, "Modelado de cambios.", &UNI),
        subject("math_lin_alg", "Álgebra Lineal", "▦", Math, "Matrices y espacios vectoriales.", &UNI),
        subject("math_stats", "Probabilidad y Estadística", "📊", Math, "Análisis de datos.", &BOTH),
        // Ciencias
        subject("sci_nat", "Ciencias Naturales", "🌿", Science, "El mundo natural.", &SCHOOL),
        subject("sci_bio", "Biología", "🧬", Science, "La ciencia de la vida.", &BOTH),
        subject("sci_chem", "Química", "🧪", Science, "Materia y transformaciones.", &BOTH),
        subject("sci_phys", "Física", "⚛️", Science, "Movimiento y energía.", &BOTH),
        subject("sci_org", "Química Orgánica", "⚗️", Science, "Compuestos de carbono.", &UNI),
        // Sociales y Humanidades
        subject("hum_soc", "Ciencias Sociales", "🌍", Humanities, "Sociedad y cultura.", &SCHOOL),
        subject("hum_hist", "Historia", "🏛️", Humanities, "Eventos pasados.", &BOTH),
        subject("hum_civ", "Competencia Ciudadana", "🤝", Humanities, "Derechos y deberes.", &SCHOOL),
        subject("hum_phil", "Filosofía", "🦉", Humanities, "Lógica y pensamiento.", &BOTH),
        subject("hum_law", "Derecho / Leyes", "⚖️", Humanities, "Marco legal básico.", &UNI),
        subject("hum_psych", "Psicología", "🧠", Humanities, "Mente y comportamiento.", &UNI),
        // Idiomas
        subject("lang_es", "Lengua Castellana", "📚", Languages, "Gramática y literatura.", &BOTH),
        subject("lang_en", "Inglés", "🇺🇸", Languages, "Writing, reading & grammar.", &BOTH),
        // Tecnología
        subject("tech_info", "Informática", "🖥️", Tech, "Herramientas digitales.", &SCHOOL),
        subject("tech_prog", "Programación", "💻", Tech, "Algoritmos y código.", &BOTH),
    ]
});

/// All catalog entries, in display order
pub fn catalog() -> &'static [Subject] {
    &CATALOG
}

/// Look up a subject by its id
pub fn find(id: &str) -> Option<&'static Subject> {
    CATALOG.iter().find(|s| s.id == id)
}

/// Subjects offered for the given level
pub fn for_level(level: EducationLevel) -> Vec<&'static Subject> {
    CATALOG.iter().filter(|s| s.levels.contains(&level)).collect()
}

/// Subjects offered for the given level within one category tab
pub fn for_level_and_category(
    level: EducationLevel,
    category: SubjectCategory,
) -> Vec<&'static Subject> {
    CATALOG
        .iter()
        .filter(|s| s.levels.contains(&level) && s.category == category)
        .collect()
}
