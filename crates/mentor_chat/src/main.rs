//! MentorIA Chat - interactive tutoring CLI
//!
//! Terminal rendition of the app shell: onboarding wizard on first run,
//! a dashboard for picking subjects/quick actions and browsing the library,
//! and the chat loop driving the tutoring engine. Markdown in replies is
//! printed verbatim; rendering belongs to richer front ends.

use clap::Parser;
use mentor::{
    subjects, EducationLevel, ExplanationMode, ProfileStore, QuickAction, Role, SubjectCategory,
    Tutor, TutorConfig, UserProfile,
};
use mentor_library::{BookSource, CatalogConfig, Library, LibraryConfig};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "mentor_chat")]
#[command(about = "Interactive tutoring CLI for MentorIA")]
struct Args {
    /// API key (optional, uses GEMINI_API_KEY env var if not provided)
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Base URL of the generative-AI API (for gateways and testing)
    #[arg(short = 'u', long)]
    base_url: Option<String>,

    /// Model for general chat
    #[arg(long)]
    fast_model: Option<String>,

    /// Model for math/science and step-by-step work
    #[arg(long)]
    reasoning_model: Option<String>,

    /// Profile file location (defaults to the platform config dir)
    #[arg(short, long)]
    profile: Option<PathBuf>,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let store = match args.profile.clone() {
        Some(path) => ProfileStore::new(path),
        None => match ProfileStore::open_default() {
            Ok(store) => store,
            Err(e) => {
                eprintln!("No se pudo ubicar el perfil: {}", e);
                std::process::exit(1);
            }
        },
    };

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to initialize readline: {}", e);
            std::process::exit(1);
        }
    };

    // First run: onboarding wizard, then persist the profile
    let (profile, level) = match store.load() {
        Some(profile) => (Some(profile), EducationLevel::default()),
        None => match onboarding(&mut rl) {
            Some((profile, level)) => {
                if let Err(e) = store.save(&profile) {
                    tracing::warn!(error = %e, "profile could not be saved");
                }
                (Some(profile), level)
            }
            None => (None, EducationLevel::default()),
        },
    };

    let mut config = TutorConfig::new();
    if let Some(key) = args.api_key {
        config = config.with_api_key(key);
    }
    if let Some(url) = args.base_url {
        config = config.with_base_url(url);
    }
    if let Some(model) = args.fast_model {
        config = config.with_fast_model(model);
    }
    if let Some(model) = args.reasoning_model {
        config = config.with_reasoning_model(model);
    }

    let mut tutor = match Tutor::new(config, level) {
        Ok(tutor) => tutor,
        Err(e) => {
            eprintln!("No se pudo iniciar MentorIA: {}", e);
            std::process::exit(1);
        }
    };

    // Curated catalog credentials come from the environment; without them
    // the library degrades to the public sources only
    let catalog = std::env::var("SUPABASE_URL").ok().zip(std::env::var("SUPABASE_ANON_KEY").ok());
    let library = match Library::new(LibraryConfig {
        catalog: catalog.map(|(base_url, api_key)| CatalogConfig { base_url, api_key }),
        ..LibraryConfig::default()
    }) {
        Ok(library) => library,
        Err(e) => {
            eprintln!("No se pudo iniciar la biblioteca: {}", e);
            std::process::exit(1);
        }
    };

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                        MentorIA                              ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    if let Some(ref p) = profile {
        println!("Hola de nuevo, {}.", p.name);
    }
    println!();

    dashboard(&mut rl, &mut tutor, profile.as_ref(), &library);

    println!("¡Hasta pronto!");
}

/// Collect the student profile on first run. `None` when the wizard is
/// aborted; the app continues without personalization.
fn onboarding(rl: &mut DefaultEditor) -> Option<(UserProfile, EducationLevel)> {
    println!("Bienvenido a MentorIA. Configuremos tu perfil (una sola vez).");
    println!();

    let name = loop {
        match rl.readline("¿Cómo te llamas? ") {
            Ok(line) if !line.trim().is_empty() => break line.trim().to_string(),
            Ok(_) => continue,
            Err(_) => return None,
        }
    };

    println!("¿Cuál es tu nivel actual?");
    println!("  1. Bachillerato / Colegio");
    println!("  2. Universidad / Superior");
    let level = loop {
        match rl.readline("Nivel [1/2]: ") {
            Ok(line) => match line.trim() {
                "1" => break EducationLevel::Bachillerato,
                "2" => break EducationLevel::Universidad,
                _ => continue,
            },
            Err(_) => return None,
        }
    };

    let strongest = read_category(rl, "¿En qué área eres más fuerte?");
    let focus = read_category(rl, "¿Qué área quieres mejorar?");

    let profile = UserProfile {
        name,
        strongest,
        focus,
        onboarding_completed: true,
    };
    println!();
    Some((profile, level))
}

fn read_category(rl: &mut DefaultEditor, question: &str) -> Option<SubjectCategory> {
    println!("{} (Enter para omitir)", question);
    for (i, category) in SubjectCategory::ALL.iter().enumerate() {
        println!("  {}. {}", i + 1, category.label());
    }
    loop {
        match rl.readline("Área: ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    return None;
                }
                if let Ok(n) = line.parse::<usize>() {
                    if let Some(category) = SubjectCategory::ALL.get(n.wrapping_sub(1)) {
                        return Some(*category);
                    }
                }
            }
            Err(_) => return None,
        }
    }
}

fn print_dashboard(level: EducationLevel) {
    println!("Nivel actual: {}", level.label());
    println!();
    println!("Acciones rápidas: resolver | explicar | practicar | crear");
    println!("Materias disponibles:");
    for subject in subjects::for_level(level) {
        println!("  {:<14} {} {} — {}", subject.id, subject.icon, subject.name, subject.description);
    }
    println!();
    println!("Escribe el id de una materia o una acción rápida para comenzar.");
    println!("Otros comandos: nivel | biblioteca [google|clasicos] <consulta> | salir");
}

fn dashboard(
    rl: &mut DefaultEditor,
    tutor: &mut Tutor,
    profile: Option<&UserProfile>,
    library: &Library,
) {
    let mut level = tutor.session().context().level;
    print_dashboard(level);

    loop {
        let line = match rl.readline("mentoria> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return,
            Err(e) => {
                eprintln!("Error: {}", e);
                return;
            }
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(input);

        match input.to_lowercase().as_str() {
            "salir" | "quit" => return,
            "nivel" => {
                level = match level {
                    EducationLevel::Bachillerato => EducationLevel::Universidad,
                    EducationLevel::Universidad => EducationLevel::Bachillerato,
                };
                tutor.set_level(level);
                print_dashboard(level);
                continue;
            }
            _ => {}
        }

        if let Some(rest) = input.strip_prefix("biblioteca") {
            browse_library(library, rest.trim());
            continue;
        }

        if let Some(action) = QuickAction::from_keyword(input) {
            tutor.start_quick_action(action, profile);
            if chat(rl, tutor) {
                return;
            }
            print_dashboard(level);
            continue;
        }

        if let Some(subject) = subjects::find(&input.to_lowercase()) {
            if !subject.levels.contains(&level) {
                println!("«{}» no está disponible para {}.", subject.name, level.label());
                continue;
            }
            tutor.start_subject(subject.clone(), profile);
            if chat(rl, tutor) {
                return;
            }
            print_dashboard(level);
            continue;
        }

        println!("No entendí «{}». Escribe el id de una materia, una acción rápida o «salir».", input);
    }
}

/// Chat loop for one session. Returns `true` when the student wants to quit
/// the whole app instead of going back to the dashboard.
fn chat(rl: &mut DefaultEditor, tutor: &mut Tutor) -> bool {
    // Show the greeting the session opened with
    for message in tutor.session().messages() {
        print_message(message.role, &message.text);
    }
    println!("(Comandos: /modo normal|sencillo|pasos|socratico|examen, /volver, /salir)");
    println!();

    loop {
        let line = match rl.readline("Tú: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return true,
            Err(e) => {
                eprintln!("Error: {}", e);
                return true;
            }
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(input);

        if let Some(rest) = input.strip_prefix('/') {
            let mut words = rest.split_whitespace();
            match words.next().unwrap_or("") {
                "volver" | "back" => return false,
                "salir" | "quit" => return true,
                "modo" | "mode" => {
                    match words.next().and_then(ExplanationMode::from_keyword) {
                        Some(mode) => {
                            tutor.set_mode(mode);
                            println!("Modo: {}", mode.label());
                        }
                        None => println!("Modos: normal, sencillo, pasos, socratico, examen"),
                    }
                    continue;
                }
                other => {
                    println!("Comando desconocido: /{}", other);
                    continue;
                }
            }
        }

        match tutor.send(input) {
            Some(reply) => print_message(reply.role, &reply.text),
            None => println!("(Hay una consulta en curso; espera la respuesta.)"),
        }
        println!();
    }
}

fn print_message(role: Role, text: &str) {
    match role {
        Role::Model => println!("MentorIA: {}", text),
        Role::System => println!("⚠ {}", text),
        Role::User => println!("Tú: {}", text),
    }
}

fn browse_library(library: &Library, request: &str) {
    let (source, query) = match request.split_once(char::is_whitespace) {
        Some(("google", q)) => (BookSource::Google, q.trim()),
        Some(("clasicos", q)) | Some(("clásicos", q)) => (BookSource::Classics, q.trim()),
        _ => (BookSource::Catalog, request),
    };

    let books = library.search(source, query);
    if books.is_empty() {
        println!("La biblioteca no encontró resultados.");
        return;
    }

    for book in &books {
        let reader = Library::embed_url(book)
            .map(|url| format!(" [{}]", url))
            .unwrap_or_default();
        println!("· {} — {}{}", book.title, book.author, reader);
    }
}
