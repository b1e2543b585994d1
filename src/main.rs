use std::io::Write;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use constants::LOG;
use format::CodeStyle;
use loader::CourseViewLoaderBuilder;
use parsing::ParsingError;
use store::{ContentStore, CourseCatalog};
use terminal::{widgets::Console, Session};
use thiserror::Error;
use validator::Verdict;

mod collaborators;
mod constants;
mod editor;
mod format;
mod gate;
mod loader;
mod models;
mod parsing;
mod projector;
mod store;
mod str_res;
mod terminal;
mod validator;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Where to write logs
    #[arg(long)]
    log: Option<String>,
    /// Log debug information
    #[arg(short, long)]
    verbose: bool,
    /// Show inline code between backticks instead of highlighting it
    #[arg(long)]
    plain: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a lesson in an interactive session
    #[command(name = "view")]
    View(LessonArgs),
    /// List the lessons of a course
    #[command(name = "list")]
    List { course: String },
    /// Check a file against the validator of a lesson
    #[command(name = "check")]
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct LessonArgs {
    /// Path to a YAML or JSON course file
    course: String,
    /// Lesson to open, starting at 1
    #[arg(long, default_value_t = 1)]
    lesson: usize,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[command(flatten)]
    lesson: LessonArgs,
    /// File holding the code to check
    #[arg(long)]
    code: String,
}

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("{0}")]
    ParsingError(#[from] ParsingError),
    #[error("{0}")]
    IOError(#[from] std::io::Error),
    #[error("lesson {0} does not exist in course '{1}'")]
    LessonNotFound(usize, String),
}

fn main() -> Result<(), ViewerError> {
    let args = Cli::parse();

    let path_log = args.log.unwrap_or(LOG.to_string());
    let file = std::fs::OpenOptions::new()
        .read(true)
        .create(true)
        .append(true)
        .open(path_log)?;

    let _ = simplelog::WriteLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::ConfigBuilder::default()
            .add_filter_allow_str("codium")
            .build(),
        file,
    );

    match args.command {
        Command::View(LessonArgs { course, lesson }) => {
            let catalog = catalog_at(&course, lesson)?;
            let style = if args.plain {
                CodeStyle::Plain
            } else {
                CodeStyle::Colored
            };
            let mut session = Session::new(catalog, style);

            let stdin = std::io::stdin();
            session.run(stdin.lock(), &mut std::io::stdout())?;
        }
        Command::List { course } => {
            let mut catalog = CourseCatalog::new();
            catalog.load(&course)?;
            handle_list(&catalog, &mut std::io::stdout())?;
        }
        Command::Check(CheckArgs { lesson: LessonArgs { course, lesson }, code }) => {
            let code = std::fs::read_to_string(code)?;
            let catalog = catalog_at(&course, lesson)?;

            if !handle_check(catalog, &code, &mut std::io::stdout())? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Loads the course at `path` and selects `lesson` (1-based).
fn catalog_at(path: &str, lesson: usize) -> Result<CourseCatalog, ViewerError> {
    let mut catalog = CourseCatalog::new();
    let course = catalog.load(path)?;

    if lesson == 0 || !catalog.select(course.clone(), lesson - 1) {
        return Err(ViewerError::LessonNotFound(lesson, course.title.clone()));
    }

    Ok(catalog)
}

fn handle_list<W: Write>(catalog: &CourseCatalog, out: &mut W) -> std::io::Result<()> {
    for course in catalog.courses() {
        writeln!(out, "📒 {}", course.title.white().bold())?;

        for (index, view) in course.course_views.iter().enumerate() {
            let validator = match &view.validator {
                Some(reference) => reference.name.white().dimmed(),
                None => "no validator".red(),
            };
            writeln!(out, "  {:02} {} {validator}", index + 1, view.subject)?;
        }
    }

    Ok(())
}

/// Runs the selected lesson's validator once against `code`. Returns whether
/// the lesson passed.
fn handle_check<W: Write>(
    catalog: CourseCatalog,
    code: &str,
    out: &mut W,
) -> std::io::Result<bool> {
    let mut loader = CourseViewLoaderBuilder::new()
        .store(catalog)
        .environment(Console::default())
        .build();

    let report = loader.load_current_course_view();
    for issue in report.issues.iter() {
        writeln!(out, "{} {issue}", "⚠".yellow().bold())?;
    }

    loader.editor_mut().set_text(code);

    match loader.check() {
        Verdict::Pass => {
            writeln!(out, "{}", "✅ lesson complete".green().bold())?;
            Ok(true)
        }
        Verdict::Fail(reason) => {
            writeln!(out, "{} {reason}", "❌ not yet:".red().bold())?;
            Ok(false)
        }
        Verdict::Pending => {
            writeln!(out, "{}", "⏳ nothing to check".white().dimmed())?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const COURSE: &str = r#"
title: Intro
course_views:
  - subject: Printing
    default_code: "print(CARET)"
    solution_code: "print(x)"
    validator: { name: contains_all, params: ["print(x)"] }
  - subject: Free play
"#;

    fn course_file() -> (TempDir, String) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("course.yml");
        fs::write(&path, COURSE).unwrap();
        let path = path.to_str().unwrap().to_string();
        (temp, path)
    }

    #[test]
    fn test_catalog_at_rejects_missing_lesson() {
        let (_temp, path) = course_file();

        assert!(catalog_at(&path, 1).is_ok());
        assert!(matches!(
            catalog_at(&path, 0),
            Err(ViewerError::LessonNotFound(0, _))
        ));
        assert!(matches!(
            catalog_at(&path, 3),
            Err(ViewerError::LessonNotFound(3, _))
        ));
    }

    #[test]
    fn test_check_pass_and_fail() {
        colored::control::set_override(false);
        let (_temp, path) = course_file();
        let mut out = Vec::new();

        let passed =
            handle_check(catalog_at(&path, 1).unwrap(), "print(x)\n", &mut out)
                .unwrap();
        assert!(passed);

        let passed =
            handle_check(catalog_at(&path, 1).unwrap(), "print(y)", &mut out)
                .unwrap();
        assert!(!passed);
        assert!(String::from_utf8(out).unwrap().contains("missing 'print(x)'"));
    }

    #[test]
    fn test_check_without_validator_is_pending() {
        colored::control::set_override(false);
        let (_temp, path) = course_file();
        let mut out = Vec::new();

        let passed =
            handle_check(catalog_at(&path, 2).unwrap(), "", &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(!passed);
        assert!(out.contains("cannot be completed"));
        assert!(out.contains("nothing to check"));
    }

    #[test]
    fn test_list() {
        colored::control::set_override(false);
        let (_temp, path) = course_file();
        let mut catalog = CourseCatalog::new();
        catalog.load(&path).unwrap();
        let mut out = Vec::new();

        handle_list(&catalog, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("01 Printing contains_all"));
        assert!(out.contains("02 Free play no validator"));
    }
}
