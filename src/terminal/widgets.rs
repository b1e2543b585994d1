//! Plain-text stand-ins for the viewer's widgets.
//!
//! Each widget only records what the loader tells it; the [super::Session]
//! decides when to print it.

use std::collections::{BTreeMap, HashSet};

use colored::Colorize;

use crate::{
    collaborators::{
        CodeEnvironment, LessonSelector, Modal, SceneHost, StepTracker,
    },
    gate::Ticket,
    str_res::CODE_ONLY,
    validator::{Validator, Verdict},
};

#[derive(Debug, Default)]
pub struct Instructions {
    pub goal: String,
    pub steps: Vec<String>,
    pub solution_shown: bool,
}

impl StepTracker for Instructions {
    fn set_goal(&mut self, goal: String) {
        self.goal = goal;
        self.solution_shown = false;
    }

    fn register_steps(&mut self, steps: Vec<String>) {
        self.steps = steps;
    }

    fn notify_solution_shown(&mut self) {
        log::debug!("Solution shown for goal '{}'", self.goal);
        self.solution_shown = true;
    }
}

impl Instructions {
    pub fn render(&self) -> String {
        let mut out = format!("🎯 {}", self.goal.bold());

        for (i, step) in self.steps.iter().enumerate() {
            out.push_str(&format!("\n  {}. {step}", i + 1));
        }

        if self.solution_shown {
            out.push_str(&format!("\n  {}", "(solution shown)".yellow()));
        }

        out
    }
}

/// Code environment holding the lesson's validator. Learner code is never run,
/// only handed to the validator.
#[derive(Default)]
pub struct Console {
    pub settings: serde_json::Value,
    validator: Option<Box<dyn Validator>>,
}

impl Console {
    pub fn validator_name(&self) -> Option<&str> {
        self.validator.as_ref().map(|validator| validator.name())
    }

    pub fn render(&self) -> String {
        let language = self
            .settings
            .get("language")
            .and_then(|language| language.as_str())
            .unwrap_or("plain text");

        match self.validator_name() {
            Some(name) => format!("[{language}] validated by {name}"),
            None => format!("[{language}] {}", "no validator".red()),
        }
    }
}

impl CodeEnvironment for Console {
    fn apply_settings(&mut self, settings: &serde_json::Value) {
        log::debug!("Applying code environment settings: {settings}");
        self.settings = settings.clone();
    }

    fn install_validator(&mut self, validator: Box<dyn Validator>) {
        self.release_validator();
        self.validator = Some(validator);
    }

    fn release_validator(&mut self) {
        if let Some(mut validator) = self.validator.take() {
            log::debug!("Releasing validator '{}'", validator.name());
            validator.release();
        }
    }

    fn evaluate(&mut self, code: &str) -> Option<Verdict> {
        self.validator.as_mut().map(|validator| validator.evaluate(code))
    }
}

#[derive(Debug, Default)]
pub struct GameView {
    pub scene: Option<String>,
}

impl SceneHost for GameView {
    fn setup_scene(&mut self, name: &str) {
        log::debug!("Setting up game scene '{name}'");
        self.scene = Some(name.to_string());
    }

    fn configure_code_only(&mut self) {
        self.scene = None;
    }
}

impl GameView {
    pub fn render(&self) -> String {
        match &self.scene {
            Some(scene) => format!("🎮 scene: {}", scene.white().bold()),
            None => CODE_ONLY.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ModalPanel {
    pub open: Option<(Ticket, String)>,
}

impl Modal for ModalPanel {
    fn request_confirmation(&mut self, ticket: Ticket, message: &str) {
        self.open = Some((ticket, message.to_string()));
    }

    fn close(&mut self, ticket: Ticket) {
        if matches!(self.open, Some((open, _)) if open == ticket) {
            self.open = None;
        }
    }
}

impl ModalPanel {
    pub fn render(&self) -> Option<String> {
        self.open.as_ref().map(|(_, message)| {
            format!("❓ {} {}", message.yellow().bold(), "[yes/no]".dimmed())
        })
    }
}

/// Lesson list, with completed lessons ticked. Ticks belong to one course and
/// are forgotten when another course is listed.
#[derive(Debug, Default)]
pub struct CourseViewDropdown {
    course: Option<String>,
    entries: BTreeMap<usize, String>,
    completed: HashSet<usize>,
    lines: Vec<String>,
}

impl CourseViewDropdown {
    pub fn mark_completed(&mut self, index: usize) {
        self.completed.insert(index);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn render_lines(&mut self) {
        self.lines = self
            .entries
            .iter()
            .map(|(index, label)| {
                let marker = if self.completed.contains(index) {
                    "✔".green().to_string()
                } else {
                    "•".dimmed().to_string()
                };
                format!("{marker} {:02} {label}", index + 1)
            })
            .collect();
    }
}

impl LessonSelector for CourseViewDropdown {
    fn clear(&mut self, course: &str) {
        if self.course.as_deref() != Some(course) {
            log::debug!("Listing lessons of '{course}'");
            self.completed.clear();
            self.course = Some(course.to_string());
        }

        self.entries.clear();
        self.lines.clear();
    }

    fn add_entry(&mut self, index: usize, label: &str) {
        self.entries.insert(index, label.to_string());
    }

    fn rebuild(&mut self) {
        self.render_lines();
    }

    fn refresh(&mut self) {
        self.render_lines();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(dropdown: &mut CourseViewDropdown, course: &str, labels: &[&str]) {
        dropdown.clear(course);
        for (index, label) in labels.iter().enumerate() {
            dropdown.add_entry(index, label);
        }
        dropdown.rebuild();
    }

    #[test]
    fn shorter_course_replaces_entries() {
        colored::control::set_override(false);
        let mut dropdown = CourseViewDropdown::default();

        list(&mut dropdown, "Long", &["b0", "a1", "a2", "a3"]);
        dropdown.mark_completed(0);
        dropdown.mark_completed(2);
        dropdown.refresh();
        assert_eq!(dropdown.lines()[2], "✔ 03 a2");

        list(&mut dropdown, "Short", &["c0"]);

        assert_eq!(dropdown.len(), 1);
        assert_eq!(dropdown.lines(), &["• 01 c0"]);
    }

    #[test]
    fn same_course_keeps_completion() {
        colored::control::set_override(false);
        let mut dropdown = CourseViewDropdown::default();

        list(&mut dropdown, "Intro", &["a", "b"]);
        dropdown.mark_completed(1);
        list(&mut dropdown, "Intro", &["a", "b"]);

        assert_eq!(dropdown.lines(), &["• 01 a", "✔ 02 b"]);
    }
}
