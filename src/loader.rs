//! Loading of lessons into the viewer.
//!
//! [CourseViewLoader] owns everything displayed for the current lesson: the
//! text panel, the code editor and, through the code environment, the active
//! validator. Loading a lesson is a [StateMachine] stepping through every part
//! of the view in a fixed order. A step that fails is reported and skipped so
//! that one bad field never prevents the rest of the lesson from showing.

use std::rc::Rc;

use itertools::Itertools;
use thiserror::Error;

use crate::{
    collaborators::{
        CodeEnvironment, LessonSelector, Modal, SceneHost, StepTracker,
    },
    constants::{PROMPT_RESET, PROMPT_SOLUTION},
    editor::CodeEditor,
    format::{CodeTagFormatter, TextFormatter},
    gate::{Answer, ConfirmationGate, Resolution, Ticket},
    models::{Course, CourseView},
    projector::{project_bullets, BulletContainer, BulletList},
    store::ContentStore,
    validator::{ValidatorError, ValidatorRegistry, Verdict},
};

pub trait StateMachine {
    fn run(self) -> Self;
    fn is_finished(&self) -> bool;
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LoadIssue {
    #[error("lesson {} is out of range, course has {len} lessons", .index + 1)]
    IndexOutOfRange { index: usize, len: usize },
    #[error("no validator referenced in '{0}', lesson cannot be completed")]
    MissingValidator(String),
    #[error("referenced validator in '{0}' is not valid: {1}")]
    InvalidValidator(String, ValidatorError),
    #[error("bullet points of '{subject}' not fully rendered in '{section}'")]
    BulletsAborted { subject: String, section: String },
}

impl LoadIssue {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::InvalidValidator(..) | Self::BulletsAborted { .. })
    }

    fn log(&self) {
        if self.is_error() {
            log::error!("{self}");
        } else {
            log::warn!("{self}");
        }
    }
}

/// Everything that went wrong while loading a lesson.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub issues: Vec<LoadIssue>,
}

impl LoadReport {
    fn push(&mut self, issue: LoadIssue) {
        issue.log();
        self.issues.push(issue);
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &LoadIssue> {
        self.issues.iter().filter(|issue| issue.is_error())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoaderState {
    Unloaded,
    Loading { index: usize },
    Loaded { index: usize },
}

/// Destructive actions which must be confirmed by the learner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GatedAction {
    ResetCode,
    ShowSolution,
}

/// Text content of the lesson, as shown next to the editor.
#[derive(Debug, Clone)]
pub struct CourseViewPanel {
    pub title: String,
    pub subject: String,
    pub explanation: String,
    pub code_desc: BulletList,
    pub examples: BulletList,
}

impl Default for CourseViewPanel {
    fn default() -> Self {
        Self {
            title: String::new(),
            subject: String::new(),
            explanation: String::new(),
            code_desc: BulletList::new("code description"),
            examples: BulletList::new("examples"),
        }
    }
}

pub struct CourseViewLoader {
    store: Option<Box<dyn ContentStore>>,
    formatter: Box<dyn TextFormatter>,
    registry: ValidatorRegistry,
    steps: Option<Box<dyn StepTracker>>,
    environment: Option<Box<dyn CodeEnvironment>>,
    scene: Option<Box<dyn SceneHost>>,
    modal: Option<Box<dyn Modal>>,
    selector: Option<Box<dyn LessonSelector>>,
    panel: CourseViewPanel,
    editor: CodeEditor,
    gate: ConfirmationGate<GatedAction>,
    state: LoaderState,
    current: Option<(Rc<Course>, usize)>,
}

impl CourseViewLoader {
    pub fn state(&self) -> LoaderState {
        self.state
    }

    pub fn panel(&self) -> &CourseViewPanel {
        &self.panel
    }

    pub fn editor(&self) -> &CodeEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut CodeEditor {
        &mut self.editor
    }

    pub fn pending_confirmation(&self) -> Option<Ticket> {
        self.gate.pending()
    }

    /// Course and index of the lesson currently displayed.
    pub fn current(&self) -> Option<(Rc<Course>, usize)> {
        self.current.clone()
    }

    fn current_view(&self) -> Option<(Rc<Course>, usize)> {
        if self.current.is_none() {
            log::error!("No current course view.");
        }
        self.current.clone()
    }

    /// Loads the lesson currently selected in the content store.
    pub fn load_current_course_view(&mut self) -> LoadReport {
        let Some(store) = self.store.as_ref() else {
            log::error!("No content store, cannot load current course view");
            return LoadReport::default();
        };

        let (Some(course), Some(view)) =
            (store.current_course(), store.current_view())
        else {
            log::error!("No current course view.");
            return LoadReport::default();
        };

        match store.index_of(&course, view) {
            Some(index) => self.load_course_view_data(course, index),
            None => {
                log::debug!("Current course view is not part of its course");
                LoadReport::default()
            }
        }
    }

    /// Selects lesson `index` of the current course and loads it.
    pub fn select_view(&mut self, index: usize) -> LoadReport {
        let Some(store) = self.store.as_mut() else {
            log::error!("No content store, cannot select lesson {index}");
            return LoadReport::default();
        };

        let Some(course) = store.current_course() else {
            log::error!("No current course, cannot select lesson {index}");
            return LoadReport::default();
        };

        if !store.select(course.clone(), index) {
            let mut report = LoadReport::default();
            report.push(LoadIssue::IndexOutOfRange { index, len: course.len() });
            return report;
        }

        self.load_course_view_data(course, index)
    }

    /// Populates the whole view with lesson `index` of `course`.
    ///
    /// An out of range index is reported and leaves the viewer untouched.
    pub fn load_course_view_data(
        &mut self,
        course: Rc<Course>,
        index: usize,
    ) -> LoadReport {
        let mut report = LoadReport::default();

        if index >= course.len() {
            report.push(LoadIssue::IndexOutOfRange { index, len: course.len() });
            return report;
        }

        log::debug!(
            "Loading lesson {index} of '{}': {}",
            course.title,
            course.course_views[index].subject
        );

        self.state = LoaderState::Loading { index };

        let mut load = ViewLoad {
            loader: self,
            course: course.clone(),
            index,
            step: LoadStep::Title,
            report,
        };

        while !load.is_finished() {
            load = load.run();
        }

        let ViewLoad { report, .. } = load;

        self.current = Some((course, index));
        self.state = LoaderState::Loaded { index };

        report
    }

    pub fn load_current_default_code(&mut self) {
        if let Some((course, index)) = self.current_view() {
            self.editor.load_default(&course.course_views[index]);
        }
    }

    pub fn load_current_solution_code(&mut self) {
        if let Some((course, index)) = self.current_view() {
            self.editor.load_solution(&course.course_views[index]);
        }
    }

    /// Asks the learner before restoring the starter code.
    pub fn reset_code(&mut self) -> Option<Ticket> {
        self.request_confirmation(GatedAction::ResetCode, PROMPT_RESET)
    }

    /// Asks the learner before overwriting their code with the solution.
    pub fn show_solution(&mut self) -> Option<Ticket> {
        self.request_confirmation(GatedAction::ShowSolution, PROMPT_SOLUTION)
    }

    fn request_confirmation(
        &mut self,
        action: GatedAction,
        message: &str,
    ) -> Option<Ticket> {
        let Some(modal) = self.modal.as_mut() else {
            log::error!("No modal panel, cannot confirm {action:?}");
            return None;
        };

        let (ticket, superseded) = self.gate.request(action);
        if let Some(old) = superseded {
            modal.close(old);
        }
        modal.request_confirmation(ticket, message);

        Some(ticket)
    }

    /// Feeds the learner's answer to confirmation `ticket` back in.
    pub fn answer(&mut self, ticket: Ticket, answer: Answer) {
        let resolution = self.gate.resolve(ticket, answer);

        if resolution != Resolution::Stale {
            if let Some(modal) = self.modal.as_mut() {
                modal.close(ticket);
            }
        }

        match resolution {
            Resolution::Confirmed(GatedAction::ResetCode) => {
                self.load_current_default_code();
            }
            Resolution::Confirmed(GatedAction::ShowSolution) => {
                self.load_current_solution_code();
                if let Some(steps) = self.steps.as_mut() {
                    steps.notify_solution_shown();
                }
            }
            Resolution::Declined(action) => {
                log::debug!("{action:?} declined");
            }
            Resolution::Stale => {}
        }
    }

    /// Runs the lesson validator against the editor's code.
    pub fn check(&mut self) -> Verdict {
        let verdict = self
            .environment
            .as_mut()
            .and_then(|environment| environment.evaluate(self.editor.text()));

        match verdict {
            Some(verdict) => {
                log::debug!("Validation verdict: {verdict:?}");
                verdict
            }
            None => {
                log::warn!("No validator installed, lesson cannot be completed");
                Verdict::Pending
            }
        }
    }

    /// Refreshes the state of the lesson selector entries.
    pub fn refresh_selector(&mut self) {
        if let Some(selector) = self.selector.as_mut() {
            selector.refresh();
        }
    }

    /// Tears down the current lesson, releasing its validator.
    pub fn unload(&mut self) {
        if let Some(environment) = self.environment.as_mut() {
            environment.release_validator();
        }

        if let Some(ticket) = self.gate.pending() {
            self.gate.resolve(ticket, Answer::Dismissed);
            if let Some(modal) = self.modal.as_mut() {
                modal.close(ticket);
            }
        }

        self.editor = CodeEditor::new();
        self.current = None;
        self.state = LoaderState::Unloaded;
    }

    fn project_title(&mut self, course: &Course, index: usize) {
        self.panel.title = format!("{:02}  {}", index + 1, course.title);
    }

    fn project_content(&mut self, view: &CourseView) {
        self.panel.subject = view.subject.clone();
        self.panel.explanation = self.formatter.format(&view.explanation);
    }

    fn project_section(
        container: &mut BulletList,
        fragments: &[String],
        formatter: &dyn TextFormatter,
        subject: &str,
        report: &mut LoadReport,
    ) {
        container.clear();

        if project_bullets(fragments, container, formatter).aborted {
            report.push(LoadIssue::BulletsAborted {
                subject: subject.to_string(),
                section: container.name().to_string(),
            });
        }
    }

    fn load_default_code(&mut self, view: &CourseView) {
        self.editor = CodeEditor::new();
        self.editor.load_default(view);
    }

    fn load_instructions(&mut self, view: &CourseView) {
        let Some(steps) = self.steps.as_mut() else {
            return;
        };

        steps.set_goal(self.formatter.format(&view.goal));
        steps.register_steps(
            view.instruction_bullet_points
                .iter()
                .map(|step| self.formatter.format(step))
                .collect(),
        );
    }

    fn load_settings(&mut self, view: &CourseView) {
        if let Some(environment) = self.environment.as_mut() {
            environment.apply_settings(&view.ce_settings);
        }
    }

    fn load_validator(&mut self, view: &CourseView, report: &mut LoadReport) {
        if let Some(environment) = self.environment.as_mut() {
            environment.release_validator();
        }

        let Some(reference) = &view.validator else {
            report.push(LoadIssue::MissingValidator(view.subject.clone()));
            return;
        };

        let mut validator = match self.registry.resolve(reference, view) {
            Ok(validator) => validator,
            Err(err) => {
                report.push(LoadIssue::InvalidValidator(view.subject.clone(), err));
                return;
            }
        };

        match self.environment.as_mut() {
            Some(environment) => {
                log::debug!("Installing validator '{}'", validator.name());
                environment.install_validator(validator);
            }
            None => {
                log::debug!(
                    "No code environment, dropping validator '{}'",
                    validator.name()
                );
                validator.release();
            }
        }
    }

    fn load_scene(&mut self, view: &CourseView) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };

        match &view.game_scene {
            Some(game_scene) => scene.setup_scene(&game_scene.name),
            None => scene.configure_code_only(),
        }
    }

    fn load_selector(&mut self, course: &Course) {
        let Some(selector) = self.selector.as_mut() else {
            return;
        };

        selector.clear(&course.title);
        for (index, view) in course.course_views.iter().enumerate() {
            selector.add_entry(index, &view.subject);
        }
        selector.rebuild();
    }
}

impl Drop for CourseViewLoader {
    fn drop(&mut self) {
        if let Some(environment) = self.environment.as_mut() {
            environment.release_validator();
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoadStep {
    Title,
    Content,
    CodeBullets,
    ExampleBullets,
    DefaultCode,
    Instructions,
    Settings,
    Validator,
    Scene,
    Selector,
    Finish,
}

impl LoadStep {
    fn next(self) -> Self {
        match self {
            Self::Title => Self::Content,
            Self::Content => Self::CodeBullets,
            Self::CodeBullets => Self::ExampleBullets,
            Self::ExampleBullets => Self::DefaultCode,
            Self::DefaultCode => Self::Instructions,
            Self::Instructions => Self::Settings,
            Self::Settings => Self::Validator,
            Self::Validator => Self::Scene,
            Self::Scene => Self::Selector,
            Self::Selector | Self::Finish => Self::Finish,
        }
    }
}

struct ViewLoad<'a> {
    loader: &'a mut CourseViewLoader,
    course: Rc<Course>,
    index: usize,
    step: LoadStep,
    report: LoadReport,
}

impl StateMachine for ViewLoad<'_> {
    fn run(self) -> Self {
        let Self { loader, course, index, step, mut report } = self;
        let view = &course.course_views[index];

        match step {
            LoadStep::Title => loader.project_title(&course, index),
            LoadStep::Content => loader.project_content(view),
            LoadStep::CodeBullets => CourseViewLoader::project_section(
                &mut loader.panel.code_desc,
                &view.code_bullet_points,
                loader.formatter.as_ref(),
                &view.subject,
                &mut report,
            ),
            LoadStep::ExampleBullets => CourseViewLoader::project_section(
                &mut loader.panel.examples,
                &view.example_bullet_points,
                loader.formatter.as_ref(),
                &view.subject,
                &mut report,
            ),
            LoadStep::DefaultCode => loader.load_default_code(view),
            LoadStep::Instructions => loader.load_instructions(view),
            LoadStep::Settings => loader.load_settings(view),
            LoadStep::Validator => loader.load_validator(view, &mut report),
            LoadStep::Scene => loader.load_scene(view),
            LoadStep::Selector => loader.load_selector(&course),
            LoadStep::Finish => {}
        }

        Self { loader, course, index, step: step.next(), report }
    }

    fn is_finished(&self) -> bool {
        self.step == LoadStep::Finish
    }
}

/// Builds a [CourseViewLoader] from its collaborators.
///
/// Collaborators left out are reported when building; the features depending
/// on them are then skipped on every load.
pub struct CourseViewLoaderBuilder {
    store: Option<Box<dyn ContentStore>>,
    formatter: Box<dyn TextFormatter>,
    registry: ValidatorRegistry,
    steps: Option<Box<dyn StepTracker>>,
    environment: Option<Box<dyn CodeEnvironment>>,
    scene: Option<Box<dyn SceneHost>>,
    modal: Option<Box<dyn Modal>>,
    selector: Option<Box<dyn LessonSelector>>,
    panel: CourseViewPanel,
}

impl CourseViewLoaderBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            formatter: Box::new(CodeTagFormatter::default()),
            registry: ValidatorRegistry::new(),
            steps: None,
            environment: None,
            scene: None,
            modal: None,
            selector: None,
            panel: CourseViewPanel::default(),
        }
    }

    pub fn store<S: ContentStore + 'static>(mut self, store: S) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn formatter<F: TextFormatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    #[cfg(test)]
    pub fn registry(mut self, registry: ValidatorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn steps<T: StepTracker + 'static>(mut self, steps: T) -> Self {
        self.steps = Some(Box::new(steps));
        self
    }

    pub fn environment<E: CodeEnvironment + 'static>(
        mut self,
        environment: E,
    ) -> Self {
        self.environment = Some(Box::new(environment));
        self
    }

    pub fn scene<S: SceneHost + 'static>(mut self, scene: S) -> Self {
        self.scene = Some(Box::new(scene));
        self
    }

    pub fn modal<M: Modal + 'static>(mut self, modal: M) -> Self {
        self.modal = Some(Box::new(modal));
        self
    }

    pub fn selector<L: LessonSelector + 'static>(mut self, selector: L) -> Self {
        self.selector = Some(Box::new(selector));
        self
    }

    #[cfg(test)]
    pub fn panel(mut self, panel: CourseViewPanel) -> Self {
        self.panel = panel;
        self
    }

    pub fn build(self) -> CourseViewLoader {
        let Self {
            store,
            formatter,
            registry,
            steps,
            environment,
            scene,
            modal,
            selector,
            panel,
        } = self;

        let missing = [
            ("content store", store.is_none()),
            ("step tracker", steps.is_none()),
            ("code environment", environment.is_none()),
            ("scene host", scene.is_none()),
            ("modal panel", modal.is_none()),
            ("lesson selector", selector.is_none()),
        ];
        for (name, _) in missing.iter().filter(|(_, missing)| *missing) {
            log::error!("No {name} referenced");
        }
        log::debug!("Validators available: {}", registry.names().join(", "));

        CourseViewLoader {
            store,
            formatter,
            registry,
            steps,
            environment,
            scene,
            modal,
            selector,
            panel,
            editor: CodeEditor::new(),
            gate: ConfirmationGate::new(),
            state: LoaderState::Unloaded,
            current: None,
        }
    }
}

impl Default for CourseViewLoaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
