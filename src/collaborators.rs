//! Interfaces to the parts of the viewer living outside of the lesson core.
//!
//! Each trait is a narrow view over one external subsystem. The loader owns
//! its collaborators and only ever talks to them through these.

use std::{cell::RefCell, rc::Rc};

use crate::{
    gate::Ticket,
    validator::{Validator, Verdict},
};

/// Displays the lesson goal and tracks the learner's progress through its
/// steps.
pub trait StepTracker {
    fn set_goal(&mut self, goal: String);
    fn register_steps(&mut self, steps: Vec<String>);
    fn notify_solution_shown(&mut self);
}

/// Where learner code is checked. Owns the active validator.
pub trait CodeEnvironment {
    fn apply_settings(&mut self, settings: &serde_json::Value);

    /// Installs `validator`, releasing the previous one first.
    fn install_validator(&mut self, validator: Box<dyn Validator>);

    /// Releases the active validator, if any, leaving the slot empty.
    fn release_validator(&mut self);

    /// Runs the active validator. `None` when no validator is installed.
    fn evaluate(&mut self, code: &str) -> Option<Verdict>;
}

pub trait SceneHost {
    fn setup_scene(&mut self, name: &str);
    fn configure_code_only(&mut self);
}

pub trait Modal {
    fn request_confirmation(&mut self, ticket: Ticket, message: &str);
    fn close(&mut self, ticket: Ticket);
}

/// List of lessons the learner can jump to.
pub trait LessonSelector {
    /// Drops every entry before the lessons of `course` are added.
    fn clear(&mut self, course: &str);
    fn add_entry(&mut self, index: usize, label: &str);
    fn rebuild(&mut self);
    fn refresh(&mut self);
}

// Shared handles let the owner of a collaborator keep reading its state while
// the loader drives it.

impl<T: StepTracker> StepTracker for Rc<RefCell<T>> {
    fn set_goal(&mut self, goal: String) {
        self.borrow_mut().set_goal(goal)
    }

    fn register_steps(&mut self, steps: Vec<String>) {
        self.borrow_mut().register_steps(steps)
    }

    fn notify_solution_shown(&mut self) {
        self.borrow_mut().notify_solution_shown()
    }
}

impl<T: CodeEnvironment> CodeEnvironment for Rc<RefCell<T>> {
    fn apply_settings(&mut self, settings: &serde_json::Value) {
        self.borrow_mut().apply_settings(settings)
    }

    fn install_validator(&mut self, validator: Box<dyn Validator>) {
        self.borrow_mut().install_validator(validator)
    }

    fn release_validator(&mut self) {
        self.borrow_mut().release_validator()
    }

    fn evaluate(&mut self, code: &str) -> Option<Verdict> {
        self.borrow_mut().evaluate(code)
    }
}

impl<T: SceneHost> SceneHost for Rc<RefCell<T>> {
    fn setup_scene(&mut self, name: &str) {
        self.borrow_mut().setup_scene(name)
    }

    fn configure_code_only(&mut self) {
        self.borrow_mut().configure_code_only()
    }
}

impl<T: Modal> Modal for Rc<RefCell<T>> {
    fn request_confirmation(&mut self, ticket: Ticket, message: &str) {
        self.borrow_mut().request_confirmation(ticket, message)
    }

    fn close(&mut self, ticket: Ticket) {
        self.borrow_mut().close(ticket)
    }
}

impl<T: LessonSelector> LessonSelector for Rc<RefCell<T>> {
    fn clear(&mut self, course: &str) {
        self.borrow_mut().clear(course)
    }

    fn add_entry(&mut self, index: usize, label: &str) {
        self.borrow_mut().add_entry(index, label)
    }

    fn rebuild(&mut self) {
        self.borrow_mut().rebuild()
    }

    fn refresh(&mut self) {
        self.borrow_mut().refresh()
    }
}
