//! Lesson validators and the registry used to resolve them by name.
//!
//! A lesson refers to its validator by name. Names are mapped to factory
//! functions in a [ValidatorRegistry], which is seeded with every
//! [BuiltinValidator] and can be extended with lesson-specific validators.

use indexmap::IndexMap;
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::models::{CourseView, ValidatorRef};

pub use self::builtin::BuiltinValidator;

pub mod builtin;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidatorError {
    #[error("no validator registered under the name '{0}'")]
    Unresolved(String),
    #[error("invalid parameters for validator '{0}': {1}")]
    InvalidParams(String, String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Pending,
    Pass,
    Fail(String),
}

/// Judges whether the learner's code satisfies a lesson's goal.
pub trait Validator {
    fn name(&self) -> &str;

    fn evaluate(&mut self, code: &str) -> Verdict;

    /// Frees any resource held by the validator. Called exactly once, before
    /// the validator is dropped by its environment.
    fn release(&mut self) {}
}

pub type ValidatorFactory = fn(
    &ValidatorRef,
    &CourseView,
) -> Result<Box<dyn Validator>, ValidatorError>;

pub struct ValidatorRegistry {
    factories: IndexMap<String, ValidatorFactory>,
}

impl ValidatorRegistry {
    pub fn empty() -> Self {
        Self { factories: IndexMap::new() }
    }

    /// A registry holding all built-in validators.
    pub fn new() -> Self {
        BuiltinValidator::iter().fold(Self::empty(), |mut acc, builtin| {
            acc.register(&builtin.to_string(), builtin.factory());
            acc
        })
    }

    /// Registers `factory` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &str, factory: ValidatorFactory) {
        if self.factories.insert(name.to_string(), factory).is_some() {
            log::warn!("Validator '{name}' registered twice, keeping the last");
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(|k| k.as_str())
    }

    pub fn resolve(
        &self,
        reference: &ValidatorRef,
        view: &CourseView,
    ) -> Result<Box<dyn Validator>, ValidatorError> {
        let factory = self
            .factories
            .get(&reference.name)
            .ok_or_else(|| ValidatorError::Unresolved(reference.name.clone()))?;

        factory(reference, view)
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysPass;

    impl Validator for AlwaysPass {
        fn name(&self) -> &str {
            "always_pass"
        }

        fn evaluate(&mut self, _code: &str) -> Verdict {
            Verdict::Pass
        }
    }

    fn always_pass(
        _: &ValidatorRef,
        _: &CourseView,
    ) -> Result<Box<dyn Validator>, ValidatorError> {
        Ok(Box::new(AlwaysPass))
    }

    #[test]
    fn seeded_with_builtins() {
        let registry = ValidatorRegistry::new();

        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["match_solution", "contains_all", "matches_pattern", "never"]
        );
    }

    #[test]
    fn resolves_registered_name() {
        let mut registry = ValidatorRegistry::empty();
        registry.register("always_pass", always_pass);

        let mut validator = registry
            .resolve(&ValidatorRef::new("always_pass"), &CourseView::default())
            .unwrap();

        assert_eq!(validator.name(), "always_pass");
        assert_eq!(validator.evaluate(""), Verdict::Pass);
    }

    #[test]
    fn unknown_name_is_unresolved() {
        let registry = ValidatorRegistry::new();

        let err = registry
            .resolve(&ValidatorRef::new("NoSuchValidator"), &CourseView::default())
            .err();

        assert_eq!(
            err,
            Some(ValidatorError::Unresolved("NoSuchValidator".to_string()))
        );
    }
}
