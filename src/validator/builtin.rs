use regex::Regex;
use strum_macros::{Display, EnumIter};

use crate::models::{CourseView, ValidatorRef};

use super::{Validator, ValidatorError, ValidatorFactory, Verdict};

/// Validators available to every course.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum BuiltinValidator {
    MatchSolution,
    ContainsAll,
    MatchesPattern,
    Never,
}

impl BuiltinValidator {
    pub fn factory(self) -> ValidatorFactory {
        match self {
            Self::MatchSolution => MatchSolution::build,
            Self::ContainsAll => ContainsAll::build,
            Self::MatchesPattern => MatchesPattern::build,
            Self::Never => Never::build,
        }
    }
}

/// Trims trailing whitespace on every line and at the end of the text, and
/// normalizes line endings.
fn normalize(code: &str) -> String {
    code.replace("\r\n", "\n")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

pub struct MatchSolution {
    expected: String,
}

impl MatchSolution {
    fn build(
        _: &ValidatorRef,
        view: &CourseView,
    ) -> Result<Box<dyn Validator>, ValidatorError> {
        Ok(Box::new(Self { expected: normalize(&view.solution_code) }))
    }
}

impl Validator for MatchSolution {
    fn name(&self) -> &str {
        "match_solution"
    }

    fn evaluate(&mut self, code: &str) -> Verdict {
        if normalize(code) == self.expected {
            Verdict::Pass
        } else {
            Verdict::Fail("code does not match the expected solution".into())
        }
    }
}

pub struct ContainsAll {
    needles: Vec<String>,
}

impl ContainsAll {
    fn build(
        reference: &ValidatorRef,
        _: &CourseView,
    ) -> Result<Box<dyn Validator>, ValidatorError> {
        if reference.params.is_empty() {
            return Err(ValidatorError::InvalidParams(
                reference.name.clone(),
                "expected at least one string to look for".to_string(),
            ));
        }

        Ok(Box::new(Self { needles: reference.params.clone() }))
    }
}

impl Validator for ContainsAll {
    fn name(&self) -> &str {
        "contains_all"
    }

    fn evaluate(&mut self, code: &str) -> Verdict {
        match self.needles.iter().find(|needle| !code.contains(needle.as_str()))
        {
            Some(missing) => Verdict::Fail(format!("missing '{missing}'")),
            None => Verdict::Pass,
        }
    }
}

pub struct MatchesPattern {
    pattern: Regex,
}

impl MatchesPattern {
    fn build(
        reference: &ValidatorRef,
        _: &CourseView,
    ) -> Result<Box<dyn Validator>, ValidatorError> {
        let invalid = |reason: String| {
            ValidatorError::InvalidParams(reference.name.clone(), reason)
        };

        let source = reference
            .params
            .first()
            .ok_or_else(|| invalid("expected a regular expression".into()))?;
        let pattern = Regex::new(source).map_err(|e| invalid(e.to_string()))?;

        Ok(Box::new(Self { pattern }))
    }
}

impl Validator for MatchesPattern {
    fn name(&self) -> &str {
        "matches_pattern"
    }

    fn evaluate(&mut self, code: &str) -> Verdict {
        if self.pattern.is_match(code) {
            Verdict::Pass
        } else {
            Verdict::Fail(format!("code does not match /{}/", self.pattern))
        }
    }
}

/// Nothing to check: the lesson stays pending forever.
pub struct Never;

impl Never {
    fn build(
        _: &ValidatorRef,
        _: &CourseView,
    ) -> Result<Box<dyn Validator>, ValidatorError> {
        Ok(Box::new(Self))
    }
}

impl Validator for Never {
    fn name(&self) -> &str {
        "never"
    }

    fn evaluate(&mut self, _code: &str) -> Verdict {
        Verdict::Pending
    }
}
