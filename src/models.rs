use serde::{Deserialize, Serialize};

use crate::parsing::no_empty_vec;

/// A course. This is an ordered list of lessons, the order of which is the
/// sequence in which they are meant to be followed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub title: String,
    #[serde(deserialize_with = "no_empty_vec")]
    pub course_views: Vec<CourseView>,
}

impl Course {
    /// Position of `view` in this course. Identity is checked first so that a
    /// view borrowed from this course always maps back to its own slot, even
    /// when two lessons happen to hold identical content.
    pub fn index_of(&self, view: &CourseView) -> Option<usize> {
        self.course_views
            .iter()
            .position(|v| std::ptr::eq(v, view))
            .or_else(|| self.course_views.iter().position(|v| v == view))
    }

    pub fn view(&self, index: usize) -> Option<&CourseView> {
        self.course_views.get(index)
    }

    pub fn len(&self) -> usize {
        self.course_views.len()
    }
}

/// A single lesson: everything needed to populate the viewer for one exercise.
///
/// Text fields other than `subject`, `default_code` and `solution_code` may
/// contain inline `<code>` tags, see [crate::format].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseView {
    pub subject: String,
    pub explanation: String,
    pub code_bullet_points: Vec<String>,
    pub example_bullet_points: Vec<String>,
    pub goal: String,
    pub instruction_bullet_points: Vec<String>,
    pub default_code: String,
    pub solution_code: String,
    pub ce_settings: serde_json::Value,
    pub game_scene: Option<SceneRef>,
    pub validator: Option<ValidatorRef>,
}

/// Interactive scene accompanying a lesson.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneRef {
    pub name: String,
}

/// Name of the validator required to complete a lesson, along with any
/// arguments its factory expects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorRef {
    pub name: String,
    #[serde(default)]
    pub params: Vec<String>,
}

#[cfg(test)]
impl ValidatorRef {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), params: vec![] }
    }

    pub fn with_params(name: &str, params: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> Course {
        Course {
            title: "Basics".to_string(),
            course_views: vec![
                CourseView { subject: "a".to_string(), ..Default::default() },
                CourseView { subject: "b".to_string(), ..Default::default() },
                CourseView { subject: "a".to_string(), ..Default::default() },
            ],
        }
    }

    #[test]
    fn index_of_prefers_identity() {
        let course = course();

        assert_eq!(course.index_of(&course.course_views[2]), Some(2));
        assert_eq!(course.index_of(&course.course_views[1]), Some(1));
    }

    #[test]
    fn index_of_falls_back_to_equality() {
        let course = course();
        let copy = course.course_views[1].clone();

        assert_eq!(course.index_of(&copy), Some(1));
    }

    #[test]
    fn index_of_not_found() {
        let course = course();
        let stranger =
            CourseView { subject: "z".to_string(), ..Default::default() };

        assert_eq!(course.index_of(&stranger), None);
    }
}
