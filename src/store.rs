use std::rc::Rc;

use crate::{
    models::{Course, CourseView},
    parsing::{load_course, ParsingError},
};

/// Source of course content and of the learner's current selection.
pub trait ContentStore {
    fn current_course(&self) -> Option<Rc<Course>>;

    fn current_view(&self) -> Option<&CourseView>;

    /// Selects lesson `index` of `course`. Returns `false` when the index is
    /// out of range, leaving the selection untouched.
    fn select(&mut self, course: Rc<Course>, index: usize) -> bool;

    fn index_of(&self, course: &Course, view: &CourseView) -> Option<usize> {
        course.index_of(view)
    }
}

/// Courses loaded from disk, in load order.
#[derive(Default)]
pub struct CourseCatalog {
    courses: Vec<Rc<Course>>,
    current: Option<(Rc<Course>, usize)>,
}

impl CourseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, course: Course) -> Rc<Course> {
        let course = Rc::new(course);
        self.courses.push(course.clone());
        course
    }

    pub fn load(&mut self, path: &str) -> Result<Rc<Course>, ParsingError> {
        Ok(self.insert(load_course(path)?))
    }

    pub fn courses(&self) -> impl Iterator<Item = &Rc<Course>> {
        self.courses.iter()
    }
}

impl ContentStore for CourseCatalog {
    fn current_course(&self) -> Option<Rc<Course>> {
        self.current.as_ref().map(|(course, _)| course.clone())
    }

    fn current_view(&self) -> Option<&CourseView> {
        self.current.as_ref().and_then(|(course, index)| course.view(*index))
    }

    fn select(&mut self, course: Rc<Course>, index: usize) -> bool {
        if index >= course.len() {
            log::warn!(
                "Cannot select lesson {index} of '{}': course has {} lessons",
                course.title,
                course.len()
            );
            return false;
        }

        self.current = Some((course, index));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> Course {
        Course {
            title: "Basics".to_string(),
            course_views: vec![CourseView::default(), CourseView::default()],
        }
    }

    #[test]
    fn select_in_range() {
        let mut catalog = CourseCatalog::new();
        let course = catalog.insert(course());

        assert!(catalog.current_view().is_none());
        assert!(catalog.select(course.clone(), 1));

        let current = catalog.current_course().unwrap();
        assert!(Rc::ptr_eq(&current, &course));

        let view = catalog.current_view().unwrap();
        assert_eq!(catalog.index_of(&current, view), Some(1));
    }

    #[test]
    fn select_out_of_range_keeps_selection() {
        let mut catalog = CourseCatalog::new();
        let course = catalog.insert(course());

        catalog.select(course.clone(), 0);
        assert!(!catalog.select(course.clone(), 2));
        let view = catalog.current_view().unwrap();
        assert_eq!(catalog.index_of(&course, view), Some(0));
    }

    #[test]
    fn courses_in_load_order() {
        let mut catalog = CourseCatalog::new();
        catalog.insert(course());
        catalog.insert(Course { title: "Advanced".to_string(), ..course() });

        let titles =
            catalog.courses().map(|c| c.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["Basics", "Advanced"]);
    }
}
