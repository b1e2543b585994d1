//! A module for parsing course data.
//!
//! Courses are authored as YAML or JSON files. Which parser is used depends on
//! the file extension: `.yml` and `.yaml` go through `serde_yaml`, everything
//! else is treated as JSON.

use std::path::Path;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::models::Course;

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("failed to open course file '{0}': {1}")]
    FileOpenError(String, String),
    #[error("invalid course format: {0}")]
    CourseFmtError(String),
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub fn load_course(path: &str) -> Result<Course, ParsingError> {
    log::debug!("Loading course from '{path}'");

    let content = std::fs::read_to_string(path).map_err(|err| {
        ParsingError::FileOpenError(path.to_string(), err.to_string())
    })?;

    let extension =
        Path::new(path).extension().and_then(|ext| ext.to_str()).unwrap_or("");

    let course = match extension {
        "yml" | "yaml" => parse_course_yaml(&content)?,
        _ => parse_course_json(&content)?,
    };

    log::debug!(
        "Loaded course '{}' with {} lessons",
        course.title,
        course.course_views.len()
    );

    Ok(course)
}

pub fn parse_course_yaml(content: &str) -> Result<Course, ParsingError> {
    Ok(serde_yaml::from_str(content)?)
}

pub fn parse_course_json(content: &str) -> Result<Course, ParsingError> {
    Ok(serde_json::from_str(content)?)
}

pub fn no_empty_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    use serde::de::Error;
    let v: Vec<T> = Deserialize::deserialize(deserializer)?;
    if v.is_empty() {
        Err(Error::custom("empty arrays are not allowed"))
    } else {
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const COURSE_YAML: &str = r#"
title: Intro to Python
course_views:
  - subject: Printing
    explanation: "Use <code>print</code> to write output."
    code_bullet_points: ["<code>print(x)</code> writes x", ""]
    goal: "Print <code>x</code>."
    instruction_bullet_points: ["Call <code>print</code>"]
    default_code: "print(CARET)"
    solution_code: "print(x)"
    ce_settings: { language: python }
    game_scene: { name: Arena }
    validator: { name: contains_all, params: ["print(x)"] }
  - subject: Variables
"#;

    #[test]
    fn test_parse_yaml_course() {
        let course = parse_course_yaml(COURSE_YAML).unwrap();

        assert_eq!(course.title, "Intro to Python");
        assert_eq!(course.course_views.len(), 2);

        let view = &course.course_views[0];
        assert_eq!(view.code_bullet_points.len(), 2);
        assert!(view.example_bullet_points.is_empty());
        assert_eq!(view.game_scene.as_ref().unwrap().name, "Arena");
        assert_eq!(view.ce_settings["language"], "python");

        let validator = view.validator.as_ref().unwrap();
        assert_eq!(validator.name, "contains_all");
        assert_eq!(validator.params, vec!["print(x)".to_string()]);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let course = parse_course_yaml(COURSE_YAML).unwrap();
        let view = &course.course_views[1];

        assert!(view.code_bullet_points.is_empty());
        assert!(view.instruction_bullet_points.is_empty());
        assert!(view.game_scene.is_none());
        assert!(view.validator.is_none());
        assert!(view.ce_settings.is_null());
    }

    #[test]
    fn test_null_bullet_points_rejected() {
        let json = r#"{
            "title": "t",
            "course_views": [{ "subject": "s", "code_bullet_points": null }]
        }"#;

        assert!(matches!(
            parse_course_json(json),
            Err(ParsingError::JsonError(_))
        ));
    }

    #[test]
    fn test_empty_course_rejected() {
        let json = r#"{ "title": "t", "course_views": [] }"#;

        let err = parse_course_json(json).unwrap_err();
        assert!(err.to_string().contains("empty arrays are not allowed"));
    }

    #[test]
    fn test_load_course_by_extension() {
        let temp = TempDir::new().unwrap();

        let path_yaml = temp.path().join("course.yml");
        fs::write(&path_yaml, COURSE_YAML).unwrap();
        let course = load_course(path_yaml.to_str().unwrap()).unwrap();
        assert_eq!(course.course_views[0].subject, "Printing");

        let path_json = temp.path().join("course.json");
        fs::write(&path_json, serde_json::to_string(&course).unwrap())
            .unwrap();
        let course_json = load_course(path_json.to_str().unwrap()).unwrap();
        assert_eq!(course, course_json);
    }

    #[test]
    fn test_load_course_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.yml");

        assert!(matches!(
            load_course(path.to_str().unwrap()),
            Err(ParsingError::FileOpenError(_, _))
        ));
    }
}
