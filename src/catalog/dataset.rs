//! Reference dataset loading and validation.
//!
//! A dataset is a TOML or JSON document listing schools (with their subjects)
//! and the courses offered per term. The format is picked from the file
//! extension.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Course, Meeting, SubjectCode};
use crate::model::subject::normalize;

const BUILTIN: &str = include_str!("../../data/catalog.toml");

/// Errors raised while loading a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported dataset format for {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("dataset failed validation: {}", join_issues(.0))]
    Invalid(Vec<DatasetIssue>),
}

/// A single semantic problem in a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetIssue {
    #[error("dataset defines no schools")]
    NoSchools,

    #[error("school {0} is defined more than once")]
    DuplicateSchool(String),

    #[error("subject {0} is defined more than once")]
    DuplicateSubject(SubjectCode),

    #[error("course {course} references unknown subject {subject}")]
    UnknownSubject { course: String, subject: SubjectCode },

    #[error("section {section} of course {course} has a meeting ending before it starts")]
    MeetingEndsBeforeStart { course: String, section: String },
}

fn join_issues(issues: &[DatasetIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Raw catalog contents as read from disk.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Dataset {
    #[serde(default)]
    pub schools: Vec<SchoolRecord>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchoolRecord {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub subjects: Vec<SubjectRecord>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubjectRecord {
    pub code: String,
    #[serde(default)]
    pub name: String,
}

impl Dataset {
    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self, DatasetError> {
        Self::from_toml_str(BUILTIN)
    }

    /// Load and validate a dataset file.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(DatasetError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, DatasetError> {
        let dataset: Dataset = toml::from_str(content)?;
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn from_json_str(content: &str) -> Result<Self, DatasetError> {
        let dataset: Dataset = serde_json::from_str(content)?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Every subject code the dataset defines, in declaration order.
    pub fn subject_codes(&self) -> impl Iterator<Item = SubjectCode> + '_ {
        self.schools.iter().flat_map(|school| {
            school
                .subjects
                .iter()
                .map(move |subject| SubjectCode::new(&subject.code, &school.code))
        })
    }

    /// Semantic checks. Collects every issue rather than stopping at the first.
    pub fn validate(&self) -> Result<(), DatasetError> {
        let mut issues = Vec::new();

        if self.schools.is_empty() {
            issues.push(DatasetIssue::NoSchools);
        }

        let mut schools = HashSet::new();
        for school in &self.schools {
            let code = normalize(&school.code);
            if !schools.insert(code.clone()) {
                issues.push(DatasetIssue::DuplicateSchool(code));
            }
        }

        let mut subjects = HashSet::new();
        for subject in self.subject_codes() {
            if subjects.contains(&subject) {
                issues.push(DatasetIssue::DuplicateSubject(subject));
            } else {
                subjects.insert(subject);
            }
        }

        for course in &self.courses {
            let label = format!("{} {} ({})", course.subject, course.number, course.term);
            if !subjects.contains(&course.subject) {
                issues.push(DatasetIssue::UnknownSubject {
                    course: label.clone(),
                    subject: course.subject.clone(),
                });
            }
            for section in &course.sections {
                if !section.meetings.iter().all(Meeting::ends_after_start) {
                    issues.push(DatasetIssue::MeetingEndsBeforeStart {
                        course: label.clone(),
                        section: section.code.clone(),
                    });
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(DatasetError::Invalid(issues))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_dataset_is_valid() {
        let dataset = Dataset::builtin().unwrap();
        assert!(dataset.schools.len() >= 2);
        assert!(!dataset.courses.is_empty());
    }

    #[test]
    fn test_json_dataset() {
        let json = r#"{
            "schools": [{"code": "eng", "subjects": [{"code": "cs"}]}],
            "courses": [{"term": 1194, "school": "ENG", "subject": "CS", "number": "1", "name": "Intro"}]
        }"#;
        let dataset = Dataset::from_json_str(json).unwrap();
        assert_eq!(dataset.courses[0].subject, SubjectCode::new("CS", "ENG"));
        assert_eq!(dataset.subject_codes().collect::<Vec<_>>(), vec![SubjectCode::new("CS", "ENG")]);
    }

    #[test]
    fn test_collects_all_issues() {
        let toml = r#"
            [[schools]]
            code = "ENG"
            subjects = [{ code = "CS" }, { code = "cs" }]

            [[schools]]
            code = "eng"

            [[courses]]
            term = 1194
            school = "ART"
            subject = "MUS"
            number = "1"
            name = "Orphan"

            [[courses]]
            term = 1194
            school = "ENG"
            subject = "CS"
            number = "2"
            name = "Backwards"
            [[courses.sections]]
            registration_number = 1
            code = "A"
            meetings = [{ days = "M", start = "10:00", end = "09:00" }]
        "#;

        match Dataset::from_toml_str(toml) {
            Err(DatasetError::Invalid(issues)) => {
                assert_eq!(issues.len(), 4, "{:?}", issues);
                assert!(issues.contains(&DatasetIssue::DuplicateSchool("ENG".into())));
                assert!(issues.contains(&DatasetIssue::DuplicateSubject(SubjectCode::new("CS", "ENG"))));
                assert!(issues.iter().any(|i| matches!(i, DatasetIssue::UnknownSubject { .. })));
                assert!(issues.iter().any(|i| matches!(i, DatasetIssue::MeetingEndsBeforeStart { .. })));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_term_is_a_parse_error() {
        let toml = r#"
            [[schools]]
            code = "ENG"
            subjects = [{ code = "CS" }]

            [[courses]]
            term = 1199
            school = "ENG"
            subject = "CS"
            number = "1"
            name = "Bad term"
        "#;
        assert!(matches!(Dataset::from_toml_str(toml), Err(DatasetError::Toml(_))));
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        match Dataset::from_toml_str("") {
            Err(DatasetError::Invalid(issues)) => assert_eq!(issues, vec![DatasetIssue::NoSchools]),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_load_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"schools": [{{"code": "ART", "subjects": [{{"code": "MUS"}}]}}]}}"#).unwrap();
        let dataset = Dataset::load(file.path()).unwrap();
        assert_eq!(dataset.schools[0].code, "ART");

        let other = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        assert!(matches!(
            Dataset::load(other.path()),
            Err(DatasetError::UnsupportedFormat(_))
        ));

        assert!(matches!(
            Dataset::load(Path::new("/nonexistent/catalog.toml")),
            Err(DatasetError::Io { .. })
        ));
    }
}
