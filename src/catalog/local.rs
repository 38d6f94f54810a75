//! In-memory catalog snapshot.

use std::collections::HashMap;

use crate::catalog::dataset::Dataset;
use crate::catalog::directory::SubjectDirectory;
use crate::model::{Course, SubjectCode, Term};

/// A frozen view of one dataset: the subject directory plus a course index
/// keyed by (term, subject).
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    directory: SubjectDirectory,
    courses: HashMap<(Term, SubjectCode), Vec<Course>>,
    course_count: usize,
}

impl CatalogSnapshot {
    /// Index a validated dataset.
    pub fn from_dataset(dataset: Dataset) -> Self {
        let directory = SubjectDirectory::from_dataset(&dataset);
        let course_count = dataset.courses.len();

        let mut courses: HashMap<(Term, SubjectCode), Vec<Course>> = HashMap::new();
        for course in dataset.courses {
            courses
                .entry((course.term, course.subject.clone()))
                .or_default()
                .push(course);
        }
        for list in courses.values_mut() {
            list.sort_by(|a, b| a.number.cmp(&b.number));
        }

        Self {
            directory,
            courses,
            course_count,
        }
    }

    pub fn directory(&self) -> &SubjectDirectory {
        &self.directory
    }

    /// Courses for `term` under `subject`, ordered by catalog number.
    /// No match is an empty list.
    pub fn select_courses(&self, term: Term, subject: &SubjectCode) -> Vec<Course> {
        self.courses
            .get(&(term, subject.clone()))
            .cloned()
            .unwrap_or_default()
    }

    pub fn course_count(&self) -> usize {
        self.course_count
    }
}
