//! School and subject directory.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::CatalogError;
use crate::catalog::dataset::Dataset;
use crate::model::SubjectCode;
use crate::model::subject::normalize;

/// Immutable index of schools and the subjects they own.
#[derive(Debug, Clone, Default)]
pub struct SubjectDirectory {
    schools: BTreeMap<String, Vec<SubjectCode>>,
}

impl SubjectDirectory {
    /// Build from a validated dataset.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut schools = BTreeMap::new();
        for record in &dataset.schools {
            let mut subjects: Vec<SubjectCode> = record
                .subjects
                .iter()
                .map(|s| SubjectCode::new(&s.code, &record.code))
                .collect();
            subjects.sort();
            subjects.dedup();

            schools.insert(normalize(&record.code), subjects);
        }
        Self { schools }
    }

    /// Every known school code.
    pub fn all_schools(&self) -> BTreeSet<String> {
        self.schools.keys().cloned().collect()
    }

    /// Subjects across all schools, or only those of `school` when given.
    ///
    /// Ordered by school, then subject. An unknown school is an error rather
    /// than an empty list.
    pub fn all_subjects(&self, school: Option<&str>) -> Result<Vec<SubjectCode>, CatalogError> {
        match school {
            None => Ok(self
                .schools
                .values()
                .flat_map(|subjects| subjects.iter().cloned())
                .collect()),
            Some(code) => self
                .schools
                .get(&normalize(code))
                .cloned()
                .ok_or_else(|| CatalogError::UnknownSchool(code.to_string())),
        }
    }
}
