//! Catalog subsystem: subject directory and course lookup.
//!
//! # Data Flow
//! ```text
//! data file (TOML/JSON) or built-in dataset
//!     → dataset.rs   (parse + semantic validation)
//!     → local.rs     (CatalogSnapshot: directory + course index)
//!     → ArcSwap<CatalogSnapshot>, one immutable snapshot per request
//!
//! select_courses:
//!     upstream configured?  → remote.rs (HTTP, Unavailable on failure)
//!     otherwise             → snapshot course index
//!
//! On data file change (watcher.rs):
//!     reload → validate → atomic swap; a bad file keeps the old snapshot
//! ```

pub mod dataset;
pub mod directory;
pub mod local;
pub mod remote;
pub mod watcher;

use std::collections::BTreeSet;
use std::sync::Arc;

use arc_swap::ArcSwap;
use thiserror::Error;

use crate::model::{Course, SubjectCode, Term};
use crate::observability::metrics;

pub use dataset::{Dataset, DatasetError, DatasetIssue};
pub use directory::SubjectDirectory;
pub use local::CatalogSnapshot;
pub use remote::RemoteCourses;
pub use watcher::DatasetWatcher;

/// Errors surfaced by catalog lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The subject filter named a school the directory does not know.
    #[error("unknown school: {0}")]
    UnknownSchool(String),

    /// The course source could not be reached.
    #[error("course source unavailable: {0}")]
    Unavailable(String),

    /// The course source was misconfigured.
    #[error("catalog configuration error: {0}")]
    Configuration(String),
}

/// Where course records come from.
#[derive(Debug, Clone)]
pub enum CourseSource {
    /// The loaded dataset.
    Local,
    /// An upstream catalog service.
    Remote(RemoteCourses),
}

/// Shared, reloadable catalog.
pub struct Catalog {
    snapshot: ArcSwap<CatalogSnapshot>,
    source: CourseSource,
}

impl Catalog {
    pub fn new(dataset: Dataset, source: CourseSource) -> Self {
        let snapshot = CatalogSnapshot::from_dataset(dataset);
        tracing::info!(
            schools = snapshot.directory().all_schools().len(),
            courses = snapshot.course_count(),
            remote = matches!(source, CourseSource::Remote(_)),
            "Catalog loaded"
        );
        Self {
            snapshot: ArcSwap::from_pointee(snapshot),
            source,
        }
    }

    /// Current snapshot. Callers hold it for the duration of a request.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.snapshot.load_full()
    }

    /// Replace the dataset atomically. In-flight requests keep their snapshot.
    pub fn reload(&self, dataset: Dataset) {
        let snapshot = CatalogSnapshot::from_dataset(dataset);
        tracing::info!(
            schools = snapshot.directory().all_schools().len(),
            courses = snapshot.course_count(),
            "Catalog reloaded"
        );
        self.snapshot.store(Arc::new(snapshot));
        metrics::record_dataset_reload(true);
    }

    pub fn all_schools(&self) -> BTreeSet<String> {
        self.snapshot.load().directory().all_schools()
    }

    pub fn all_subjects(&self, school: Option<&str>) -> Result<Vec<SubjectCode>, CatalogError> {
        self.snapshot.load().directory().all_subjects(school)
    }

    /// Courses offered for `term` under `subject`; empty when none match.
    pub async fn select_courses(
        &self,
        term: Term,
        subject: &SubjectCode,
    ) -> Result<Vec<Course>, CatalogError> {
        let courses = match &self.source {
            CourseSource::Local => self.snapshot().select_courses(term, subject),
            CourseSource::Remote(remote) => remote.select_courses(term, subject).await?,
        };

        if courses.is_empty() {
            tracing::debug!(term = %term, subject = %subject, "No courses matched");
        }
        metrics::record_courses_returned(courses.len());
        Ok(courses)
    }
}
