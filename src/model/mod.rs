//! Catalog value types.
//!
//! # Data Flow
//! ```text
//! path segments ("1194", "ENG", "CS")
//!     → term.rs     (Term::from_id, InvalidArgument on failure)
//!     → subject.rs  (SubjectCode, normalized)
//!     → catalog lookup
//!     → course.rs   (Course / Section / Meeting, serialized to JSON)
//! ```
//!
//! All types are immutable values; nothing in the API creates or edits them.

pub mod course;
pub mod subject;
pub mod term;

pub use course::{Course, Days, Meeting, ScheduleError, Section, TimeOfDay};
pub use subject::SubjectCode;
pub use term::{Semester, Term, TermError};
