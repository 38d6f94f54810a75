//! Subject codes.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A subject within a school, e.g. `CS` in `ENG`.
///
/// Both parts are normalized (trimmed, upper-cased) on construction so that
/// path segments and dataset entries compare equal regardless of casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SubjectCode {
    subject: String,
    school: String,
}

impl SubjectCode {
    pub fn new(subject: impl AsRef<str>, school: impl AsRef<str>) -> Self {
        Self {
            subject: normalize(subject.as_ref()),
            school: normalize(school.as_ref()),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn school(&self) -> &str {
        &self.school
    }
}

impl fmt::Display for SubjectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.subject, self.school)
    }
}

impl<'de> Deserialize<'de> for SubjectCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            subject: String,
            school: String,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(Self::new(raw.subject, raw.school))
    }
}

/// Canonical form of a school or subject code.
pub fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}
