//! Academic terms.
//!
//! A term is addressed on the wire by a compact integer id:
//!
//! ```text
//! id = (year - 1900) * 10 + semester
//!
//!   1191  →  January 2019
//!   1194  →  Fall 2019
//! ```
//!
//! Semester codes are 1 (January), 2 (Spring), 3 (Summer) and 4 (Fall).
//! Years outside 2000..=2099 are rejected.

use std::fmt;
use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MIN_YEAR: u16 = 2000;
const MAX_YEAR: u16 = 2099;

/// Errors produced when turning a raw id into a [`Term`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermError {
    /// The input was not an integer at all.
    #[error("term id must be an integer, got {0:?}")]
    NotAnInteger(String),

    /// The input is an integer too large to be any term id.
    #[error("term id {0} is out of range")]
    OutOfRange(String),

    /// The integer does not encode a supported term.
    #[error("{0} is not a valid term id")]
    InvalidId(i64),
}

/// Part of the academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Semester {
    January,
    Spring,
    Summer,
    Fall,
}

impl Semester {
    fn code(self) -> u32 {
        match self {
            Semester::January => 1,
            Semester::Spring => 2,
            Semester::Summer => 3,
            Semester::Fall => 4,
        }
    }

    fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Semester::January),
            2 => Some(Semester::Spring),
            3 => Some(Semester::Summer),
            4 => Some(Semester::Fall),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Semester::January => "January",
            Semester::Spring => "Spring",
            Semester::Summer => "Summer",
            Semester::Fall => "Fall",
        }
    }
}

/// An academic session, e.g. Fall 2019.
///
/// Serializes as its integer id; deserialization goes through
/// [`Term::from_id`] so invalid ids never make it into the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Term {
    year: u16,
    semester: Semester,
}

impl Term {
    /// Decode a wire id.
    pub fn from_id(id: i64) -> Result<Self, TermError> {
        let invalid = || TermError::InvalidId(id);

        if id <= 0 {
            return Err(invalid());
        }
        let semester = u32::try_from(id % 10)
            .ok()
            .and_then(Semester::from_code)
            .ok_or_else(invalid)?;
        let year = u16::try_from(id / 10 + 1900).map_err(|_| invalid())?;
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(invalid());
        }

        Ok(Self { year, semester })
    }

    /// The wire id of this term.
    pub fn id(&self) -> u32 {
        (u32::from(self.year) - 1900) * 10 + self.semester.code()
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn semester(&self) -> Semester {
        self.semester
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.semester.label(), self.year)
    }
}

impl FromStr for Term {
    type Err = TermError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let id: i64 = trimmed.parse().map_err(|e: ParseIntError| match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                TermError::OutOfRange(trimmed.to_string())
            }
            _ => TermError::NotAnInteger(s.to_string()),
        })?;
        Self::from_id(id)
    }
}

impl TryFrom<i64> for Term {
    type Error = TermError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        Self::from_id(id)
    }
}

impl From<Term> for u32 {
    fn from(term: Term) -> Self {
        term.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_known_ids() {
        let fall = Term::from_id(1194).unwrap();
        assert_eq!(fall.year(), 2019);
        assert_eq!(fall.semester(), Semester::Fall);
        assert_eq!(fall.to_string(), "Fall 2019");

        let january = Term::from_id(1191).unwrap();
        assert_eq!(january.semester(), Semester::January);
        assert_eq!(january.id(), 1191);
    }

    #[test]
    fn test_invalid_ids() {
        for id in [0, -1194, 1190, 1195, 1199, 999, 994, 2004, 99_999] {
            assert_eq!(Term::from_id(id), Err(TermError::InvalidId(id)), "id {}", id);
        }
    }

    #[test]
    fn test_from_id_is_injective() {
        let mut seen = HashSet::new();
        for id in 0..3000 {
            if let Ok(term) = Term::from_id(id) {
                assert_eq!(i64::from(term.id()), id);
                assert!(seen.insert(term), "duplicate term for id {}", id);
            }
        }
        // 100 years, four semesters each
        assert_eq!(seen.len(), 400);
    }

    #[test]
    fn test_parse_from_path_segment() {
        assert!("1198".parse::<Term>().is_err());
        assert_eq!(" 1192 ".parse::<Term>().unwrap().semester(), Semester::Spring);
        assert_eq!(
            "abc".parse::<Term>(),
            Err(TermError::NotAnInteger("abc".to_string()))
        );
    }

    #[test]
    fn test_oversized_integer_is_out_of_range() {
        assert_eq!(
            "99999999999999999999".parse::<Term>(),
            Err(TermError::OutOfRange("99999999999999999999".to_string()))
        );
        assert_eq!(
            "-99999999999999999999".parse::<Term>(),
            Err(TermError::OutOfRange("-99999999999999999999".to_string()))
        );
        assert_eq!(
            "12.5".parse::<Term>(),
            Err(TermError::NotAnInteger("12.5".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_id() {
        let term = Term::from_id(1203).unwrap();
        assert_eq!(serde_json::to_string(&term).unwrap(), "1203");
        let back: Term = serde_json::from_str("1203").unwrap();
        assert_eq!(back, term);
        assert!(serde_json::from_str::<Term>("1208").is_err());
    }
}
