//! Course records and their schedule.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::model::{SubjectCode, Term};

/// One offered course within a subject and term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub term: Term,
    #[serde(flatten)]
    pub subject: SubjectCode,
    /// Catalog number within the subject, e.g. "1114".
    pub number: String,
    pub name: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Course {
    /// True if this course is offered for `term` under `subject`.
    pub fn matches(&self, term: Term, subject: &SubjectCode) -> bool {
        self.term == term && &self.subject == subject
    }

    /// True if every meeting of every section ends after it starts.
    pub fn has_consistent_schedule(&self) -> bool {
        self.sections
            .iter()
            .all(|section| section.meetings.iter().all(Meeting::ends_after_start))
    }
}

/// A registrable section of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub registration_number: u32,
    pub code: String,
    #[serde(default)]
    pub instructors: Vec<String>,
    #[serde(default)]
    pub meetings: Vec<Meeting>,
}

/// A recurring weekly meeting slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub days: Days,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl Meeting {
    pub fn ends_after_start(&self) -> bool {
        self.end > self.start
    }
}

/// Errors from parsing schedule fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("unknown weekday letter {0:?} (expected one of MTWRFSU)")]
    UnknownDay(char),

    #[error("meeting days must not be empty")]
    NoDays,

    #[error("invalid time of day {0:?} (expected HH:MM)")]
    InvalidTime(String),
}

const DAY_LETTERS: [char; 7] = ['M', 'T', 'W', 'R', 'F', 'S', 'U'];

/// A set of weekdays, written as letters `MTWRFSU` (R is Thursday, U is Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Days(u8);

impl FromStr for Days {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mask = 0u8;
        for c in s.chars().filter(|c| !c.is_whitespace()) {
            let bit = DAY_LETTERS
                .iter()
                .position(|&l| l == c.to_ascii_uppercase())
                .ok_or(ScheduleError::UnknownDay(c))?;
            mask |= 1 << bit;
        }
        if mask == 0 {
            return Err(ScheduleError::NoDays);
        }
        Ok(Self(mask))
    }
}

impl fmt::Display for Days {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (bit, letter) in DAY_LETTERS.iter().enumerate() {
            if self.0 & (1 << bit) != 0 {
                write!(f, "{}", letter)?;
            }
        }
        Ok(())
    }
}

impl Serialize for Days {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Days {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Wall-clock time with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidTime(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        if minute.len() != 2 {
            return Err(invalid());
        }
        let hour = hour.parse().map_err(|_| invalid())?;
        let minute = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).ok_or_else(invalid)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
