use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub type CourseId = i64;
pub type Period = u8;

/// Id carried by a course that has not been written to a store yet.
pub const UNSAVED_ID: CourseId = -1;
pub const PERIOD_COUNT: Period = 4;
pub const MAX_CREDITS: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub credits: u32,
    #[serde(default)]
    pub periods: BTreeSet<Period>,
    #[serde(default)]
    pub requirements: BTreeSet<CourseId>,
}

impl Course {
    pub fn new(name: impl Into<String>, credits: u32) -> Self {
        Self {
            id: UNSAVED_ID,
            name: name.into(),
            credits,
            periods: BTreeSet::new(),
            requirements: BTreeSet::new(),
        }
    }

    pub fn with_id(mut self, id: CourseId) -> Self {
        self.id = id;
        self
    }

    pub fn with_periods(mut self, periods: impl IntoIterator<Item = Period>) -> Self {
        self.periods = periods.into_iter().collect();
        self
    }

    pub fn with_requirements(mut self, requirements: impl IntoIterator<Item = CourseId>) -> Self {
        self.requirements = requirements.into_iter().collect();
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.id != UNSAVED_ID
    }

    pub fn is_offered_in(&self, period: Period) -> bool {
        self.periods.contains(&period)
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.name)
    }
}

/// Recovers the course id from a picker label such as `"3: Algorithms"`.
pub fn parse_course_label(label: &str) -> Option<CourseId> {
    label.split(':').next()?.trim().parse().ok()
}
