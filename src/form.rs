use crate::course::{Course, CourseId, MAX_CREDITS, PERIOD_COUNT, Period, UNSAVED_ID};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("credits must be between 0 and {max} (got {0})", max = MAX_CREDITS)]
    CreditsOutOfRange(u32),
    #[error("period must be between 1 and {max} (got {0})", max = PERIOD_COUNT)]
    PeriodOutOfRange(Period),
    #[error("a course cannot require itself")]
    SelfRequirement,
}

/// Editable state of the course form: the picked course (if any), its name,
/// credits, one check box per period and the prerequisite rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseForm {
    selected: Option<CourseId>,
    name: String,
    credits: u32,
    periods: [bool; PERIOD_COUNT as usize],
    requirements: Vec<CourseId>,
}

impl Default for CourseForm {
    fn default() -> Self {
        Self {
            selected: None,
            name: String::new(),
            credits: 0,
            periods: [false; PERIOD_COUNT as usize],
            requirements: Vec::new(),
        }
    }
}

impl CourseForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn selected(&self) -> Option<CourseId> {
        self.selected
    }

    pub fn fill_from(&mut self, course: &Course) {
        self.selected = course.is_persisted().then_some(course.id);
        self.name = course.name.clone();
        self.credits = course.credits;
        self.clear_period_selection();
        for period in &course.periods {
            if let Some(slot) = Self::slot(*period) {
                self.periods[slot] = true;
            }
        }
        self.requirements = course.requirements.iter().copied().collect();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_credits(&mut self, credits: u32) -> Result<(), FormError> {
        if credits > MAX_CREDITS {
            return Err(FormError::CreditsOutOfRange(credits));
        }
        self.credits = credits;
        Ok(())
    }

    /// Flips the check box of `period`, returning whether it is now checked.
    pub fn toggle_period(&mut self, period: Period) -> Result<bool, FormError> {
        let slot = Self::slot(period).ok_or(FormError::PeriodOutOfRange(period))?;
        self.periods[slot] = !self.periods[slot];
        Ok(self.periods[slot])
    }

    pub fn periods(&self) -> BTreeSet<Period> {
        self.periods
            .iter()
            .enumerate()
            .filter(|(_, checked)| **checked)
            .map(|(i, _)| i as Period + 1)
            .collect()
    }

    pub fn add_requirement(&mut self, id: CourseId) -> Result<(), FormError> {
        if self.selected == Some(id) {
            return Err(FormError::SelfRequirement);
        }
        if !self.requirements.contains(&id) {
            self.requirements.push(id);
        }
        Ok(())
    }

    pub fn remove_requirement(&mut self, id: CourseId) -> bool {
        let before = self.requirements.len();
        self.requirements.retain(|r| *r != id);
        before != self.requirements.len()
    }

    pub fn requirements(&self) -> &[CourseId] {
        &self.requirements
    }

    pub fn to_course(&self) -> Course {
        Course {
            id: self.selected.unwrap_or(UNSAVED_ID),
            name: self.name.trim().to_string(),
            credits: self.credits,
            periods: self.periods(),
            requirements: self.requirements.iter().copied().collect(),
        }
    }

    fn clear_period_selection(&mut self) {
        self.periods = [false; PERIOD_COUNT as usize];
    }

    fn slot(period: Period) -> Option<usize> {
        (1..=PERIOD_COUNT)
            .contains(&period)
            .then(|| usize::from(period) - 1)
    }
}

/// Labels shown by the course pickers, in the order given.
pub fn course_choices(courses: &[Course]) -> Vec<String> {
    courses.iter().map(ToString::to_string).collect()
}
