use crate::course::{Course, MAX_CREDITS, PERIOD_COUNT, UNSAVED_ID};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CourseValidationError {
    message: String,
}

impl CourseValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn validate_course(course: &Course) -> Result<(), CourseValidationError> {
    if course.id != UNSAVED_ID && course.id <= 0 {
        return Err(CourseValidationError::new(format!(
            "course id {} is invalid (must be positive or {UNSAVED_ID} for a new course)",
            course.id
        )));
    }

    if course.name.trim().is_empty() {
        return Err(CourseValidationError::new(format!(
            "course {} requires a non-empty name",
            course.id
        )));
    }

    if course.credits > MAX_CREDITS {
        return Err(CourseValidationError::new(format!(
            "course '{}' has {} credits (must be between 0 and {MAX_CREDITS})",
            course.name, course.credits
        )));
    }

    if let Some(period) = course
        .periods
        .iter()
        .find(|p| **p == 0 || **p > PERIOD_COUNT)
    {
        return Err(CourseValidationError::new(format!(
            "course '{}' has invalid period {} (must be between 1 and {PERIOD_COUNT})",
            course.name, period
        )));
    }

    if course.is_persisted() && course.requirements.contains(&course.id) {
        return Err(CourseValidationError::new(format!(
            "course '{}' cannot require itself",
            course.name
        )));
    }

    Ok(())
}

pub fn validate_course_collection(courses: &[Course]) -> Result<(), CourseValidationError> {
    let mut seen_ids = HashSet::with_capacity(courses.len());
    for course in courses {
        if course.is_persisted() && !seen_ids.insert(course.id) {
            return Err(CourseValidationError::new(format!(
                "duplicate course id {}",
                course.id
            )));
        }
        validate_course(course)?;
    }
    Ok(())
}
