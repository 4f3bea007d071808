use crate::course::{Course, CourseId};
use crate::course_validation;
use serde_json::Error as SerdeJsonError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Storage for courses together with their offering periods and prerequisites.
///
/// A save always replaces the whole course: its period and requirement sets
/// are written from scratch rather than diffed against what was stored.
pub trait CourseStore {
    fn save_course(&mut self, course: Course) -> PersistenceResult<Course>;
    fn delete_course(&mut self, id: CourseId) -> PersistenceResult<bool>;
    fn delete_all(&mut self) -> PersistenceResult<()>;
    fn find_by_id(&self, id: CourseId) -> PersistenceResult<Option<Course>>;
    fn find_all(&self) -> PersistenceResult<Vec<Course>>;
}

pub fn validate_course(course: &Course) -> PersistenceResult<()> {
    course_validation::validate_course(course)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

pub fn validate_courses(courses: &[Course]) -> PersistenceResult<()> {
    course_validation::validate_course_collection(courses)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    load_courses_from_csv, load_courses_from_json, save_courses_to_csv, save_courses_to_json,
};
