pub mod config;
pub mod course;
pub mod course_validation;
pub mod form;
pub mod graph;
pub mod persistence;
pub mod planner;

pub use config::PlannerConfig;
pub use course::{Course, CourseId, MAX_CREDITS, PERIOD_COUNT, Period, UNSAVED_ID};
pub use course_validation::CourseValidationError;
pub use form::{CourseForm, FormError};
pub use graph::{PrerequisiteCycle, PrerequisiteGraph};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteCourseStore;
pub use persistence::{
    CourseStore, PersistenceError, PersistenceResult, load_courses_from_csv,
    load_courses_from_json, save_courses_to_csv, save_courses_to_json,
};
pub use planner::{CreditSummary, Planner, PlannerError, PlannerResult};
