use crate::course::{Course, CourseId, PERIOD_COUNT, Period};
use crate::course_validation::{self, CourseValidationError};
use crate::graph::{PrerequisiteCycle, PrerequisiteGraph};
use crate::persistence::{
    CourseStore, PersistenceError, load_courses_from_csv, load_courses_from_json,
    save_courses_to_csv, save_courses_to_json,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("invalid course: {0}")]
    Validation(#[from] CourseValidationError),
    #[error("unknown course {0}")]
    UnknownCourse(CourseId),
    #[error("course {course} requires unknown course {requirement}")]
    UnknownRequirement {
        course: CourseId,
        requirement: CourseId,
    },
    #[error(transparent)]
    PrerequisiteCycle(#[from] PrerequisiteCycle),
    #[error("course {0} not found")]
    NotFound(CourseId),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub type PlannerResult<T> = Result<T, PlannerError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditSummary {
    pub course_ids: Vec<CourseId>,
    pub total_credits: u32,
}

impl CreditSummary {
    pub fn to_cli_summary(&self) -> String {
        let ids = self
            .course_ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        format!("courses={} total={} cr", ids, self.total_credits)
    }
}

/// Service layer between the form front end and a course store.
pub struct Planner<S: CourseStore> {
    store: S,
}

impl<S: CourseStore> Planner<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn get_all_courses(&self) -> PlannerResult<Vec<Course>> {
        Ok(self.store.find_all()?)
    }

    pub fn get_course(&self, id: CourseId) -> PlannerResult<Option<Course>> {
        Ok(self.store.find_by_id(id)?)
    }

    pub fn save_course(&mut self, course: Course) -> PlannerResult<Course> {
        course_validation::validate_course(&course)?;

        let mut courses = self.store.find_all()?;
        if let Some(requirement) = course
            .requirements
            .iter()
            .find(|req| !courses.iter().any(|c| c.id == **req))
        {
            warn!(course = course.id, requirement, "rejected save with unknown requirement");
            return Err(PlannerError::UnknownRequirement {
                course: course.id,
                requirement: *requirement,
            });
        }

        // A course without an id cannot be required by anything yet, so only
        // updates can close a cycle. Cycles elsewhere in the catalog are left alone.
        if course.is_persisted() {
            courses.retain(|c| c.id != course.id);
            courses.push(course.clone());
            let graph = PrerequisiteGraph::build(&courses);
            let closes_cycle = course
                .requirements
                .iter()
                .any(|r| *r == course.id || graph.prerequisites_of(*r).contains(&course.id));
            if closes_cycle {
                warn!(course = course.id, "rejected save that creates a prerequisite cycle");
                return Err(PrerequisiteCycle {
                    course_id: course.id,
                }
                .into());
            }
        }

        Ok(self.store.save_course(course)?)
    }

    /// Courses that directly or transitively require `id`.
    pub fn dependents_of(&self, id: CourseId) -> PlannerResult<BTreeSet<CourseId>> {
        let courses = self.store.find_all()?;
        Ok(PrerequisiteGraph::build(&courses).dependents_of(id))
    }

    pub fn delete_course(&mut self, id: CourseId) -> PlannerResult<()> {
        if self.store.delete_course(id)? {
            Ok(())
        } else {
            Err(PlannerError::NotFound(id))
        }
    }

    pub fn delete_all(&mut self) -> PlannerResult<()> {
        Ok(self.store.delete_all()?)
    }

    pub fn credit_total(
        &self,
        ids: &[CourseId],
        include_prerequisites: bool,
    ) -> PlannerResult<CreditSummary> {
        let courses = self.store.find_all()?;
        let by_id: BTreeMap<CourseId, &Course> = courses.iter().map(|c| (c.id, c)).collect();

        let mut selected: BTreeSet<CourseId> = BTreeSet::new();
        for id in ids {
            if !by_id.contains_key(id) {
                return Err(PlannerError::UnknownCourse(*id));
            }
            selected.insert(*id);
        }

        if include_prerequisites {
            let graph = PrerequisiteGraph::build(&courses);
            let prerequisites: Vec<CourseId> = selected
                .iter()
                .flat_map(|id| graph.prerequisites_of(*id))
                .collect();
            selected.extend(prerequisites);
        }

        let total_credits = selected
            .iter()
            .filter_map(|id| by_id.get(id))
            .map(|c| c.credits)
            .sum();

        Ok(CreditSummary {
            course_ids: selected.into_iter().collect(),
            total_credits,
        })
    }

    pub fn study_order(&self) -> PlannerResult<Vec<Vec<Course>>> {
        let courses = self.store.find_all()?;
        let graph = PrerequisiteGraph::build(&courses);
        let by_id: BTreeMap<CourseId, &Course> = courses.iter().map(|c| (c.id, c)).collect();

        let layers: Vec<Vec<Course>> = graph
            .study_order()?
            .into_iter()
            .map(|layer| {
                layer
                    .into_iter()
                    .filter_map(|id| by_id.get(&id).map(|c| (*c).clone()))
                    .collect::<Vec<_>>()
            })
            .collect();
        Ok(layers)
    }

    pub fn courses_by_period(&self) -> PlannerResult<BTreeMap<Period, Vec<Course>>> {
        let courses = self.store.find_all()?;
        let mut by_period: BTreeMap<Period, Vec<Course>> =
            (1..=PERIOD_COUNT).map(|p| (p, Vec::new())).collect();
        for course in courses {
            for period in &course.periods {
                if let Some(bucket) = by_period.get_mut(period) {
                    bucket.push(course.clone());
                }
            }
        }
        Ok(by_period)
    }

    pub fn export_json<P: AsRef<Path>>(&self, path: P) -> PlannerResult<usize> {
        let courses = self.store.find_all()?;
        save_courses_to_json(&courses, path.as_ref())?;
        info!(path = %path.as_ref().display(), count = courses.len(), "exported courses");
        Ok(courses.len())
    }

    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> PlannerResult<usize> {
        let courses = self.store.find_all()?;
        save_courses_to_csv(&courses, path.as_ref())?;
        info!(path = %path.as_ref().display(), count = courses.len(), "exported courses");
        Ok(courses.len())
    }

    pub fn import_json<P: AsRef<Path>>(&mut self, path: P) -> PlannerResult<usize> {
        let courses = load_courses_from_json(path.as_ref())?;
        self.import_courses(courses, path.as_ref())
    }

    pub fn import_csv<P: AsRef<Path>>(&mut self, path: P) -> PlannerResult<usize> {
        let courses = load_courses_from_csv(path.as_ref())?;
        self.import_courses(courses, path.as_ref())
    }

    fn import_courses(&mut self, courses: Vec<Course>, path: &Path) -> PlannerResult<usize> {
        let count = courses.len();
        for course in courses {
            self.store.save_course(course)?;
        }
        info!(path = %path.display(), count, "imported courses");

        let graph = PrerequisiteGraph::build(&self.store.find_all()?);
        for (course, requirement) in graph.missing_requirements() {
            warn!(course, requirement, "imported course requires a course that does not exist");
        }
        if graph.has_cycle() {
            warn!("imported catalog contains a prerequisite cycle");
        }
        Ok(count)
    }
}
