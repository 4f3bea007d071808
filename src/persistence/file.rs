use super::{PersistenceError, PersistenceResult};
use crate::course::{Course, CourseId, Period};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

#[derive(Serialize, Deserialize)]
struct CatalogSnapshot {
    courses: Vec<Course>,
}

pub fn save_courses_to_json<P: AsRef<Path>>(courses: &[Course], path: P) -> PersistenceResult<()> {
    super::validate_courses(courses)?;
    let snapshot = CatalogSnapshot {
        courses: courses.to_vec(),
    };
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_courses_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Course>> {
    let file = File::open(path)?;
    let snapshot: CatalogSnapshot = serde_json::from_reader(file)?;
    super::validate_courses(&snapshot.courses)?;
    Ok(snapshot.courses)
}

#[derive(Default, Serialize, Deserialize)]
struct CourseCsvRecord {
    id: CourseId,
    name: String,
    credits: u32,
    periods: String,
    requirements: String,
}

impl From<&Course> for CourseCsvRecord {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            name: course.name.clone(),
            credits: course.credits,
            periods: join_set(&course.periods),
            requirements: join_set(&course.requirements),
        }
    }
}

impl CourseCsvRecord {
    fn into_course(self) -> PersistenceResult<Course> {
        Ok(Course {
            id: self.id,
            periods: split_set::<Period>(&self.periods)?,
            requirements: split_set::<CourseId>(&self.requirements)?,
            name: self.name,
            credits: self.credits,
        })
    }
}

pub fn save_courses_to_csv<P: AsRef<Path>>(courses: &[Course], path: P) -> PersistenceResult<()> {
    super::validate_courses(courses)?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for course in courses {
        writer.serialize(CourseCsvRecord::from(course))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_courses_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Course>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut courses = Vec::new();
    for record in reader.deserialize::<CourseCsvRecord>() {
        let record = record?;
        courses.push(record.into_course()?);
    }
    super::validate_courses(&courses)?;
    Ok(courses)
}

fn join_set<T: Display>(values: &BTreeSet<T>) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(";")
}

fn split_set<T>(input: &str) -> PersistenceResult<BTreeSet<T>>
where
    T: FromStr + Ord,
    T::Err: Display,
{
    if input.trim().is_empty() {
        return Ok(BTreeSet::new());
    }
    input
        .split(';')
        .map(|part| {
            part.trim()
                .parse::<T>()
                .map_err(|e| PersistenceError::InvalidData(format!("invalid integer '{part}': {e}")))
        })
        .collect()
}
