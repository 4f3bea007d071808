use super::{CourseStore, PersistenceResult};
use crate::course::{Course, CourseId, Period, UNSAVED_ID};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

pub struct SqliteCourseStore {
    connection: Connection,
}

impl SqliteCourseStore {
    pub fn open<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::from_connection(connection)
    }

    pub fn open_in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::from_connection(connection)
    }

    pub fn from_connection(connection: Connection) -> PersistenceResult<Self> {
        Self::initialize_schema(&connection)?;
        Ok(Self { connection })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS Courses (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                credits INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS Periods (
                course_id INTEGER NOT NULL,
                period INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS Requirements (
                course_id INTEGER NOT NULL,
                requirement_id INTEGER NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    pub fn find_requirements(&self, id: CourseId) -> PersistenceResult<BTreeSet<CourseId>> {
        let mut stmt = self
            .connection
            .prepare("SELECT requirement_id FROM Requirements WHERE course_id = ?1")?;
        let rows = stmt.query_map(params![id], |row| row.get::<_, CourseId>(0))?;
        let mut requirements = BTreeSet::new();
        for requirement in rows {
            requirements.insert(requirement?);
        }
        Ok(requirements)
    }

    pub fn find_periods(&self, id: CourseId) -> PersistenceResult<BTreeSet<Period>> {
        let mut stmt = self
            .connection
            .prepare("SELECT period FROM Periods WHERE course_id = ?1")?;
        let rows = stmt.query_map(params![id], |row| row.get::<_, Period>(0))?;
        let mut periods = BTreeSet::new();
        for period in rows {
            periods.insert(period?);
        }
        Ok(periods)
    }

    fn course_exists(tx: &Transaction, id: CourseId) -> PersistenceResult<bool> {
        let found: Option<i64> = tx
            .query_row("SELECT 1 FROM Courses WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    fn remove_owned_rows(tx: &Transaction, id: CourseId) -> PersistenceResult<()> {
        tx.execute("DELETE FROM Courses WHERE id = ?1", params![id])?;
        tx.execute("DELETE FROM Periods WHERE course_id = ?1", params![id])?;
        tx.execute("DELETE FROM Requirements WHERE course_id = ?1", params![id])?;
        Ok(())
    }

    fn write_periods(tx: &Transaction, course: &Course) -> PersistenceResult<()> {
        let mut stmt = tx.prepare("INSERT INTO Periods (course_id, period) VALUES (?1, ?2)")?;
        for period in &course.periods {
            stmt.execute(params![course.id, period])?;
        }
        Ok(())
    }

    fn write_requirements(tx: &Transaction, course: &Course) -> PersistenceResult<()> {
        let mut stmt =
            tx.prepare("INSERT INTO Requirements (course_id, requirement_id) VALUES (?1, ?2)")?;
        for requirement_id in &course.requirements {
            stmt.execute(params![course.id, requirement_id])?;
        }
        Ok(())
    }
}

impl CourseStore for SqliteCourseStore {
    fn save_course(&mut self, mut course: Course) -> PersistenceResult<Course> {
        super::validate_course(&course)?;
        let tx = self.connection.transaction()?;

        if course.id == UNSAVED_ID {
            tx.execute(
                "INSERT INTO Courses (name, credits) VALUES (?1, ?2)",
                params![course.name, course.credits],
            )?;
            course.id = tx.last_insert_rowid();
        } else {
            if Self::course_exists(&tx, course.id)? {
                Self::remove_owned_rows(&tx, course.id)?;
            }
            tx.execute(
                "INSERT INTO Courses (id, name, credits) VALUES (?1, ?2, ?3)",
                params![course.id, course.name, course.credits],
            )?;
        }

        Self::write_periods(&tx, &course)?;
        Self::write_requirements(&tx, &course)?;
        tx.commit()?;

        debug!(
            id = course.id,
            periods = course.periods.len(),
            requirements = course.requirements.len(),
            "course saved"
        );
        Ok(course)
    }

    fn delete_course(&mut self, id: CourseId) -> PersistenceResult<bool> {
        let tx = self.connection.transaction()?;
        let removed = tx.execute("DELETE FROM Courses WHERE id = ?1", params![id])?;
        tx.execute("DELETE FROM Periods WHERE course_id = ?1", params![id])?;
        tx.execute(
            "DELETE FROM Requirements WHERE course_id = ?1 OR requirement_id = ?1",
            params![id],
        )?;
        tx.commit()?;

        debug!(id, existed = (removed > 0), "course deleted");
        Ok(removed > 0)
    }

    fn delete_all(&mut self) -> PersistenceResult<()> {
        let tx = self.connection.transaction()?;
        tx.execute("DELETE FROM Courses", [])?;
        tx.execute("DELETE FROM Periods", [])?;
        tx.execute("DELETE FROM Requirements", [])?;
        tx.commit()?;
        debug!("all courses deleted");
        Ok(())
    }

    fn find_by_id(&self, id: CourseId) -> PersistenceResult<Option<Course>> {
        let row: Option<(String, u32)> = self
            .connection
            .query_row(
                "SELECT name, credits FROM Courses WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((name, credits)) = row else {
            return Ok(None);
        };

        Ok(Some(Course {
            id,
            name,
            credits,
            periods: self.find_periods(id)?,
            requirements: self.find_requirements(id)?,
        }))
    }

    fn find_all(&self) -> PersistenceResult<Vec<Course>> {
        let mut stmt = self
            .connection
            .prepare("SELECT id FROM Courses ORDER BY id ASC")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, CourseId>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut courses = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(course) = self.find_by_id(id)? {
                courses.push(course);
            }
        }
        Ok(courses)
    }
}
