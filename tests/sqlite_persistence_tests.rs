#![cfg(feature = "sqlite")]

use course_planner::{Course, CourseStore, PersistenceError, SqliteCourseStore, UNSAVED_ID};
use rusqlite::{Connection, params};
use std::collections::BTreeSet;
use tempfile::NamedTempFile;

fn count_rows(path: &std::path::Path, sql: &str, id: i64) -> i64 {
    let conn = Connection::open(path).unwrap();
    conn.query_row(sql, params![id], |row| row.get(0)).unwrap()
}

#[test]
fn sqlite_store_round_trip_course() {
    let file = NamedTempFile::new().unwrap();
    let mut store = SqliteCourseStore::open(file.path()).unwrap();

    let basics = store
        .save_course(Course::new("Programming Basics", 5).with_periods([1, 3]))
        .expect("save basics");
    assert_ne!(basics.id, UNSAVED_ID);

    let advanced = store
        .save_course(
            Course::new("Advanced Programming", 5)
                .with_periods([2, 4])
                .with_requirements([basics.id]),
        )
        .expect("save advanced");

    let loaded = store
        .find_by_id(advanced.id)
        .expect("load course")
        .expect("course exists");

    assert_eq!(loaded.name, "Advanced Programming");
    assert_eq!(loaded.credits, 5);
    assert_eq!(loaded.periods, BTreeSet::from([2, 4]));
    assert_eq!(loaded.requirements, BTreeSet::from([basics.id]));
    assert_eq!(loaded, advanced);
}

#[test]
fn sqlite_store_reopens_existing_database() {
    let file = NamedTempFile::new().unwrap();
    let saved = {
        let mut store = SqliteCourseStore::open(file.path()).unwrap();
        store
            .save_course(Course::new("Statistics", 5).with_periods([2]))
            .unwrap()
    };

    let store = SqliteCourseStore::open(file.path()).unwrap();
    assert_eq!(store.find_all().unwrap(), vec![saved]);
}

#[test]
fn update_replaces_periods_and_requirements() {
    let file = NamedTempFile::new().unwrap();
    let mut store = SqliteCourseStore::open(file.path()).unwrap();

    let a = store.save_course(Course::new("A", 5)).unwrap();
    let b = store.save_course(Course::new("B", 5)).unwrap();
    let c = store
        .save_course(
            Course::new("C", 5)
                .with_periods([1, 2])
                .with_requirements([a.id]),
        )
        .unwrap();

    let mut updated = c.clone();
    updated.name = "C (revised)".into();
    updated.credits = 10;
    updated.periods = BTreeSet::from([3]);
    updated.requirements = BTreeSet::from([b.id]);
    let updated = store.save_course(updated).unwrap();
    assert_eq!(updated.id, c.id);

    assert_eq!(store.find_periods(c.id).unwrap(), BTreeSet::from([3]));
    assert_eq!(store.find_requirements(c.id).unwrap(), BTreeSet::from([b.id]));
    assert_eq!(
        count_rows(file.path(), "SELECT COUNT(*) FROM Courses WHERE id = ?1", c.id),
        1
    );
    assert_eq!(store.find_by_id(c.id).unwrap().unwrap().name, "C (revised)");
}

#[test]
fn updating_a_course_keeps_edges_pointing_at_it() {
    let mut store = SqliteCourseStore::open_in_memory().unwrap();
    let base = store.save_course(Course::new("Base", 5)).unwrap();
    let dependent = store
        .save_course(Course::new("Dependent", 5).with_requirements([base.id]))
        .unwrap();

    let mut renamed = base.clone();
    renamed.name = "Base (renamed)".into();
    store.save_course(renamed).unwrap();

    assert_eq!(
        store.find_requirements(dependent.id).unwrap(),
        BTreeSet::from([base.id])
    );
}

#[test]
fn saving_with_explicit_unknown_id_inserts_that_id() {
    let mut store = SqliteCourseStore::open_in_memory().unwrap();
    let course = store
        .save_course(Course::new("Imported", 3).with_id(42))
        .unwrap();
    assert_eq!(course.id, 42);
    assert!(store.find_by_id(42).unwrap().is_some());
}

#[test]
fn delete_removes_rows_from_all_tables() {
    let file = NamedTempFile::new().unwrap();
    let mut store = SqliteCourseStore::open(file.path()).unwrap();

    let a = store
        .save_course(Course::new("A", 5).with_periods([1]))
        .unwrap();
    let b = store
        .save_course(
            Course::new("B", 5)
                .with_periods([2, 3])
                .with_requirements([a.id]),
        )
        .unwrap();

    assert!(store.delete_course(a.id).unwrap());
    assert!(store.find_by_id(a.id).unwrap().is_none());

    let path = file.path();
    assert_eq!(count_rows(path, "SELECT COUNT(*) FROM Courses WHERE id = ?1", a.id), 0);
    assert_eq!(count_rows(path, "SELECT COUNT(*) FROM Periods WHERE course_id = ?1", a.id), 0);
    assert_eq!(
        count_rows(
            path,
            "SELECT COUNT(*) FROM Requirements WHERE course_id = ?1 OR requirement_id = ?1",
            a.id
        ),
        0
    );

    // B survives, minus its edge to the deleted course.
    let b_loaded = store.find_by_id(b.id).unwrap().unwrap();
    assert!(b_loaded.requirements.is_empty());
    assert_eq!(b_loaded.periods, BTreeSet::from([2, 3]));
}

#[test]
fn delete_missing_course_reports_false() {
    let mut store = SqliteCourseStore::open_in_memory().unwrap();
    assert!(!store.delete_course(7).unwrap());
}

#[test]
fn delete_all_empties_store() {
    let mut store = SqliteCourseStore::open_in_memory().unwrap();
    let a = store.save_course(Course::new("A", 1).with_periods([1])).unwrap();
    store
        .save_course(Course::new("B", 2).with_requirements([a.id]))
        .unwrap();

    store.delete_all().unwrap();

    assert!(store.find_all().unwrap().is_empty());
    assert!(store.find_periods(a.id).unwrap().is_empty());
}

#[test]
fn find_all_orders_by_id() {
    let mut store = SqliteCourseStore::open_in_memory().unwrap();
    store.save_course(Course::new("Third", 1).with_id(30)).unwrap();
    store.save_course(Course::new("First", 1).with_id(10)).unwrap();
    store.save_course(Course::new("Second", 1).with_id(20)).unwrap();

    let ids: Vec<i64> = store.find_all().unwrap().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![10, 20, 30]);
}

#[test]
fn save_rejects_invalid_course() {
    let mut store = SqliteCourseStore::open_in_memory().unwrap();
    let err = store
        .save_course(Course::new("Bad periods", 5).with_periods([5]))
        .unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)));
    assert!(store.find_all().unwrap().is_empty());
}
