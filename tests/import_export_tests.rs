use course_planner::{
    Course, PersistenceError, load_courses_from_csv, load_courses_from_json, save_courses_to_csv,
    save_courses_to_json,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn sample_courses() -> Vec<Course> {
    vec![
        Course::new("Calculus I", 5).with_id(1).with_periods([1, 2]),
        Course::new("Calculus II", 5)
            .with_id(2)
            .with_periods([3])
            .with_requirements([1]),
        Course::new("Seminar, \"Research\"", 0).with_id(3),
    ]
}

#[test]
fn json_export_round_trip() {
    let file = NamedTempFile::new().unwrap();
    let courses = sample_courses();
    save_courses_to_json(&courses, file.path()).unwrap();
    let loaded = load_courses_from_json(file.path()).unwrap();
    assert_eq!(loaded, courses);
}

#[test]
fn csv_export_uses_semicolon_joined_sets() {
    let file = NamedTempFile::new().unwrap();
    let courses = sample_courses();
    save_courses_to_csv(&courses, file.path()).unwrap();

    let text = std::fs::read_to_string(file.path()).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("id,name,credits,periods,requirements"));
    assert_eq!(lines.next(), Some("1,Calculus I,5,1;2,"));

    let loaded = load_courses_from_csv(file.path()).unwrap();
    assert_eq!(loaded, courses);
}

#[test]
fn csv_rejects_malformed_period_cell() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "id,name,credits,periods,requirements").unwrap();
    writeln!(file, "1,Broken,5,one;2,").unwrap();
    file.flush().unwrap();

    let err = load_courses_from_csv(file.path()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)));
}

#[test]
fn json_rejects_duplicate_ids() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"courses": [
            {{"id": 1, "name": "A", "credits": 1}},
            {{"id": 1, "name": "B", "credits": 1}}
        ]}}"#
    )
    .unwrap();
    file.flush().unwrap();

    let err = load_courses_from_json(file.path()).unwrap_err();
    match err {
        PersistenceError::InvalidData(msg) => assert!(msg.contains("duplicate course id 1")),
        other => panic!("unexpected error: {other}"),
    }
}

#[cfg(feature = "sqlite")]
#[test]
fn planner_import_replaces_courses_with_same_id() {
    use course_planner::{Planner, SqliteCourseStore};

    let file = NamedTempFile::new().unwrap();
    save_courses_to_json(&sample_courses(), file.path()).unwrap();

    let mut planner = Planner::new(SqliteCourseStore::open_in_memory().unwrap());
    planner
        .save_course(Course::new("Old name", 3).with_id(1).with_periods([4]))
        .unwrap();

    let imported = planner.import_json(file.path()).unwrap();
    assert_eq!(imported, 3);
    assert_eq!(planner.get_all_courses().unwrap(), sample_courses());

    let csv_file = NamedTempFile::new().unwrap();
    assert_eq!(planner.export_csv(csv_file.path()).unwrap(), 3);
    assert_eq!(load_courses_from_csv(csv_file.path()).unwrap(), sample_courses());
}
