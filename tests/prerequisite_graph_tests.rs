use course_planner::{Course, PrerequisiteGraph};
use std::collections::BTreeSet;

fn catalog() -> Vec<Course> {
    // 1 -> 2 -> 4, 1 -> 3 -> 4, 5 standalone
    vec![
        Course::new("Intro", 5).with_id(1),
        Course::new("Data Structures", 5).with_id(2).with_requirements([1]),
        Course::new("Discrete Math", 5).with_id(3).with_requirements([1]),
        Course::new("Algorithms", 5).with_id(4).with_requirements([2, 3]),
        Course::new("Ethics", 2).with_id(5),
    ]
}

#[test]
fn graph_builds_edges_from_requirements() {
    let graph = PrerequisiteGraph::build(&catalog());
    assert_eq!(graph.graph.node_count(), 5);
    assert_eq!(graph.graph.edge_count(), 4);
    assert!(!graph.has_cycle());
    assert!(graph.missing_requirements().is_empty());
}

#[test]
fn study_order_layers_by_prerequisite_depth() {
    let graph = PrerequisiteGraph::build(&catalog());
    let layers = graph.study_order().unwrap();
    assert_eq!(layers, vec![vec![1, 5], vec![2, 3], vec![4]]);
}

#[test]
fn transitive_prerequisites_and_dependents() {
    let graph = PrerequisiteGraph::build(&catalog());
    assert_eq!(graph.prerequisites_of(4), BTreeSet::from([1, 2, 3]));
    assert_eq!(graph.dependents_of(1), BTreeSet::from([2, 3, 4]));
    assert!(graph.prerequisites_of(5).is_empty());
    assert!(graph.prerequisites_of(99).is_empty());
}

#[test]
fn unknown_requirements_are_reported_not_linked() {
    let courses = vec![Course::new("Orphan", 5).with_id(1).with_requirements([42])];
    let graph = PrerequisiteGraph::build(&courses);
    assert_eq!(graph.graph.edge_count(), 0);
    assert_eq!(graph.missing_requirements(), &[(1, 42)]);
}

#[test]
fn cycles_are_detected() {
    let courses = vec![
        Course::new("A", 1).with_id(1).with_requirements([2]),
        Course::new("B", 1).with_id(2).with_requirements([1]),
    ];
    let graph = PrerequisiteGraph::build(&courses);
    assert!(graph.has_cycle());
    let err = graph.study_order().unwrap_err();
    assert!([1, 2].contains(&err.course_id));
}
