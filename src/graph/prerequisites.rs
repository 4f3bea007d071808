use crate::course::{Course, CourseId};
use petgraph::Direction;
use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, Reversed};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("prerequisite cycle detected at course {course_id}")]
pub struct PrerequisiteCycle {
    pub course_id: CourseId,
}

/// Directed graph over courses with an edge from each prerequisite to the
/// course requiring it.
pub struct PrerequisiteGraph {
    pub graph: DiGraph<CourseId, ()>,
    pub id_to_index: HashMap<CourseId, NodeIndex>,
    missing: Vec<(CourseId, CourseId)>,
}

impl PrerequisiteGraph {
    pub fn build(courses: &[Course]) -> Self {
        let mut graph: DiGraph<CourseId, ()> = DiGraph::new();
        let mut id_to_index: HashMap<CourseId, NodeIndex> = HashMap::new();
        let mut missing = Vec::new();

        for course in courses {
            id_to_index
                .entry(course.id)
                .or_insert_with(|| graph.add_node(course.id));
        }

        // Edges: requirement -> course
        for course in courses {
            let course_ix = id_to_index[&course.id];
            for requirement_id in &course.requirements {
                match id_to_index.get(requirement_id) {
                    Some(&req_ix) => {
                        graph.add_edge(req_ix, course_ix, ());
                    }
                    None => missing.push((course.id, *requirement_id)),
                }
            }
        }

        Self {
            graph,
            id_to_index,
            missing,
        }
    }

    /// `(course, requirement)` pairs whose requirement is not among the built courses.
    pub fn missing_requirements(&self) -> &[(CourseId, CourseId)] {
        &self.missing
    }

    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Groups courses into levels: a course sits one level above its deepest
    /// prerequisite, courses without prerequisites sit on level 0.
    pub fn study_order(&self) -> Result<Vec<Vec<CourseId>>, PrerequisiteCycle> {
        let sorted = toposort(&self.graph, None).map_err(|cycle| PrerequisiteCycle {
            course_id: self.graph[cycle.node_id()],
        })?;

        let mut levels: HashMap<NodeIndex, usize> = HashMap::with_capacity(sorted.len());
        let mut layers: Vec<Vec<CourseId>> = Vec::new();
        for node in sorted {
            let level = self
                .graph
                .neighbors_directed(node, Direction::Incoming)
                .filter_map(|pred| levels.get(&pred))
                .map(|l| l + 1)
                .max()
                .unwrap_or(0);
            levels.insert(node, level);
            if layers.len() <= level {
                layers.resize_with(level + 1, Vec::new);
            }
            layers[level].push(self.graph[node]);
        }

        for layer in &mut layers {
            layer.sort_unstable();
        }
        Ok(layers)
    }

    pub fn prerequisites_of(&self, id: CourseId) -> BTreeSet<CourseId> {
        let Some(&start) = self.id_to_index.get(&id) else {
            return BTreeSet::new();
        };
        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, start);
        let mut found = BTreeSet::new();
        while let Some(node) = dfs.next(reversed) {
            if node != start {
                found.insert(self.graph[node]);
            }
        }
        found
    }

    pub fn dependents_of(&self, id: CourseId) -> BTreeSet<CourseId> {
        let Some(&start) = self.id_to_index.get(&id) else {
            return BTreeSet::new();
        };
        let mut dfs = Dfs::new(&self.graph, start);
        let mut found = BTreeSet::new();
        while let Some(node) = dfs.next(&self.graph) {
            if node != start {
                found.insert(self.graph[node]);
            }
        }
        found
    }
}
