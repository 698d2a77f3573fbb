//! Dependency graph over task names.
//!
//! Design:
//! - Forward edges: task -> tasks it depends on (waits for)
//! - Reverse edges: task -> tasks that depend on it (waiting tasks)
//! - Invariant: edges and reverse_edges must be kept in sync
//!
//! The scheduler removes an edge as soon as the depended task resolves, so a
//! task with no remaining forward edges is ready to run.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Gray,
    Black,
}

/// Dependency graph for tracking unresolved dependencies.
///
/// - `edges`: task -> set of tasks it still waits for
/// - `reverse_edges`: task -> set of tasks waiting for it
#[derive(Debug, Default)]
pub struct DependencyGraph {
    edges: HashMap<String, HashSet<String>>,

    /// Enables O(1) lookup: "who is waiting for this task?"
    reverse_edges: HashMap<String, HashSet<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dependency: `task` depends on `depends_on`.
    ///
    /// Example: add_dependency("op2", "op1") means "op2 waits for op1"
    pub fn add_dependency(&mut self, task: &str, depends_on: &str) {
        self.edges
            .entry(task.to_string())
            .or_default()
            .insert(depends_on.to_string());
        self.reverse_edges
            .entry(depends_on.to_string())
            .or_default()
            .insert(task.to_string());
    }

    /// Remove a dependency: `task` no longer depends on `depends_on`.
    ///
    /// This happens when the depended task resolves.
    pub fn remove_dependency(&mut self, task: &str, depends_on: &str) {
        if let Entry::Occupied(mut e) = self.edges.entry(task.to_string()) {
            e.get_mut().remove(depends_on);
            if e.get().is_empty() {
                e.remove_entry();
            }
        }
        if let Entry::Occupied(mut e) = self.reverse_edges.entry(depends_on.to_string()) {
            e.get_mut().remove(task);
            if e.get().is_empty() {
                e.remove_entry();
            }
        }
    }

    /// Tasks waiting for `resolved`, whether or not they wait on anything else.
    pub fn get_waiting_tasks(&self, resolved: &str) -> Vec<String> {
        self.reverse_edges
            .get(resolved)
            .map(|waiting| waiting.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn has_dependencies(&self, task: &str) -> bool {
        self.edges.get(task).is_some_and(|deps| !deps.is_empty())
    }

    pub fn get_dependencies(&self, task: &str) -> Vec<String> {
        self.edges
            .get(task)
            .map(|deps| deps.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Find one cycle among the remaining edges.
    ///
    /// The path starts and ends with the same task, following dependency
    /// direction: `[a, b, a]` means a waits for b and b waits for a.
    pub fn detect_cycle(&self) -> Option<Vec<String>> {
        let mut starts: Vec<&str> = self.edges.keys().map(String::as_str).collect();
        starts.sort_unstable();

        let mut color: HashMap<&str, Color> = HashMap::new();
        let mut path: Vec<&str> = Vec::new();
        for start in starts {
            if color.contains_key(start) {
                continue;
            }
            if let Some(cycle) = self.visit(start, &mut color, &mut path) {
                return Some(cycle);
            }
        }
        None
    }

    fn visit<'a>(
        &'a self,
        node: &'a str,
        color: &mut HashMap<&'a str, Color>,
        path: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        color.insert(node, Color::Gray);
        path.push(node);

        if let Some(deps) = self.edges.get(node) {
            let mut deps: Vec<&str> = deps.iter().map(String::as_str).collect();
            deps.sort_unstable();
            for dep in deps {
                match color.get(dep) {
                    Some(Color::Gray) => {
                        let start = path.iter().position(|n| *n == dep)?;
                        let mut cycle: Vec<String> =
                            path[start..].iter().map(|n| n.to_string()).collect();
                        cycle.push(dep.to_string());
                        return Some(cycle);
                    }
                    Some(Color::Black) => {}
                    None => {
                        if let Some(cycle) = self.visit(dep, color, path) {
                            return Some(cycle);
                        }
                    }
                }
            }
        }

        path.pop();
        color.insert(node, Color::Black);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_graph_is_empty() {
        let graph = DependencyGraph::new();
        assert!(!graph.has_dependencies("op1"));
    }

    #[test]
    fn add_dependency_creates_both_edges() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("op2", "op1");

        assert!(graph.has_dependencies("op2"));
        assert!(!graph.has_dependencies("op1"));
        assert_eq!(graph.get_dependencies("op2"), vec!["op1"]);
        assert_eq!(graph.get_waiting_tasks("op1"), vec!["op2"]);
    }

    #[test]
    fn remove_dependency_removes_both_edges() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("op2", "op1");
        graph.remove_dependency("op2", "op1");

        assert!(!graph.has_dependencies("op2"));
        assert!(graph.get_waiting_tasks("op1").is_empty());
    }

    #[test]
    fn duplicate_dependency_counts_once() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("op3", "op1");
        graph.add_dependency("op3", "op1");
        graph.add_dependency("op3", "op2");
        graph.remove_dependency("op3", "op1");

        assert_eq!(graph.get_dependencies("op3"), vec!["op2"]);
    }

    #[test]
    fn detect_self_dependency() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("op1", "op1");
        assert_eq!(graph.detect_cycle(), Some(vec!["op1".into(), "op1".into()]));
    }

    #[test]
    fn detect_three_node_cycle() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("op1", "op3");
        graph.add_dependency("op2", "op1");
        graph.add_dependency("op3", "op2");

        let cycle = graph.detect_cycle().unwrap();
        assert_eq!(cycle, vec!["op1", "op3", "op2", "op1"]);
    }

    #[test]
    fn detect_cycle_behind_a_tail() {
        let mut graph = DependencyGraph::new();
        // a -> b -> c -> d -> b
        graph.add_dependency("a", "b");
        graph.add_dependency("b", "c");
        graph.add_dependency("c", "d");
        graph.add_dependency("d", "b");

        let cycle = graph.detect_cycle().unwrap();
        assert_eq!(cycle, vec!["b", "c", "d", "b"]);
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let mut graph = DependencyGraph::new();
        //     a
        //    / \
        //   b   c
        //    \ /
        //     d
        graph.add_dependency("b", "a");
        graph.add_dependency("c", "a");
        graph.add_dependency("d", "b");
        graph.add_dependency("d", "c");
        graph.add_dependency("d", "a");

        assert!(graph.detect_cycle().is_none());
    }
}
