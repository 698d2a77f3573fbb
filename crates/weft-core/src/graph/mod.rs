//! Graph builder: dependency lists, adaptation, and up-front validation.
//!
//! Runs once before the scheduler. No task executes until the whole graph is
//! known to be structurally sound: every dependency names a declared task and
//! no task lists itself. Longer cycles are left to the scheduler, which
//! reports them as unresolvable.

mod dependency;

pub use self::dependency::DependencyGraph;

use std::collections::HashMap;

use serde_json::Value;
use tracing::trace;

use crate::adapter::{self, ResultShape};
use crate::config::ResolverConfig;
use crate::domain::outcome::Deferred;
use crate::domain::store::ResultStore;
use crate::domain::task::{Body, Invoke, Task, TaskMap};
use crate::error::ResolveError;

/// A task ready for scheduling; completion-style bodies are already adapted.
pub(crate) enum NodeKind {
    Value(Value),
    Pending(Deferred),
    Injected(Invoke<Vec<Value>>),
    Classic(Invoke<ResultStore>),
}

pub(crate) struct Node {
    pub name: String,
    pub deps: Vec<String>,
    pub kind: NodeKind,
}

/// Frozen dependency structure plus the adapted tasks, in declaration order.
pub(crate) struct Plan {
    pub nodes: Vec<Node>,
    pub index: HashMap<String, usize>,
    pub graph: DependencyGraph,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

pub(crate) fn build(tasks: TaskMap, config: &ResolverConfig) -> Result<Plan, ResolveError> {
    let nodes: Vec<Node> = tasks
        .into_ordered()
        .into_iter()
        .map(|(name, task)| node(name, task, config))
        .collect();

    let index: HashMap<String, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.name.clone(), i))
        .collect();

    validate(&nodes, &index)?;

    let mut graph = DependencyGraph::new();
    for n in &nodes {
        for dep in &n.deps {
            graph.add_dependency(&n.name, dep);
        }
    }

    Ok(Plan {
        nodes,
        index,
        graph,
    })
}

fn node(name: String, task: Task, config: &ResolverConfig) -> Node {
    let (deps, kind) = match task {
        Task::Value(v) => (Vec::new(), NodeKind::Value(v)),
        Task::Pending(fut) => (Vec::new(), NodeKind::Pending(fut)),
        Task::Injected(injected) => {
            let mut deps = injected.params.into_names();
            let invoke = match injected.body {
                Body::Direct(f) => f,
                Body::Completion(f) => {
                    if deps.last().is_some_and(|p| config.is_callback_name(p)) {
                        deps.pop();
                    }
                    adapter::adapt(&name, f, ResultShape::Single)
                }
            };
            (deps, NodeKind::Injected(invoke))
        }
        Task::Classic(classic) => {
            let invoke = match classic.body {
                Body::Direct(f) => f,
                Body::Completion(f) => adapter::adapt(&name, f, ResultShape::Collapse),
            };
            (classic.deps, NodeKind::Classic(invoke))
        }
    };
    trace!(task = %name, ?deps, "dependencies");
    Node { name, deps, kind }
}

fn validate(nodes: &[Node], index: &HashMap<String, usize>) -> Result<(), ResolveError> {
    for n in nodes {
        for dep in &n.deps {
            if !index.contains_key(dep) {
                return Err(ResolveError::DependencyNotDefined(dep.clone()));
            }
            if *dep == n.name {
                return Err(ResolveError::CircularDependency(n.name.clone()));
            }
        }
    }
    Ok(())
}
