//! Wavefront scheduler.
//!
//! Each wave is a single pass over the ready set in declaration order.
//! Immediate results are written to the store on the spot. A task they
//! release joins the current pass only if it is declared after the task being
//! launched; an earlier one waits for the next wave. Deferred results are
//! spawned and collected into the wave's batch, which is joined as a whole
//! before the next wave starts.
//!
//! Readiness is tracked on the [`DependencyGraph`]: resolving a task removes
//! its edges, and a task left with no forward edges joins the ready set.
//! If a wave launches nothing deferred and releases nothing for the next
//! wave while tasks are still missing, the run is stalled and fails as
//! unresolvable.

use std::collections::{BTreeSet, HashMap};
use std::panic::{self, AssertUnwindSafe};

use futures::future::try_join_all;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::domain::outcome::{Deferred, Outcome};
use crate::domain::state::RunState;
use crate::domain::store::ResultStore;
use crate::error::{ResolveError, TaskError};
use crate::domain::task::Invoke;
use crate::graph::{DependencyGraph, NodeKind, Plan};

type Batch = Vec<(usize, JoinHandle<Result<Value, TaskError>>)>;

pub(crate) struct Scheduler {
    names: Vec<String>,
    deps: Vec<Vec<String>>,
    kinds: Vec<Option<NodeKind>>,
    index: HashMap<String, usize>,
    graph: DependencyGraph,
    store: ResultStore,
    ready: BTreeSet<usize>,
    state: RunState,
    wave: usize,
}

impl Scheduler {
    pub fn new(plan: Plan) -> Self {
        let n = plan.len();
        let mut names = Vec::with_capacity(n);
        let mut deps = Vec::with_capacity(n);
        let mut kinds = Vec::with_capacity(n);
        for node in plan.nodes {
            names.push(node.name);
            deps.push(node.deps);
            kinds.push(Some(node.kind));
        }

        let ready = names
            .iter()
            .enumerate()
            .filter(|(_, name)| !plan.graph.has_dependencies(name))
            .map(|(i, _)| i)
            .collect();

        Self {
            names,
            deps,
            kinds,
            index: plan.index,
            graph: plan.graph,
            store: ResultStore::with_capacity(n),
            ready,
            state: RunState::Running,
            wave: 0,
        }
    }

    /// Drive the run to a terminal state.
    pub async fn run(mut self) -> Result<ResultStore, ResolveError> {
        let result = self.drive().await;
        self.state = match result {
            Ok(_) => RunState::Completed,
            Err(_) => RunState::Failed,
        };
        debug!(state = %self.state, waves = self.wave, "run finished");
        result
    }

    async fn drive(&mut self) -> Result<ResultStore, ResolveError> {
        loop {
            self.wave += 1;
            let batch = self.scan()?;
            debug!(
                wave = self.wave,
                deferred = batch.len(),
                resolved = self.store.len(),
                total = self.names.len(),
                "wave scanned"
            );

            if batch.is_empty() {
                if self.store.len() == self.names.len() {
                    return Ok(std::mem::take(&mut self.store));
                }
                if self.ready.is_empty() {
                    return Err(self.stalled());
                }
                continue;
            }

            let mut settled = join(batch, &self.names).await?;
            settled.sort_unstable_by_key(|(i, _)| *i);
            for (i, value) in settled {
                self.settle(i, value);
            }
        }
    }

    /// Launch everything ready, in declaration order.
    ///
    /// Tasks released behind the scan position are left in `ready` for the
    /// next wave.
    fn scan(&mut self) -> Result<Batch, ResolveError> {
        let mut batch = Batch::new();
        let mut held = BTreeSet::new();
        let mut cursor = 0;
        while let Some(i) = self.ready.pop_first() {
            if i < cursor {
                held.insert(i);
                continue;
            }
            cursor = i;
            let Some(kind) = self.kinds[i].take() else {
                continue;
            };
            trace!(task = %self.names[i], wave = self.wave, "launching");

            let outcome = match kind {
                NodeKind::Value(v) => Outcome::Immediate(v),
                NodeKind::Pending(fut) => Outcome::Deferred(fut),
                NodeKind::Injected(f) => {
                    let inputs = self.deps[i]
                        .iter()
                        .map(|d| self.store[d.as_str()].clone())
                        .collect();
                    invoke(&self.names[i], &f, inputs)?
                }
                NodeKind::Classic(f) => invoke(&self.names[i], &f, self.store.clone())?,
            };

            match outcome {
                Outcome::Immediate(v) => self.settle(i, v),
                Outcome::Deferred(fut) => batch.push((i, spawn(fut))),
            }
        }
        self.ready = held;
        Ok(batch)
    }

    /// Write a value and release the tasks waiting on it.
    fn settle(&mut self, i: usize, value: Value) {
        let name = &self.names[i];
        self.store.insert(name, value);

        for waiting in self.graph.get_waiting_tasks(name) {
            self.graph.remove_dependency(&waiting, name);
            if !self.graph.has_dependencies(&waiting)
                && let Some(&w) = self.index.get(&waiting)
            {
                self.ready.insert(w);
            }
        }
    }

    fn stalled(&self) -> ResolveError {
        let missing: Vec<String> = self
            .names
            .iter()
            .filter(|n| !self.store.contains(n))
            .cloned()
            .collect();
        let cycle = self.graph.detect_cycle();
        warn!(?missing, ?cycle, "no progress, dependencies cannot be satisfied");
        ResolveError::Unresolvable(missing)
    }
}

/// Call a task body, turning a panic into a failure of that task.
fn invoke<I>(name: &str, f: &Invoke<I>, input: I) -> Result<Outcome, TaskError> {
    panic::catch_unwind(AssertUnwindSafe(|| f(input)))
        .unwrap_or_else(|_| Err(TaskError::panicked(name)))
}

fn spawn(fut: Deferred) -> JoinHandle<Result<Value, TaskError>> {
    tokio::spawn(fut)
}

/// Wait for the whole batch; the first failure observed wins.
///
/// Handles still running when that happens are detached, not aborted.
async fn join(batch: Batch, names: &[String]) -> Result<Vec<(usize, Value)>, TaskError> {
    try_join_all(batch.into_iter().map(|(i, handle)| async move {
        match handle.await {
            Ok(result) => result.map(|v| (i, v)),
            Err(e) if e.is_panic() => Err(TaskError::panicked(&names[i])),
            Err(_) => Err(TaskError::new(format!("task {} was cancelled", names[i]))),
        }
    }))
    .await
}
