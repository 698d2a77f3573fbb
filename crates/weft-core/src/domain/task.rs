//! Task declarations and the ordered task mapping.
//!
//! # Forms
//! - **Value**: 解決済みの定数（依存なし）
//! - **Pending**: 既に走っている deferred 値（依存なし、最初の wave で join）
//! - **Injected**: 依存名の値を宣言順に受け取る callable
//! - **Classic**: 依存名を宣言し、Result Store 全体のスナップショットを受け取る callable
//!
//! Completion style (the legacy `callback(err, value)` convention) is an
//! explicit choice of constructor, never inferred from a name alone.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;

use super::outcome::{Deferred, Outcome};
use super::params::Params;
use super::store::ResultStore;
use crate::adapter::Completion;
use crate::error::TaskError;
use crate::handler::TaskHandler;

/// Type-erased callable receiving `I`.
pub(crate) type Invoke<I> = Arc<dyn Fn(I) -> Result<Outcome, TaskError> + Send + Sync>;

/// Type-erased completion-style callable receiving `I`.
pub(crate) type InvokeWithCompletion<I> =
    Arc<dyn Fn(I, Completion) -> Result<(), TaskError> + Send + Sync>;

pub(crate) enum Body<I> {
    Direct(Invoke<I>),
    Completion(InvokeWithCompletion<I>),
}

impl<I> Body<I> {
    pub(crate) fn uses_completion(&self) -> bool {
        matches!(self, Body::Completion(_))
    }
}

/// Injected form: receives the values of `params` in declared order.
pub struct Injected {
    pub(crate) params: Params,
    pub(crate) body: Body<Vec<Value>>,
}

impl Injected {
    pub fn params(&self) -> &Params {
        &self.params
    }
}

/// Classic form: declares `deps` and receives the whole result store.
pub struct Classic {
    pub(crate) deps: Vec<String>,
    pub(crate) body: Body<ResultStore>,
}

impl Classic {
    pub fn deps(&self) -> &[String] {
        &self.deps
    }
}

/// One entry of a [`TaskMap`].
pub enum Task {
    Value(Value),
    Pending(Deferred),
    Injected(Injected),
    Classic(Classic),
}

impl Task {
    pub fn value(value: impl Into<Value>) -> Self {
        Task::Value(value.into())
    }

    /// A deferred value with no dependencies.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<Value, TaskError>> + Send + 'static,
    {
        Task::Pending(future.boxed())
    }

    /// Injected task: `f` receives the resolved values of `params`.
    ///
    /// # Example
    /// ```ignore
    /// Task::inject(["op1", "op2"], |args| {
    ///     Ok(Outcome::ready(format!("{} {}", args[0], args[1])))
    /// })
    /// ```
    pub fn inject<P, F>(params: P, f: F) -> Self
    where
        P: Into<Params>,
        F: Fn(Vec<Value>) -> Result<Outcome, TaskError> + Send + Sync + 'static,
    {
        Task::Injected(Injected {
            params: params.into(),
            body: Body::Direct(Arc::new(f)),
        })
    }

    /// Injected task using a completion callback instead of returning a value.
    ///
    /// A trailing parameter named like a callback (`callback`, `cb`) is not a
    /// dependency and is dropped when the graph is built.
    pub fn inject_callback<P, F>(params: P, f: F) -> Self
    where
        P: Into<Params>,
        F: Fn(Vec<Value>, Completion) -> Result<(), TaskError> + Send + Sync + 'static,
    {
        Task::Injected(Injected {
            params: params.into(),
            body: Body::Completion(Arc::new(f)),
        })
    }

    /// Classic task: `f` receives a snapshot of every value resolved so far.
    pub fn classic<D, S, F>(deps: D, f: F) -> Self
    where
        D: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(ResultStore) -> Result<Outcome, TaskError> + Send + Sync + 'static,
    {
        Task::Classic(Classic {
            deps: deps.into_iter().map(Into::into).collect(),
            body: Body::Direct(Arc::new(f)),
        })
    }

    /// Classic task whose callable takes the completion callback first.
    ///
    /// Extra success arguments collapse into an array.
    pub fn classic_callback<D, S, F>(deps: D, f: F) -> Self
    where
        D: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(Completion, ResultStore) -> Result<(), TaskError> + Send + Sync + 'static,
    {
        Task::Classic(Classic {
            deps: deps.into_iter().map(Into::into).collect(),
            body: Body::Completion(Arc::new(move |store, done| f(done, store))),
        })
    }

    /// Injected task backed by a [`TaskHandler`].
    pub fn handler<P>(params: P, handler: Arc<dyn TaskHandler>) -> Self
    where
        P: Into<Params>,
    {
        Task::inject(params, move |inputs| {
            let handler = Arc::clone(&handler);
            Ok(Outcome::deferred(async move { handler.handle(inputs).await }))
        })
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Task::Injected(_) | Task::Classic(_))
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Task::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Task::Pending(_) => f.write_str("Pending(..)"),
            Task::Injected(i) => f
                .debug_struct("Injected")
                .field("params", &i.params)
                .field("completion", &i.body.uses_completion())
                .finish(),
            Task::Classic(c) => f
                .debug_struct("Classic")
                .field("deps", &c.deps)
                .field("completion", &c.body.uses_completion())
                .finish(),
        }
    }
}

/// Ordered mapping of task name to [`Task`].
///
/// Iteration order is first-insertion order. Inserting an existing name
/// replaces the task but keeps its position.
#[derive(Debug, Default)]
pub struct TaskMap {
    order: Vec<String>,
    tasks: HashMap<String, Task>,
}

impl TaskMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, task: Task) -> Option<Task> {
        let name = name.into();
        let prev = self.tasks.insert(name.clone(), task);
        if prev.is_none() {
            self.order.push(name);
        }
        prev
    }

    /// Builder-style [`TaskMap::insert`].
    pub fn with(mut self, name: impl Into<String>, task: Task) -> Self {
        self.insert(name, task);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn into_ordered(self) -> Vec<(String, Task)> {
        let mut tasks = self.tasks;
        self.order
            .into_iter()
            .filter_map(|name| tasks.remove(&name).map(|t| (name, t)))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, Task)> for TaskMap {
    fn from_iter<T: IntoIterator<Item = (S, Task)>>(iter: T) -> Self {
        let mut map = TaskMap::new();
        for (name, task) in iter {
            map.insert(name, task);
        }
        map
    }
}

impl<S: Into<String>, const N: usize> From<[(S, Task); N]> for TaskMap {
    fn from(entries: [(S, Task); N]) -> Self {
        entries.into_iter().collect()
    }
}
