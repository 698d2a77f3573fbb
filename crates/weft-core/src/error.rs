use serde_json::Value;
use thiserror::Error;

/// Failure of a whole `resolve` call.
///
/// The first three variants come from the graph itself; `Task` carries the
/// failure value of a single task unchanged.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Dependency {0} not defined")]
    DependencyNotDefined(String),

    #[error("Circular dependency for {0}")]
    CircularDependency(String),

    #[error("Unresolvable dependencies: {}", .0.join(", "))]
    Unresolvable(Vec<String>),

    #[error(transparent)]
    Task(#[from] TaskError),
}

impl ResolveError {
    /// The task failure value, if this error came from a task.
    pub fn task_error(&self) -> Option<&TaskError> {
        match self {
            ResolveError::Task(e) => Some(e),
            _ => None,
        }
    }
}

/// TaskError is the failure value produced by a single task.
///
/// A task may fail with any JSON value, the same way a completion callback
/// passes an arbitrary first argument. String values display as themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskError {
    value: Value,
}

impl TaskError {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub(crate) fn panicked(task: &str) -> Self {
        Self::new(format!("task {task} panicked"))
    }
}

impl From<String> for TaskError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for TaskError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl std::fmt::Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

impl std::error::Error for TaskError {}

/// Errors from reading parameter names out of signature text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("unable to extract parameter names from `{0}`")]
    Unrecognized(String),
}
