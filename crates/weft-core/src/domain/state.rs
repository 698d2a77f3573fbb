//! Run state of a single resolve call.
//!
//! # Transitions
//! - running: waves are still being scanned
//! - completed: every task has a value
//! - failed: validation error, deadlock or task failure

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunState::Running => "running",
            RunState::Completed => "completed",
            RunState::Failed => "failed",
        };
        f.write_str(s)
    }
}
