//! Domain model (tasks, parameters, outcomes, result store, run state).

pub mod outcome;
pub mod params;
pub mod state;
pub mod store;
pub mod task;

pub use self::outcome::{Deferred, Outcome};
pub use self::params::Params;
pub use self::state::RunState;
pub use self::store::ResultStore;
pub use self::task::{Classic, Injected, Task, TaskMap};
