//! weft-core
//!
//! Resolve a map of named tasks whose order is implied by their declared
//! dependencies. Independent tasks run concurrently; the result is one value
//! per task name.
//!
//! # Modules
//! - **domain**: Task / TaskMap / Params / Outcome / ResultStore / RunState
//! - **signature**: parameter names from signature text
//! - **adapter**: completion-callback callables turned into value-returning ones
//! - **graph**: dependency lists and validation (DependencyGraph)
//! - **scheduler**: launches ready tasks wave by wave and joins them
//! - **resolver**: public entry points (`resolve`, `Resolver`)
//!
//! # Example
//! ```ignore
//! use weft_core::{resolve, Outcome, Task, TaskMap};
//!
//! let results = resolve(
//!     TaskMap::new()
//!         .with("config", Task::value(serde_json::json!({ "db": "mem" })))
//!         .with("db", Task::inject(["config"], |a| Ok(Outcome::ready(a[0]["db"].clone()))))
//!         .with("cache", Task::value("warm"))
//!         .with("app", Task::classic(["db", "cache"], |r| {
//!             Ok(Outcome::ready(format!("{}+{}", r["db"], r["cache"])))
//!         })),
//! )
//! .await?;
//! ```

pub mod adapter;
pub mod config;
pub mod domain;
pub mod error;
pub mod graph;
pub mod handler;
pub mod resolver;
pub mod signature;

mod scheduler;

pub use adapter::Completion;
pub use config::ResolverConfig;
pub use domain::{Outcome, Params, ResultStore, RunState, Task, TaskMap};
pub use error::{ResolveError, SignatureError, TaskError};
pub use graph::DependencyGraph;
pub use handler::TaskHandler;
pub use resolver::{Resolver, resolve};
