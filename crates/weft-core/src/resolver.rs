//! Entry points for resolving a task map.
//!
//! 1. `graph::build` fixes the dependency lists and validates the structure
//!    before anything runs.
//! 2. The scheduler runs waves until the result store is complete.

use tracing::Instrument;

use crate::config::ResolverConfig;
use crate::domain::store::ResultStore;
use crate::domain::task::TaskMap;
use crate::error::ResolveError;
use crate::graph;
use crate::scheduler::Scheduler;

/// Resolves task maps with a fixed [`ResolverConfig`].
///
/// Must be driven inside a tokio runtime: deferred task results are spawned
/// onto it.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve every task and return one value per task name.
    ///
    /// `None` and an empty map both resolve to an empty store. On failure no
    /// partial results are returned.
    pub async fn resolve<T>(&self, tasks: T) -> Result<ResultStore, ResolveError>
    where
        T: Into<Option<TaskMap>>,
    {
        let Some(tasks) = tasks.into() else {
            return Ok(ResultStore::new());
        };
        if tasks.is_empty() {
            return Ok(ResultStore::new());
        }

        let span = tracing::debug_span!(
            "resolve",
            label = self.config.label.as_deref().unwrap_or_default(),
            tasks = tasks.len(),
        );
        async {
            let plan = graph::build(tasks, &self.config)?;
            Scheduler::new(plan).run().await
        }
        .instrument(span)
        .await
    }
}

/// Resolve `tasks` with the default configuration.
///
/// # Example
/// ```ignore
/// let results = weft_core::resolve(
///     TaskMap::new()
///         .with("op1", Task::value("hej"))
///         .with("op2", Task::inject(["op1"], |a| {
///             Ok(Outcome::ready(format!("{} hov", a[0].as_str().unwrap_or_default())))
///         })),
/// )
/// .await?;
/// assert_eq!(results["op2"], "hej hov");
/// ```
pub async fn resolve<T>(tasks: T) -> Result<ResultStore, ResolveError>
where
    T: Into<Option<TaskMap>>,
{
    Resolver::default().resolve(tasks).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::outcome::Outcome;
    use crate::domain::task::Task;
    use serde_json::json;

    #[tokio::test]
    async fn none_resolves_to_empty_store() {
        let store = resolve(None::<TaskMap>).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn empty_map_resolves_to_empty_store() {
        let store = resolve(TaskMap::new()).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn custom_callback_names_are_honored() {
        let config = ResolverConfig {
            label: Some("boot".into()),
            callback_names: vec!["done".into()],
        };
        let tasks = TaskMap::new()
            .with("op1", Task::value("hej"))
            .with(
                "op2",
                Task::inject_callback(["op1", "done"], |a, done| {
                    done.ok(format!("{} hov", a[0].as_str().unwrap_or_default()));
                    Ok(())
                }),
            );

        let store = Resolver::new(config).resolve(tasks).await.unwrap();
        assert_eq!(store["op2"], json!("hej hov"));
    }

    #[tokio::test]
    async fn validation_runs_before_any_task() {
        let ran = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = ran.clone();
        let tasks = TaskMap::new()
            .with(
                "op1",
                Task::inject(Vec::<String>::new(), move |_| {
                    flag.store(true, std::sync::atomic::Ordering::SeqCst);
                    Ok(Outcome::ready(1))
                }),
            )
            .with("op2", Task::inject(["op3"], |_| Ok(Outcome::ready(2))));

        let err = resolve(tasks).await.unwrap_err();
        assert_eq!(err.to_string(), "Dependency op3 not defined");
        assert!(!ran.load(std::sync::atomic::Ordering::SeqCst));
    }
}
