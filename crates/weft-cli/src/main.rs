use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::time::{Duration, sleep};
use tracing_subscriber::EnvFilter;
use weft_core::{
    Completion, Outcome, Params, Resolver, ResolverConfig, Task, TaskError, TaskHandler, TaskMap,
};

/// Loads the "database" once the config is known.
struct ConnectHandler;

#[async_trait]
impl TaskHandler for ConnectHandler {
    async fn handle(&self, inputs: Vec<Value>) -> Result<Value, TaskError> {
        let url = inputs[0]["db"].as_str().unwrap_or("mem://");
        sleep(Duration::from_millis(20)).await;
        Ok(json!({ "connected": url }))
    }
}

/// 旧来の callback(err, value) 形式の API
fn warm_cache(size: u64, done: Completion) {
    tokio::spawn(async move {
        sleep(Duration::from_millis(10)).await;
        done.ok(json!({ "entries": size }));
    });
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config() -> anyhow::Result<ResolverConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(ResolverConfig::default());
    };
    let raw = std::fs::read_to_string(&path).with_context(|| format!("read config {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("parse config {path}"))
}

fn demo_tasks() -> anyhow::Result<TaskMap> {
    Ok(TaskMap::new()
        .with(
            "config",
            Task::pending(async {
                sleep(Duration::from_millis(10)).await;
                Ok(json!({ "db": "postgres://localhost/app", "cache_size": 128 }))
            }),
        )
        .with("db", Task::handler(["config"], Arc::new(ConnectHandler)))
        .with(
            "cache",
            Task::inject_callback(Params::from_signature("(config, callback) => {}")?, |a, cb| {
                warm_cache(a[0]["cache_size"].as_u64().unwrap_or(0), cb);
                Ok(())
            }),
        )
        .with(
            "app",
            Task::classic(["db", "cache"], |r| {
                Ok(Outcome::ready(json!({
                    "db": r["db"]["connected"],
                    "cache": r["cache"]["entries"],
                })))
            }),
        ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config()?;
    let resolver = Resolver::new(config);
    let results = resolver.resolve(demo_tasks()?).await?;

    tracing::info!(tasks = results.len(), "resolved");
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
