//! Outcome model: what a task invocation hands back to the scheduler.
//!
//! The scheduler branches on the tag instead of probing the value. An
//! `Immediate` value is written to the store during the scan; a `Deferred`
//! one joins the current wave.

use std::future::Future;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;

use crate::error::TaskError;

/// Deferred task result, polled on the runtime until it settles.
pub type Deferred = BoxFuture<'static, Result<Value, TaskError>>;

pub enum Outcome {
    Immediate(Value),
    Deferred(Deferred),
}

impl Outcome {
    pub fn ready(value: impl Into<Value>) -> Self {
        Outcome::Immediate(value.into())
    }

    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<Value, TaskError>> + Send + 'static,
    {
        Outcome::Deferred(future.boxed())
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Outcome::Deferred(_))
    }
}

impl std::fmt::Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Immediate(v) => f.debug_tuple("Immediate").field(v).finish(),
            Outcome::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ready_is_immediate() {
        let o = Outcome::ready("hej");
        assert!(!o.is_deferred());
        assert!(matches!(o, Outcome::Immediate(v) if v == json!("hej")));
    }

    #[tokio::test]
    async fn deferred_resolves_to_value() {
        let o = Outcome::deferred(async { Ok(json!(1)) });
        assert!(o.is_deferred());
        let Outcome::Deferred(fut) = o else {
            panic!("expected deferred");
        };
        assert_eq!(fut.await.unwrap(), json!(1));
    }
}
