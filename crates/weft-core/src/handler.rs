use async_trait::async_trait;
use serde_json::Value;

use crate::error::TaskError;

/// A struct-backed task body.
///
/// Receives the resolved values of its declared parameters, in order.
/// Register one with [`Task::handler`](crate::Task::handler).
///
/// # Example
/// ```ignore
/// struct Greet;
///
/// #[async_trait]
/// impl TaskHandler for Greet {
///     async fn handle(&self, inputs: Vec<Value>) -> Result<Value, TaskError> {
///         Ok(json!(format!("hello {}", inputs[0])))
///     }
/// }
/// ```
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn handle(&self, inputs: Vec<Value>) -> Result<Value, TaskError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Concat;

    #[async_trait]
    impl TaskHandler for Concat {
        async fn handle(&self, inputs: Vec<Value>) -> Result<Value, TaskError> {
            let parts: Vec<&str> = inputs.iter().filter_map(Value::as_str).collect();
            Ok(json!(parts.join(" ")))
        }
    }

    #[tokio::test]
    async fn handler_receives_inputs_in_order() {
        let v = Concat.handle(vec![json!("hej"), json!("hov")]).await.unwrap();
        assert_eq!(v, json!("hej hov"));
    }
}
