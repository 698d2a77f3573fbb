//! Completion adapter: turns completion-style callables into value-producing ones.
//!
//! A completion-style task is handed a [`Completion`] and reports through it
//! with node-style arguments: `(err, value, ...)`. The adapter gives such a
//! task the ordinary [`Outcome`] shape so the scheduler never sees the
//! difference.
//!
//! [`Completion::fail`] always fails the task, whatever the value. Raw
//! [`Completion::call`] arguments go through the loose truthiness check on
//! the error slot.
//!
//! # Result shapes
//! - `Single`: the second argument is the value (`null` when absent).
//! - `Collapse`: with more than two arguments, everything after the first is
//!   collected into an array.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::oneshot;

use crate::domain::outcome::Outcome;
use crate::domain::task::{Invoke, InvokeWithCompletion};
use crate::error::TaskError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResultShape {
    Single,
    Collapse,
}

/// Single-use completion callback handed to completion-style tasks.
///
/// Dropping it without calling fails the task.
#[derive(Debug)]
pub struct Completion {
    tx: oneshot::Sender<Report>,
}

#[derive(Debug)]
enum Report {
    Args(Vec<Value>),
    Failed(Value),
}

impl Completion {
    fn channel() -> (Self, oneshot::Receiver<Report>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Report with raw node-style arguments; `args[0]` is the error slot.
    pub fn call(self, args: Vec<Value>) {
        self.send(Report::Args(args));
    }

    pub fn ok(self, value: impl Into<Value>) {
        self.call(vec![Value::Null, value.into()]);
    }

    /// Fail the task with `err`, even when `err` is falsy.
    pub fn fail(self, err: impl Into<Value>) {
        self.send(Report::Failed(err.into()));
    }

    fn send(self, report: Report) {
        // the receiver is gone once the run has failed elsewhere
        let _ = self.tx.send(report);
    }
}

/// Loose truthiness: `null`, `false`, `0` and `""` are falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Convert the callback arguments into the task's result.
pub(crate) fn settle(args: Vec<Value>, shape: ResultShape) -> Result<Value, TaskError> {
    let mut args = args.into_iter();
    if let Some(first) = args.next()
        && is_truthy(&first)
    {
        return Err(TaskError::new(first));
    }

    let mut rest: Vec<Value> = args.collect();
    if shape == ResultShape::Collapse && rest.len() > 1 {
        return Ok(Value::Array(rest));
    }
    if rest.is_empty() {
        return Ok(Value::Null);
    }
    Ok(rest.swap_remove(0))
}

/// Wrap `f` so that it returns a deferred outcome fed by its completion.
pub(crate) fn adapt<I>(task: &str, f: InvokeWithCompletion<I>, shape: ResultShape) -> Invoke<I>
where
    I: Send + 'static,
{
    let task: Arc<str> = Arc::from(task);
    Arc::new(move |inputs: I| {
        let (done, rx) = Completion::channel();
        f(inputs, done)?;

        let task = Arc::clone(&task);
        Ok(Outcome::deferred(async move {
            match rx.await {
                Ok(Report::Args(args)) => settle(args, shape),
                Ok(Report::Failed(err)) => Err(TaskError::new(err)),
                Err(_) => Err(TaskError::new(format!(
                    "completion callback for {task} was never called"
                ))),
            }
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(null), false)]
    #[case(json!(false), false)]
    #[case(json!(0), false)]
    #[case(json!(0.0), false)]
    #[case(json!(""), false)]
    #[case(json!(true), true)]
    #[case(json!(1), true)]
    #[case(json!("boom"), true)]
    #[case(json!([]), true)]
    #[case(json!({}), true)]
    fn truthiness(#[case] v: Value, #[case] expected: bool) {
        assert_eq!(is_truthy(&v), expected);
    }

    #[test]
    fn settle_single_takes_second_argument() {
        let v = settle(vec![json!(null), json!("a"), json!("b")], ResultShape::Single).unwrap();
        assert_eq!(v, json!("a"));
    }

    #[test]
    fn settle_collapse_gathers_remaining_arguments() {
        let v = settle(vec![json!(null), json!("a"), json!("b")], ResultShape::Collapse).unwrap();
        assert_eq!(v, json!(["a", "b"]));

        let v = settle(vec![json!(null), json!("a")], ResultShape::Collapse).unwrap();
        assert_eq!(v, json!("a"));
    }

    #[test]
    fn settle_without_value_is_null() {
        assert_eq!(settle(vec![], ResultShape::Single).unwrap(), Value::Null);
        assert_eq!(settle(vec![json!(0)], ResultShape::Collapse).unwrap(), Value::Null);
    }

    #[test]
    fn settle_truthy_first_argument_fails_with_it() {
        let err = settle(vec![json!("boom"), json!("ignored")], ResultShape::Single).unwrap_err();
        assert_eq!(err.value(), &json!("boom"));
    }

    #[tokio::test]
    async fn adapted_callable_resolves_through_completion() {
        let f: InvokeWithCompletion<Vec<Value>> = Arc::new(|args: Vec<Value>, done: Completion| -> Result<(), TaskError> {
            let input = args[0].as_str().unwrap_or_default().to_string();
            tokio::spawn(async move { done.ok(format!("{input} hov")) });
            Ok(())
        });

        let adapted = adapt("op2", f, ResultShape::Single);
        let Outcome::Deferred(fut) = adapted(vec![json!("hej")]).unwrap() else {
            panic!("expected deferred outcome");
        };
        assert_eq!(fut.await.unwrap(), json!("hej hov"));
    }

    #[tokio::test]
    async fn dropped_completion_fails_the_task() {
        let f: InvokeWithCompletion<()> = Arc::new(|_: (), _done: Completion| -> Result<(), TaskError> { Ok(()) });
        let adapted = adapt("op9", f, ResultShape::Single);
        let Outcome::Deferred(fut) = adapted(()).unwrap() else {
            panic!("expected deferred outcome");
        };
        let err = fut.await.unwrap_err();
        assert_eq!(err.to_string(), "completion callback for op9 was never called");
    }

    #[rstest]
    #[case(json!(0))]
    #[case(json!(""))]
    #[case(json!(null))]
    #[case(json!(false))]
    #[tokio::test]
    async fn explicit_fail_fails_even_with_falsy_value(#[case] err: Value) {
        let reported = err.clone();
        let f: InvokeWithCompletion<()> = Arc::new(move |_: (), done: Completion| -> Result<(), TaskError> {
            done.fail(reported.clone());
            Ok(())
        });
        let adapted = adapt("op1", f, ResultShape::Single);
        let Outcome::Deferred(fut) = adapted(()).unwrap() else {
            panic!("expected deferred outcome");
        };
        assert_eq!(fut.await.unwrap_err().value(), &err);
    }

    #[tokio::test]
    async fn falsy_error_slot_in_raw_call_is_success() {
        let f: InvokeWithCompletion<()> = Arc::new(|_: (), done: Completion| -> Result<(), TaskError> {
            done.call(vec![json!(0), json!("fine")]);
            Ok(())
        });
        let adapted = adapt("op1", f, ResultShape::Single);
        let Outcome::Deferred(fut) = adapted(()).unwrap() else {
            panic!("expected deferred outcome");
        };
        assert_eq!(fut.await.unwrap(), json!("fine"));
    }

    #[test]
    fn synchronous_error_is_returned_before_deferring() {
        let f: InvokeWithCompletion<()> = Arc::new(|_: (), _: Completion| -> Result<(), TaskError> { Err(TaskError::from("sync")) });
        let adapted = adapt("op1", f, ResultShape::Single);
        assert_eq!(adapted(()).unwrap_err().to_string(), "sync");
    }
}
