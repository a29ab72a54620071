//! Pending propagation from host futures through whole programs.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use natrix::ast::BinaryOp;
use natrix::{Environment, EvalError, Evaluator, HostRegistry, PendingValue, Value};
use pretty_assertions::assert_eq;

use super::*;

/// `g/0` resolves to 2 off the evaluation path.
fn registry_with_g() -> HostRegistry {
    let mut registry = HostRegistry::new();
    registry.register_fn("g", 0, |_args| {
        async {
            Ok(Value::Pending(PendingValue::spawn(async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok(Value::from(2))
            })))
        }
        .boxed()
    });
    registry
}

fn g_evaluator() -> Evaluator {
    Evaluator::new(Arc::new(registry_with_g()))
}

#[tokio::test]
async fn test_blocking_entry_point_settles_the_sum() {
    // g() + g() joins two in-flight results; eval waits the sum out
    let mut env = Environment::new();
    let result = g_evaluator()
        .eval(
            &program(vec![expr_stmt(binary(
                BinaryOp::Add,
                call("g", vec![], 1),
                call("g", vec![], 2),
            ))]),
            &mut env,
        )
        .await
        .unwrap();
    assert_eq!(result, 4);
}

#[tokio::test]
async fn test_async_entry_point_hands_back_a_pending() {
    let mut env = Environment::new();
    let result = g_evaluator()
        .eval_async(
            &program(vec![expr_stmt(binary(
                BinaryOp::Add,
                call("g", vec![], 1),
                call("g", vec![], 2),
            ))]),
            &mut env,
        )
        .await
        .unwrap();

    assert!(result.is_pending());
    assert_eq!(result.resolved().await.unwrap(), 4);
}

#[tokio::test]
async fn test_pending_mixes_with_settled_operands() {
    let mut env = Environment::new();
    let result = g_evaluator()
        .eval(
            &program(vec![expr_stmt(binary(
                BinaryOp::Add,
                call("g", vec![], 1),
                dec("1"),
            ))]),
            &mut env,
        )
        .await
        .unwrap();
    assert_eq!(result, 3);
}

#[tokio::test]
async fn test_pending_travels_through_variables() {
    // x holds the pending; x + x joins two clones of the same handle
    let mut env = Environment::new();
    let result = g_evaluator()
        .eval(
            &program(vec![
                assign("x", call("g", vec![], 1)),
                expr_stmt(binary(BinaryOp::Add, name("x"), name("x"))),
            ]),
            &mut env,
        )
        .await
        .unwrap();
    assert_eq!(result, 4);
}

#[tokio::test]
async fn test_conditions_reject_pending_guards() {
    let mut env = Environment::new();
    let err = g_evaluator()
        .eval(
            &program(vec![if_only(
                binary(BinaryOp::Equal, call("g", vec![], 1), dec("2")),
                vec![],
            )]),
            &mut env,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EvalError::TypeMismatch { .. }));
}

#[tokio::test]
async fn test_script_errors_keep_their_kind_through_pendings() {
    let mut registry = HostRegistry::new();
    registry.register_fn("bad", 0, |_args| {
        async {
            Ok(Value::Pending(PendingValue::from_future(async {
                Value::apply_binary(BinaryOp::Divide, Value::from(1), Value::from(0))
            })))
        }
        .boxed()
    });
    let evaluator = Evaluator::new(Arc::new(registry));

    let mut env = Environment::new();
    let err = evaluator
        .eval(&program(vec![expr_stmt(call("bad", vec![], 1))]), &mut env)
        .await
        .unwrap_err();
    assert_eq!(err, EvalError::DivisionByZero);
}

#[tokio::test]
async fn test_failed_futures_surface_as_async_failures() {
    let mut registry = HostRegistry::new();
    registry.register_fn("doomed", 0, |_args| {
        async {
            Ok(Value::Pending(PendingValue::fail("backend unreachable")))
        }
        .boxed()
    });
    let evaluator = Evaluator::new(Arc::new(registry));

    let mut env = Environment::new();
    let err = evaluator
        .eval(
            &program(vec![expr_stmt(call("doomed", vec![], 1))]),
            &mut env,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EvalError::AsyncFailure { .. }));
}
