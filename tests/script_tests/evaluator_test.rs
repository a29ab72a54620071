//! End-to-end runs through the blocking entry point.

use std::sync::Arc;

use natrix::ast::{BinaryOp, UnaryOp};
use natrix::dump::dump_program;
use natrix::{Environment, EvalError, HostRegistry, MemorySink, Evaluator, Value};
use pretty_assertions::assert_eq;

use super::*;

#[tokio::test]
async fn test_decimal_addition() {
    let mut env = Environment::new();
    let result = basic_evaluator()
        .eval(
            &program(vec![expr_stmt(binary(BinaryOp::Add, dec("1"), dec("2")))]),
            &mut env,
        )
        .await
        .unwrap();
    assert_eq!(result, 3);
}

#[tokio::test]
async fn test_text_concatenation_with_decimal() {
    let mut env = Environment::new();
    let result = basic_evaluator()
        .eval(
            &program(vec![expr_stmt(binary(
                BinaryOp::Add,
                text_lit("a"),
                dec("1"),
            ))]),
            &mut env,
        )
        .await
        .unwrap();
    assert_eq!(result, "a1");
}

#[tokio::test]
async fn test_preset_environment_feeds_the_program() {
    let mut env = Environment::new();
    env.set("a", Value::Decimal("2.1".parse().unwrap()));

    let result = basic_evaluator()
        .eval(
            &program(vec![expr_stmt(binary(
                BinaryOp::Add,
                name("a"),
                dec("2.43"),
            ))]),
            &mut env,
        )
        .await
        .unwrap();
    assert_eq!(result, 4.53);
}

#[tokio::test]
async fn test_division_by_zero() {
    let mut env = Environment::new();
    let err = basic_evaluator()
        .eval(
            &program(vec![expr_stmt(binary(BinaryOp::Divide, dec("1"), dec("0")))]),
            &mut env,
        )
        .await
        .unwrap_err();
    assert_eq!(err, EvalError::DivisionByZero);
}

#[tokio::test]
async fn test_modulo_and_power_truncate_their_operands() {
    let mut env = Environment::new();
    let evaluator = basic_evaluator();

    let result = evaluator
        .eval(
            &program(vec![expr_stmt(binary(BinaryOp::Modulo, dec("5"), dec("3")))]),
            &mut env,
        )
        .await
        .unwrap();
    assert_eq!(result, 2);

    // 3.7 truncates to 3 before exponentiation
    let result = evaluator
        .eval(
            &program(vec![expr_stmt(binary(
                BinaryOp::Power,
                dec("2"),
                dec("3.7"),
            ))]),
            &mut env,
        )
        .await
        .unwrap();
    assert_eq!(result, 8);
}

#[tokio::test]
async fn test_negation_of_a_grouped_sum() {
    let mut env = Environment::new();
    let result = basic_evaluator()
        .eval(
            &program(vec![expr_stmt(unary(
                UnaryOp::Negate,
                paren(binary(BinaryOp::Add, dec("1"), dec("2"))),
            ))]),
            &mut env,
        )
        .await
        .unwrap();
    assert_eq!(result, -3);
}

#[tokio::test]
async fn test_while_counts_down_to_the_boundary() {
    // i = 5; while i > 3 { i = i - 1 }
    let mut env = Environment::new();
    basic_evaluator()
        .eval(
            &program(vec![
                assign("i", dec("5")),
                while_loop(
                    binary(BinaryOp::Greater, name("i"), dec("3")),
                    vec![assign("i", binary(BinaryOp::Subtract, name("i"), dec("1")))],
                ),
            ]),
            &mut env,
        )
        .await
        .unwrap();
    assert_eq!(env.get("i"), Some(&Value::from(3)));
}

#[tokio::test]
async fn test_break_is_observed_at_the_iteration_boundary() {
    // the iteration that breaks still finishes its body, so i ends at 5
    let mut env = Environment::new();
    basic_evaluator()
        .eval(
            &program(vec![
                assign("i", dec("0")),
                while_loop(
                    binary(BinaryOp::Less, name("i"), dec("10")),
                    vec![
                        if_only(binary(BinaryOp::Equal, name("i"), dec("4")), vec![brk()]),
                        assign("i", binary(BinaryOp::Add, name("i"), dec("1"))),
                    ],
                ),
            ]),
            &mut env,
        )
        .await
        .unwrap();
    assert_eq!(env.get("i"), Some(&Value::from(5)));
}

#[tokio::test]
async fn test_return_ends_the_program_early() {
    let mut env = Environment::new();
    let result = basic_evaluator()
        .eval(
            &program(vec![
                assign("x", dec("1")),
                ret(name("x")),
                assign("x", dec("99")),
            ]),
            &mut env,
        )
        .await
        .unwrap();
    assert_eq!(result, 1);
    assert_eq!(env.get("x"), Some(&Value::from(1)));
}

#[tokio::test]
async fn test_undefined_variable() {
    let mut env = Environment::new();
    let err = basic_evaluator()
        .eval(&program(vec![expr_stmt(name("ghost"))]), &mut env)
        .await
        .unwrap_err();
    assert_eq!(err, EvalError::undefined_variable("ghost"));
}

#[tokio::test]
async fn test_unknown_function() {
    let mut env = Environment::new();
    let err = basic_evaluator()
        .eval(
            &program(vec![expr_stmt(call("missing", vec![dec("1")], 0))]),
            &mut env,
        )
        .await
        .unwrap_err();
    assert_eq!(err, EvalError::unknown_function("missing", 1));
}

#[tokio::test]
async fn test_print_renders_values_in_order() {
    let sink = Arc::new(MemorySink::default());
    let evaluator = Evaluator::with_sink(Arc::new(HostRegistry::new()), sink.clone());
    let mut env = Environment::new();

    evaluator
        .eval(
            &program(vec![
                print(binary(BinaryOp::Add, dec("1"), dec("2"))),
                print(text_lit("done")),
                print(nil()),
            ]),
            &mut env,
        )
        .await
        .unwrap();

    assert_eq!(
        sink.lines(),
        vec!["3".to_string(), "done".to_string(), "nil".to_string()]
    );
}

#[tokio::test]
async fn test_dump_serializes_the_program_shape() {
    let tree = program(vec![
        assign("x", binary(BinaryOp::Multiply, dec("2"), dec("3"))),
        while_loop(boolean(true), vec![brk()]),
    ]);

    let json = serde_json::to_value(dump_program(&tree)).unwrap();
    assert_eq!(json["kind"], "program");
    assert_eq!(json["children"][0]["kind"], "assign");
    assert_eq!(json["children"][0]["text"], "x");
    assert_eq!(json["children"][0]["children"][0]["text"], "*");
    assert_eq!(json["children"][1]["kind"], "while");
    assert_eq!(json["children"][1]["children"][1]["kind"], "break");
}
