use std::sync::Arc;

use natrix::ast::{
    BinaryOp, CallSiteId, Expr, ExprKind, IfArm, Literal, Program, Span, Stmt, StmtKind, UnaryOp,
};
use natrix::{Evaluator, HostRegistry};

pub mod async_test;
pub mod evaluator_test;

fn dec(text: &str) -> Expr {
    Expr::new(
        ExprKind::Literal(Literal::Decimal(text.parse().unwrap())),
        Span::default(),
    )
}

fn text_lit(value: &str) -> Expr {
    Expr::new(
        ExprKind::Literal(Literal::Text(value.to_string())),
        Span::default(),
    )
}

fn boolean(value: bool) -> Expr {
    Expr::new(ExprKind::Literal(Literal::Boolean(value)), Span::default())
}

fn nil() -> Expr {
    Expr::new(ExprKind::Literal(Literal::Nil), Span::default())
}

fn name(value: &str) -> Expr {
    Expr::new(ExprKind::Name(value.to_string()), Span::default())
}

fn paren(inner: Expr) -> Expr {
    Expr::new(ExprKind::Paren(Box::new(inner)), Span::default())
}

fn unary(op: UnaryOp, operand: Expr) -> Expr {
    Expr::new(
        ExprKind::Unary {
            op,
            operand: Box::new(operand),
        },
        Span::default(),
    )
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        Span::default(),
    )
}

fn call(function: &str, args: Vec<Expr>, site: u32) -> Expr {
    Expr::new(
        ExprKind::Call {
            name: function.to_string(),
            args,
            site: CallSiteId(site),
        },
        Span::default(),
    )
}

fn assign(target: &str, value: Expr) -> Stmt {
    Stmt::new(
        StmtKind::Assign {
            name: target.to_string(),
            value,
        },
        Span::default(),
    )
}

fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::new(StmtKind::Expr(expr), Span::default())
}

fn print(expr: Expr) -> Stmt {
    Stmt::new(StmtKind::Print(expr), Span::default())
}

fn if_only(condition: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::new(
        StmtKind::If {
            arms: vec![IfArm { condition, body }],
            else_body: vec![],
        },
        Span::default(),
    )
}

fn while_loop(condition: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::new(StmtKind::While { condition, body }, Span::default())
}

fn brk() -> Stmt {
    Stmt::new(StmtKind::Break, Span::default())
}

fn ret(expr: Expr) -> Stmt {
    Stmt::new(StmtKind::Return(expr), Span::default())
}

fn program(statements: Vec<Stmt>) -> Program {
    Program::new(statements)
}

fn basic_evaluator() -> Evaluator {
    Evaluator::new(Arc::new(HostRegistry::new()))
}
