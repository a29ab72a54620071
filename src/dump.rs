//! # Structural Dump
//!
//! Renders a program as a tree of serializable records, one per syntax
//! node, with source spans and the salient token of each node. Intended
//! for debugging front ends and for golden tests over program shape; the
//! records serialize cleanly with `serde_json`.

use serde::{Deserialize, Serialize};

use crate::ast::{Expr, ExprKind, IfArm, Literal, Program, Span, Stmt, StmtKind};

/// One node of the dumped tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node kind in snake case, e.g. `"while"` or `"expr_stmt"`.
    pub kind: String,
    pub span: Span,
    /// The node's salient token: operator symbol, literal rendering,
    /// variable or function name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<NodeRecord>,
}

impl NodeRecord {
    fn new(kind: &str, span: Span) -> Self {
        Self {
            kind: kind.to_string(),
            span,
            text: None,
            children: Vec::new(),
        }
    }

    fn with_text<S: Into<String>>(kind: &str, span: Span, text: S) -> Self {
        Self {
            kind: kind.to_string(),
            span,
            text: Some(text.into()),
            children: Vec::new(),
        }
    }
}

pub fn dump_program(program: &Program) -> NodeRecord {
    let mut record = NodeRecord::new("program", Span::default());
    record.children = program.body.iter().map(dump_stmt).collect();
    record
}

pub fn dump_stmt(stmt: &Stmt) -> NodeRecord {
    match &stmt.kind {
        StmtKind::Assign { name, value } => {
            let mut record = NodeRecord::with_text("assign", stmt.span, name.clone());
            record.children.push(dump_expr(value));
            record
        }
        StmtKind::Expr(expr) => wrap("expr_stmt", stmt.span, dump_expr(expr)),
        StmtKind::Print(expr) => wrap("print", stmt.span, dump_expr(expr)),
        StmtKind::If { arms, else_body } => {
            let mut record = NodeRecord::new("if", stmt.span);
            record.children.extend(arms.iter().map(dump_arm));
            if !else_body.is_empty() {
                let mut else_record = NodeRecord::new("else", stmt.span);
                else_record.children = else_body.iter().map(dump_stmt).collect();
                record.children.push(else_record);
            }
            record
        }
        StmtKind::While { condition, body } => {
            let mut record = NodeRecord::new("while", stmt.span);
            record.children.push(dump_expr(condition));
            record.children.extend(body.iter().map(dump_stmt));
            record
        }
        StmtKind::Break => NodeRecord::new("break", stmt.span),
        StmtKind::Continue => NodeRecord::new("continue", stmt.span),
        StmtKind::Return(expr) => wrap("return", stmt.span, dump_expr(expr)),
    }
}

pub fn dump_expr(expr: &Expr) -> NodeRecord {
    match &expr.kind {
        ExprKind::Literal(literal) => {
            NodeRecord::with_text("literal", expr.span, render_literal(literal))
        }
        ExprKind::Name(name) => NodeRecord::with_text("name", expr.span, name.clone()),
        ExprKind::Paren(inner) => wrap("paren", expr.span, dump_expr(inner)),
        ExprKind::Unary { op, operand } => {
            let mut record = NodeRecord::with_text("unary", expr.span, op.as_ref());
            record.children.push(dump_expr(operand));
            record
        }
        ExprKind::Binary { op, left, right } => {
            let mut record = NodeRecord::with_text("binary", expr.span, op.as_ref());
            record.children.push(dump_expr(left));
            record.children.push(dump_expr(right));
            record
        }
        ExprKind::Call { name, args, .. } => {
            let mut record = NodeRecord::with_text("call", expr.span, name.clone());
            record.children = args.iter().map(dump_expr).collect();
            record
        }
    }
}

// The arm node borrows its condition's span; arms have no span of their own.
fn dump_arm(arm: &IfArm) -> NodeRecord {
    let mut record = NodeRecord::new("branch", arm.condition.span);
    record.children.push(dump_expr(&arm.condition));
    record.children.extend(arm.body.iter().map(dump_stmt));
    record
}

fn render_literal(literal: &Literal) -> String {
    match literal {
        Literal::Decimal(d) => d.to_string(),
        // quoted form keeps text literals apart from identical-looking
        // decimal renderings
        Literal::Text(t) => format!("{:?}", t),
        Literal::Boolean(b) => b.to_string(),
        Literal::Nil => "nil".to_string(),
    }
}

fn wrap(kind: &str, span: Span, child: NodeRecord) -> NodeRecord {
    let mut record = NodeRecord::new(kind, span);
    record.children.push(child);
    record
}
