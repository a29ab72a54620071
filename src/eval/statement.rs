//! # Statement Evaluation
//!
//! Statements evaluate to a [`Signal`]: a normal value, or a control
//! request travelling toward the construct that consumes it. Control
//! statements never unwind the walk.
//!
//! ## Block semantics
//!
//! A block does not stop at `break` or `continue`. The signal is latched,
//! the remaining statements run, and the block reports the latched signal
//! once it is done. `break` outranks `continue` when both occur. Only
//! `return` cuts the block short. Loops therefore observe `break` at the
//! iteration boundary, never mid-body.

use std::sync::Arc;

use async_recursion::async_recursion;
use tracing::debug;

use super::context::Session;
use super::expression::ExpressionEvaluator;
use super::value::Value;
use crate::ast::{Expr, Program, Stmt, StmtKind};
use crate::error::{EvalError, EvalResult};
use crate::host::{HostRegistry, PrintSink};

/// Outcome of a single statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// The statement completed and produced a value.
    Normal(Value),
    /// A `break` is travelling toward the nearest enclosing loop.
    Break,
    /// A `continue` is travelling toward the nearest enclosing loop.
    Continue,
    /// A `return` is travelling toward the program boundary.
    Return(Value),
}

/// Walks statements and blocks, delegating expressions to
/// [`ExpressionEvaluator`].
pub struct StatementEvaluator {
    expressions: ExpressionEvaluator,
    sink: Arc<dyn PrintSink>,
}

impl StatementEvaluator {
    pub fn new(host: Arc<HostRegistry>, sink: Arc<dyn PrintSink>) -> Self {
        Self {
            expressions: ExpressionEvaluator::new(host),
            sink,
        }
    }

    /// Runs a whole program and applies the boundary rules: `return`
    /// surfaces its value, stray `break`/`continue` fizzle to void, and a
    /// normally finished program yields its last statement value.
    pub async fn eval_program(
        &self,
        program: &Program,
        session: &mut Session<'_>,
    ) -> EvalResult<Value> {
        match self.eval_block(&program.body, session).await? {
            Signal::Normal(value) | Signal::Return(value) => Ok(value),
            Signal::Break | Signal::Continue => Ok(Value::Void),
        }
    }

    #[async_recursion]
    pub async fn eval_stmt(&self, stmt: &Stmt, session: &mut Session<'_>) -> EvalResult<Signal> {
        match &stmt.kind {
            StmtKind::Assign { name, value } => {
                let value = self.expressions.eval_expr(value, session).await?;
                debug!(name = %name, value = %value, "assigning variable");
                session.env.set(name.clone(), value.clone());
                Ok(Signal::Normal(value))
            }
            StmtKind::Expr(expr) => {
                let value = self.expressions.eval_expr(expr, session).await?;
                Ok(Signal::Normal(value))
            }
            StmtKind::Print(expr) => {
                let value = self.expressions.eval_expr(expr, session).await?;
                self.sink.print(&value.to_string());
                Ok(Signal::Normal(value))
            }
            StmtKind::If { arms, else_body } => {
                for arm in arms {
                    if self.eval_condition(&arm.condition, session, "if").await? {
                        let signal = self.eval_block(&arm.body, session).await?;
                        return Ok(Self::void_on_normal(signal));
                    }
                }
                let signal = self.eval_block(else_body, session).await?;
                Ok(Self::void_on_normal(signal))
            }
            StmtKind::While { condition, body } => {
                loop {
                    if !self.eval_condition(condition, session, "while").await? {
                        break;
                    }
                    match self.eval_block(body, session).await? {
                        Signal::Normal(_) | Signal::Continue => {}
                        Signal::Break => break,
                        Signal::Return(value) => return Ok(Signal::Return(value)),
                    }
                }
                Ok(Signal::Normal(Value::Void))
            }
            StmtKind::Break => Ok(Signal::Break),
            StmtKind::Continue => Ok(Signal::Continue),
            StmtKind::Return(expr) => {
                let value = self.expressions.eval_expr(expr, session).await?;
                Ok(Signal::Return(value))
            }
        }
    }

    /// Runs the statements of a block, latching `break`/`continue` and
    /// short-circuiting only on `return`.
    #[async_recursion]
    pub async fn eval_block(
        &self,
        statements: &[Stmt],
        session: &mut Session<'_>,
    ) -> EvalResult<Signal> {
        let mut latched: Option<Signal> = None;
        let mut last = Value::Void;
        for statement in statements {
            match self.eval_stmt(statement, session).await? {
                Signal::Return(value) => return Ok(Signal::Return(value)),
                Signal::Break => latched = Some(Signal::Break),
                Signal::Continue => {
                    if !matches!(latched, Some(Signal::Break)) {
                        latched = Some(Signal::Continue);
                    }
                }
                Signal::Normal(value) => last = value,
            }
        }
        Ok(latched.unwrap_or(Signal::Normal(last)))
    }

    /// Conditions are strictly boolean; a pending value is rejected rather
    /// than awaited.
    async fn eval_condition(
        &self,
        condition: &Expr,
        session: &mut Session<'_>,
        construct: &str,
    ) -> EvalResult<bool> {
        let value = self.expressions.eval_expr(condition, session).await?;
        match value {
            Value::Boolean(b) => Ok(b),
            other => Err(EvalError::type_mismatch(format!(
                "{} condition must be boolean, got {}",
                construct,
                other.kind_name()
            ))),
        }
    }

    /// Branch bodies do not leak their last value; control signals pass
    /// through untouched.
    fn void_on_normal(signal: Signal) -> Signal {
        match signal {
            Signal::Normal(_) => Signal::Normal(Value::Void),
            other => other,
        }
    }
}
