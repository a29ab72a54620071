//! # Expression Evaluation
//!
//! The recursive walk over [`Expr`] trees. Literals, variable references,
//! parenthesized groups and unary operators are evaluated strictly; binary
//! operators lift over pending operands (see below); calls resolve through
//! the host capability table with per-call-site argument memoization.
//!
//! ## Lifting
//!
//! Both operands of a binary operator are evaluated first, left before
//! right, whether or not either is pending. If exactly one operand turned
//! out pending, the operator is applied inside a `map` of that pending; if
//! both are pending, inside a `join`. The expression's own result is then
//! pending too, and the chain keeps folding without the walk ever
//! suspending.

use std::sync::Arc;

use async_recursion::async_recursion;
use tracing::debug;

use super::context::Session;
use super::value::Value;
use crate::ast::{BinaryOp, CallSiteId, Expr, ExprKind, Literal};
use crate::error::{EvalError, EvalResult};
use crate::host::HostRegistry;

/// Walks expressions against a [`Session`].
///
/// Holds the read-only host capability table; all mutable state travels in
/// the session argument.
pub struct ExpressionEvaluator {
    host: Arc<HostRegistry>,
}

impl ExpressionEvaluator {
    pub fn new(host: Arc<HostRegistry>) -> Self {
        Self { host }
    }

    #[async_recursion]
    pub async fn eval_expr(&self, expr: &Expr, session: &mut Session<'_>) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::Literal(literal) => Ok(Self::eval_literal(literal)),
            ExprKind::Name(name) => Self::eval_name(name, session),
            ExprKind::Paren(inner) => self.eval_expr(inner, session).await,
            ExprKind::Unary { op, operand } => {
                let operand = self.eval_expr(operand, session).await?;
                Value::apply_unary(*op, operand)
            }
            ExprKind::Binary { op, left, right } => {
                self.eval_binary(*op, left, right, session).await
            }
            ExprKind::Call { name, args, site } => self.eval_call(name, args, *site, session).await,
        }
    }

    fn eval_literal(literal: &Literal) -> Value {
        match literal {
            Literal::Decimal(d) => Value::Decimal(d.clone()),
            Literal::Text(t) => Value::Text(t.clone()),
            Literal::Boolean(b) => Value::Boolean(*b),
            Literal::Nil => Value::Nil,
        }
    }

    fn eval_name(name: &str, session: &Session<'_>) -> EvalResult<Value> {
        session
            .env
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::undefined_variable(name))
    }

    /// Left operand first, right second, regardless of how either resolves.
    async fn eval_binary(
        &self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        session: &mut Session<'_>,
    ) -> EvalResult<Value> {
        let left = self.eval_expr(left, session).await?;
        let right = self.eval_expr(right, session).await?;
        Self::lift_binary(op, left, right)
    }

    /// Applies the operator, lifting it over pending operands.
    fn lift_binary(op: BinaryOp, left: Value, right: Value) -> EvalResult<Value> {
        match (left, right) {
            (Value::Pending(l), Value::Pending(r)) => {
                debug!(op = %op, "joining two pending operands");
                Ok(Value::Pending(
                    l.join(r, move |a, b| Value::apply_binary(op, a, b)),
                ))
            }
            (Value::Pending(l), r) => {
                debug!(op = %op, "mapping pending left operand");
                Ok(Value::Pending(
                    l.map(move |a| Value::apply_binary(op, a, r)),
                ))
            }
            (l, Value::Pending(r)) => {
                debug!(op = %op, "mapping pending right operand");
                Ok(Value::Pending(
                    r.map(move |b| Value::apply_binary(op, l, b)),
                ))
            }
            (l, r) => Value::apply_binary(op, l, r),
        }
    }

    /// Resolves and invokes a host function.
    ///
    /// When a memo cache is attached and holds a record for this call site,
    /// the recorded arguments are reused verbatim and the argument
    /// expressions are skipped, side effects included. The host operation
    /// itself runs in both paths. Zero-argument calls never touch the cache.
    #[tracing::instrument(skip(self, args, session))]
    async fn eval_call(
        &self,
        name: &str,
        args: &[Expr],
        site: CallSiteId,
        session: &mut Session<'_>,
    ) -> EvalResult<Value> {
        let function = self
            .host
            .lookup(name, args.len())
            .ok_or_else(|| EvalError::unknown_function(name, args.len()))?;

        let arguments = if args.is_empty() {
            Vec::new()
        } else if let Some(recorded) = session.recorded_args(site) {
            debug!(name, site = site.0, "replaying recorded arguments");
            recorded
        } else {
            let mut evaluated = Vec::with_capacity(args.len());
            for arg in args {
                evaluated.push(self.eval_expr(arg, session).await?);
            }
            session.record_args(site, &evaluated);
            evaluated
        };

        function
            .invoke(arguments)
            .await
            .map_err(|e| EvalError::host_failure(name, e.message))
    }
}
