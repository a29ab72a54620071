//! # Evaluator Facade
//!
//! The top-level entry points over the statement and expression walkers.
//! The blocking pair resolves a pending program result before returning;
//! the async pair hands it back as-is so the caller can overlap other
//! work and await later.

use std::sync::Arc;

use tracing::debug;

use super::context::{Environment, MemoCache, Session};
use super::statement::StatementEvaluator;
use super::value::Value;
use crate::ast::Program;
use crate::error::EvalResult;
use crate::host::{HostRegistry, PrintSink, TracingSink};

/// Evaluates programs against an [`Environment`] and a host capability
/// table.
///
/// The evaluator itself is stateless across runs; everything a run mutates
/// lives in the environment and the optional memo cache the caller hands
/// in. One evaluator can therefore serve any number of sequential runs.
pub struct Evaluator {
    statements: StatementEvaluator,
}

impl Evaluator {
    /// Builds an evaluator whose `print` goes to the tracing pipeline.
    pub fn new(host: Arc<HostRegistry>) -> Self {
        Self::with_sink(host, Arc::new(TracingSink))
    }

    pub fn with_sink(host: Arc<HostRegistry>, sink: Arc<dyn PrintSink>) -> Self {
        Self {
            statements: StatementEvaluator::new(host, sink),
        }
    }

    /// Runs a program to a settled value, awaiting a pending result.
    #[tracing::instrument(skip(self, program, env))]
    pub async fn eval(&self, program: &Program, env: &mut Environment) -> EvalResult<Value> {
        let mut session = Session::new(env);
        let value = self.statements.eval_program(program, &mut session).await?;
        value.resolved().await
    }

    /// Like [`eval`](Self::eval), with argument memoization recorded in
    /// `cache`.
    pub async fn eval_with_cache(
        &self,
        program: &Program,
        env: &mut Environment,
        cache: &mut MemoCache,
    ) -> EvalResult<Value> {
        let mut session = Session::with_cache(env, cache);
        let value = self.statements.eval_program(program, &mut session).await?;
        value.resolved().await
    }

    /// Runs a program and returns its result without settling it. The
    /// value may be [`Value::Pending`]; resolve it with
    /// [`Value::resolved`] when its outcome is needed.
    pub async fn eval_async(&self, program: &Program, env: &mut Environment) -> EvalResult<Value> {
        let mut session = Session::new(env);
        let value = self.statements.eval_program(program, &mut session).await?;
        if value.is_pending() {
            debug!("program result is pending");
        }
        Ok(value)
    }

    /// Like [`eval_async`](Self::eval_async), with argument memoization.
    pub async fn eval_async_with_cache(
        &self,
        program: &Program,
        env: &mut Environment,
        cache: &mut MemoCache,
    ) -> EvalResult<Value> {
        let mut session = Session::with_cache(env, cache);
        self.statements.eval_program(program, &mut session).await
    }
}
