//! # Pending Values
//!
//! The asynchronous side of the value model. A host function may hand the
//! evaluator a result that does not exist yet; [`PendingValue`] wraps that
//! eventual result so the tree walk can keep composing operators over it
//! without suspending.
//!
//! A pending value is backed by a shared boxed future, so it resolves
//! exactly once: every expression holding a handle observes the same payload
//! (or the same failure). Combining happens functionally through [`map`] and
//! [`join`]; the only place anything suspends is [`wait`], called by the
//! resolving entry points on the final, fully folded result.
//!
//! [`map`]: PendingValue::map
//! [`join`]: PendingValue::join
//! [`wait`]: PendingValue::wait

use std::fmt;
use std::future::Future;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::debug;

use super::value::Value;
use crate::error::{EvalError, EvalResult};

type SharedEval = Shared<BoxFuture<'static, EvalResult<Value>>>;

/// Handle onto an eventual [`Value`], resolved at most once.
#[derive(Clone)]
pub struct PendingValue {
    future: SharedEval,
}

impl PendingValue {
    /// Wraps a future as a pending value.
    ///
    /// The payload is flattened on resolution: if the future itself produces
    /// a pending value, that one is awaited too, so a resolved payload is
    /// never pending.
    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = EvalResult<Value>> + Send + 'static,
    {
        let future = async move { future.await?.resolved().await }
            .boxed()
            .shared();
        Self { future }
    }

    /// Starts `future` on the tokio runtime right away and wraps the handle.
    ///
    /// This is how a host function kicks work off before the evaluator ever
    /// looks at the result. A panicked or cancelled task surfaces as
    /// [`EvalError::AsyncFailure`].
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = EvalResult<Value>> + Send + 'static,
    {
        debug!("spawning host future");
        let handle = tokio::spawn(future);
        Self::from_future(async move {
            match handle.await {
                Ok(result) => result,
                Err(join) => Err(EvalError::async_failure(join.to_string())),
            }
        })
    }

    /// A pending value that is already resolved. Useful for tests and for
    /// host functions with a synchronous fast path.
    pub fn ready(value: Value) -> Self {
        Self::from_future(async move { Ok(value) })
    }

    /// A pending value that resolves to a failure through the async
    /// failure channel.
    pub fn fail<S: Into<String>>(message: S) -> Self {
        let error = EvalError::async_failure(message);
        Self::from_future(async move { Err(error) })
    }

    /// Applies `transform` once the payload resolves, yielding a new pending
    /// value. This lifts an operator whose other operand is already resolved.
    pub fn map<F>(self, transform: F) -> Self
    where
        F: FnOnce(Value) -> EvalResult<Value> + Send + 'static,
    {
        Self::from_future(async move {
            let value = self.future.await?;
            transform(value)
        })
    }

    /// Waits for both payloads, then combines them. This lifts an operator
    /// with two pending operands.
    pub fn join<F>(self, other: PendingValue, combine: F) -> Self
    where
        F: FnOnce(Value, Value) -> EvalResult<Value> + Send + 'static,
    {
        Self::from_future(async move {
            let (left, right) = futures::future::try_join(self.future, other.future).await?;
            combine(left, right)
        })
    }

    /// Suspends until the payload is available.
    pub async fn wait(self) -> EvalResult<Value> {
        self.future.await
    }

    /// Identity comparison: true when both handles share one resolution.
    pub fn ptr_eq(&self, other: &PendingValue) -> bool {
        self.future.ptr_eq(&other.future)
    }
}

/// Pending values have no structural equality; two handles are equal only
/// when they are the same shared resolution.
impl PartialEq for PendingValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for PendingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.future.peek() {
            Some(Ok(value)) => write!(f, "PendingValue(resolved: {:?})", value),
            Some(Err(error)) => write!(f, "PendingValue(failed: {})", error),
            None => write!(f, "PendingValue(unresolved)"),
        }
    }
}
