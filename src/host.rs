//! # Host Capability Table
//!
//! Scripts cannot define functions of their own; every call resolves to an
//! operation the embedding application registered here. Resolution is by
//! exact name and exact arity, through an explicit table built at
//! construction time. There is no reflection and no runtime discovery: what
//! the host registers is what scripts can reach.
//!
//! Host functions are async. One may hand back `Value::Pending` to expose an
//! in-flight result; the evaluator composes over it without waiting.
//!
//! The module also carries [`PrintSink`], the output boundary of the script
//! `print` statement.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::future::BoxFuture;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::eval::value::Value;

/// Failure reported by a host function itself.
///
/// The evaluator surfaces it as an evaluation failure carrying the function
/// name alongside this message.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for HostError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for HostError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// An operation the embedding application exposes to scripts.
///
/// `invoke` receives exactly `arity` argument values, evaluated left to
/// right. An argument may itself be pending when the script computed it
/// from an asynchronous result.
#[async_trait]
pub trait HostFunction: Send + Sync {
    /// The name scripts call this operation by.
    fn name(&self) -> &str;

    /// The exact number of arguments accepted. No overloading beyond the
    /// name+arity pair, no variadic calls.
    fn arity(&self) -> usize;

    async fn invoke(&self, args: Vec<Value>) -> Result<Value, HostError>;
}

/// Boxed async closure form of a host function.
type HostFn =
    Box<dyn Fn(Vec<Value>) -> BoxFuture<'static, Result<Value, HostError>> + Send + Sync>;

struct FnHostFunction {
    name: String,
    arity: usize,
    handler: HostFn,
}

#[async_trait]
impl HostFunction for FnHostFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> usize {
        self.arity
    }

    async fn invoke(&self, args: Vec<Value>) -> Result<Value, HostError> {
        (self.handler)(args).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FunctionKey {
    name: String,
    arity: usize,
}

/// The capability table scripts call into.
///
/// Built once by the embedding host, then shared read-only with every
/// evaluator. Registration happens before evaluation, not during it.
#[derive(Default)]
pub struct HostRegistry {
    functions: HashMap<FunctionKey, Arc<dyn HostFunction>>,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a function under its name and arity. Registering the same
    /// pair again replaces the earlier entry and logs a warning.
    pub fn register(&mut self, function: Arc<dyn HostFunction>) {
        let key = FunctionKey {
            name: function.name().to_string(),
            arity: function.arity(),
        };
        debug!(name = %key.name, arity = key.arity, "registering host function");
        if self.functions.contains_key(&key) {
            warn!(
                name = %key.name,
                arity = key.arity,
                "replacing existing host function registration"
            );
        }
        self.functions.insert(key, function);
    }

    /// Registers a plain async closure under a name and arity, sparing the
    /// host a named type per operation.
    pub fn register_fn<F>(&mut self, name: &str, arity: usize, handler: F)
    where
        F: Fn(Vec<Value>) -> BoxFuture<'static, Result<Value, HostError>> + Send + Sync + 'static,
    {
        self.register(Arc::new(FnHostFunction {
            name: name.to_string(),
            arity,
            handler: Box::new(handler),
        }));
    }

    /// Resolves a call target by exact name and arity.
    pub fn lookup(&self, name: &str, arity: usize) -> Option<Arc<dyn HostFunction>> {
        let key = FunctionKey {
            name: name.to_string(),
            arity,
        };
        self.functions.get(&key).cloned()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// Destination of the script `print` statement.
pub trait PrintSink: Send + Sync {
    /// Receives the rendered form of each printed value, in program order.
    fn print(&self, rendered: &str);
}

/// Default sink: emits through the tracing pipeline at info level.
#[derive(Debug, Clone, Default)]
pub struct TracingSink;

impl PrintSink for TracingSink {
    fn print(&self, rendered: &str) {
        info!(target: "script", "{}", rendered);
    }
}

/// Capturing sink for tests and embeddings that collect script output.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything printed so far, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl PrintSink for MemorySink {
    fn print(&self, rendered: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(rendered.to_string());
        }
    }
}
