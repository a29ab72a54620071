//! # Evaluation Context
//!
//! The per-session stores: an [`Environment`] holding script variables and a
//! [`MemoCache`] holding recorded call arguments, plus the [`Session`] bundle
//! that threads exclusive borrows of both through one tree walk.
//!
//! The language has one flat namespace. No lexical scopes, no call stack:
//! loops and branches read and write the same mapping, and the embedding
//! host can preset variables before a run and inspect every binding after
//! it. Control flow is never represented in here; it travels as an explicit
//! statement outcome instead.

use std::collections::HashMap;

use super::value::Value;
use crate::ast::CallSiteId;

/// Flat name-to-value store for one evaluation session.
///
/// Created and owned by the embedding host. The evaluator borrows it
/// exclusively for the duration of a run, which also makes cross-session
/// sharing a compile error rather than a data race.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    variables: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a name, replacing any previous value.
    pub fn set<S: Into<String>>(&mut self, name: S, value: Value) {
        self.variables.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterates over bindings in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.variables
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

/// Recorded call arguments keyed by call site.
///
/// The contract is read-then-write: when a call site already holds a record,
/// its argument expressions are not evaluated again and the recorded values
/// are passed to the host function verbatim; otherwise the freshly evaluated
/// arguments are recorded after evaluation. A host may pre-populate records
/// to replay a previous session, and read them back once the run finishes.
#[derive(Debug, Clone, Default)]
pub struct MemoCache {
    records: HashMap<CallSiteId, Vec<Value>>,
}

impl MemoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The arguments recorded for a call site, if any.
    pub fn recorded(&self, site: CallSiteId) -> Option<&[Value]> {
        self.records.get(&site).map(Vec::as_slice)
    }

    /// Records the argument list for a call site, replacing any previous
    /// record. Once recorded, the list is authoritative for the site until
    /// the host clears or replaces it.
    pub fn record(&mut self, site: CallSiteId, arguments: Vec<Value>) {
        self.records.insert(site, arguments);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over recorded call sites in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = (CallSiteId, &[Value])> {
        self.records
            .iter()
            .map(|(site, args)| (*site, args.as_slice()))
    }
}

/// The exclusive borrows threaded through one tree walk.
///
/// Without an attached cache, calls never replay and never record.
pub struct Session<'a> {
    pub env: &'a mut Environment,
    pub cache: Option<&'a mut MemoCache>,
}

impl<'a> Session<'a> {
    pub fn new(env: &'a mut Environment) -> Self {
        Self { env, cache: None }
    }

    pub fn with_cache(env: &'a mut Environment, cache: &'a mut MemoCache) -> Self {
        Self {
            env,
            cache: Some(cache),
        }
    }

    /// The recorded argument list for a call site, when a cache is attached.
    pub fn recorded_args(&self, site: CallSiteId) -> Option<Vec<Value>> {
        self.cache
            .as_ref()
            .and_then(|cache| cache.recorded(site))
            .map(<[Value]>::to_vec)
    }

    /// Records an argument list for a call site, when a cache is attached.
    pub fn record_args(&mut self, site: CallSiteId, arguments: &[Value]) {
        if let Some(cache) = self.cache.as_deref_mut() {
            cache.record(site, arguments.to_vec());
        }
    }
}
