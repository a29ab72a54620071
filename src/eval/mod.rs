//! # Evaluation System
//!
//! The tree walk and everything it carries.
//!
//! ## Core Components
//!
//! - [`value::Value`]: the dynamic value model
//! - [`pending::PendingValue`]: a shared handle on an in-flight result
//! - [`context::Environment`] / [`context::MemoCache`] / [`context::Session`]:
//!   the mutable state a run threads through the walk
//! - [`expression::ExpressionEvaluator`] / [`statement::StatementEvaluator`]:
//!   the recursive walkers
//! - [`evaluator::Evaluator`]: the entry-point facade

pub mod context;
pub mod evaluator;
pub mod expression;
pub mod pending;
pub mod statement;
pub mod value;

pub use context::{Environment, MemoCache, Session};
pub use evaluator::Evaluator;
pub use pending::PendingValue;
pub use statement::Signal;
pub use value::Value;
