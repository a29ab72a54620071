//! # Natrix
//!
//! A tree-walking evaluator for a small dynamically typed scripting
//! language. Programs arrive as syntax trees; natrix has no parser of its
//! own and leaves source text to the embedding front end.
//!
//! ## Highlights
//!
//! - Arbitrary-precision decimal arithmetic with a polymorphic `+`
//! - A flat variable environment the caller owns between runs
//! - Control flow surfaced as explicit signals rather than unwinding
//! - Host functions dispatched by exact name and arity, with per-call-site
//!   argument memoization
//! - Asynchronous host results that travel through expressions as pending
//!   values and settle only where the caller asks for them
//!
//! ## Modules
//!
//! - [`ast`]: the syntax tree the evaluator consumes
//! - [`eval`]: the walkers, the value model and the session state
//! - [`host`]: host function registration and the print sink
//! - [`dump`]: serializable structural dumps of programs
//! - [`error`]: the error taxonomy

pub mod ast;
pub mod dump;
pub mod error;
pub mod eval;
pub mod host;

// Re-exports
pub use ast::*;
pub use dump::*;
pub use error::*;
pub use eval::{Environment, Evaluator, MemoCache, PendingValue, Session, Signal, Value};
pub use host::*;
