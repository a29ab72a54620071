//! # Evaluation Errors
//!
//! Failure taxonomy for script evaluation. Every error aborts the evaluation
//! it occurred in; nothing is caught or retried internally. The caller
//! receives exactly one terminal failure per run.
//!
//! Errors are `Clone` because a pending value is backed by a shared future:
//! when it resolves to a failure, every expression holding that pending
//! observes the same error instance.

use thiserror::Error;

pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A name was read before any assignment bound it
    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String },

    /// An operator token the value model has no rule for.
    /// A conformant parser never emits one; this keeps dispatch total.
    #[error("unknown operator: {op}")]
    UnknownOperator { op: String },

    /// No host function registered under this name and arity
    #[error("unknown function: {name}/{arity}")]
    UnknownFunction { name: String, arity: usize },

    /// An operator was applied to values outside its domain
    #[error("type mismatch: {message}")]
    TypeMismatch { message: String },

    /// Division or modulo with a zero divisor
    #[error("division by zero")]
    DivisionByZero,

    /// The invoked host function reported a failure of its own
    #[error("host function '{function}' failed: {message}")]
    HostFunctionFailure { function: String, message: String },

    /// The async machinery itself failed: a spawned host task
    /// panicked or was cancelled, or a host completed a pending
    /// value through its failure channel. Script-level errors keep
    /// their own kind when they surface out of a pending value.
    #[error("async evaluation failed: {message}")]
    AsyncFailure { message: String },
}

// エラー作成用のヘルパー関数
impl EvalError {
    pub fn undefined_variable<S: Into<String>>(name: S) -> Self {
        EvalError::UndefinedVariable { name: name.into() }
    }

    pub fn unknown_operator<S: Into<String>>(op: S) -> Self {
        EvalError::UnknownOperator { op: op.into() }
    }

    pub fn unknown_function<S: Into<String>>(name: S, arity: usize) -> Self {
        EvalError::UnknownFunction {
            name: name.into(),
            arity,
        }
    }

    pub fn type_mismatch<S: Into<String>>(message: S) -> Self {
        EvalError::TypeMismatch {
            message: message.into(),
        }
    }

    pub fn host_failure<S: Into<String>, M: Into<String>>(function: S, message: M) -> Self {
        EvalError::HostFunctionFailure {
            function: function.into(),
            message: message.into(),
        }
    }

    pub fn async_failure<S: Into<String>>(message: S) -> Self {
        EvalError::AsyncFailure {
            message: message.into(),
        }
    }
}
