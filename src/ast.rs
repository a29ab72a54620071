//! # Input Tree
//!
//! The syntax tree handed to the evaluator by an external parser for the
//! Python-like surface language. The tree arrives already validated: node
//! kinds are fixed, operator tokens are drawn from the enums below, and the
//! evaluator never mutates it.
//!
//! Every node carries a [`Span`] with the source region the parser reported.
//! Call expressions additionally carry a [`CallSiteId`], the stable key used
//! for argument memoization. All types are serde-enabled so a parser running
//! in another process can hand trees across a boundary.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Source region covered by a node. Lines are 1-based, columns 0-based,
/// matching what the parser reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl Span {
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }
}

/// Stable identity of one call expression, assigned during parsing.
///
/// Memoized argument lists are keyed by this value, so it survives
/// unrelated edits to the source text, unlike a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallSiteId(pub u32);

/// A whole script: the top-level statement sequence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Self { body }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    /// `name = expr`
    Assign { name: String, value: Expr },
    /// A bare expression line, usually a host call ran for its effect
    Expr(Expr),
    /// `print expr`
    Print(Expr),
    /// `if`/`elif` chain with an optional `else` body
    If {
        arms: Vec<IfArm>,
        else_body: Vec<Stmt>,
    },
    /// `while condition:` body
    While { condition: Expr, body: Vec<Stmt> },
    Break,
    Continue,
    /// `return expr`
    Return(Expr),
}

/// One guarded branch of an `if`/`elif` chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfArm {
    pub condition: Expr,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    Literal(Literal),
    /// Variable reference
    Name(String),
    /// Parenthesized sub-expression, kept as a node for spans and dumps
    Paren(Box<Expr>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Host function call; `site` keys the argument memoization cache
    Call {
        name: String,
        args: Vec<Expr>,
        site: CallSiteId,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Decimal(BigDecimal),
    Text(String),
    Boolean(bool),
    Nil,
}

/// Binary operator tokens of the surface language.
///
/// `and`/`or` are listed here rather than as separate node kinds: the
/// language evaluates both operands eagerly, so they behave like ordinary
/// binary operators.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
pub enum BinaryOp {
    /// Exponentiation (`**`)
    #[strum(serialize = "**")]
    Power,
    /// Multiplication (`*`)
    #[strum(serialize = "*")]
    Multiply,
    /// Division (`/`)
    #[strum(serialize = "/")]
    Divide,
    /// Remainder (`%`)
    #[strum(serialize = "%")]
    Modulo,
    /// Addition, or text concatenation for non-numeric operands (`+`)
    #[strum(serialize = "+")]
    Add,
    /// Subtraction (`-`)
    #[strum(serialize = "-")]
    Subtract,
    /// Less than (`<`)
    #[strum(serialize = "<")]
    Less,
    /// Less than or equal (`<=`)
    #[strum(serialize = "<=")]
    LessEqual,
    /// Greater than (`>`)
    #[strum(serialize = ">")]
    Greater,
    /// Greater than or equal (`>=`)
    #[strum(serialize = ">=")]
    GreaterEqual,
    /// Tolerance equality (`==`)
    #[strum(serialize = "==")]
    Equal,
    /// Tolerance inequality (`!=`)
    #[strum(serialize = "!=")]
    NotEqual,
    /// Logical conjunction, both operands evaluated (`and`)
    #[strum(serialize = "and")]
    And,
    /// Logical disjunction, both operands evaluated (`or`)
    #[strum(serialize = "or")]
    Or,
}

/// Unary operator tokens of the surface language.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
pub enum UnaryOp {
    /// Numeric negation (`-`)
    #[strum(serialize = "-")]
    Negate,
    /// Logical negation (`not`)
    #[strum(serialize = "not")]
    Not,
}
