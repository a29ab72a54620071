//! # Runtime Values
//!
//! The dynamic value model of the script language and the semantics of every
//! operator over it. Numbers are arbitrary-precision base-10 decimals, which
//! keeps financial arithmetic exact: `0.1 + 0.2` is `0.3`, not an
//! approximation.
//!
//! ## Operator rules
//!
//! * `+`, `-`, `*` on two decimals are exact, with unbounded digits.
//! * `/` rounds only when it must, into the 34 significant digits of the
//!   decimal128 format; exact quotients such as `10 / 4` stay exact.
//! * `%` and the exponent of `**` truncate their operands toward zero into
//!   integral range first. The precision loss is part of the language, not
//!   hidden.
//! * `+` with any non-decimal operand renders both sides as text and
//!   concatenates.
//! * `==`/`!=` on decimals compare within an absolute tolerance of 1e-9;
//!   on anything else they are exact.
//! * Relational and logical operators insist on decimal and boolean
//!   operands respectively. Logical operators evaluate both sides.
//!
//! These functions only ever see resolved operands. Pending operands are
//! lifted by the expression walk before the operator is applied.

use std::cmp::Ordering;
use std::fmt;

use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, One, ToPrimitive, Zero};
use lazy_static::lazy_static;

use super::pending::PendingValue;
use crate::ast::{BinaryOp, UnaryOp};
use crate::error::{EvalError, EvalResult};

/// Significant digits of the decimal128 format, applied when a quotient
/// does not terminate within them.
const DIVISION_PRECISION: u64 = 34;

/// Largest exponent magnitude `**` accepts after truncation.
const MAX_POWER_EXPONENT: u64 = 999_999_999;

lazy_static! {
    /// Absolute tolerance used by the script `==`/`!=` operators on decimals.
    static ref EQUALITY_EPSILON: BigDecimal = BigDecimal::new(BigInt::from(1), 9);
}

/// A runtime value. Immutable once constructed.
///
/// `Void` is the "no value" result of statements, distinct from the script
/// literal `Nil`. `Pending` wraps a result a host function has not produced
/// yet.
#[derive(Debug, Clone)]
pub enum Value {
    Decimal(BigDecimal),
    Text(String),
    Boolean(bool),
    Nil,
    Void,
    Pending(PendingValue),
}

impl Value {
    /// Variant name for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "text",
            Value::Boolean(_) => "boolean",
            Value::Nil => "nil",
            Value::Void => "void",
            Value::Pending(_) => "pending",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Value::Pending(_))
    }

    pub fn as_decimal(&self) -> Option<&BigDecimal> {
        match self {
            Value::Decimal(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Fully resolves this value, awaiting through any chain of pendings.
    pub async fn resolved(self) -> EvalResult<Value> {
        let mut value = self;
        while let Value::Pending(pending) = value {
            value = pending.wait().await?;
        }
        Ok(value)
    }

    /// Applies a binary operator to two resolved operands.
    pub fn apply_binary(op: BinaryOp, left: Value, right: Value) -> EvalResult<Value> {
        match op {
            BinaryOp::Power => Self::power(left, right),
            BinaryOp::Multiply => Self::multiply(left, right),
            BinaryOp::Divide => Self::divide(left, right),
            BinaryOp::Modulo => Self::modulo(left, right),
            BinaryOp::Add => Self::add(left, right),
            BinaryOp::Subtract => Self::subtract(left, right),
            BinaryOp::Less => Self::compare(op, left, right, Ordering::is_lt),
            BinaryOp::LessEqual => Self::compare(op, left, right, Ordering::is_le),
            BinaryOp::Greater => Self::compare(op, left, right, Ordering::is_gt),
            BinaryOp::GreaterEqual => Self::compare(op, left, right, Ordering::is_ge),
            BinaryOp::Equal => Ok(Value::Boolean(Self::tolerance_equal(&left, &right))),
            BinaryOp::NotEqual => Ok(Value::Boolean(!Self::tolerance_equal(&left, &right))),
            BinaryOp::And | BinaryOp::Or => Self::logical(op, left, right),
        }
    }

    /// Applies a unary operator. Unary operators never lift: a pending
    /// operand is a type mismatch like any other wrong variant.
    pub fn apply_unary(op: UnaryOp, operand: Value) -> EvalResult<Value> {
        match (op, operand) {
            (UnaryOp::Negate, Value::Decimal(d)) => Ok(Value::Decimal(-d)),
            (UnaryOp::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
            (op, operand) => Err(EvalError::type_mismatch(format!(
                "cannot apply {} to {}",
                op,
                operand.kind_name()
            ))),
        }
    }

    fn add(left: Value, right: Value) -> EvalResult<Value> {
        match (left, right) {
            (Value::Decimal(l), Value::Decimal(r)) => Ok(Value::Decimal(l + r)),
            // any other combination concatenates the rendered forms
            (l, r) => Ok(Value::Text(format!("{}{}", l, r))),
        }
    }

    fn subtract(left: Value, right: Value) -> EvalResult<Value> {
        match (left, right) {
            (Value::Decimal(l), Value::Decimal(r)) => Ok(Value::Decimal(l - r)),
            (l, r) => Err(Self::binary_mismatch(BinaryOp::Subtract, &l, &r)),
        }
    }

    fn multiply(left: Value, right: Value) -> EvalResult<Value> {
        match (left, right) {
            (Value::Decimal(l), Value::Decimal(r)) => Ok(Value::Decimal(l * r)),
            (l, r) => Err(Self::binary_mismatch(BinaryOp::Multiply, &l, &r)),
        }
    }

    fn divide(left: Value, right: Value) -> EvalResult<Value> {
        match (left, right) {
            (Value::Decimal(l), Value::Decimal(r)) => {
                if r.is_zero() {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(Value::Decimal(Self::fit_division_context(l / r)))
            }
            (l, r) => Err(Self::binary_mismatch(BinaryOp::Divide, &l, &r)),
        }
    }

    fn modulo(left: Value, right: Value) -> EvalResult<Value> {
        match (left, right) {
            (Value::Decimal(l), Value::Decimal(r)) => {
                let l = Self::integral_operand(BinaryOp::Modulo, &l)?;
                let r = Self::integral_operand(BinaryOp::Modulo, &r)?;
                if r == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(Value::Decimal(BigDecimal::from(l % r)))
            }
            (l, r) => Err(Self::binary_mismatch(BinaryOp::Modulo, &l, &r)),
        }
    }

    fn power(left: Value, right: Value) -> EvalResult<Value> {
        match (left, right) {
            (Value::Decimal(l), Value::Decimal(r)) => {
                let exponent = Self::integral_operand(BinaryOp::Power, &r)?;
                Self::decimal_power(&l, exponent).map(Value::Decimal)
            }
            (l, r) => Err(Self::binary_mismatch(BinaryOp::Power, &l, &r)),
        }
    }

    fn compare<F>(op: BinaryOp, left: Value, right: Value, check: F) -> EvalResult<Value>
    where
        F: Fn(Ordering) -> bool,
    {
        match (left, right) {
            (Value::Decimal(l), Value::Decimal(r)) => Ok(Value::Boolean(check(l.cmp(&r)))),
            (l, r) => Err(Self::binary_mismatch(op, &l, &r)),
        }
    }

    fn logical(op: BinaryOp, left: Value, right: Value) -> EvalResult<Value> {
        match (op, left, right) {
            (BinaryOp::And, Value::Boolean(l), Value::Boolean(r)) => Ok(Value::Boolean(l && r)),
            (BinaryOp::Or, Value::Boolean(l), Value::Boolean(r)) => Ok(Value::Boolean(l || r)),
            (op, l, r) => Err(Self::binary_mismatch(op, &l, &r)),
        }
    }

    /// Script equality: tolerance comparison on decimals, exact elsewhere.
    fn tolerance_equal(left: &Value, right: &Value) -> bool {
        match (left, right) {
            (Value::Decimal(l), Value::Decimal(r)) => (l - r).abs() < *EQUALITY_EPSILON,
            (l, r) => l == r,
        }
    }

    /// Truncates a decimal operand toward zero for the integral operators.
    fn integral_operand(op: BinaryOp, operand: &BigDecimal) -> EvalResult<i64> {
        operand.to_i64().ok_or_else(|| {
            EvalError::type_mismatch(format!(
                "operand of {} out of integral range: {}",
                op, operand
            ))
        })
    }

    /// Exponentiation by squaring over an already truncated exponent.
    /// Negative exponents go through the reciprocal under the division
    /// context.
    fn decimal_power(base: &BigDecimal, exponent: i64) -> EvalResult<BigDecimal> {
        if exponent.unsigned_abs() > MAX_POWER_EXPONENT {
            return Err(EvalError::type_mismatch(format!(
                "exponent of {} out of range: {}",
                BinaryOp::Power,
                exponent
            )));
        }
        let mut result = BigDecimal::one();
        let mut factor = base.clone();
        let mut remaining = exponent.unsigned_abs();
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = &result * &factor;
            }
            remaining >>= 1;
            if remaining > 0 {
                factor = &factor * &factor;
            }
        }
        if exponent < 0 {
            if result.is_zero() {
                return Err(EvalError::DivisionByZero);
            }
            result = Self::fit_division_context(BigDecimal::one() / result);
        }
        Ok(result)
    }

    /// Rounds a quotient into the division context only when it carries more
    /// digits than the context allows; exact short results stay untouched.
    fn fit_division_context(quotient: BigDecimal) -> BigDecimal {
        if quotient.digits() > DIVISION_PRECISION {
            quotient.with_prec(DIVISION_PRECISION)
        } else {
            quotient
        }
    }

    fn binary_mismatch(op: BinaryOp, left: &Value, right: &Value) -> EvalError {
        EvalError::type_mismatch(format!(
            "cannot apply {} to {} and {}",
            op,
            left.kind_name(),
            right.kind_name()
        ))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Text(t) => write!(f, "{}", t),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Nil => write!(f, "nil"),
            Value::Void => write!(f, "void"),
            Value::Pending(_) => write!(f, "<pending>"),
        }
    }
}

/// Structural equality: exact numeric comparison for decimals (the script
/// `==` operator applies a tolerance instead, see [`Value::apply_binary`]),
/// and identity for pendings.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Decimal(l), Value::Decimal(r)) => l == r,
            (Value::Text(l), Value::Text(r)) => l == r,
            (Value::Boolean(l), Value::Boolean(r)) => l == r,
            (Value::Nil, Value::Nil) => true,
            (Value::Void, Value::Void) => true,
            (Value::Pending(l), Value::Pending(r)) => l.ptr_eq(r),
            _ => false,
        }
    }
}

// 生のリテラルと直接比較できるようにする: result == 3, result == "a1"
impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        matches!(self, Value::Decimal(d) if *d == BigDecimal::from(*other))
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        // via the text form, so 1.1 means the written literal and not its
        // binary expansion
        match self {
            Value::Decimal(d) => format!("{}", other)
                .parse::<BigDecimal>()
                .map(|rhs| *d == rhs)
                .unwrap_or(false),
            _ => false,
        }
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, Value::Text(t) if t == other)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        matches!(self, Value::Boolean(b) if b == other)
    }
}

impl From<BigDecimal> for Value {
    fn from(value: BigDecimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Decimal(BigDecimal::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<PendingValue> for Value {
    fn from(value: PendingValue) -> Self {
        Value::Pending(value)
    }
}
