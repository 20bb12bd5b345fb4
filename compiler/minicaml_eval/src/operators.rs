//! Binary and unary operators.
//!
//! Both operands are already evaluated. Dispatch is a match on the operand
//! kinds, then on the operator; combinations without a meaning are type errors.
//! Equality is the exception: `=` and `<>` accept any pair of values and never
//! fail, comparing values of different kinds as unequal.

use minicaml_ir::{BinaryOp, UnaryOp};

use crate::errors::{
    binary_type_mismatch, division_by_zero, integer_overflow, modulo_by_zero, type_mismatch,
    EvalResult,
};
use crate::Value;

#[inline]
fn checked_arith(result: Option<i64>, op_name: &'static str) -> EvalResult {
    result.map(Value::Int).ok_or_else(|| integer_overflow(op_name))
}

/// Evaluate `left op right`.
#[allow(clippy::needless_pass_by_value)]
pub fn evaluate_binary(left: Value, right: Value, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Eq => return Ok(Value::Bool(left == right)),
        BinaryOp::NotEq => return Ok(Value::Bool(left != right)),
        _ => {}
    }

    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(*a, *b, op),
        (Value::Bool(a), Value::Bool(b)) => eval_bool_binary(*a, *b, op),
        (Value::Str(a), Value::Str(b)) => eval_string_binary(a, b, op),
        (Value::List(a), Value::List(b)) if op == BinaryOp::Concat => {
            let mut joined = a.clone();
            joined.append(b.clone());
            Ok(Value::List(joined))
        }
        _ => Err(binary_type_mismatch(op, left.type_name(), right.type_name())),
    }
}

fn eval_int_binary(a: i64, b: i64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => checked_arith(a.checked_add(b), "addition"),
        BinaryOp::Sub => checked_arith(a.checked_sub(b), "subtraction"),
        BinaryOp::Mul => checked_arith(a.checked_mul(b), "multiplication"),
        BinaryOp::Div if b == 0 => Err(division_by_zero()),
        BinaryOp::Div => checked_arith(a.checked_div(b), "division"),
        BinaryOp::Mod if b == 0 => Err(modulo_by_zero()),
        BinaryOp::Mod => checked_arith(a.checked_rem(b), "modulo"),
        _ if op.is_comparison() => Ok(Value::Bool(compare(&a, &b, op))),
        _ => Err(binary_type_mismatch(op, "int", "int")),
    }
}

fn eval_bool_binary(a: bool, b: bool, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::And => Ok(Value::Bool(a && b)),
        BinaryOp::Or => Ok(Value::Bool(a || b)),
        _ if op.is_comparison() => Ok(Value::Bool(compare(&a, &b, op))),
        _ => Err(binary_type_mismatch(op, "bool", "bool")),
    }
}

fn eval_string_binary(a: &str, b: &str, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Concat => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            Ok(Value::string(joined))
        }
        _ if op.is_comparison() => Ok(Value::Bool(compare(a, b, op))),
        _ => Err(binary_type_mismatch(op, "string", "string")),
    }
}

/// Ordering comparison; `op` must satisfy `BinaryOp::is_comparison`.
fn compare<T: PartialOrd + ?Sized>(a: &T, b: &T, op: BinaryOp) -> bool {
    match op {
        BinaryOp::Lt => a < b,
        BinaryOp::LtEq => a <= b,
        BinaryOp::Gt => a > b,
        BinaryOp::GtEq => a >= b,
        BinaryOp::Eq => a == b,
        _ => a != b,
    }
}

/// Evaluate a unary operator: `not` on booleans, negation on integers.
#[allow(clippy::needless_pass_by_value)]
pub fn evaluate_unary(op: UnaryOp, operand: Value) -> EvalResult {
    match (op, &operand) {
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Neg, Value::Int(n)) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("negation")),
        (UnaryOp::Not, other) => Err(type_mismatch("bool", other.type_name())),
        (UnaryOp::Neg, other) => Err(type_mismatch("int", other.type_name())),
    }
}
