//! Operator semantics

use crate::frontend::parser::ast::{BinaryOp, UnaryOp};
use crate::runtime::error::{ErrorKind, RuntimeError};
use crate::runtime::value::Value;

/// Longest string an operator may build, in bytes
pub const MAX_STRING_BYTES: usize = 64 * 1024 * 1024;

/// Longest array an operator may build
pub const MAX_ARRAY_LEN: usize = 16 * 1024 * 1024;

fn overflow() -> RuntimeError {
    RuntimeError::new(ErrorKind::RangeError, "integer overflow")
}

fn divided_by_zero() -> RuntimeError {
    RuntimeError::new(ErrorKind::ZeroDivisionError, "divided by 0")
}

/// `len` when it is known and within `limit`
fn checked_size(
    len: Option<usize>,
    limit: usize,
) -> Result<usize, RuntimeError> {
    match len {
        Some(len) if len <= limit => Ok(len),
        _ => Err(RuntimeError::new(ErrorKind::ArgumentError, "argument too big")),
    }
}

fn unsupported(
    op: BinaryOp,
    left: &Value,
    right: &Value,
) -> RuntimeError {
    RuntimeError::new(
        ErrorKind::TypeError,
        format!(
            "unsupported operand types for {}: {} and {}",
            op.symbol(),
            left.class_name(),
            right.class_name()
        ),
    )
}

/// Apply a unary operator
pub fn unary(
    op: UnaryOp,
    operand: Value,
) -> Result<Value, RuntimeError> {
    match (op, operand) {
        (UnaryOp::Not, value) => Ok(Value::Bool(!value.truthy())),
        (UnaryOp::Neg, Value::Int(i)) => i.checked_neg().map(Value::Int).ok_or_else(overflow),
        (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Neg, other) => Err(RuntimeError::new(
            ErrorKind::TypeError,
            format!("unsupported operand type for unary -: {}", other.class_name()),
        )),
    }
}

/// Apply a non short-circuiting binary operator
pub fn binary(
    op: BinaryOp,
    left: Value,
    right: Value,
) -> Result<Value, RuntimeError> {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(left.loose_eq(&right))),
        BinaryOp::Neq => Ok(Value::Bool(!left.loose_eq(&right))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => compare(op, &left, &right),
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => arithmetic(op, left, right),
        BinaryOp::And | BinaryOp::Or => {
            unreachable!("short-circuit operators are evaluated by the interpreter")
        }
    }
}

fn add(
    left: Value,
    right: Value,
) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Str(mut a), Value::Str(b)) => {
            checked_size(a.len().checked_add(b.len()), MAX_STRING_BYTES)?;
            a.push_str(&b);
            Ok(Value::Str(a))
        }
        (Value::Array(a), Value::Array(b)) => {
            checked_size(a.len().checked_add(b.len()), MAX_ARRAY_LEN)?;
            let mut items = a.as_ref().clone();
            items.extend(b.iter().cloned());
            Ok(Value::array(items))
        }
        (left, right) => arithmetic(BinaryOp::Add, left, right),
    }
}

fn arithmetic(
    op: BinaryOp,
    left: Value,
    right: Value,
) -> Result<Value, RuntimeError> {
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => int_arithmetic(op, *a, *b),
        (Value::Str(s), Value::Int(n)) if op == BinaryOp::Mul => {
            let count = usize::try_from(*n)
                .map_err(|_| RuntimeError::new(ErrorKind::ArgumentError, "negative argument"))?;
            checked_size(s.len().checked_mul(count), MAX_STRING_BYTES)?;
            Ok(Value::Str(s.repeat(count)))
        }
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Float(match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                BinaryOp::Rem => a - b * (a / b).floor(),
                _ => return Err(unsupported(op, &left, &right)),
            })),
            _ => Err(unsupported(op, &left, &right)),
        },
    }
}

/// Integer arithmetic; division and remainder round toward negative infinity
fn int_arithmetic(
    op: BinaryOp,
    a: i64,
    b: i64,
) -> Result<Value, RuntimeError> {
    let result = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        BinaryOp::Div => {
            if b == 0 {
                return Err(divided_by_zero());
            }
            a.checked_div(b).map(|q| {
                if a % b != 0 && ((a < 0) != (b < 0)) {
                    q - 1
                } else {
                    q
                }
            })
        }
        BinaryOp::Rem => {
            if b == 0 {
                return Err(divided_by_zero());
            }
            a.checked_rem(b).map(|r| {
                if r != 0 && ((r < 0) != (b < 0)) {
                    r + b
                } else {
                    r
                }
            })
        }
        _ => None,
    };
    result.map(Value::Int).ok_or_else(overflow)
}

fn compare(
    op: BinaryOp,
    left: &Value,
    right: &Value,
) -> Result<Value, RuntimeError> {
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
    };
    let Some(ordering) = ordering else {
        return Err(RuntimeError::new(
            ErrorKind::ArgumentError,
            format!(
                "comparison of {} with {} failed",
                left.class_name(),
                right.class_name()
            ),
        ));
    };
    Ok(Value::Bool(match op {
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::Le => ordering.is_le(),
        BinaryOp::Gt => ordering.is_gt(),
        _ => ordering.is_ge(),
    }))
}

/// `target[index]`; out of range reads give nil
pub fn index(
    target: &Value,
    index: &Value,
) -> Result<Value, RuntimeError> {
    let position = match index {
        Value::Int(i) => *i,
        other => {
            return Err(RuntimeError::new(
                ErrorKind::TypeError,
                format!("no implicit conversion of {} into Integer", other.class_name()),
            ))
        }
    };
    let resolve = |len: usize| -> Option<usize> {
        let len = i64::try_from(len).ok()?;
        let at = if position < 0 { len + position } else { position };
        (0..len).contains(&at).then_some(at as usize)
    };
    match target {
        Value::Array(items) => Ok(resolve(items.len())
            .map(|at| items[at].clone())
            .unwrap_or(Value::Nil)),
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            Ok(resolve(chars.len())
                .map(|at| Value::Str(chars[at].to_string()))
                .unwrap_or(Value::Nil))
        }
        other => Err(RuntimeError::new(
            ErrorKind::NoMethodError,
            format!("undefined method `[]' for {}", other.class_name()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(op: BinaryOp, a: i64, b: i64) -> Result<Value, RuntimeError> {
        binary(op, Value::Int(a), Value::Int(b))
    }

    #[test]
    fn test_floor_division_and_modulo() {
        assert_eq!(int(BinaryOp::Div, 7, 2).unwrap(), Value::Int(3));
        assert_eq!(int(BinaryOp::Div, -7, 2).unwrap(), Value::Int(-4));
        assert_eq!(int(BinaryOp::Rem, -7, 2).unwrap(), Value::Int(1));
        assert_eq!(int(BinaryOp::Rem, 7, -2).unwrap(), Value::Int(-1));
    }

    #[test]
    fn test_division_by_zero() {
        let err = int(BinaryOp::Div, 1, 0).unwrap_err();
        assert_eq!(err.to_string(), "ZeroDivisionError: divided by 0");
        assert_eq!(int(BinaryOp::Rem, 1, 0).unwrap_err().kind, ErrorKind::ZeroDivisionError);
    }

    #[test]
    fn test_overflow_is_range_error() {
        assert_eq!(int(BinaryOp::Add, i64::MAX, 1).unwrap_err().kind, ErrorKind::RangeError);
        assert_eq!(int(BinaryOp::Div, i64::MIN, -1).unwrap_err().kind, ErrorKind::RangeError);
        assert_eq!(
            unary(UnaryOp::Neg, Value::Int(i64::MIN)).unwrap_err().kind,
            ErrorKind::RangeError
        );
    }

    #[test]
    fn test_mixed_numeric() {
        assert_eq!(
            binary(BinaryOp::Add, Value::Int(1), Value::Float(0.5)).unwrap(),
            Value::Float(1.5)
        );
        assert_eq!(
            binary(BinaryOp::Lt, Value::Int(1), Value::Float(1.5)).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_string_operators() {
        assert_eq!(
            binary(BinaryOp::Add, Value::str("a"), Value::str("b")).unwrap(),
            Value::str("ab")
        );
        assert_eq!(
            binary(BinaryOp::Mul, Value::str("ab"), Value::Int(3)).unwrap(),
            Value::str("ababab")
        );
        assert_eq!(
            binary(BinaryOp::Mul, Value::str("ab"), Value::Int(-1)).unwrap_err().kind,
            ErrorKind::ArgumentError
        );
    }

    #[test]
    fn test_oversized_results_are_rejected() {
        let err = binary(BinaryOp::Mul, Value::str("ab"), Value::Int(1_000_000_000_000)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ArgumentError);
        assert_eq!(err.message, "argument too big");

        let err = binary(BinaryOp::Mul, Value::str("ab"), Value::Int(i64::MAX)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ArgumentError);

        let half = Value::str("x".repeat(MAX_STRING_BYTES / 2 + 1));
        let err = binary(BinaryOp::Add, half.clone(), half).unwrap_err();
        assert_eq!(err.message, "argument too big");

        let filled = binary(BinaryOp::Mul, Value::str("ab"), Value::Int(4)).unwrap();
        assert_eq!(filled, Value::str("abababab"));
    }

    #[test]
    fn test_type_mismatch() {
        let err = binary(BinaryOp::Add, Value::Int(1), Value::str("x")).unwrap_err();
        assert_eq!(err.message, "unsupported operand types for +: Integer and String");
        let err = binary(BinaryOp::Lt, Value::Int(1), Value::str("x")).unwrap_err();
        assert_eq!(err.message, "comparison of Integer with String failed");
    }

    #[test]
    fn test_index() {
        let items = Value::array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(index(&items, &Value::Int(0)).unwrap(), Value::Int(1));
        assert_eq!(index(&items, &Value::Int(-1)).unwrap(), Value::Int(3));
        assert_eq!(index(&items, &Value::Int(3)).unwrap(), Value::Nil);
        assert_eq!(index(&Value::str("héllo"), &Value::Int(1)).unwrap(), Value::str("é"));
        assert_eq!(
            index(&items, &Value::str("0")).unwrap_err().kind,
            ErrorKind::TypeError
        );
        assert_eq!(
            index(&Value::Int(1), &Value::Int(0)).unwrap_err().kind,
            ErrorKind::NoMethodError
        );
    }
}
