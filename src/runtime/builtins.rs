//! Builtin functions available to every console session

use crate::runtime::error::{ErrorKind, RuntimeError};
use crate::runtime::value::Value;

pub const BUILTINS: &[&str] = &["len", "str", "inspect", "type", "raise", "message", "backtrace"];

/// Whether `name` is a builtin
pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains(&name)
}

fn arity(
    name: &str,
    args: &[Value],
    expected: usize,
) -> Result<(), RuntimeError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(RuntimeError::new(
            ErrorKind::ArgumentError,
            format!(
                "wrong number of arguments to `{name}' (given {}, expected {expected})",
                args.len()
            ),
        ))
    }
}

fn expect_exception<'a>(
    name: &str,
    value: &'a Value,
) -> Result<&'a RuntimeError, RuntimeError> {
    match value {
        Value::Exception(err) => Ok(err),
        other => Err(RuntimeError::new(
            ErrorKind::TypeError,
            format!("`{name}' expects an exception, got {}", other.class_name()),
        )),
    }
}

/// Call builtin `name`. The caller attaches the backtrace to any error.
pub fn call(
    name: &str,
    args: Vec<Value>,
) -> Result<Value, RuntimeError> {
    match name {
        "len" => {
            arity(name, &args, 1)?;
            match &args[0] {
                Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
                Value::Array(items) => Ok(Value::Int(items.len() as i64)),
                other => Err(RuntimeError::new(
                    ErrorKind::TypeError,
                    format!("{} has no length", other.class_name()),
                )),
            }
        }
        "str" => {
            arity(name, &args, 1)?;
            Ok(Value::Str(args[0].to_string()))
        }
        "inspect" => {
            arity(name, &args, 1)?;
            Ok(Value::Str(args[0].inspect()))
        }
        "type" => {
            arity(name, &args, 1)?;
            Ok(Value::Str(args[0].class_name()))
        }
        "raise" => Err(raise(args)),
        "message" => {
            arity(name, &args, 1)?;
            let err = expect_exception(name, &args[0])?;
            Ok(Value::Str(err.message.clone()))
        }
        "backtrace" => {
            arity(name, &args, 1)?;
            let err = expect_exception(name, &args[0])?;
            Ok(Value::array(
                err.backtrace.iter().cloned().map(Value::Str).collect(),
            ))
        }
        other => Err(RuntimeError::new(
            ErrorKind::NoMethodError,
            format!("undefined function `{other}'"),
        )),
    }
}

/// `raise`, `raise(msg)`, `raise(kind, msg)` or re-raise of a captured exception
fn raise(args: Vec<Value>) -> RuntimeError {
    match args.as_slice() {
        [] => RuntimeError::new(ErrorKind::RuntimeError, "unhandled exception"),
        [Value::Exception(err)] => RuntimeError::new(err.kind.clone(), err.message.clone()),
        [message] => RuntimeError::new(ErrorKind::RuntimeError, message.to_string()),
        [Value::Symbol(kind) | Value::Str(kind), message] => {
            RuntimeError::new(ErrorKind::from_name(kind), message.to_string())
        }
        [kind, _] => RuntimeError::new(
            ErrorKind::TypeError,
            format!("exception class must be a symbol or string, got {}", kind.class_name()),
        ),
        _ => RuntimeError::new(
            ErrorKind::ArgumentError,
            format!(
                "wrong number of arguments to `raise' (given {}, expected 0..2)",
                args.len()
            ),
        ),
    }
}
