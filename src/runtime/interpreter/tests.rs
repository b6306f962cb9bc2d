//! Interpreter unit tests

use super::Interpreter;
use crate::repl::environment::{Environment, Evaluation};
use crate::runtime::error::{ErrorKind, RuntimeError};
use crate::runtime::value::Value;

fn eval(
    interp: &mut Interpreter,
    source: &str,
) -> Value {
    match interp.run(source, "(test)", 1) {
        Ok(Evaluation::Value(value)) => value,
        other => panic!("expected a value from {source:?}, got {other:?}"),
    }
}

fn eval_err(
    interp: &mut Interpreter,
    source: &str,
) -> RuntimeError {
    interp.run(source, "(test)", 1).unwrap_err()
}

#[test]
fn test_arithmetic() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "1 + 2 * 3"), Value::Int(7));
    assert_eq!(eval(&mut interp, "(1 + 2) * 3"), Value::Int(9));
    assert_eq!(eval(&mut interp, "-2 - 3"), Value::Int(-5));
    assert_eq!(eval(&mut interp, "7 / 2.0"), Value::Float(3.5));
}

#[test]
fn test_bindings_persist_between_runs() {
    let mut interp = Interpreter::new();
    eval(&mut interp, "x = :ok");
    eval(&mut interp, "y = x");
    assert_eq!(eval(&mut interp, "y"), Value::symbol("ok"));
    assert_eq!(interp.binding_names().collect::<Vec<_>>(), vec!["x", "y"]);
}

#[test]
fn test_fresh_interpreters_do_not_share_scope() {
    let mut first = Interpreter::new();
    eval(&mut first, "x = 1");
    let mut second = Interpreter::new();
    assert_eq!(eval_err(&mut second, "x").kind, ErrorKind::NameError);
}

#[test]
fn test_self_is_target() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "self"), Value::Main);

    let mut interp = Interpreter::with_target(Value::array(vec![Value::Int(1)]));
    assert_eq!(eval(&mut interp, "len(self)"), Value::Int(1));
}

#[test]
fn test_blank_program_is_ignored() {
    let mut interp = Interpreter::new();
    assert_eq!(interp.run("", "(test)", 1).unwrap(), Evaluation::Ignore);
    assert_eq!(interp.run("\n# note\n", "(test)", 1).unwrap(), Evaluation::Ignore);
}

#[test]
fn test_set_binding_is_visible() {
    let mut interp = Interpreter::new();
    interp.set_binding("_", Value::Int(42));
    assert_eq!(eval(&mut interp, "_ + 1"), Value::Int(43));
    assert_eq!(interp.binding("_"), Some(Value::Int(42)));
    assert_eq!(interp.binding("missing"), None);
}

#[test]
fn test_functions() {
    let mut interp = Interpreter::new();
    assert_eq!(
        eval(&mut interp, "def add(a, b)\n  a + b\nend"),
        Value::symbol("add")
    );
    assert_eq!(eval(&mut interp, "add(2, 3)"), Value::Int(5));
    eval(&mut interp, "def foo\n:ok\nend");
    assert_eq!(eval(&mut interp, "foo"), Value::symbol("ok"));
    assert_eq!(interp.function_names().collect::<Vec<_>>(), vec!["add", "foo"]);
}

#[test]
fn test_functions_have_their_own_scope() {
    let mut interp = Interpreter::new();
    eval(&mut interp, "x = 10");
    eval(&mut interp, "def peek\n  x\nend");
    assert_eq!(eval_err(&mut interp, "peek").kind, ErrorKind::NameError);
    eval(&mut interp, "def shadow(x)\n  x = x * 2\n  x\nend");
    assert_eq!(eval(&mut interp, "shadow(3)"), Value::Int(6));
    assert_eq!(eval(&mut interp, "x"), Value::Int(10));
}

#[test]
fn test_recursion_and_return() {
    let mut interp = Interpreter::new();
    eval(
        &mut interp,
        "def fact(n)\n  if n <= 1\n    return 1\n  end\n  n * fact(n - 1)\nend",
    );
    assert_eq!(eval(&mut interp, "fact(10)"), Value::Int(3_628_800));
}

#[test]
fn test_control_flow() {
    let mut interp = Interpreter::new();
    assert_eq!(
        eval(&mut interp, "i = 0; total = 0\nwhile i < 5\n  total = total + i\n  i = i + 1\nend\ntotal"),
        Value::Int(10)
    );
    assert_eq!(
        eval(&mut interp, "if false\n1\nelsif nil\n2\nelse\n3\nend"),
        Value::Int(3)
    );
    assert_eq!(eval(&mut interp, "if false\n1\nend"), Value::Nil);
    assert_eq!(eval(&mut interp, "nil || :fallback"), Value::symbol("fallback"));
    assert_eq!(eval(&mut interp, "1 && 2"), Value::Int(2));
}

#[test]
fn test_short_circuit_skips_errors() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "false && undefined_thing"), Value::Bool(false));
}

#[test]
fn test_name_error_backtrace() {
    let mut interp = Interpreter::new();
    let err = interp.run("1\nDoesNotExist", "(yx)", 5).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NameError);
    assert_eq!(err.message, "undefined local variable or function `DoesNotExist'");
    assert_eq!(err.backtrace, vec!["(yx):6".to_string()]);
}

#[test]
fn test_backtrace_through_functions() {
    let mut interp = Interpreter::new();
    interp
        .run("def inner\n  1 / 0\nend\ndef outer\n  inner\nend", "(yx)", 1)
        .unwrap();
    let err = interp.run("outer", "(yx)", 7).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ZeroDivisionError);
    assert_eq!(
        err.backtrace,
        vec![
            "(yx):2:in `inner'".to_string(),
            "(yx):5:in `outer'".to_string(),
            "(yx):7".to_string(),
        ]
    );
}

#[test]
fn test_arity_mismatch() {
    let mut interp = Interpreter::new();
    eval(&mut interp, "def one(a)\na\nend");
    let err = eval_err(&mut interp, "one(1, 2)");
    assert_eq!(err.kind, ErrorKind::ArgumentError);
    assert_eq!(err.message, "wrong number of arguments (given 2, expected 1)");
}

#[test]
fn test_unknown_function() {
    let mut interp = Interpreter::new();
    let err = eval_err(&mut interp, "nope(1)");
    assert_eq!(err.kind, ErrorKind::NoMethodError);
}

#[test]
fn test_stack_limit() {
    let mut interp = Interpreter::new().with_max_call_depth(16);
    eval(&mut interp, "def forever(n)\n  forever(n + 1)\nend");
    let err = eval_err(&mut interp, "forever(0)");
    assert_eq!(err.kind, ErrorKind::SystemStackError);
    assert_eq!(err.backtrace.len(), 17);
    // the interpreter is still usable afterwards
    assert_eq!(eval(&mut interp, "1"), Value::Int(1));
}

#[test]
fn test_deep_recursion_without_call_limit() {
    let mut interp = Interpreter::new().with_max_call_depth(1_000_000);
    eval(&mut interp, "def down(n)\n  down(n + 1)\nend");
    let err = eval_err(&mut interp, "down(0)");
    assert_eq!(err.kind, ErrorKind::SystemStackError);
    assert_eq!(err.message, "stack level too deep");
    assert_eq!(eval(&mut interp, "1 + 1"), Value::Int(2));
}

#[test]
fn test_evaluation_into_value() {
    let mut interp = Interpreter::new();
    let value = interp.run("1 + 2", "(test)", 1).unwrap().into_value();
    assert_eq!(value, Some(Value::Int(3)));
    let ignored = interp.run("# nothing", "(test)", 1).unwrap().into_value();
    assert_eq!(ignored, None);
}

#[test]
fn test_raise_and_inspect_exception() {
    let mut interp = Interpreter::new();
    let err = eval_err(&mut interp, "raise(:ArgumentError, \"bad input\")");
    assert_eq!(err.to_string(), "ArgumentError: bad input");
    assert_eq!(err.backtrace, vec!["(test):1".to_string()]);

    interp.set_binding("e", Value::Exception(std::rc::Rc::new(err)));
    assert_eq!(eval(&mut interp, "message(e)"), Value::str("bad input"));
    assert_eq!(eval(&mut interp, "type(e)"), Value::str("ArgumentError"));
    assert_eq!(
        eval(&mut interp, "backtrace(e)"),
        Value::array(vec![Value::str("(test):1")])
    );
}

#[test]
fn test_syntax_error_when_run_directly() {
    let mut interp = Interpreter::new();
    let err = interp.run("1\n1 2", "(yx)", 3).unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
    assert_eq!(err.backtrace, vec!["(yx):4".to_string()]);
}

#[test]
fn test_top_level_return() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "return 5\n6"), Value::Int(5));
}

#[test]
fn test_arrays() {
    let mut interp = Interpreter::new();
    assert_eq!(
        eval(&mut interp, "a = [1, 2] + [3]\na[-1]"),
        Value::Int(3)
    );
    assert_eq!(
        eval(&mut interp, "[\n  1,\n  2,\n]"),
        Value::array(vec![Value::Int(1), Value::Int(2)])
    );
}
