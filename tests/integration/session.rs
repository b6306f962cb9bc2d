//! End-to-end console sessions

use yaoxiang_console::repl::{CaptureSink, Context, DriverStack, StreamDriver};
use yaoxiang_console::runtime::ErrorKind;
use yaoxiang_console::Value;
use std::rc::Rc;

fn session() -> (Context, CaptureSink) {
    let sink = CaptureSink::new();
    (Context::new(Value::Main).with_fallback(sink.clone()), sink)
}

fn feed(
    context: &mut Context,
    lines: &[&str],
) {
    for line in lines {
        assert!(context.process_line(line), "session ended at {line:?}");
    }
}

#[test]
fn test_recursive_function() {
    let (mut context, sink) = session();
    feed(&mut context, &[
        "def fact(n)",
        "  if n <= 1",
        "    1",
        "  else",
        "    n * fact(n - 1)",
        "  end",
        "end",
        "fact(10)",
    ]);
    assert_eq!(sink.lines(), vec!["=> :fact", "=> 3628800"]);
    assert_eq!(context.line(), 9);
}

#[test]
fn test_while_loop_with_state() {
    let (mut context, sink) = session();
    feed(&mut context, &[
        "total = 0",
        "i = 0",
        "while i < 5",
        "  total = total + i",
        "  i = i + 1",
        "end",
        "total",
    ]);
    assert_eq!(sink.last().as_deref(), Some("=> 10"));
}

#[test]
fn test_raise_and_inspect_exception() {
    let (mut context, sink) = session();
    feed(&mut context, &["raise(\"boom\")"]);
    assert_eq!(sink.last().as_deref(), Some("RuntimeError: boom\n\t(yx):1"));
    assert_eq!(
        context.last_exception().map(|err| err.kind.clone()),
        Some(ErrorKind::RuntimeError)
    );

    feed(&mut context, &["backtrace(exception)"]);
    assert_eq!(sink.last().as_deref(), Some("=> [\"(yx):1\"]"));
}

#[test]
fn test_division_by_zero_keeps_last_result() {
    let (mut context, sink) = session();
    feed(&mut context, &["7", "1 / 0", "_"]);
    assert_eq!(
        sink.lines(),
        vec!["=> 7", "ZeroDivisionError: divided by 0\n\t(yx):2", "=> 7"]
    );
}

#[test]
fn test_nested_session_takes_over_output() {
    let drivers = DriverStack::new();
    let outer_sink = CaptureSink::new();
    let _outer = drivers.push(Rc::new(StreamDriver::new(outer_sink.clone())));

    let mut outer = Context::new(Value::Main).with_drivers(drivers.clone());
    let mut inner = Context::new(Value::Int(3)).with_drivers(drivers.clone());

    outer.process_line(":outer");
    {
        let inner_sink = CaptureSink::new();
        let _inner = drivers.push(Rc::new(StreamDriver::new(inner_sink.clone())));
        inner.process_line("self + 1");
        outer.process_line(":still_inner");
        assert_eq!(inner_sink.lines(), vec!["=> 4", "=> :still_inner"]);
    }
    outer.process_line(":back");
    assert_eq!(outer_sink.lines(), vec!["=> :outer", "=> :back"]);
}

#[test]
fn test_syntax_error_inside_block_recovers() {
    let (mut context, sink) = session();
    feed(&mut context, &["def greet(name)", "  \"hi \" + name", "else", "end"]);
    assert_eq!(
        sink.lines(),
        vec![
            "SyntaxError: compile error\n(yx):3: syntax error, unexpected 'else'",
            "=> :greet",
        ]
    );
    feed(&mut context, &["greet(\"bob\")"]);
    assert_eq!(sink.last().as_deref(), Some("=> \"hi bob\""));
}
