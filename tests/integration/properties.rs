//! Line counter and prompt properties

use proptest::prelude::*;
use yaoxiang_console::repl::{CaptureSink, Context};
use yaoxiang_console::Value;

fn fragment() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("1"),
        Just("x = 2"),
        Just("def f"),
        Just("end"),
        Just(")"),
        Just("if true"),
        Just("else"),
        Just("missing"),
        Just(""),
        Just("[1,"),
        Just("2]"),
        Just("1 +"),
        Just("\"open"),
        Just("close\""),
    ]
}

proptest! {
    #[test]
    fn line_counter_advances_once_per_line(lines in proptest::collection::vec(fragment(), 0..40)) {
        let mut context = Context::new(Value::Main).with_fallback(CaptureSink::new());
        for (i, line) in lines.iter().enumerate() {
            prop_assert_eq!(context.line(), i + 1);
            prop_assert!(context.process_line(line));
            prop_assert!(!context.source().has_syntax_error());
            let expected = format!("yx(main):{:03}:{}> ", i + 2, context.source().level());
            prop_assert_eq!(context.prompt(), expected);
        }
        prop_assert_eq!(context.line(), lines.len() + 1);
    }

    #[test]
    fn complete_statements_leave_buffer_empty(values in proptest::collection::vec(-1000i64..1000, 1..20)) {
        let sink = CaptureSink::new();
        let mut context = Context::new(Value::Main).with_fallback(sink.clone());
        for value in &values {
            prop_assert!(context.process_line(&value.to_string()));
            prop_assert!(context.source().is_empty());
            let expected = format!("=> {value}");
            prop_assert_eq!(sink.last(), Some(expected));
        }
        let last = values.last().map(|v| Value::Int(*v));
        prop_assert_eq!(context.last_result(), last.as_ref());
    }
}
