//! Script transcripts

use std::io::Cursor;

use yaoxiang_console::repl::{run_script, CaptureSink, Context};
use yaoxiang_console::util::config::ConsoleConfig;
use yaoxiang_console::Value;

#[test]
fn test_transcript_of_block() {
    let sink = CaptureSink::new();
    let mut context = Context::new(Value::Main).with_fallback(sink.clone());
    let script = "def sq(x)\n  x * x\nend\nsq(12)\nexit\n";

    assert_eq!(run_script(&mut context, Cursor::new(script)).unwrap(), 5);
    assert_eq!(
        sink.lines(),
        vec![
            "yx(main):001:0> def sq(x)",
            "yx(main):002:1>   x * x",
            "yx(main):003:1> end",
            "=> :sq",
            "yx(main):004:0> sq(12)",
            "=> 144",
            "yx(main):005:0> exit",
        ]
    );
}

#[test]
fn test_configured_label_in_transcript() {
    let mut config = ConsoleConfig::default();
    config.repl.label = "calc".to_string();
    config.repl.colors = false;

    let sink = CaptureSink::new();
    let mut context = Context::from_config(Value::Main, &config).with_fallback(sink.clone());
    run_script(&mut context, Cursor::new("oops\n")).unwrap();
    assert_eq!(
        sink.lines(),
        vec![
            "calc(main):001:0> oops",
            "NameError: undefined local variable or function `oops'\n\t(calc):1",
        ]
    );
}
