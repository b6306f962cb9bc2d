//! Non-interactive input
//!
//! Feeds lines from any reader through [`Context::input_line`], which
//! echoes each prompt and line, producing a console transcript.

use std::io::BufRead;

use crate::repl::context::Context;

/// Feed `reader` to `context` until an exit command or end of input.
///
/// Returns the number of lines consumed, the exit command included.
pub fn run_script<R: BufRead>(
    context: &mut Context,
    reader: R,
) -> std::io::Result<usize> {
    let mut consumed = 0;
    for line in reader.lines() {
        let line = line?;
        consumed += 1;
        if !context.input_line(&line) {
            tracing::debug!(consumed, "script terminated");
            break;
        }
    }
    Ok(consumed)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::repl::driver::CaptureSink;
    use crate::runtime::value::Value;

    #[test]
    fn test_transcript() {
        let sink = CaptureSink::new();
        let mut context = Context::new(Value::Main).with_fallback(sink.clone());
        let input = Cursor::new("x = 2\nx * 21\nquit\n:unreached\n");
        assert_eq!(run_script(&mut context, input).unwrap(), 3);
        assert_eq!(
            sink.lines(),
            vec![
                "yx(main):001:0> x = 2",
                "=> 2",
                "yx(main):002:0> x * 21",
                "=> 42",
                "yx(main):003:0> quit",
            ]
        );
    }

    #[test]
    fn test_end_of_input_without_exit() {
        let sink = CaptureSink::new();
        let mut context = Context::new(Value::Main).with_fallback(sink.clone());
        assert_eq!(run_script(&mut context, Cursor::new("def f\n")).unwrap(), 1);
        assert_eq!(context.source().len(), 1);
    }
}
