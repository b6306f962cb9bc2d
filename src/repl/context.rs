//! Console context
//!
//! The [`Context`] is the per-session state machine. Every typed line goes
//! through [`Context::process_line`], which appends it to the source
//! buffer, classifies the buffer and then either waits for more input,
//! reports a syntax error, evaluates the statement, or signals that the
//! session should end.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::repl::driver::{DriverStack, OutputSink, StdoutSink};
use crate::repl::environment::{Environment, Evaluation};
use crate::repl::formatter::{DefaultFormatter, Formatter};
use crate::repl::source::{LineState, SourceBuffer, DEFAULT_EXIT_COMMANDS};
use crate::runtime::error::RuntimeError;
use crate::runtime::interpreter::Interpreter;
use crate::runtime::value::Value;
use crate::util::config::ConsoleConfig;

/// Label used in prompts and as the evaluation file name
pub const DEFAULT_LABEL: &str = "yx";

/// Binding that holds the last successful result
pub const LAST_RESULT_BINDING: &str = "_";

/// Bindings that hold the last exception
pub const LAST_EXCEPTION_BINDINGS: &[&str] = &["e", "exception"];

const DISPLAY_LIMIT: usize = 32;

/// State of one console session
pub struct Context {
    target: Value,
    environment: Box<dyn Environment>,
    formatter: Rc<dyn Formatter>,
    drivers: DriverStack,
    fallback: Rc<dyn OutputSink>,
    exit_commands: Rc<[String]>,
    label: String,
    line: usize,
    source: SourceBuffer,
    last_result: Option<Value>,
    last_exception: Option<RuntimeError>,
}

impl Context {
    /// Session on a fresh interpreter whose `self` is `target`
    pub fn new(target: Value) -> Self {
        let environment = Interpreter::with_target(target.clone());
        Self::with_environment(target, environment)
    }

    /// Session on an existing environment
    pub fn with_environment(
        target: Value,
        environment: impl Environment + 'static,
    ) -> Self {
        let exit_commands: Rc<[String]> = DEFAULT_EXIT_COMMANDS
            .iter()
            .map(|cmd| cmd.to_string())
            .collect::<Vec<_>>()
            .into();
        let mut context = Self {
            target,
            environment: Box::new(environment),
            formatter: Rc::new(DefaultFormatter::new()),
            drivers: DriverStack::new(),
            fallback: Rc::new(StdoutSink),
            source: SourceBuffer::with_exit_commands(Rc::clone(&exit_commands)),
            exit_commands,
            label: DEFAULT_LABEL.to_string(),
            line: 1,
            last_result: None,
            last_exception: None,
        };
        context.environment.set_binding(LAST_RESULT_BINDING, Value::Nil);
        for name in LAST_EXCEPTION_BINDINGS {
            context.environment.set_binding(name, Value::Nil);
        }
        context
    }

    /// Session configured from `config`
    pub fn from_config(
        target: Value,
        config: &ConsoleConfig,
    ) -> Self {
        let environment = Interpreter::with_target(target.clone())
            .with_max_call_depth(config.eval.max_call_depth);
        let formatter = DefaultFormatter::new()
            .with_colors(config.repl.colors)
            .with_description_limit(config.repl.description_limit);
        Self::with_environment(target, environment)
            .with_formatter(formatter)
            .with_label(config.repl.label.clone())
            .with_exit_commands(config.repl.exit_commands.iter().cloned())
    }

    pub fn with_formatter(
        mut self,
        formatter: impl Formatter + 'static,
    ) -> Self {
        self.formatter = Rc::new(formatter);
        self
    }

    /// Share `drivers` with other sessions
    pub fn with_drivers(
        mut self,
        drivers: DriverStack,
    ) -> Self {
        self.drivers = drivers;
        self
    }

    /// Sink used while no driver is active
    pub fn with_fallback(
        mut self,
        sink: impl OutputSink + 'static,
    ) -> Self {
        self.fallback = Rc::new(sink);
        self
    }

    /// Replace the words that end the session; the buffer is reset
    pub fn with_exit_commands<I, S>(
        mut self,
        commands: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exit_commands = commands
            .into_iter()
            .map(Into::into)
            .collect::<Vec<_>>()
            .into();
        self.clear_buffer();
        self
    }

    pub fn with_label(
        mut self,
        label: impl Into<String>,
    ) -> Self {
        self.label = label.into();
        self
    }

    /// Feed one typed line through the session.
    ///
    /// Returns `false` once an exit command is typed outside any block.
    pub fn process_line(
        &mut self,
        line: &str,
    ) -> bool {
        let formatter = Rc::clone(&self.formatter);
        let reindented = formatter.add_input_to_context(self, line);
        let state = self.source.state();
        debug!(line = self.line, ?state, reindented, "processed input line");

        match state {
            LineState::Terminate => return false,
            LineState::Error => {
                let detail = self.source.syntax_error().unwrap_or_default().to_string();
                let message = formatter.syntax_error(self, &detail);
                self.output(&message);
                self.source.pop();
            }
            LineState::Ready => {
                let text = self.source.render();
                self.evaluate(&text);
                self.clear_buffer();
            }
            LineState::Waiting => {}
        }

        self.line += 1;
        true
    }

    /// Run `text` in the environment and report the outcome.
    ///
    /// The start line counts back from the current line over the lines
    /// held in the buffer. Errors and panics raised by the environment are
    /// stored and printed, never propagated.
    pub fn evaluate(
        &mut self,
        text: &str,
    ) -> Option<Value> {
        let file = format!("({})", self.label);
        let start = (self.line + 1).saturating_sub(self.source.len()).max(1);
        debug!(file = %file, start, lines = self.source.len(), "evaluating statement");

        let environment = &mut self.environment;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            environment.run(text, &file, start)
        }))
        .unwrap_or_else(|payload| {
            let err = RuntimeError::from_panic(payload.as_ref());
            Err(err.with_backtrace(vec![format!("{file}:{start}")]))
        });

        match outcome {
            Ok(Evaluation::Value(value)) => {
                self.store_result(value.clone());
                let rendered = self.formatter.result(&value);
                self.output(&rendered);
                Some(value)
            }
            Ok(Evaluation::Ignore) => None,
            Err(err) => {
                debug!(error = %err, "statement raised");
                let rendered = self.formatter.exception(&err);
                self.store_exception(err);
                self.output(&rendered);
                None
            }
        }
    }

    fn store_result(
        &mut self,
        value: Value,
    ) {
        self.environment.set_binding(LAST_RESULT_BINDING, value.clone());
        self.last_result = Some(value);
    }

    fn store_exception(
        &mut self,
        err: RuntimeError,
    ) {
        let value = Value::Exception(Rc::new(err.clone()));
        for name in LAST_EXCEPTION_BINDINGS {
            self.environment.set_binding(name, value.clone());
        }
        self.last_exception = Some(err);
    }

    /// Write `text` to the active driver, or the fallback sink
    pub fn output(
        &self,
        text: &str,
    ) {
        let written = match self.drivers.current() {
            Some(driver) => driver.output().puts(text),
            None => self.fallback.puts(text),
        };
        if let Err(err) = written {
            warn!(error = %err, "failed to write console output");
        }
    }

    pub fn prompt(&self) -> String {
        self.formatter.prompt(self)
    }

    /// Echo the prompt and `line`, then process it
    pub fn input_line(
        &mut self,
        line: &str,
    ) -> bool {
        let echo = format!("{}{line}", self.prompt());
        self.output(&echo);
        self.process_line(line)
    }

    /// Drop everything buffered
    pub fn clear_buffer(&mut self) {
        self.source = SourceBuffer::with_exit_commands(Rc::clone(&self.exit_commands));
    }

    pub fn target(&self) -> &Value {
        &self.target
    }

    /// Logical line number of the next processed line
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self) -> &SourceBuffer {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut SourceBuffer {
        &mut self.source
    }

    pub fn last_result(&self) -> Option<&Value> {
        self.last_result.as_ref()
    }

    pub fn last_exception(&self) -> Option<&RuntimeError> {
        self.last_exception.as_ref()
    }

    pub fn environment(&self) -> &dyn Environment {
        self.environment.as_ref()
    }

    pub fn environment_mut(&mut self) -> &mut dyn Environment {
        self.environment.as_mut()
    }

    pub fn drivers(&self) -> &DriverStack {
        &self.drivers
    }

    pub fn exit_commands(&self) -> &[String] {
        &self.exit_commands
    }
}

impl fmt::Display for Context {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let quoted = format!("`{}'", self.target.inspect());
        if quoted.chars().count() > DISPLAY_LIMIT {
            write!(
                f,
                "#<Context for object of class `{}'>",
                self.target.class_name()
            )
        } else {
            write!(f, "#<Context for object {quoted}>")
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Context")
            .field("target", &self.target)
            .field("label", &self.label)
            .field("line", &self.line)
            .field("source", &self.source)
            .field("last_result", &self.last_result)
            .field("last_exception", &self.last_exception)
            .field("drivers", &self.drivers)
            .finish_non_exhaustive()
    }
}
