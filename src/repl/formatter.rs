//! Console rendering
//!
//! A [`Formatter`] decides what the prompt looks like, how results and
//! errors are printed, and is the only way a typed line gets into the
//! context's source buffer.

use owo_colors::OwoColorize;

use crate::repl::context::Context;
use crate::runtime::error::RuntimeError;
use crate::runtime::value::Value;

/// Longest target description shown verbatim in prompts
pub const DEFAULT_DESCRIPTION_LIMIT: usize = 32;

/// Rendering strategy of a console session
pub trait Formatter {
    /// Prompt shown before the next line is read
    fn prompt(
        &self,
        context: &Context,
    ) -> String;

    /// Append `line` to the context's buffer.
    ///
    /// Returns `true` when the line closed a block, i.e. the buffer's
    /// depth went down.
    fn add_input_to_context(
        &self,
        context: &mut Context,
        line: &str,
    ) -> bool {
        let before = context.source().level();
        context.source_mut().push(line);
        context.source().level() < before
    }

    /// Successful evaluation
    fn result(
        &self,
        value: &Value,
    ) -> String;

    /// Failed evaluation
    fn exception(
        &self,
        error: &RuntimeError,
    ) -> String;

    /// Syntax error found in the line just typed
    fn syntax_error(
        &self,
        context: &Context,
        detail: &str,
    ) -> String;
}

/// `yx(main):001:0> ` style formatter
#[derive(Debug, Clone)]
pub struct DefaultFormatter {
    description_limit: usize,
    colors: bool,
}

impl Default for DefaultFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultFormatter {
    pub fn new() -> Self {
        Self {
            description_limit: DEFAULT_DESCRIPTION_LIMIT,
            colors: false,
        }
    }

    pub fn with_colors(
        mut self,
        colors: bool,
    ) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_description_limit(
        mut self,
        limit: usize,
    ) -> Self {
        self.description_limit = limit;
        self
    }

    /// `inspect` of the target, or `#<Class>` when that is too long
    pub fn describe(
        &self,
        target: &Value,
    ) -> String {
        let inspected = target.inspect();
        if inspected.chars().count() > self.description_limit {
            format!("#<{}>", target.class_name())
        } else {
            inspected
        }
    }
}

impl Formatter for DefaultFormatter {
    fn prompt(
        &self,
        context: &Context,
    ) -> String {
        format!(
            "{}({}):{:03}:{}> ",
            context.label(),
            self.describe(context.target()),
            context.line(),
            context.source().level()
        )
    }

    fn result(
        &self,
        value: &Value,
    ) -> String {
        if self.colors {
            format!("{} {}", "=>".green(), value.inspect())
        } else {
            format!("=> {}", value.inspect())
        }
    }

    fn exception(
        &self,
        error: &RuntimeError,
    ) -> String {
        let mut out = if self.colors {
            format!("{}: {}", error.kind.name().red().bold(), error.message)
        } else {
            format!("{}: {}", error.kind, error.message)
        };
        for frame in &error.backtrace {
            out.push_str("\n\t");
            out.push_str(frame);
        }
        out
    }

    fn syntax_error(
        &self,
        context: &Context,
        detail: &str,
    ) -> String {
        let head = if self.colors {
            "SyntaxError".red().bold().to_string()
        } else {
            "SyntaxError".to_string()
        };
        format!(
            "{head}: compile error\n({}):{}: {detail}",
            context.label(),
            context.line()
        )
    }
}
