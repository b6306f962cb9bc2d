//! Source buffer
//!
//! Holds the raw lines of the statement being typed and keeps their
//! classification current after every mutation.

use std::fmt;
use std::rc::Rc;

use crate::frontend::{classify, BlockState, Classification};

/// Exit commands recognized when none are configured
pub const DEFAULT_EXIT_COMMANDS: &[&str] = &["quit", "exit"];

/// What the context should do with the buffer after a line arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    /// Keep reading
    Waiting,
    /// Report and drop the offending line
    Error,
    /// Evaluate and clear
    Ready,
    /// Stop the run loop
    Terminate,
}

/// Accumulated input lines
#[derive(Debug, Clone)]
pub struct SourceBuffer {
    lines: Vec<String>,
    exit_commands: Rc<[String]>,
    classification: Classification,
}

impl Default for SourceBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceBuffer {
    /// Empty buffer with the default exit commands
    pub fn new() -> Self {
        let exit_commands: Vec<String> = DEFAULT_EXIT_COMMANDS
            .iter()
            .map(|cmd| cmd.to_string())
            .collect();
        Self::with_exit_commands(exit_commands.into())
    }

    /// Empty buffer recognizing `exit_commands` as termination tokens
    pub fn with_exit_commands(exit_commands: Rc<[String]>) -> Self {
        Self {
            lines: Vec::new(),
            exit_commands,
            classification: classify(""),
        }
    }

    /// Append a line and reclassify
    pub fn push(
        &mut self,
        line: impl Into<String>,
    ) {
        self.lines.push(line.into());
        self.reclassify();
    }

    /// Remove the most recently appended line
    pub fn pop(&mut self) -> Option<String> {
        let line = self.lines.pop();
        self.reclassify();
        line
    }

    fn reclassify(&mut self) {
        self.classification = classify(&self.render());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Block depth of the buffered text
    pub fn level(&self) -> usize {
        self.classification.level
    }

    /// A lone exit command typed outside any block
    pub fn is_terminate(&self) -> bool {
        match self.lines.as_slice() {
            [line] if self.level() == 0 => {
                let line = line.trim();
                self.exit_commands.iter().any(|cmd| cmd == line)
            }
            _ => false,
        }
    }

    /// Detail of a syntax error no further input can fix
    pub fn syntax_error(&self) -> Option<&str> {
        match &self.classification.state {
            BlockState::SyntaxError(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn has_syntax_error(&self) -> bool {
        self.syntax_error().is_some()
    }

    /// Buffered text forms complete statements at depth 0
    pub fn is_code_block(&self) -> bool {
        !self.lines.is_empty() && self.classification.state == BlockState::Complete
    }

    /// State the buffer is in, termination taking precedence
    pub fn state(&self) -> LineState {
        if self.is_terminate() {
            LineState::Terminate
        } else if self.has_syntax_error() {
            LineState::Error
        } else if self.is_code_block() {
            LineState::Ready
        } else {
            LineState::Waiting
        }
    }

    /// Buffered lines joined by newlines
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for SourceBuffer {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(lines: &[&str]) -> SourceBuffer {
        let mut source = SourceBuffer::new();
        for line in lines {
            source.push(*line);
        }
        source
    }

    #[test]
    fn test_empty_buffer() {
        let source = SourceBuffer::new();
        assert!(source.is_empty());
        assert_eq!(source.to_string(), "");
        assert_eq!(source.level(), 0);
        assert!(!source.is_code_block());
        assert_eq!(source.state(), LineState::Waiting);
    }

    #[test]
    fn test_single_statement_is_ready() {
        let source = buffer(&["x = 1"]);
        assert!(source.is_code_block());
        assert_eq!(source.state(), LineState::Ready);
    }

    #[test]
    fn test_render_preserves_blank_lines() {
        let source = buffer(&["def foo", "", "  :ok", "end"]);
        assert_eq!(source.render(), "def foo\n\n  :ok\nend");
        assert_eq!(source.len(), 4);
        assert!(source.is_code_block());
    }

    #[test]
    fn test_open_block_waits() {
        let source = buffer(&["def foo", "  :ok"]);
        assert_eq!(source.state(), LineState::Waiting);
        assert_eq!(source.level(), 1);
        assert_eq!(source.to_string(), "def foo\n  :ok");
    }

    #[test]
    fn test_terminate_only_at_depth_zero() {
        assert_eq!(buffer(&["quit"]).state(), LineState::Terminate);
        assert_eq!(buffer(&["  exit  "]).state(), LineState::Terminate);

        let nested = buffer(&["def foo", "quit"]);
        assert!(!nested.is_terminate());
        assert_eq!(nested.state(), LineState::Waiting);
    }

    #[test]
    fn test_custom_exit_commands() {
        let mut source = SourceBuffer::with_exit_commands(vec!["bye".to_string()].into());
        source.push("quit");
        assert!(!source.is_terminate());
        let mut source = SourceBuffer::with_exit_commands(vec!["bye".to_string()].into());
        source.push("bye");
        assert!(source.is_terminate());
    }

    #[test]
    fn test_syntax_error_and_pop() {
        let mut source = buffer(&["def foo", ")"]);
        assert!(source.has_syntax_error());
        assert_eq!(source.syntax_error(), Some("syntax error, unexpected ')'"));
        assert_eq!(source.state(), LineState::Error);

        assert_eq!(source.pop(), Some(")".to_string()));
        assert!(!source.has_syntax_error());
        assert_eq!(source.render(), "def foo");
        assert_eq!(source.level(), 1);
    }

    #[test]
    fn test_level_decreases_when_block_closes() {
        let mut source = buffer(&["def foo", "  if x"]);
        assert_eq!(source.level(), 2);
        source.push("  end");
        assert_eq!(source.level(), 1);
        source.push("end");
        assert_eq!(source.level(), 0);
        assert!(source.is_code_block());
    }
}
