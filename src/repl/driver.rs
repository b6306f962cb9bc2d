//! Output routing
//!
//! A driver owns the sink console output goes to. Contexts do not keep a
//! driver of their own: they share a [`DriverStack`] and ask it for the
//! innermost active driver on every write, so a nested session can take
//! over output and hand it back when its guard is dropped.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

/// Line-oriented output
pub trait OutputSink {
    /// Write `text` followed by a newline
    fn puts(
        &self,
        text: &str,
    ) -> io::Result<()>;
}

/// Writes to the process' standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn puts(
        &self,
        text: &str,
    ) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{text}")?;
        out.flush()
    }
}

/// Collects output in memory; clones share the same storage
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    lines: Rc<RefCell<Vec<String>>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Most recent write
    pub fn last(&self) -> Option<String> {
        self.lines.borrow().last().cloned()
    }

    /// Drain everything written so far
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.borrow_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.lines.borrow().is_empty()
    }
}

impl OutputSink for CaptureSink {
    fn puts(
        &self,
        text: &str,
    ) -> io::Result<()> {
        self.lines.borrow_mut().push(text.to_string());
        Ok(())
    }
}

/// Something that can currently receive console output
pub trait Driver {
    fn output(&self) -> &dyn OutputSink;
}

/// Driver over a fixed sink
#[derive(Debug, Clone, Default)]
pub struct StreamDriver<S> {
    output: S,
}

impl<S: OutputSink> StreamDriver<S> {
    pub fn new(output: S) -> Self {
        Self { output }
    }
}

impl<S: OutputSink> Driver for StreamDriver<S> {
    fn output(&self) -> &dyn OutputSink {
        &self.output
    }
}

/// Shared stack of active drivers, innermost last
#[derive(Clone, Default)]
pub struct DriverStack {
    active: Rc<RefCell<Vec<Rc<dyn Driver>>>>,
}

impl DriverStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `driver` the current driver until the guard is dropped
    #[must_use = "the driver is deactivated as soon as the guard is dropped"]
    pub fn push(
        &self,
        driver: Rc<dyn Driver>,
    ) -> DriverGuard {
        let mut active = self.active.borrow_mut();
        let depth = active.len();
        active.push(driver);
        tracing::debug!(depth = depth + 1, "driver activated");
        DriverGuard {
            stack: self.clone(),
            depth,
        }
    }

    /// Innermost active driver
    pub fn current(&self) -> Option<Rc<dyn Driver>> {
        self.active.borrow().last().cloned()
    }

    /// Number of active drivers
    pub fn depth(&self) -> usize {
        self.active.borrow().len()
    }
}

impl fmt::Debug for DriverStack {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("DriverStack")
            .field("depth", &self.depth())
            .finish()
    }
}

/// Deactivates a driver (and anything pushed after it) when dropped
#[derive(Debug)]
pub struct DriverGuard {
    stack: DriverStack,
    depth: usize,
}

impl Drop for DriverGuard {
    fn drop(&mut self) {
        self.stack.active.borrow_mut().truncate(self.depth);
        tracing::debug!(depth = self.depth, "driver deactivated");
    }
}
