//! Evaluation environment contract
//!
//! The console only needs to run a snippet in a scope that survives
//! between statements, and to write a few named bindings (`_`, `e`,
//! `exception`) into that scope after each run.

use crate::runtime::error::RuntimeError;
use crate::runtime::value::Value;

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// A value worth printing and remembering
    Value(Value),
    /// Nothing to print; the last result is left untouched
    Ignore,
}

impl Evaluation {
    pub fn into_value(self) -> Option<Value> {
        match self {
            Evaluation::Value(value) => Some(value),
            Evaluation::Ignore => None,
        }
    }
}

/// A persistent scope that console statements run against
pub trait Environment {
    /// Run `source`, attributing its first line to `file`:`line`
    fn run(
        &mut self,
        source: &str,
        file: &str,
        line: usize,
    ) -> Result<Evaluation, RuntimeError>;

    /// Externally set a binding visible to later runs
    fn set_binding(
        &mut self,
        name: &str,
        value: Value,
    );

    /// Read a binding
    fn binding(
        &self,
        name: &str,
    ) -> Option<Value>;
}
