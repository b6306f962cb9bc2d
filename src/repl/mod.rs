//! Console session
//!
//! [`Context`] is the read-eval-print state machine. It depends on three
//! contracts: an [`Environment`] to run statements in, a [`Formatter`] for
//! everything shown to the user, and the [`Driver`]s output is routed to.

pub mod context;
pub mod driver;
pub mod environment;
pub mod formatter;
pub mod line;
pub mod script;
pub mod source;

pub use context::Context;
pub use driver::{CaptureSink, Driver, DriverGuard, DriverStack, OutputSink, StdoutSink, StreamDriver};
pub use environment::{Environment, Evaluation};
pub use formatter::{DefaultFormatter, Formatter};
pub use line::{LineRepl, LineReplConfig};
pub use script::run_script;
pub use source::{LineState, SourceBuffer};
