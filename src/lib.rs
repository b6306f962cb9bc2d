//! YaoXiang console
//!
//! An interactive read-eval-print console for a small embedded scripting
//! language. Lines are accumulated until they form complete statements,
//! evaluated against a persistent environment, and results or errors are
//! reported back without ever ending the session.
//!
//! # Example
//!
//! ```no_run
//! use yaoxiang_console::repl::{CaptureSink, Context};
//! use yaoxiang_console::runtime::value::Value;
//!
//! let sink = CaptureSink::new();
//! let mut context = Context::new(Value::Main).with_fallback(sink.clone());
//! context.process_line("def double(x)");
//! context.process_line("  x * 2");
//! context.process_line("end");
//! context.process_line("double(21)");
//! assert_eq!(sink.last().as_deref(), Some("=> 42"));
//! ```

#![doc(html_root_url = "https://docs.rs/yaoxiang-console")]
#![warn(rust_2018_idioms)]

// Public modules
pub mod frontend;
pub mod repl;
pub mod runtime;

// Utility modules
pub mod util;

// Re-exports
pub use repl::{Context, Environment, Evaluation, Formatter};
pub use runtime::error::RuntimeError;
pub use runtime::value::Value;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Console name
pub const NAME: &str = "YaoXiang console (爻象)";
