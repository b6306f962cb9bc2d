//! Runtime system
//!
//! Values, errors and the tree-walking interpreter that console
//! statements run on.

pub mod builtins;
pub mod error;
pub mod interpreter;
pub mod value;

pub use error::{ErrorKind, RuntimeError};
pub use interpreter::Interpreter;
pub use value::Value;
