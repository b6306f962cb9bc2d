//! Runtime errors raised while evaluating console script

use std::fmt;

/// Error class, rendered by name in reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    NameError,
    NoMethodError,
    ArgumentError,
    TypeError,
    IndexError,
    ZeroDivisionError,
    RangeError,
    SyntaxError,
    SystemStackError,
    RuntimeError,
    /// A panic caught at the console's evaluation boundary
    InternalError,
    /// User-chosen class name passed to `raise`
    Custom(String),
}

impl ErrorKind {
    pub fn name(&self) -> &str {
        match self {
            ErrorKind::NameError => "NameError",
            ErrorKind::NoMethodError => "NoMethodError",
            ErrorKind::ArgumentError => "ArgumentError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::IndexError => "IndexError",
            ErrorKind::ZeroDivisionError => "ZeroDivisionError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::SystemStackError => "SystemStackError",
            ErrorKind::RuntimeError => "RuntimeError",
            ErrorKind::InternalError => "InternalError",
            ErrorKind::Custom(name) => name,
        }
    }

    /// Resolve a class name given to `raise`
    pub fn from_name(name: &str) -> Self {
        match name {
            "NameError" => ErrorKind::NameError,
            "NoMethodError" => ErrorKind::NoMethodError,
            "ArgumentError" => ErrorKind::ArgumentError,
            "TypeError" => ErrorKind::TypeError,
            "IndexError" => ErrorKind::IndexError,
            "ZeroDivisionError" => ErrorKind::ZeroDivisionError,
            "RangeError" => ErrorKind::RangeError,
            "RuntimeError" => ErrorKind::RuntimeError,
            other => ErrorKind::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An error with its backtrace, innermost frame first
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
    pub backtrace: Vec<String>,
}

impl RuntimeError {
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            backtrace: Vec::new(),
        }
    }

    pub fn with_backtrace(
        mut self,
        backtrace: Vec<String>,
    ) -> Self {
        self.backtrace = backtrace;
        self
    }

    /// Build from a caught panic payload
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "evaluation panicked".to_string()
        };
        Self::new(ErrorKind::InternalError, message)
    }
}
