use std::fmt::{self, Display};

use thiserror::Error;

use crate::{
    kind::classify,
    trace::{self, TraceFilter},
    value::{Class, Value},
};

/// The family an error value belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Error,
    EvalError,
    RangeError,
    ReferenceError,
    SyntaxError,
    TypeError,
    UriError,
    Custom(String),
}

impl ErrorKind {
    pub fn name(&self) -> &str {
        match self {
            ErrorKind::Error => "Error",
            ErrorKind::EvalError => "EvalError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::UriError => "URIError",
            ErrorKind::Custom(name) => name,
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An error raised by script code, or by the engine on a script's behalf.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct Exception {
    pub kind: ErrorKind,
    pub message: String,
}

impl Exception {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn range(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RangeError, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    pub fn reference(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ReferenceError, message)
    }
}

/// Misuse of the chain: an operation that needs a node was called on a view
/// without one, or a group lookup found nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("{operation} can only be used in testit chain")]
    MissingNode { operation: &'static str },
    #[error("there is no group with name: {name}")]
    UnknownGroup { name: String },
}

impl From<ChainError> for Exception {
    fn from(value: ChainError) -> Self {
        Exception::reference(value.to_string())
    }
}

/// A caught failure, normalized so every shape of error reports the same way.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub kind: String,
    pub message: String,
    pub trace: Option<String>,
    /// The value that was originally raised.
    pub cause: Value,
}

impl ErrorRecord {
    pub fn from_value(cause: Value, filter: &TraceFilter) -> Self {
        let error_parts = cause.as_object().and_then(|object| match &object.borrow().class {
            Class::Error { kind, message } => Some((kind.name().to_string(), message.to_string())),
            _ => None,
        });
        let (kind, message) = match error_parts {
            Some(parts) => parts,
            None => (classify(&cause).name().to_string(), cause.to_string()),
        };
        let trace = trace::capture(&kind, filter);
        Self {
            kind,
            message,
            trace,
            cause,
        }
    }

    pub fn from_exception(exception: Exception, filter: &TraceFilter) -> Self {
        Self::from_value(exception.into(), filter)
    }

    pub(crate) fn from_panic(message: String, location: Option<String>) -> Self {
        Self {
            kind: "panic".to_string(),
            cause: Value::from(message.as_str()),
            message,
            trace: location,
        }
    }
}

impl Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
