//! The built-in assertion evaluators.
//!
//! An evaluator looks at the arguments captured for one test and decides its
//! [`Status`] and description. Evaluators never fail: calling one with the
//! wrong number or kind of arguments yields an [`Status::Error`] evaluation
//! carrying the [`Exception`] that describes the misuse.

use std::fmt::{self, Display};

use crate::{error::Exception, outcome::Status, value::Value};

mod truthy;
mod types;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assertion {
    /// One truthy argument, or two arguments of equal kind and structure.
    It,
    /// An array whose elements are all truthy.
    Them,
    /// A value and the name of the kind it should have.
    Type,
    /// An array whose elements share one kind, optionally a named one.
    Types,
}

impl Assertion {
    pub fn name(&self) -> &'static str {
        match self {
            Assertion::It => "it",
            Assertion::Them => "them",
            Assertion::Type => "type",
            Assertion::Types => "types",
        }
    }

    pub fn evaluate(self, args: &[Value]) -> Evaluation {
        match self {
            Assertion::It => truthy::it(args),
            Assertion::Them => truthy::them(args),
            Assertion::Type => types::is_type(args),
            Assertion::Types => types::types(args),
        }
    }
}

impl Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub status: Status,
    pub description: Option<String>,
    pub error: Option<Exception>,
}

impl Evaluation {
    pub(crate) fn pass(description: impl Into<String>) -> Self {
        Self {
            status: Status::Pass,
            description: Some(description.into()),
            error: None,
        }
    }

    pub(crate) fn fail(description: impl Into<String>) -> Self {
        Self {
            status: Status::Fail,
            description: Some(description.into()),
            error: None,
        }
    }

    pub(crate) fn error(exception: Exception) -> Self {
        Self {
            status: Status::Error,
            description: None,
            error: Some(exception),
        }
    }
}
