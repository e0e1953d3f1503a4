pub mod assertion;
pub mod equality;
pub mod error;
pub mod kind;
pub mod outcome;
pub mod reporter;
pub mod trace;
pub mod tree;
pub mod value;

mod chain;
pub use chain::*;

mod engine;
pub use engine::*;

mod panic;
pub use panic::BodyResult;

#[cfg(test)]
mod test_support;

pub mod prelude {
    pub use crate::{
        BodyResult, Callbacks, ChainView, Testit, args,
        assertion::Assertion,
        error::{ChainError, ErrorKind, Exception},
        kind::Kind,
        outcome::Status,
        value::{HostObject, Primitive, Value},
    };
}
