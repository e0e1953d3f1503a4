//! Containment of group bodies.
//!
//! A group body may fail by returning an error or by panicking. Both are
//! caught at the group boundary and turned into a [`Caught`] value; nothing
//! escapes to the script around the group.
//!
//! While a body is contained, the panic hook records the panic location
//! instead of printing the usual message. Outside of a containment the
//! previously installed hook runs unchanged.

use std::{
    any::Any,
    cell::{Cell, RefCell},
    panic::{self, AssertUnwindSafe},
    sync::Once,
};

use crate::value::Value;

/// What a group body hands back.
///
/// Bodies may return `()`, or a `Result<(), E>` whose error converts into a
/// [`Value`] (for example an [`Exception`](crate::error::Exception)).
///
/// A closure that only diverges, such as `|| panic!("boom")` or
/// `|| todo!()`, has no return type to convert from. Name one explicitly:
///
/// ```
/// use testit::{BodyResult, Testit, outcome::Status, reporter::no::NoReporter};
///
/// let test = Testit::new().with_reporter(NoReporter);
/// let group = test.group("pending", || -> BodyResult { todo!() });
/// let node = group.node().unwrap();
/// assert_eq!(test.tree().node(node).status(), Some(Status::Error));
/// ```
#[derive(Debug)]
pub struct BodyResult(pub Result<(), Value>);

impl From<()> for BodyResult {
    fn from(_: ()) -> Self {
        Self(Ok(()))
    }
}

impl<E: Into<Value>> From<Result<(), E>> for BodyResult {
    fn from(v: Result<(), E>) -> Self {
        BodyResult(v.map_err(Into::into))
    }
}

/// A failure caught at a group boundary.
#[derive(Debug)]
pub(crate) enum Caught {
    Returned(Value),
    Panicked {
        message: String,
        location: Option<String>,
    },
}

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
    static LAST_LOCATION: RefCell<Option<String>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let contained = DEPTH.try_with(Cell::get).unwrap_or(0) > 0;
            if !contained {
                return previous(info);
            }
            let location = info.location().map(ToString::to_string);
            let _ = LAST_LOCATION.try_with(|last| *last.borrow_mut() = location);
        }));
    });
}

struct DepthGuard;

impl DepthGuard {
    fn enter() -> Self {
        DEPTH.with(|depth| depth.set(depth.get() + 1));
        DepthGuard
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Convert a panic payload into a string.
///
/// This matches the common payload types produced by `panic!` (`&'static str` and `String`).
pub(crate) fn payload_as_string(err: Box<dyn Any + Send + 'static>) -> String {
    err.downcast::<&'static str>()
        .map(|s| s.to_string())
        .or_else(|err| err.downcast::<String>().map(|s| *s))
        .unwrap_or_else(|_| String::from("Box<dyn Any>"))
}

/// Run `body`, catching both returned errors and panics.
pub(crate) fn contain<F, R>(body: F) -> Result<(), Caught>
where
    F: FnOnce() -> R,
    R: Into<BodyResult>,
{
    install_hook();
    // A panic caught inside an earlier body, or one resumed without the
    // hook, must not lend its location to this one.
    LAST_LOCATION.with(|last| last.borrow_mut().take());
    let result = {
        let _guard = DepthGuard::enter();
        panic::catch_unwind(AssertUnwindSafe(|| -> BodyResult { body().into() }))
    };
    match result {
        Ok(BodyResult(Ok(()))) => Ok(()),
        Ok(BodyResult(Err(value))) => Err(Caught::Returned(value)),
        Err(payload) => Err(Caught::Panicked {
            message: payload_as_string(payload),
            location: LAST_LOCATION.with(|last| last.borrow_mut().take()),
        }),
    }
}
