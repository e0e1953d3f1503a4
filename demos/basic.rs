//! A small script showing the fluent API.
//!
//! Run with `RUST_LOG=testit=debug` to see what the engine does, and with
//! `RUST_BACKTRACE=1` to get full traces on errors.

use testit::prelude::*;

fn main() {
    env_logger::init();

    let test = Testit::new();

    test.group("primitives", || {
        test.it(args![1, 1]);
        test.it(args!["text"]).comment("non-empty strings are truthy").unwrap();
        test.is_type(args![Value::nan(), "NaN"]);
    });

    test.group("structures", || {
        let point = Value::object([("x", 1), ("y", 2)]);
        let same = Value::object([("x", 1), ("y", 2)]);
        test.it(args![point, same]);
        test.them(args![Value::array([1, 2, 0])])
            .add_trace(Some(0))
            .unwrap();
        test.types(args![Value::array(["a", "b"]), "string"]);
    });

    test.group("misuse", || {
        test.it(args![]);
        Err::<(), _>(Exception::range("gave up halfway"))
    });

    // Re-entering a group adds to it.
    test.group("primitives", || {
        test.time().it(args![true, true]);
    });

    let passed = test
        .group_named("structures")
        .and_then(|view| {
            view.callback(
                Callbacks::new()
                    .on_pass(|| println!("structures passed"))
                    .on_fail(|| println!("structures failed")),
            )
        })
        .map(|view| view.result());
    println!("structures result: {passed:?}");

    test.done();
}
