use pretty_assertions::assert_eq;
use testit::prelude::*;

mod lib;

use lib::{Buffer, engine};

#[test]
fn nested_groups_render_as_an_indented_tree() {
    let buffer = Buffer::default();
    let test = engine(&buffer, false);

    test.group("numbers", || {
        test.it(args![1, 1]);
        test.it(args![1, "1"]).comment("mixed kinds").unwrap();
    });
    test.group("collections", || {
        test.them(args![Value::array([1, 2, 3])]);
        test.types(args![Value::array(["a", "b"]), "string"]);
    });
    test.group("broken", || {
        test.it(args![]);
        Err::<(), _>(Exception::range("x"))
    });
    test.done();

    let expected = "\
root - error - 1/1/1 (<n> ms)
  numbers - fail - 1/1/0 (<n> ms)
    pass
    fail: mixed kinds
      arguments have different types
      [1, \"1\"]
  collections - pass - 2/0/0 (<n> ms)
  broken - error - 0/0/1 (<n> ms)
    error
      RangeError: at least one argument expected
      []
    RangeError: x
";
    assert_eq!(buffer.sanitized(), expected);
}

#[test]
fn panics_report_their_location() {
    let buffer = Buffer::default();
    let test = engine(&buffer, false);

    test.group("panics", || -> BodyResult { panic!("boom") });
    test.done();

    let expected = "\
root - error - 0/0/1 (<n> ms)
  panics - error - 0/0/0 (<n> ms)
    panic: boom
      tests/report/main.rs:<line>:<col>
";
    assert_eq!(buffer.sanitized(), expected);
}

#[test]
fn single_nodes_can_be_reported() {
    let buffer = Buffer::default();
    let test = engine(&buffer, true);

    test.it(args![1]).comment("solo").unwrap().done();
    let timed = test.time();
    std::thread::sleep(std::time::Duration::from_millis(1));
    timed.it(args![0]).add_trace(Some(0)).unwrap().done();

    let expected = "\
pass: solo
  argument is true-like
  [1]
fail (<n> ms)
  argument is false-like
  tests/report/main.rs:<line>:<col>
  [0]
";
    assert_eq!(buffer.sanitized(), expected);
}

#[test]
fn raw_values_print_on_one_line() {
    let buffer = Buffer::default();
    let test = engine(&buffer, false);

    test.print(&args!["value:", Value::object([("a", 1)]), Value::Null])
        .unwrap();
    assert_eq!(buffer.sanitized(), "value: { a: 1 } null\n");
}
