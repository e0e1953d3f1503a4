use crate::{
    assertion::Evaluation,
    equality::equals,
    error::Exception,
    kind::classify,
    value::Value,
};

pub(super) fn it(args: &[Value]) -> Evaluation {
    match args {
        [] => Evaluation::error(Exception::range("at least one argument expected")),
        [value] => match value.is_truthy() {
            true => Evaluation::pass("argument is true-like"),
            false => Evaluation::fail("argument is false-like"),
        },
        [actual, expected] => {
            if classify(actual) != classify(expected) {
                Evaluation::fail("arguments have different types")
            } else if equals(actual, expected) {
                Evaluation::pass("arguments are equal")
            } else {
                Evaluation::fail("arguments are not equal")
            }
        }
        _ => Evaluation::error(Exception::range("maximum of 2 arguments expected")),
    }
}

pub(super) fn them(args: &[Value]) -> Evaluation {
    match args {
        [] => Evaluation::error(Exception::range("at least one argument expected")),
        [list] => {
            let Some(items) = list.array_elements() else {
                return Evaluation::error(Exception::type_error("argument should be an array"));
            };
            match items.iter().all(Value::is_truthy) {
                true => Evaluation::pass("arguments are true-like"),
                false => Evaluation::fail("there is at least one false-like element"),
            }
        }
        _ => Evaluation::error(Exception::range("maximum of 1 arguments expected")),
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        args,
        assertion::Assertion,
        error::ErrorKind,
        outcome::Status,
        value::{Primitive, Value},
    };

    #[test]
    fn single_argument_checks_truthiness() {
        let eval = Assertion::It.evaluate(&args![1]);
        assert_eq!(eval.status, Status::Pass);
        assert_eq!(eval.description.as_deref(), Some("argument is true-like"));

        let eval = Assertion::It.evaluate(&args![""]);
        assert_eq!(eval.status, Status::Fail);
        assert_eq!(eval.description.as_deref(), Some("argument is false-like"));
    }

    #[test]
    fn two_arguments_compare_kind_then_structure() {
        let eval = Assertion::It.evaluate(&args![1, 1]);
        assert_eq!(eval.status, Status::Pass);
        assert_eq!(eval.description.as_deref(), Some("arguments are equal"));

        let eval = Assertion::It.evaluate(&args![1, "1"]);
        assert_eq!(eval.status, Status::Fail);
        assert_eq!(
            eval.description.as_deref(),
            Some("arguments have different types")
        );

        let eval = Assertion::It.evaluate(&args![Value::array([1, 2]), Value::array([1, 3])]);
        assert_eq!(eval.status, Status::Fail);
        assert_eq!(eval.description.as_deref(), Some("arguments are not equal"));
    }

    #[test]
    fn boxed_and_primitive_numbers_share_a_kind_but_not_a_structure() {
        let eval = Assertion::It.evaluate(&args![Value::boxed(Primitive::Number(1.0)), 1]);
        assert_eq!(eval.status, Status::Fail);
        assert_eq!(eval.description.as_deref(), Some("arguments are not equal"));
    }

    #[test]
    fn argument_count_violations_are_errors() {
        let eval = Assertion::It.evaluate(&args![]);
        assert_eq!(eval.status, Status::Error);
        assert_eq!(eval.error.unwrap().kind, ErrorKind::RangeError);

        let eval = Assertion::It.evaluate(&args![1, 2, 3]);
        assert_eq!(eval.status, Status::Error);
        assert_eq!(
            eval.error.unwrap().message,
            "maximum of 2 arguments expected"
        );
    }

    #[test]
    fn them_wants_a_single_array_of_truthy_values() {
        assert_eq!(
            Assertion::Them.evaluate(&args![Value::array([1, 2, 3])]).status,
            Status::Pass
        );
        assert_eq!(
            Assertion::Them.evaluate(&args![Value::array(Vec::<Value>::new())]).status,
            Status::Pass
        );

        let eval = Assertion::Them.evaluate(&args![Value::array([1, 2, 0])]);
        assert_eq!(eval.status, Status::Fail);

        let eval = Assertion::Them.evaluate(&args![1]);
        assert_eq!(eval.status, Status::Error);
        assert_eq!(eval.error.unwrap().kind, ErrorKind::TypeError);

        let eval = Assertion::Them.evaluate(&args![Value::array([1]), Value::array([1])]);
        assert_eq!(eval.status, Status::Error);
        assert_eq!(eval.error.unwrap().kind, ErrorKind::RangeError);

        assert_eq!(Assertion::Them.evaluate(&args![]).status, Status::Error);
    }
}
