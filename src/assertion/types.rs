use crate::{
    assertion::Evaluation,
    error::Exception,
    kind::{Kind, classify},
    value::Value,
};

/// Parse an expected-kind argument, or describe why it can't be one.
fn expected_kind(value: &Value, position: &str) -> Result<Kind, Exception> {
    let Some(tag) = value.string_contents() else {
        return Err(Exception::type_error(format!(
            "{position} argument should be a String"
        )));
    };
    Kind::from_tag(&tag).ok_or_else(|| {
        Exception::type_error(format!("{position} argument should be a standard type"))
    })
}

pub(super) fn is_type(args: &[Value]) -> Evaluation {
    let [value, expected] = args else {
        return Evaluation::error(Exception::range("expect two arguments"));
    };
    let kind = match expected_kind(expected, "second") {
        Ok(kind) => kind,
        Err(exception) => return Evaluation::error(exception),
    };

    let actual = classify(value);
    match actual == kind {
        true => Evaluation::pass(format!("type of argument is {actual}")),
        false => Evaluation::fail(format!(
            "type of argument is not {}",
            expected
                .string_contents()
                .map(|tag| tag.to_string())
                .unwrap_or_default()
        )),
    }
}

pub(super) fn types(args: &[Value]) -> Evaluation {
    let (list, expected) = match args {
        [] => return Evaluation::error(Exception::range("at least one argument expected")),
        [list] => (list, None),
        [list, expected] => (list, Some(expected)),
        _ => return Evaluation::error(Exception::range("maximum of two arguments expected")),
    };
    let Some(items) = list.array_elements() else {
        return Evaluation::error(Exception::type_error("first argument should be an array"));
    };

    let (kind, mode) = match expected {
        None | Some(Value::Undefined) => (
            items.first().map(classify).unwrap_or(Kind::Undefined),
            "same",
        ),
        Some(expected) => match expected_kind(expected, "second") {
            Ok(kind) => (kind, "right"),
            Err(exception) => return Evaluation::error(exception),
        },
    };

    match items.iter().all(|item| classify(item) == kind) {
        true => Evaluation::pass(format!("arguments are {mode} type")),
        false => Evaluation::fail("there is at least one element with a different type"),
    }
}
