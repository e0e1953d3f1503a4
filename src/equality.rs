//! Structural equality over value graphs.
//!
//! Two values are equal when they are the same value, or when they are objects
//! built by the same constructor whose own keys match and whose properties are
//! pairwise equal. Comparison terminates on cyclic graphs: an object that is
//! already being compared further up the current path is never equal to
//! anything, so two distinct self-referential structures compare unequal while
//! a structure always equals itself through the identity short-circuit.

use crate::value::{Class, Object, Primitive, Value};

pub fn equals(a: &Value, b: &Value) -> bool {
    Comparator::default().compare(a, b)
}

/// `true` only if every one of `others` equals `reference`.
pub fn equals_all<'v>(reference: &Value, others: impl IntoIterator<Item = &'v Value>) -> bool {
    others.into_iter().all(|other| equals(reference, other))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringForm {
    Function,
    Date,
    RegExp,
    Boolean,
    Number,
    String,
}

fn string_form(object: &Object) -> Option<(StringForm, String)> {
    let data = object.borrow();
    let form = match &data.class {
        Class::Function { source, .. } => (StringForm::Function, source.to_string()),
        Class::Date(_) => (StringForm::Date, Value::Object(object.clone()).to_string()),
        Class::RegExp { source, flags } => (StringForm::RegExp, format!("/{source}/{flags}")),
        Class::Boxed(Primitive::Boolean(b)) => (StringForm::Boolean, b.to_string()),
        Class::Boxed(Primitive::Number(n)) => {
            (StringForm::Number, Value::Number(*n).to_string())
        }
        Class::Boxed(Primitive::String(s)) => (StringForm::String, s.to_string()),
        _ => return None,
    };
    Some(form)
}

fn same_prototype(a: &Object, b: &Object) -> bool {
    match (&a.borrow().prototype, &b.borrow().prototype) {
        (None, None) => true,
        (Some(a), Some(b)) => a.ptr_eq(b),
        _ => false,
    }
}

#[derive(Debug, Default)]
struct Comparator {
    left: Vec<Object>,
    right: Vec<Object>,
}

impl Comparator {
    fn compare(&mut self, a: &Value, b: &Value) -> bool {
        if let (Value::Number(x), Value::Number(y)) = (a, b)
            && x.is_nan()
            && y.is_nan()
        {
            return true;
        }

        if a.strict_equals(b) {
            return true;
        }

        let (Value::Object(x), Value::Object(y)) = (a, b) else {
            return false;
        };

        if let (Some((x_form, x_text)), Some((y_form, y_text))) = (string_form(x), string_form(y))
            && x_form == y_form
        {
            return x_text == y_text;
        }

        if x.is_prototype_of(y) || y.is_prototype_of(x) {
            return false;
        }

        if x.borrow().constructor_name() != y.borrow().constructor_name()
            || !same_prototype(x, y)
        {
            return false;
        }

        if self.left.iter().any(|seen| seen.ptr_eq(x))
            || self.right.iter().any(|seen| seen.ptr_eq(y))
        {
            return false;
        }

        let x_entries = x.borrow().own_entries();
        let y_entries = y.borrow().own_entries();
        if x_entries.len() != y_entries.len() {
            return false;
        }

        let mut pairs = Vec::with_capacity(x_entries.len());
        for (key, x_value) in x_entries {
            let Some((_, y_value)) = y_entries.iter().find(|(k, _)| *k == key) else {
                return false;
            };
            if x_value.type_of() != y_value.type_of() {
                return false;
            }
            pairs.push((x_value, y_value.clone()));
        }

        for (x_value, y_value) in pairs {
            match (&x_value, &y_value) {
                (Value::Object(_), _) => {
                    self.left.push(x.clone());
                    self.right.push(y.clone());
                    if !self.compare(&x_value, &y_value) {
                        return false;
                    }
                    self.left.pop();
                    self.right.pop();
                }
                _ if !x_value.strict_equals(&y_value) => return false,
                _ => {}
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        value::{HostObject, ObjectData},
    };

    fn cyclic() -> Value {
        let value = Value::object([("name", "loop")]);
        let object = value.as_object().unwrap().clone();
        object.set("me", value.clone());
        value
    }

    #[test]
    fn primitives_compare_by_value() {
        assert!(equals(&Value::from(1), &Value::from(1)));
        assert!(!equals(&Value::from(1), &Value::from("1")));
        assert!(equals(&Value::nan(), &Value::nan()));
        assert!(equals(&Value::Null, &Value::Null));
        assert!(!equals(&Value::Null, &Value::Undefined));
    }

    #[test]
    fn objects_compare_structurally() {
        let a = Value::object([
            ("list", Value::array([1, 2, 3])),
            ("nested", Value::object([("flag", true)])),
        ]);
        let b = Value::object([
            ("nested", Value::object([("flag", true)])),
            ("list", Value::array([1, 2, 3])),
        ]);
        assert!(equals(&a, &b));

        let c = Value::object([
            ("list", Value::array([1, 2, 4])),
            ("nested", Value::object([("flag", true)])),
        ]);
        assert!(!equals(&a, &c));
    }

    #[test]
    fn key_sets_must_match() {
        let a = Value::object([("a", 1)]);
        let b = Value::object([("a", 1), ("b", 2)]);
        assert!(!equals(&a, &b));
        assert!(!equals(&b, &a));

        let c = Value::object([("a", Value::Undefined)]);
        let d = Value::object([("b", Value::Undefined)]);
        assert!(!equals(&c, &d));
    }

    #[test]
    fn nested_primitives_use_strict_equality() {
        let a = Value::array([Value::nan()]);
        let b = Value::array([Value::nan()]);
        assert!(!equals(&a, &b));
    }

    #[test]
    fn string_forms_decide_functions_dates_and_boxes() {
        assert!(equals(
            &Value::function("f", "function f() {}"),
            &Value::function("g", "function f() {}")
        ));
        assert!(!equals(
            &Value::function("f", "function f() {}"),
            &Value::function("f", "function f() { return 1 }")
        ));
        assert!(equals(&Value::date(1000.0), &Value::date(1000.0)));
        assert!(!equals(&Value::date(1000.0), &Value::date(2000.0)));
        assert!(equals(&Value::regexp("a+", "g"), &Value::regexp("a+", "g")));
        assert!(!equals(&Value::regexp("a+", "g"), &Value::regexp("a+", "i")));
        assert!(!equals(
            &Value::boxed(Primitive::Boolean(true)),
            &Value::boxed(Primitive::Boolean(false))
        ));
        assert!(!equals(
            &Value::boxed(Primitive::Number(1.0)),
            &Value::boxed(Primitive::String("1".into()))
        ));
    }

    #[test]
    fn constructors_must_match() {
        let plain = Value::object([("x", 1)]);
        let point = Value::instance("Point", [("x", 1)]);
        assert!(!equals(&plain, &point));
        assert!(!equals(
            &Value::array(Vec::<Value>::new()),
            &Value::object(Vec::<(&str, Value)>::new())
        ));
        assert!(equals(
            &Value::error(ErrorKind::RangeError, "x"),
            &Value::error(ErrorKind::RangeError, "x")
        ));
        assert!(!equals(
            &Value::error(ErrorKind::RangeError, "x"),
            &Value::error(ErrorKind::TypeError, "x")
        ));
        assert!(equals(
            &Value::host(HostObject::HtmlElement("div".into())),
            &Value::host(HostObject::HtmlElement("div".into()))
        ));
    }

    #[test]
    fn a_prototype_never_equals_its_descendant() {
        let base = Object::new(ObjectData::new(Class::Plain { constructor: None }));
        let derived = Object::new(ObjectData::new(Class::Plain { constructor: None }));
        derived.set_prototype(Some(base.clone()));
        assert!(!equals(&Value::Object(base.clone()), &Value::Object(derived.clone())));
        assert!(!equals(&Value::Object(derived), &Value::Object(base)));
    }

    #[test]
    fn cycles_terminate() {
        let a = cyclic();
        let b = cyclic();
        assert!(equals(&a, &a));
        assert!(!equals(&a, &b));

        let list = Value::array([1]);
        list.as_object().unwrap().push(list.clone());
        assert!(equals(&list, &list));
        assert!(!equals(&list, &Value::array([1, 2])));
    }

    #[test]
    fn shared_but_acyclic_children_are_fine() {
        let shared = Value::object([("k", 1)]);
        let a = Value::array([shared.clone(), shared.clone()]);
        let b = Value::array([Value::object([("k", 1)]), Value::object([("k", 1)])]);
        assert!(equals(&a, &b));
        assert!(equals(&b, &a));
    }

    #[test]
    fn variadic_form_checks_every_candidate() {
        let reference = Value::array([1, 2]);
        let same = Value::array([1, 2]);
        let other = Value::array([2, 1]);
        assert!(equals_all(&reference, [&same, &same]));
        assert!(!equals_all(&reference, [&same, &other]));
        assert!(equals_all(&reference, std::iter::empty()));
    }
}
