//! Semantic classification of values.
//!
//! [`classify`] is total: every value gets a [`Kind`]. Only the tags listed in
//! [`RECOGNIZED_TAGS`] can be named by an assertion, anything else the
//! classifier produces is either [`Kind::Undefined`] or [`Kind::Unrecognized`].

use std::fmt::{self, Display};

use crate::{
    error::ErrorKind,
    value::{Class, HostObject, Primitive, Value},
};

/// Tags an assertion may name, compared case-insensitively.
pub const RECOGNIZED_TAGS: [&str; 20] = [
    "array",
    "boolean",
    "date",
    "error",
    "evalerror",
    "function",
    "html",
    "nan",
    "nodelist",
    "null",
    "number",
    "object",
    "rangeerror",
    "referenceerror",
    "regexp",
    "string",
    "syntaxerror",
    "typeerror",
    "urierror",
    "window",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Array,
    Boolean,
    Date,
    Error,
    EvalError,
    Function,
    Html,
    NaN,
    NodeList,
    Null,
    Number,
    Object,
    RangeError,
    ReferenceError,
    RegExp,
    String,
    SyntaxError,
    TypeError,
    UriError,
    Window,
    Undefined,
    /// Fallback for values outside the recognized set, carrying the host's
    /// primitive type name.
    Unrecognized(&'static str),
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Array => "Array",
            Kind::Boolean => "Boolean",
            Kind::Date => "Date",
            Kind::Error => "Error",
            Kind::EvalError => "EvalError",
            Kind::Function => "Function",
            Kind::Html => "HTML",
            Kind::NaN => "NaN",
            Kind::NodeList => "NodeList",
            Kind::Null => "null",
            Kind::Number => "Number",
            Kind::Object => "Object",
            Kind::RangeError => "RangeError",
            Kind::ReferenceError => "ReferenceError",
            Kind::RegExp => "RegExp",
            Kind::String => "String",
            Kind::SyntaxError => "SyntaxError",
            Kind::TypeError => "TypeError",
            Kind::UriError => "URIError",
            Kind::Window => "Window",
            Kind::Undefined => "undefined",
            Kind::Unrecognized(type_name) => type_name,
        }
    }

    /// Parse one of [`RECOGNIZED_TAGS`], ignoring case.
    pub fn from_tag(tag: &str) -> Option<Kind> {
        let kind = match tag.to_ascii_lowercase().as_str() {
            "array" => Kind::Array,
            "boolean" => Kind::Boolean,
            "date" => Kind::Date,
            "error" => Kind::Error,
            "evalerror" => Kind::EvalError,
            "function" => Kind::Function,
            "html" => Kind::Html,
            "nan" => Kind::NaN,
            "nodelist" => Kind::NodeList,
            "null" => Kind::Null,
            "number" => Kind::Number,
            "object" => Kind::Object,
            "rangeerror" => Kind::RangeError,
            "referenceerror" => Kind::ReferenceError,
            "regexp" => Kind::RegExp,
            "string" => Kind::String,
            "syntaxerror" => Kind::SyntaxError,
            "typeerror" => Kind::TypeError,
            "urierror" => Kind::UriError,
            "window" => Kind::Window,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Kind::Undefined | Kind::Unrecognized(_))
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn number_kind(n: f64) -> Kind {
    match n.is_nan() {
        true => Kind::NaN,
        false => Kind::Number,
    }
}

pub fn classify(value: &Value) -> Kind {
    match value {
        Value::Undefined => Kind::Undefined,
        Value::Null => Kind::Null,
        Value::Boolean(_) => Kind::Boolean,
        Value::Number(n) => number_kind(*n),
        Value::String(_) => Kind::String,
        Value::Object(object) => match &object.borrow().class {
            Class::Plain { constructor: None } => Kind::Object,
            Class::Plain { constructor: Some(_) } => Kind::Unrecognized(value.type_of()),
            Class::Array(_) => Kind::Array,
            Class::Function { .. } => Kind::Function,
            Class::Date(_) => Kind::Date,
            Class::RegExp { .. } => Kind::RegExp,
            Class::Boxed(Primitive::Boolean(_)) => Kind::Boolean,
            Class::Boxed(Primitive::Number(n)) => number_kind(*n),
            Class::Boxed(Primitive::String(_)) => Kind::String,
            Class::Error { kind, .. } => match kind {
                ErrorKind::Error => Kind::Error,
                ErrorKind::EvalError => Kind::EvalError,
                ErrorKind::RangeError => Kind::RangeError,
                ErrorKind::ReferenceError => Kind::ReferenceError,
                ErrorKind::SyntaxError => Kind::SyntaxError,
                ErrorKind::TypeError => Kind::TypeError,
                ErrorKind::UriError => Kind::UriError,
                ErrorKind::Custom(_) => Kind::Unrecognized("object"),
            },
            Class::Host(HostObject::Window) => Kind::Window,
            Class::Host(HostObject::HtmlDocument | HostObject::HtmlElement(_)) => Kind::Html,
            Class::Host(HostObject::NodeList(_)) => Kind::NodeList,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_is_told_apart_from_numbers() {
        assert_eq!(classify(&Value::nan()), Kind::NaN);
        assert_eq!(classify(&Value::from(1)), Kind::Number);
        assert_eq!(classify(&Value::boxed(Primitive::Number(f64::NAN))), Kind::NaN);
    }

    #[test]
    fn every_recognized_tag_round_trips_through_its_kind() {
        for tag in RECOGNIZED_TAGS {
            let kind = Kind::from_tag(tag).unwrap();
            assert_eq!(kind.name().to_ascii_lowercase(), tag);
            assert!(kind.is_recognized());
        }
        assert_eq!(Kind::from_tag("ReGeXp"), Some(Kind::RegExp));
        assert_eq!(Kind::from_tag("undefined"), None);
        assert_eq!(Kind::from_tag("integer"), None);
    }

    #[test]
    fn null_and_undefined_are_distinct() {
        assert_eq!(classify(&Value::Null), Kind::Null);
        assert_eq!(classify(&Value::Undefined), Kind::Undefined);
        assert!(!Kind::Undefined.is_recognized());
    }

    #[test]
    fn unknown_constructors_fall_back_to_the_primitive_type() {
        let point = Value::instance("Point", [("x", 1)]);
        assert_eq!(classify(&point), Kind::Unrecognized("object"));
        assert_ne!(Some(classify(&point)), Kind::from_tag("object"));

        let custom = Value::error(ErrorKind::Custom("DomainError".into()), "bad");
        assert_eq!(classify(&custom).name(), "object");
    }

    #[test]
    fn host_objects_classify_by_role() {
        assert_eq!(classify(&Value::host(HostObject::Window)), Kind::Window);
        assert_eq!(
            classify(&Value::host(HostObject::HtmlElement("div".into()))),
            Kind::Html
        );
        assert_eq!(
            classify(&Value::host(HostObject::NodeList(vec![]))),
            Kind::NodeList
        );
        assert_eq!(
            classify(&Value::error(ErrorKind::UriError, "")).name(),
            "URIError"
        );
    }
}
