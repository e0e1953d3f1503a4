//! Host values that assertions are made about.
//!
//! Scripts assert on loosely typed values: primitives, arrays, plain objects,
//! functions, dates, errors and a handful of host objects. [`Value`] models
//! them. Object-like values live behind a shared [`Object`] handle so that
//! identity (and with it self-referential structures) can be expressed.

use std::{
    cell::{Ref, RefCell, RefMut},
    fmt::{self, Display},
    rc::Rc,
};

use crate::error::{ErrorKind, Exception};

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(Rc<str>),
    Object(Object),
}

/// A primitive wrapped into an object, like `new Number(1)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Boolean(bool),
    Number(f64),
    String(Rc<str>),
}

/// Objects provided by a browser-like host environment.
#[derive(Debug, Clone)]
pub enum HostObject {
    Window,
    HtmlDocument,
    HtmlElement(Rc<str>),
    NodeList(Vec<Value>),
}

#[derive(Debug, Clone)]
pub enum Class {
    /// A plain object. `None` is the built-in `Object` constructor, `Some` names a
    /// user-defined one.
    Plain { constructor: Option<Rc<str>> },
    Array(Vec<Value>),
    Function { name: Rc<str>, source: Rc<str> },
    /// Milliseconds since the unix epoch, `NaN` for an invalid date.
    Date(f64),
    RegExp { source: Rc<str>, flags: Rc<str> },
    Boxed(Primitive),
    Error { kind: ErrorKind, message: Rc<str> },
    Host(HostObject),
}

#[derive(Debug, Clone)]
pub struct ObjectData {
    pub class: Class,
    pub prototype: Option<Object>,
    pub properties: Vec<(Rc<str>, Value)>,
}

impl ObjectData {
    pub fn new(class: Class) -> Self {
        Self {
            class,
            prototype: None,
            properties: Vec::new(),
        }
    }

    /// Name of the constructor that produced this object.
    pub fn constructor_name(&self) -> &str {
        match &self.class {
            Class::Plain { constructor: None } => "Object",
            Class::Plain {
                constructor: Some(name),
            } => name,
            Class::Array(_) => "Array",
            Class::Function { .. } => "Function",
            Class::Date(_) => "Date",
            Class::RegExp { .. } => "RegExp",
            Class::Boxed(Primitive::Boolean(_)) => "Boolean",
            Class::Boxed(Primitive::Number(_)) => "Number",
            Class::Boxed(Primitive::String(_)) => "String",
            Class::Error { kind, .. } => kind.name(),
            Class::Host(HostObject::Window) => "Window",
            Class::Host(HostObject::HtmlDocument) => "HTMLDocument",
            Class::Host(HostObject::HtmlElement(_)) => "HTMLElement",
            Class::Host(HostObject::NodeList(_)) => "NodeList",
        }
    }

    /// Every own property in key order, including the implicit ones carried by
    /// the class (array indices, error messages, element tags).
    pub fn own_entries(&self) -> Vec<(Rc<str>, Value)> {
        let mut entries: Vec<(Rc<str>, Value)> = match &self.class {
            Class::Array(items) | Class::Host(HostObject::NodeList(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| (Rc::from(index.to_string()), item.clone()))
                .collect(),
            Class::Error { message, .. } => {
                vec![(Rc::from("message"), Value::String(message.clone()))]
            }
            Class::Host(HostObject::HtmlElement(tag)) => {
                vec![(Rc::from("tagName"), Value::String(tag.clone()))]
            }
            _ => Vec::new(),
        };
        entries.extend(self.properties.iter().cloned());
        entries
    }
}

/// Shared handle to an object-like value.
///
/// Cloning the handle does not clone the object; two handles are the same
/// object exactly when [`Object::ptr_eq`] holds.
#[derive(Clone)]
pub struct Object(Rc<RefCell<ObjectData>>);

impl Object {
    pub fn new(data: ObjectData) -> Self {
        Self(Rc::new(RefCell::new(data)))
    }

    pub fn borrow(&self) -> Ref<'_, ObjectData> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, ObjectData> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0).cast()
    }

    /// Set an own property, replacing an existing one with the same key.
    pub fn set(&self, key: impl Into<Rc<str>>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let mut data = self.borrow_mut();
        match data.properties.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => data.properties.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.borrow()
            .own_entries()
            .into_iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v)
    }

    /// Append to an array. Returns `false` if this object is not an array.
    pub fn push(&self, value: impl Into<Value>) -> bool {
        match &mut self.borrow_mut().class {
            Class::Array(items) => {
                items.push(value.into());
                true
            }
            _ => false,
        }
    }

    pub fn set_prototype(&self, prototype: Option<Object>) {
        self.borrow_mut().prototype = prototype;
    }

    /// Whether `self` appears somewhere on the prototype chain of `other`.
    pub fn is_prototype_of(&self, other: &Object) -> bool {
        let mut visited: Vec<*const ()> = vec![other.addr()];
        let mut current = other.borrow().prototype.clone();
        while let Some(prototype) = current {
            if prototype.ptr_eq(self) {
                return true;
            }
            if visited.contains(&prototype.addr()) {
                return false;
            }
            visited.push(prototype.addr());
            current = prototype.borrow().prototype.clone();
        }
        false
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({})", Value::Object(self.clone()))
    }
}

impl Value {
    pub fn nan() -> Self {
        Value::Number(f64::NAN)
    }

    pub fn object_of(class: Class) -> Self {
        Value::Object(Object::new(ObjectData::new(class)))
    }

    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::object_of(Class::Array(items.into_iter().map(Into::into).collect()))
    }

    /// A plain object with the given properties.
    pub fn object<K, V, I>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Rc<str>>,
        V: Into<Value>,
    {
        let object = Object::new(ObjectData::new(Class::Plain { constructor: None }));
        for (key, value) in properties {
            object.set(key, value);
        }
        Value::Object(object)
    }

    /// An object created by a user-defined constructor.
    pub fn instance<K, V, I>(constructor: &str, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Rc<str>>,
        V: Into<Value>,
    {
        let object = Object::new(ObjectData::new(Class::Plain {
            constructor: Some(constructor.into()),
        }));
        for (key, value) in properties {
            object.set(key, value);
        }
        Value::Object(object)
    }

    pub fn function(name: &str, source: &str) -> Self {
        Self::object_of(Class::Function {
            name: name.into(),
            source: source.into(),
        })
    }

    pub fn date(millis: f64) -> Self {
        Self::object_of(Class::Date(millis))
    }

    pub fn regexp(source: &str, flags: &str) -> Self {
        Self::object_of(Class::RegExp {
            source: source.into(),
            flags: flags.into(),
        })
    }

    pub fn boxed(primitive: Primitive) -> Self {
        Self::object_of(Class::Boxed(primitive))
    }

    pub fn error(kind: ErrorKind, message: &str) -> Self {
        Self::object_of(Class::Error {
            kind,
            message: message.into(),
        })
    }

    pub fn host(host: HostObject) -> Self {
        Self::object_of(Class::Host(host))
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The text of a primitive or boxed string.
    pub fn string_contents(&self) -> Option<Rc<str>> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Object(object) => match &object.borrow().class {
                Class::Boxed(Primitive::String(s)) => Some(s.clone()),
                _ => None,
            },
            _ => None,
        }
    }

    /// The elements of an array value.
    pub fn array_elements(&self) -> Option<Vec<Value>> {
        match &self.as_object()?.borrow().class {
            Class::Array(items) => Some(items.clone()),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => !(n.is_nan() || *n == 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Object(_) => true,
        }
    }

    /// The host's primitive type name.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Object(object) => match object.borrow().class {
                Class::Function { .. } => "function",
                _ => "object",
            },
        }
    }

    /// Identity comparison; primitives compare by value, `NaN` never equals itself.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        (if n > 0.0 { "Infinity" } else { "-Infinity" }).to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

struct Printer<'f, 'a> {
    f: &'f mut fmt::Formatter<'a>,
    seen: Vec<*const ()>,
}

impl Printer<'_, '_> {
    fn value(&mut self, value: &Value, nested: bool) -> fmt::Result {
        match value {
            Value::Undefined => self.f.write_str("undefined"),
            Value::Null => self.f.write_str("null"),
            Value::Boolean(b) => write!(self.f, "{b}"),
            Value::Number(n) => self.f.write_str(&format_number(*n)),
            Value::String(s) if nested => write!(self.f, "{:?}", s.as_ref()),
            Value::String(s) => self.f.write_str(s),
            Value::Object(object) => {
                if self.seen.contains(&object.addr()) {
                    return self.f.write_str("[Circular]");
                }
                self.seen.push(object.addr());
                let result = self.object(&object.borrow());
                self.seen.pop();
                result
            }
        }
    }

    fn list(&mut self, items: &[Value]) -> fmt::Result {
        self.f.write_str("[")?;
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                self.f.write_str(", ")?;
            }
            self.value(item, true)?;
        }
        self.f.write_str("]")
    }

    fn properties(&mut self, properties: &[(Rc<str>, Value)]) -> fmt::Result {
        self.f.write_str("{")?;
        for (index, (key, value)) in properties.iter().enumerate() {
            self.f.write_str(if index > 0 { ", " } else { " " })?;
            write!(self.f, "{key}: ")?;
            self.value(value, true)?;
        }
        self.f.write_str(if properties.is_empty() { "}" } else { " }" })
    }

    fn object(&mut self, data: &ObjectData) -> fmt::Result {
        match &data.class {
            Class::Plain { constructor: None } => self.properties(&data.properties),
            Class::Plain {
                constructor: Some(name),
            } => {
                write!(self.f, "{name} ")?;
                self.properties(&data.properties)
            }
            Class::Array(items) => self.list(items),
            Class::Function { name, .. } if name.is_empty() => {
                self.f.write_str("[Function (anonymous)]")
            }
            Class::Function { name, .. } => write!(self.f, "[Function: {name}]"),
            Class::Date(millis) if millis.is_nan() => self.f.write_str("Invalid Date"),
            Class::Date(millis) => write!(self.f, "Date({})", format_number(*millis)),
            Class::RegExp { source, flags } => write!(self.f, "/{source}/{flags}"),
            Class::Boxed(Primitive::Boolean(b)) => write!(self.f, "[Boolean: {b}]"),
            Class::Boxed(Primitive::Number(n)) => {
                write!(self.f, "[Number: {}]", format_number(*n))
            }
            Class::Boxed(Primitive::String(s)) => write!(self.f, "[String: {:?}]", s.as_ref()),
            Class::Error { kind, message } if message.is_empty() => write!(self.f, "{kind}"),
            Class::Error { kind, message } => write!(self.f, "{kind}: {message}"),
            Class::Host(HostObject::Window) => self.f.write_str("Window"),
            Class::Host(HostObject::HtmlDocument) => self.f.write_str("HTMLDocument"),
            Class::Host(HostObject::HtmlElement(tag)) => write!(self.f, "<{tag}>"),
            Class::Host(HostObject::NodeList(items)) => {
                self.f.write_str("NodeList ")?;
                self.list(items)
            }
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer {
            f,
            seen: Vec::new(),
        }
        .value(self, false)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

macro_rules! impl_from_number {
    [$($ty:ty),* $(,)?] => {$(
        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::Number(value as f64)
            }
        }
    )*};
}

impl_from_number![f64, f32, i32, i64, u32, u64, usize];

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value.into())
    }
}

impl From<Rc<str>> for Value {
    fn from(value: Rc<str>) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::array(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

impl From<Exception> for Value {
    fn from(value: Exception) -> Self {
        Value::error(value.kind, &value.message)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Undefined)
    }
}

/// Build an argument list for an assertion out of anything convertible into a [`Value`].
///
/// ```
/// use testit::{args, value::Value};
///
/// let arguments: Vec<Value> = args![1, "one", true];
/// assert_eq!(arguments.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::value::Value>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::value::Value::from($value)),+]
    };
}
