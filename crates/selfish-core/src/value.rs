//! Runtime values for the object model.
//!
//! Attributes hold `Value`s. Data values (`Str`, `List`, `Record`, ...) have
//! value semantics: reading one yields an independent copy, so mutating a
//! value read from an ancestor never reaches the ancestor. Callables and
//! prototypes are shared by identity.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ObjectError;
use crate::instance::{ObjectView, Receiver};
use crate::prototype::Prototype;

// ---------------------------------------------------------------------------
// ObjectId
// ---------------------------------------------------------------------------

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a prototype or instance. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl ObjectId {
    pub(crate) fn next() -> Self {
        Self(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Method / Getter
// ---------------------------------------------------------------------------

type MethodBody = dyn Fn(&mut Receiver<'_>, &[Value]) -> Result<Value, ObjectError> + Send + Sync;
type GetterBody = dyn Fn(ObjectView<'_>) -> Result<Value, ObjectError> + Send + Sync;

/// A callable attribute value. The receiver (`this`) is supplied at call time.
///
/// Two `Method`s are equal only if they are the same allocation, so a method
/// inherited or composed from elsewhere compares equal to its origin.
#[derive(Clone)]
pub struct Method {
    name: Arc<str>,
    body: Arc<MethodBody>,
}

impl Method {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut Receiver<'_>, &[Value]) -> Result<Value, ObjectError> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            body: Arc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the method against `receiver`. Also the way to make a "super"
    /// call: fetch an ancestor's method and invoke it on the current receiver.
    pub fn invoke(&self, receiver: &mut Receiver<'_>, args: &[Value]) -> Result<Value, ObjectError> {
        (self.body)(receiver, args)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

impl PartialEq for Method {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method({})", self.name)
    }
}

/// Read side of a computed accessor. Gets a read-only view of the receiver.
#[derive(Clone)]
pub struct Getter {
    body: Arc<GetterBody>,
}

impl Getter {
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(ObjectView<'_>) -> Result<Value, ObjectError> + Send + Sync + 'static,
    {
        Self {
            body: Arc::new(body),
        }
    }

    pub fn get(&self, receiver: ObjectView<'_>) -> Result<Value, ObjectError> {
        (self.body)(receiver)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

impl PartialEq for Getter {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Getter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Getter")
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// Tagged attribute value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    List(Vec<Value>),
    Record(IndexMap<String, Value>),
    Method(Method),
    Prototype(Prototype),
}

impl Value {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Method(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Record(_) => "record",
            Self::Method(_) => "method",
            Self::Prototype(_) => "prototype",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Self::Record(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut IndexMap<String, Value>> {
        match self {
            Self::Record(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&Method> {
        match self {
            Self::Method(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_prototype(&self) -> Option<&Prototype> {
        match self {
            Self::Prototype(p) => Some(p),
            _ => None,
        }
    }

    /// JSON rendering for snapshots and logs. Callables and prototypes are
    /// rendered as descriptive strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Undefined | Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Str(s) => serde_json::Value::String(s.clone()),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Record(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::Method(_) | Self::Prototype(_) => serde_json::Value::String(self.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Self::Number(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Record(fields) => {
                f.write_str("{")?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Self::Method(m) => write!(f, "[method {}]", m.name()),
            Self::Prototype(p) => write!(f, "[prototype {}]", p.id()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(fields: IndexMap<String, Value>) -> Self {
        Self::Record(fields)
    }
}

impl From<Method> for Value {
    fn from(m: Method) -> Self {
        Self::Method(m)
    }
}

impl From<Prototype> for Value {
    fn from(p: Prototype) -> Self {
        Self::Prototype(p)
    }
}
