//! Attribute descriptors and insertion-ordered attribute sets.
//!
//! A descriptor is the unit of composition: merging copies whole descriptors,
//! so a method's writability and enumerability travel with it.

use indexmap::IndexMap;

use crate::error::ObjectError;
use crate::instance::{ObjectView, Receiver};
use crate::value::{Getter, Method, Value};

// ---------------------------------------------------------------------------
// AttributeDescriptor
// ---------------------------------------------------------------------------

/// Value plus metadata, or a computed accessor plus metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeDescriptor {
    /// Data attribute: plain values and methods alike.
    Data {
        value: Value,
        writable: bool,
        enumerable: bool,
        configurable: bool,
    },
    /// Computed attribute. The setter is a method called with one argument.
    Accessor {
        get: Option<Getter>,
        set: Option<Method>,
        enumerable: bool,
        configurable: bool,
    },
}

impl AttributeDescriptor {
    /// Writable, enumerable, configurable data attribute.
    pub fn data(value: impl Into<Value>) -> Self {
        Self::Data {
            value: value.into(),
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }

    /// Writable, configurable data attribute that is skipped by enumeration.
    pub fn hidden(value: impl Into<Value>) -> Self {
        Self::Data {
            value: value.into(),
            writable: true,
            enumerable: false,
            configurable: true,
        }
    }

    /// Non-writable, non-enumerable, non-configurable data attribute.
    pub fn data_frozen(value: impl Into<Value>) -> Self {
        Self::Data {
            value: value.into(),
            writable: false,
            enumerable: false,
            configurable: false,
        }
    }

    /// Enumerable, configurable accessor.
    pub fn accessor(get: Option<Getter>, set: Option<Method>) -> Self {
        Self::Accessor {
            get,
            set,
            enumerable: true,
            configurable: true,
        }
    }

    pub fn is_configurable(&self) -> bool {
        match self {
            Self::Data { configurable, .. } | Self::Accessor { configurable, .. } => *configurable,
        }
    }

    pub fn is_enumerable(&self) -> bool {
        match self {
            Self::Data { enumerable, .. } | Self::Accessor { enumerable, .. } => *enumerable,
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data { .. })
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self, Self::Accessor { .. })
    }

    /// The stored value, for data attributes.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Data { value, .. } => Some(value),
            Self::Accessor { .. } => None,
        }
    }

    /// Data attribute with `writable == true`. Accessors report `false`.
    pub fn is_writable(&self) -> bool {
        match self {
            Self::Data { writable, .. } => *writable,
            Self::Accessor { .. } => false,
        }
    }

    pub fn setter(&self) -> Option<&Method> {
        match self {
            Self::Accessor { set, .. } => set.as_ref(),
            Self::Data { .. } => None,
        }
    }

    pub fn set_non_configurable(&mut self) {
        match self {
            Self::Data { configurable, .. } | Self::Accessor { configurable, .. } => {
                *configurable = false;
            }
        }
    }

    /// No-op for accessors.
    pub fn set_non_writable(&mut self) {
        if let Self::Data { writable, .. } = self {
            *writable = false;
        }
    }

    pub fn set_non_enumerable(&mut self) {
        match self {
            Self::Data { enumerable, .. } | Self::Accessor { enumerable, .. } => {
                *enumerable = false;
            }
        }
    }

    /// Builder form of [`set_non_enumerable`](Self::set_non_enumerable).
    pub fn non_enumerable(mut self) -> Self {
        self.set_non_enumerable();
        self
    }

    /// Builder form of [`set_non_writable`](Self::set_non_writable).
    pub fn read_only(mut self) -> Self {
        self.set_non_writable();
        self
    }

    /// Builder form of [`set_non_configurable`](Self::set_non_configurable).
    pub fn permanent(mut self) -> Self {
        self.set_non_configurable();
        self
    }

    /// Resolve the attribute's value for `receiver`, running the getter of an
    /// accessor. An accessor without a getter reads as `Undefined`.
    pub fn read(&self, receiver: ObjectView<'_>) -> Result<Value, ObjectError> {
        match self {
            Self::Data { value, .. } => Ok(value.clone()),
            Self::Accessor { get: Some(getter), .. } => getter.get(receiver),
            Self::Accessor { get: None, .. } => Ok(Value::Undefined),
        }
    }

    /// Can `next` replace this descriptor? A non-configurable descriptor
    /// keeps its kind, enumerability and configurability; a writable data
    /// value may still change, and may be made read-only.
    pub fn allows_redefinition(&self, next: &AttributeDescriptor) -> bool {
        if self.is_configurable() {
            return true;
        }
        if next.is_configurable()
            || next.is_enumerable() != self.is_enumerable()
            || next.is_data() != self.is_data()
        {
            return false;
        }
        match (self, next) {
            (
                Self::Data {
                    value,
                    writable: false,
                    ..
                },
                Self::Data {
                    value: next_value,
                    writable: next_writable,
                    ..
                },
            ) => !next_writable && value == next_value,
            (
                Self::Accessor { get, set, .. },
                Self::Accessor {
                    get: next_get,
                    set: next_set,
                    ..
                },
            ) => get == next_get && set == next_set,
            _ => true,
        }
    }
}

// ---------------------------------------------------------------------------
// AttributeSet
// ---------------------------------------------------------------------------

/// Name → descriptor map. Keys are unique; iteration follows first insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeSet {
    entries: IndexMap<String, AttributeDescriptor>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.entries.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut AttributeDescriptor> {
        self.entries.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeDescriptor)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Names of enumerable attributes, in order.
    pub fn enumerable_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, d)| d.is_enumerable())
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Insert or replace. A replaced attribute keeps its original position.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        descriptor: AttributeDescriptor,
    ) -> Option<AttributeDescriptor> {
        self.entries.insert(name.into(), descriptor)
    }

    /// Remove, preserving the order of the remaining attributes.
    pub fn remove(&mut self, name: &str) -> Option<AttributeDescriptor> {
        self.entries.shift_remove(name)
    }

    /// Object.freeze semantics for the stored descriptors.
    pub(crate) fn freeze_all(&mut self) {
        for descriptor in self.entries.values_mut() {
            descriptor.set_non_configurable();
            descriptor.set_non_writable();
        }
    }

    // -- builders -----------------------------------------------------------

    /// Add a plain data attribute.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, AttributeDescriptor::data(value));
        self
    }

    /// Add a method attribute. The method is named after the attribute.
    pub fn with_method<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut Receiver<'_>, &[Value]) -> Result<Value, ObjectError> + Send + Sync + 'static,
    {
        let name = name.into();
        let method = Method::new(name.clone(), body);
        self.insert(name, AttributeDescriptor::data(method));
        self
    }

    pub fn with_accessor(
        mut self,
        name: impl Into<String>,
        get: Option<Getter>,
        set: Option<Method>,
    ) -> Self {
        self.insert(name, AttributeDescriptor::accessor(get, set));
        self
    }

    pub fn with_descriptor(mut self, name: impl Into<String>, descriptor: AttributeDescriptor) -> Self {
        self.insert(name, descriptor);
        self
    }
}

impl Extend<(String, AttributeDescriptor)> for AttributeSet {
    fn extend<I: IntoIterator<Item = (String, AttributeDescriptor)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl FromIterator<(String, AttributeDescriptor)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (String, AttributeDescriptor)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for AttributeSet {
    type Item = (String, AttributeDescriptor);
    type IntoIter = indexmap::map::IntoIter<String, AttributeDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ---------------------------------------------------------------------------
// AttributeSource
// ---------------------------------------------------------------------------

/// Anything whose own attributes can feed a merge: literal sets, prototypes
/// and instances. Only own attributes are exposed, never inherited ones.
pub trait AttributeSource {
    fn own_attributes(&self) -> &AttributeSet;
}

impl AttributeSource for AttributeSet {
    fn own_attributes(&self) -> &AttributeSet {
        self
    }
}
