//! Mutable instances and method receivers.
//!
//! An instance owns its attributes and delegates missing lookups to its
//! prototype. Writes always land on the instance: assigning an inherited
//! name creates an own attribute that shadows it, and deleting that own
//! attribute uncovers the inherited one again.

use crate::ancestry::{self, Ancestry};
use crate::attribute::{AttributeDescriptor, AttributeSet, AttributeSource};
use crate::error::{Mutation, ObjectError, ViolationCause};
use crate::merge;
use crate::prototype::{Prototype, resolve_method};
use crate::value::{ObjectId, Value};

// ---------------------------------------------------------------------------
// Instance
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Instance {
    id: ObjectId,
    prototype: Prototype,
    attributes: AttributeSet,
}

impl Instance {
    pub(crate) fn allocate(prototype: &Prototype) -> Self {
        Self {
            id: ObjectId::next(),
            prototype: prototype.clone(),
            attributes: AttributeSet::new(),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The prototype this instance was constructed from.
    pub fn prototype(&self) -> &Prototype {
        &self.prototype
    }

    pub fn is_frozen(&self) -> bool {
        false
    }

    pub fn is_prototype_of(&self, other: &dyn Ancestry) -> bool {
        ancestry::is_prototype_of(self, other)
    }

    // -- reads --------------------------------------------------------------

    pub fn own_attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    pub fn get_own_attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.get(name)
    }

    pub fn has_own(&self, name: &str) -> bool {
        self.attributes.contains(name)
    }

    pub fn own_attribute_names(&self) -> Vec<String> {
        self.attributes.names().map(str::to_string).collect()
    }

    /// Enumerable own names.
    pub fn keys(&self) -> Vec<String> {
        self.attributes.enumerable_names()
    }

    /// Enumerable names through the whole chain, own first.
    pub fn for_in_keys(&self) -> Vec<String> {
        ancestry::for_in_keys(Some(&self.attributes), &self.prototype)
    }

    /// Nearest descriptor for `name`: own, then inherited.
    pub fn lookup(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes
            .get(name)
            .or_else(|| self.prototype.lookup(name))
    }

    pub fn has(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Read `name`, falling back through the ancestry chain. Accessors run
    /// with this instance as receiver. Missing attributes read as `Undefined`.
    pub fn get(&self, name: &str) -> Result<Value, ObjectError> {
        match self.lookup(name) {
            Some(descriptor) => descriptor.read(ObjectView::Instance(self)),
            None => Ok(Value::Undefined),
        }
    }

    /// JSON object of the enumerable own data attributes.
    pub fn to_json(&self) -> serde_json::Value {
        let fields: serde_json::Map<String, serde_json::Value> = self
            .attributes
            .iter()
            .filter(|(_, d)| d.is_enumerable())
            .filter_map(|(name, d)| d.value().map(|v| (name.to_string(), v.to_json())))
            .collect();
        serde_json::Value::Object(fields)
    }

    // -- writes -------------------------------------------------------------

    /// Assign `name`. Inherited data attributes are shadowed by a new own
    /// attribute; accessors (own or inherited) go through their setter.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ObjectError> {
        let value = value.into();
        let setter = match self.lookup(name) {
            Some(AttributeDescriptor::Accessor { set: Some(setter), .. }) => Some(setter.clone()),
            Some(AttributeDescriptor::Accessor { set: None, .. }) => {
                return Err(ObjectError::MissingSetter {
                    object: self.id,
                    attribute: name.to_string(),
                });
            }
            _ => None,
        };
        if let Some(setter) = setter {
            setter.invoke(&mut Receiver::Instance(self), &[value])?;
            return Ok(());
        }

        match self.attributes.get_mut(name) {
            Some(AttributeDescriptor::Data {
                value: slot,
                writable: true,
                ..
            }) => {
                *slot = value;
                Ok(())
            }
            Some(_) => Err(ObjectError::immutable(
                self.id,
                name,
                Mutation::Assign,
                ViolationCause::ReadOnlyAttribute,
            )),
            None => {
                self.attributes.insert(name, AttributeDescriptor::data(value));
                Ok(())
            }
        }
    }

    /// Read `name`, let `edit` change the value, and store the result as an
    /// own attribute. The ancestor's copy is left untouched.
    pub fn update<F>(&mut self, name: &str, edit: F) -> Result<(), ObjectError>
    where
        F: FnOnce(&mut Value),
    {
        let mut value = self.get(name)?;
        edit(&mut value);
        self.set(name, value)
    }

    /// Remove the own attribute `name`. Returns whether anything was removed;
    /// inherited attributes are never touched.
    pub fn delete(&mut self, name: &str) -> Result<bool, ObjectError> {
        let configurable = match self.attributes.get(name) {
            Some(descriptor) => descriptor.is_configurable(),
            None => return Ok(false),
        };
        if !configurable {
            return Err(ObjectError::immutable(
                self.id,
                name,
                Mutation::Delete,
                ViolationCause::NonConfigurableAttribute,
            ));
        }
        Ok(self.attributes.remove(name).is_some())
    }

    /// Define or replace the own descriptor for `name`. A non-configurable
    /// own attribute only accepts replacements that
    /// [`allows_redefinition`](AttributeDescriptor::allows_redefinition)
    /// permits.
    pub fn define(&mut self, name: &str, descriptor: AttributeDescriptor) -> Result<(), ObjectError> {
        self.check_redefine(name, &descriptor)?;
        self.attributes.insert(name, descriptor);
        Ok(())
    }

    /// Merge the own attributes of `sources` onto this instance, later
    /// sources winning. The batch is checked up front, so either every
    /// attribute lands or none does.
    pub fn merge(&mut self, sources: &[&dyn AttributeSource]) -> Result<&mut Self, ObjectError> {
        let batch = merge::collect(sources);
        for (name, descriptor) in batch.iter() {
            self.check_redefine(name, descriptor)?;
        }
        merge::apply(&mut self.attributes, batch);
        Ok(self)
    }

    fn check_redefine(&self, name: &str, descriptor: &AttributeDescriptor) -> Result<(), ObjectError> {
        match self.attributes.get(name) {
            Some(current) if !current.allows_redefinition(descriptor) => {
                Err(ObjectError::immutable(
                    self.id,
                    name,
                    Mutation::Redefine,
                    ViolationCause::NonConfigurableAttribute,
                ))
            }
            _ => Ok(()),
        }
    }

    /// Call method `name` with this instance as receiver.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, ObjectError> {
        let method = resolve_method(self.get(name)?, self.id, name)?;
        method.invoke(&mut Receiver::Instance(self), args)
    }
}

impl AttributeSource for Instance {
    fn own_attributes(&self) -> &AttributeSet {
        &self.attributes
    }
}

impl Ancestry for Instance {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn ancestry_parent(&self) -> Option<&Prototype> {
        Some(&self.prototype)
    }
}

// ---------------------------------------------------------------------------
// Receiver / ObjectView
// ---------------------------------------------------------------------------

/// The receiver a method runs against. Mutations through a prototype
/// receiver fail with an immutability violation.
#[derive(Debug)]
pub enum Receiver<'a> {
    Prototype(&'a Prototype),
    Instance(&'a mut Instance),
}

impl Receiver<'_> {
    pub fn id(&self) -> ObjectId {
        match self {
            Self::Prototype(p) => p.id(),
            Self::Instance(i) => i.id(),
        }
    }

    pub fn view(&self) -> ObjectView<'_> {
        match self {
            Self::Prototype(p) => ObjectView::Prototype(p),
            Self::Instance(i) => ObjectView::Instance(&**i),
        }
    }

    pub fn is_prototype(&self) -> bool {
        matches!(self, Self::Prototype(_))
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Instance(i) => Some(&**i),
            Self::Prototype(_) => None,
        }
    }

    pub fn get(&self, name: &str) -> Result<Value, ObjectError> {
        self.view().get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.view().has(name)
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ObjectError> {
        match self {
            Self::Prototype(p) => p.try_set(name, value.into()),
            Self::Instance(i) => i.set(name, value),
        }
    }

    pub fn delete(&mut self, name: &str) -> Result<bool, ObjectError> {
        match self {
            Self::Prototype(p) => p.try_delete(name),
            Self::Instance(i) => i.delete(name),
        }
    }

    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, ObjectError> {
        match self {
            Self::Prototype(p) => p.call(name, args),
            Self::Instance(i) => i.call(name, args),
        }
    }
}

/// Read-only receiver, handed to accessor getters.
#[derive(Debug, Clone, Copy)]
pub enum ObjectView<'a> {
    Prototype(&'a Prototype),
    Instance(&'a Instance),
}

impl ObjectView<'_> {
    pub fn id(&self) -> ObjectId {
        match self {
            Self::Prototype(p) => p.id(),
            Self::Instance(i) => i.id(),
        }
    }

    pub fn get(&self, name: &str) -> Result<Value, ObjectError> {
        match self {
            Self::Prototype(p) => p.get(name),
            Self::Instance(i) => i.get(name),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        match self {
            Self::Prototype(p) => p.has(name),
            Self::Instance(i) => i.has(name),
        }
    }
}
