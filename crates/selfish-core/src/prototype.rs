//! Frozen prototypes and the root `Base`.
//!
//! A prototype is created by [`Prototype::extend`]: a new node chained to its
//! parent, composed from the merged own attributes of the sources, and frozen
//! before anyone else can see it. Nothing about a prototype changes after
//! that; every mutating entry point exists only to report the refusal.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock};

use crate::ancestry::{self, Ancestry};
use crate::attribute::{AttributeDescriptor, AttributeSet, AttributeSource};
use crate::error::{Mutation, ObjectError, ViolationCause};
use crate::instance::{Instance, ObjectView, Receiver};
use crate::merge;
use crate::value::{Method, ObjectId, Value};

/// Name of the attribute run by construction.
pub const INITIALIZE: &str = "initialize";

static BASE: LazyLock<Prototype> = LazyLock::new(Prototype::root);

/// The root prototype: no parent, no own attributes, frozen.
pub fn base() -> &'static Prototype {
    &BASE
}

#[derive(Debug)]
struct PrototypeNode {
    id: ObjectId,
    parent: Option<Prototype>,
    depth: usize,
    attributes: AttributeSet,
}

impl Drop for PrototypeNode {
    // Unlink ancestors one at a time; the default drop recurses per level.
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(parent) = next {
            next = Arc::into_inner(parent.node).and_then(|mut node| node.parent.take());
        }
    }
}

/// Shared handle to an immutable prototype node. Cloning is cheap and keeps
/// identity; equality is identity.
#[derive(Clone)]
pub struct Prototype {
    node: Arc<PrototypeNode>,
}

impl Prototype {
    fn root() -> Self {
        Self::sealed(None, AttributeSet::new())
    }

    fn sealed(parent: Option<Prototype>, mut attributes: AttributeSet) -> Self {
        attributes.freeze_all();
        let depth = parent.as_ref().map_or(0, |p| p.depth() + 1);
        Self {
            node: Arc::new(PrototypeNode {
                id: ObjectId::next(),
                parent,
                depth,
                attributes,
            }),
        }
    }

    // -- factories ----------------------------------------------------------

    /// Derive a new frozen prototype whose parent is `self`, composed from
    /// the own attributes of `sources` (later sources win). Passing another
    /// prototype as a source copies its own attributes without making it an
    /// ancestor.
    pub fn extend(&self, sources: &[&dyn AttributeSource]) -> Prototype {
        let mut attributes = AttributeSet::new();
        merge::merge(&mut attributes, sources);
        Self::sealed(Some(self.clone()), attributes)
    }

    /// Construct a mutable instance whose ancestry begins here, running the
    /// nearest `initialize` with `args`. A failing initializer fails the
    /// construction with its error and the instance is dropped.
    pub fn construct(&self, args: &[Value]) -> Result<Instance, ObjectError> {
        let mut instance = Instance::allocate(self);
        match instance.get(INITIALIZE)? {
            Value::Undefined => {}
            Value::Method(initialize) => {
                initialize.invoke(&mut Receiver::Instance(&mut instance), args)?;
            }
            other => {
                return Err(ObjectError::NotCallable {
                    object: instance.id(),
                    attribute: INITIALIZE.to_string(),
                    found: other.type_name(),
                });
            }
        }
        Ok(instance)
    }

    // -- identity -----------------------------------------------------------

    pub fn id(&self) -> ObjectId {
        self.node.id
    }

    pub fn parent(&self) -> Option<&Prototype> {
        self.node.parent.as_ref()
    }

    /// Number of ancestors. The root has depth 0.
    pub fn depth(&self) -> usize {
        self.node.depth
    }

    pub fn is_root(&self) -> bool {
        self.node.parent.is_none()
    }

    /// Always true; kept for parity with instances and for assertions.
    pub fn is_frozen(&self) -> bool {
        true
    }

    /// `self`, then each ancestor up to the root.
    pub fn lineage(&self) -> Lineage<'_> {
        Lineage { next: Some(self) }
    }

    /// Is `self` a strict ancestor of `other`?
    pub fn is_prototype_of(&self, other: &dyn Ancestry) -> bool {
        ancestry::is_prototype_of(self, other)
    }

    // -- reads --------------------------------------------------------------

    pub fn own_attributes(&self) -> &AttributeSet {
        &self.node.attributes
    }

    pub fn get_own_attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.node.attributes.get(name)
    }

    pub fn has_own(&self, name: &str) -> bool {
        self.node.attributes.contains(name)
    }

    /// Nearest descriptor for `name` along the lineage.
    pub fn lookup(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.lineage().find_map(|p| p.node.attributes.get(name))
    }

    pub fn has(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Read `name` with the prototype itself as receiver. Missing attributes
    /// read as `Undefined`.
    pub fn get(&self, name: &str) -> Result<Value, ObjectError> {
        match self.lookup(name) {
            Some(descriptor) => descriptor.read(ObjectView::Prototype(self)),
            None => Ok(Value::Undefined),
        }
    }

    /// Call method `name` with the prototype as receiver. The method may read
    /// through `this` but any attempt to mutate it fails.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, ObjectError> {
        let method = resolve_method(self.get(name)?, self.id(), name)?;
        method.invoke(&mut Receiver::Prototype(self), args)
    }

    /// Enumerable names visible from here: own first, then inherited, with
    /// shadowed names reported once.
    pub fn for_in_keys(&self) -> Vec<String> {
        ancestry::for_in_keys(None, self)
    }

    // -- refused mutations --------------------------------------------------

    pub fn try_set(&self, name: &str, _value: Value) -> Result<(), ObjectError> {
        let operation = if self.has_own(name) {
            Mutation::Assign
        } else {
            Mutation::Add
        };
        Err(self.frozen(name, operation))
    }

    pub fn try_delete(&self, name: &str) -> Result<bool, ObjectError> {
        Err(self.frozen(name, Mutation::Delete))
    }

    pub fn try_define(
        &self,
        name: &str,
        _descriptor: AttributeDescriptor,
    ) -> Result<(), ObjectError> {
        let operation = if self.has_own(name) {
            Mutation::Redefine
        } else {
            Mutation::Add
        };
        Err(self.frozen(name, operation))
    }

    /// Merging into a prototype is refused unless there is nothing to merge.
    pub fn try_merge(&self, sources: &[&dyn AttributeSource]) -> Result<(), ObjectError> {
        let batch = merge::collect(sources);
        match batch.names().next() {
            Some(name) => {
                let operation = if self.has_own(name) {
                    Mutation::Redefine
                } else {
                    Mutation::Add
                };
                Err(self.frozen(name, operation))
            }
            None => Ok(()),
        }
    }

    fn frozen(&self, name: &str, operation: Mutation) -> ObjectError {
        ObjectError::immutable(self.id(), name, operation, ViolationCause::FrozenPrototype)
    }
}

/// Turn a looked-up value into something callable.
pub(crate) fn resolve_method(
    value: Value,
    object: ObjectId,
    name: &str,
) -> Result<Method, ObjectError> {
    match value {
        Value::Method(method) => Ok(method),
        other => Err(ObjectError::NotCallable {
            object,
            attribute: name.to_string(),
            found: other.type_name(),
        }),
    }
}

impl PartialEq for Prototype {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl Eq for Prototype {}

impl Hash for Prototype {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.id.hash(state);
    }
}

impl fmt::Debug for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prototype")
            .field("id", &self.node.id)
            .field("parent", &self.node.parent.as_ref().map(Prototype::id))
            .field(
                "attributes",
                &self.node.attributes.names().collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl AttributeSource for Prototype {
    fn own_attributes(&self) -> &AttributeSet {
        &self.node.attributes
    }
}

impl Ancestry for Prototype {
    fn object_id(&self) -> ObjectId {
        self.id()
    }

    fn ancestry_parent(&self) -> Option<&Prototype> {
        self.parent()
    }
}

/// Iterator over a prototype and its ancestors, nearest first.
pub struct Lineage<'a> {
    next: Option<&'a Prototype>,
}

impl<'a> Iterator for Lineage<'a> {
    type Item = &'a Prototype;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}
