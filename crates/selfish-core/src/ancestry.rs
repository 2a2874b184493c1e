//! Ancestry and identity queries.
//!
//! Ancestry is the parent chain built by `extend` and construction. It is
//! independent of composition: copying a prototype's attributes into a new
//! prototype does not make it an ancestor.
//!
//! Queries over values that are not prototypes (numbers, strings, methods)
//! always answer `false`; they never fail.

use std::collections::BTreeSet;

use crate::attribute::AttributeSet;
use crate::prototype::Prototype;
use crate::value::{ObjectId, Value};

/// Objects that sit in the ancestry graph.
pub trait Ancestry {
    fn object_id(&self) -> ObjectId;

    /// First link of the ancestry chain, `None` for the root.
    fn ancestry_parent(&self) -> Option<&Prototype>;
}

/// Does `ancestor` occur in `descendant`'s ancestry chain? Strict: an object
/// is never its own prototype.
pub fn is_prototype_of(ancestor: &dyn Ancestry, descendant: &dyn Ancestry) -> bool {
    let target = ancestor.object_id();
    descendant
        .ancestry_parent()
        .is_some_and(|parent| parent.lineage().any(|p| p.id() == target))
}

/// Value-level form of [`is_prototype_of`]. Only prototypes can take part;
/// anything else yields `false`.
pub fn value_is_prototype_of(ancestor: &Value, descendant: &Value) -> bool {
    match (ancestor, descendant) {
        (Value::Prototype(a), Value::Prototype(d)) => is_prototype_of(a, d),
        _ => false,
    }
}

/// Ids of `object`'s ancestors, nearest first.
pub fn chain_of(object: &dyn Ancestry) -> Vec<ObjectId> {
    object
        .ancestry_parent()
        .map(|parent| parent.lineage().map(Prototype::id).collect())
        .unwrap_or_default()
}

/// `for...in` style enumeration: enumerable names from `own` (if any), then
/// from each prototype in the lineage. A name seen at a nearer level hides
/// the same name further up, even when the nearer one is not enumerable.
pub(crate) fn for_in_keys(own: Option<&AttributeSet>, start: &Prototype) -> Vec<String> {
    let mut result = Vec::new();
    let mut seen = BTreeSet::new();
    let levels = own
        .into_iter()
        .chain(start.lineage().map(Prototype::own_attributes));
    for attributes in levels {
        for (name, descriptor) in attributes.iter() {
            if !seen.insert(name.to_string()) {
                continue;
            }
            if descriptor.is_enumerable() {
                result.push(name.to_string());
            }
        }
    }
    result
}
