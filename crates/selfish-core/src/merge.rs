//! Descriptor merge.
//!
//! Sources are visited in order and their own descriptors accumulated by
//! name; a later source replaces an earlier descriptor whole. The result is
//! then applied onto the target in one batch.

use crate::attribute::{AttributeSet, AttributeSource};

/// Accumulate the own descriptors of `sources`, later sources winning.
pub fn collect(sources: &[&dyn AttributeSource]) -> AttributeSet {
    let mut descriptor = AttributeSet::new();
    for source in sources {
        for (name, attribute) in source.own_attributes().iter() {
            descriptor.insert(name, attribute.clone());
        }
    }
    descriptor
}

/// Apply an already collected batch onto `target`.
pub fn apply(target: &mut AttributeSet, batch: AttributeSet) -> &mut AttributeSet {
    target.extend(batch);
    target
}

/// Merge the own attributes of `sources` into `target` and return it.
pub fn merge<'t>(
    target: &'t mut AttributeSet,
    sources: &[&dyn AttributeSource],
) -> &'t mut AttributeSet {
    apply(target, collect(sources))
}
