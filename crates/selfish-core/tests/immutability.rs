//! Frozen prototypes versus mutable instances.

use selfish_core::{
    AttributeDescriptor, AttributeSet, Mutation, ObjectError, Prototype, Value, ViolationCause,
    base,
};

fn foo() -> Prototype {
    base().extend(&[&AttributeSet::new()
        .with("name", "hello")
        .with_method("rename", |this, args| {
            this.set("name", args.first().cloned().unwrap_or_default())?;
            Ok(Value::Undefined)
        })
        .with_method("nothing", |_, _| Ok(Value::Undefined))])
}

fn assert_frozen(err: ObjectError, operation: Mutation) {
    match err {
        ObjectError::ImmutabilityViolation {
            operation: op,
            cause,
            ..
        } => {
            assert_eq!(op, operation);
            assert_eq!(cause, ViolationCause::FrozenPrototype);
        }
        other => panic!("expected immutability violation, got {other:?}"),
    }
}

// ===========================================================================
// 1. Base
// ===========================================================================

#[test]
fn base_rejects_additions() {
    assert_frozen(base().try_set("foo", Value::Null).unwrap_err(), Mutation::Add);
    assert_frozen(
        base()
            .try_define("foo", AttributeDescriptor::data(1))
            .unwrap_err(),
        Mutation::Add,
    );
    assert!(base().own_attributes().is_empty());
}

#[test]
fn base_rejects_deletion() {
    assert_frozen(base().try_delete("extend").unwrap_err(), Mutation::Delete);
}

#[test]
fn base_rejects_merge() {
    let extra = AttributeSet::new().with("x", 1);
    assert_frozen(base().try_merge(&[&extra]).unwrap_err(), Mutation::Add);
    assert!(base().own_attributes().is_empty());
}

// ===========================================================================
// 2. Extended prototypes
// ===========================================================================

#[test]
fn cannot_change_prototype_attributes() {
    let foo = foo();
    assert_frozen(
        foo.try_set("name", Value::from("other")).unwrap_err(),
        Mutation::Assign,
    );
    assert_eq!(foo.get("name").unwrap(), Value::from("hello"));
}

#[test]
fn cannot_add_attributes() {
    let foo = foo();
    assert_frozen(foo.try_set("bar", Value::Null).unwrap_err(), Mutation::Add);
    assert!(!foo.has("bar"));
}

#[test]
fn cannot_remove_attributes() {
    let foo = foo();
    assert_frozen(foo.try_delete("name").unwrap_err(), Mutation::Delete);
    assert!(foo.has_own("name"));
}

#[test]
fn cannot_redefine_attributes() {
    let foo = foo();
    assert_frozen(
        foo.try_define("name", AttributeDescriptor::data("x"))
            .unwrap_err(),
        Mutation::Redefine,
    );
    assert_eq!(
        foo.get_own_attribute("name"),
        Some(&AttributeDescriptor::Data {
            value: Value::from("hello"),
            writable: false,
            enumerable: true,
            configurable: false,
        })
    );
}

#[test]
fn methods_cannot_mutate_prototypes() {
    let foo = foo();
    let err = foo.call("rename", &[Value::from("new name")]).unwrap_err();
    assert_frozen(err, Mutation::Assign);
    assert_eq!(foo.get("name").unwrap(), Value::from("hello"));
    assert_eq!(foo.call("nothing", &[]).unwrap(), Value::Undefined);
}

#[test]
fn inherited_mutator_cannot_mutate_derived_prototype() {
    let derived = foo().extend(&[]);
    let err = derived.call("rename", &[Value::from("x")]).unwrap_err();
    match err {
        ObjectError::ImmutabilityViolation {
            object, operation, ..
        } => {
            assert_eq!(object, derived.id());
            assert_eq!(operation, Mutation::Add);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn attributes_may_be_overridden_on_descendants() {
    let foo = foo();
    let bar = foo.extend(&[&AttributeSet::new().with_method("rename", |this, _| this.get("name"))]);
    assert_eq!(bar.call("rename", &[]).unwrap(), foo.get("name").unwrap());
    assert_ne!(bar.get("rename").unwrap(), foo.get("rename").unwrap());
}

#[test]
fn every_prototype_reports_frozen() {
    let foo = foo();
    assert!(base().is_frozen());
    assert!(foo.is_frozen());
    assert!(foo.extend(&[]).is_frozen());
    for (_, descriptor) in foo.own_attributes().iter() {
        assert!(!descriptor.is_writable());
        assert!(!descriptor.is_configurable());
    }
}

// ===========================================================================
// 3. Instances stay mutable
// ===========================================================================

#[test]
fn instance_is_mutable() {
    let mut f1 = foo().construct(&[]).unwrap();
    assert!(!f1.is_frozen());
    assert_eq!(f1.get("alias").unwrap(), Value::Undefined);
    f1.set("alias", "f1").unwrap();
    assert_eq!(f1.get("alias").unwrap(), Value::from("f1"));
}

#[test]
fn own_attributes_are_deletable() {
    let mut f1 = foo().construct(&[]).unwrap();
    f1.set("alias", "f1").unwrap();
    assert!(f1.has("alias"));
    assert!(f1.delete("alias").unwrap());
    assert!(!f1.has("alias"));
}

#[test]
fn deleting_inherited_name_is_a_noop() {
    let foo = foo();
    let mut f1 = foo.construct(&[]).unwrap();
    assert!(!f1.delete("name").unwrap());
    assert_eq!(f1.get("name").unwrap(), Value::from("hello"));
}

#[test]
fn methods_mutate_instance_own_attributes() {
    let foo = foo();
    let mut f1 = foo.construct(&[]).unwrap();
    f1.call("rename", &[Value::from(1)]).unwrap();
    assert_eq!(f1.get("name").unwrap(), Value::from(1));
    f1.call("rename", &[Value::from(3)]).unwrap();
    assert_eq!(f1.get("name").unwrap(), Value::from(3));
    assert_eq!(foo.get("name").unwrap(), Value::from("hello"));
}

#[test]
fn inherited_frozen_attributes_can_be_shadowed() {
    let foo = foo();
    let mut f1 = foo.construct(&[]).unwrap();
    f1.set("name", "lol").unwrap();
    assert_eq!(f1.get("name").unwrap(), Value::from("lol"));
    assert_eq!(
        f1.get_own_attribute("name"),
        Some(&AttributeDescriptor::data("lol"))
    );
    assert!(f1.delete("name").unwrap());
    assert_eq!(f1.get("name").unwrap(), Value::from("hello"));
}

#[test]
fn merging_a_prototype_into_an_instance_copies_frozen_descriptors() {
    let foo = foo();
    let mut target = base().construct(&[]).unwrap();
    target.merge(&[&foo]).unwrap();
    assert_eq!(target.get("name").unwrap(), Value::from("hello"));
    let err = target.set("name", "changed").unwrap_err();
    assert!(matches!(
        err,
        ObjectError::ImmutabilityViolation {
            cause: ViolationCause::ReadOnlyAttribute,
            ..
        }
    ));
    assert!(!foo.is_prototype_of(&target));
}
