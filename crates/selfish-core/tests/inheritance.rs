//! Lineage, ancestry and initializer behavior across several levels of
//! `extend`.

use selfish_core::{
    AttributeSet, INITIALIZE, Instance, ObjectError, Prototype, Value, base,
    is_prototype_of,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn attrs() -> AttributeSet {
    AttributeSet::new()
}

fn greeting_parent() -> Prototype {
    base().extend(&[&attrs().with("name", "parent").with_method("method", |this, _| {
        Ok(Value::from(format!("hello {}", this.get("name")?)))
    })])
}

fn option(args: &[Value], key: &str) -> Value {
    args.first()
        .and_then(Value::as_record)
        .and_then(|fields| fields.get(key).cloned())
        .unwrap_or_default()
}

fn named(name: &str) -> Value {
    let mut fields = indexmap::IndexMap::new();
    fields.insert("name".to_string(), Value::from(name));
    Value::Record(fields)
}

// ===========================================================================
// 1. Ancestry queries
// ===========================================================================

#[test]
fn base_is_prototype_of_everything_built_from_it() {
    let derived = base().extend(&[]);
    let instance = base().construct(&[]).unwrap();
    assert!(base().is_prototype_of(&instance));
    assert!(base().is_prototype_of(&derived));
    assert!(base().is_prototype_of(&derived.construct(&[]).unwrap()));
}

#[test]
fn unrelated_extensions_are_not_ancestors() {
    let a = base().extend(&[]);
    let b = base().extend(&[]);
    assert!(!a.is_prototype_of(&b));
    assert!(!a.is_prototype_of(&b.construct(&[]).unwrap()));
    assert!(!a.is_prototype_of(&base().construct(&[]).unwrap()));
}

#[test]
fn instances_are_never_prototypes() {
    let first = base().construct(&[]).unwrap();
    let second = base().construct(&[]).unwrap();
    let derived = base().extend(&[]);
    assert!(!first.is_prototype_of(&second));
    assert!(!first.is_prototype_of(&derived));
    assert!(!first.is_prototype_of(&first));
}

#[test]
fn ancestry_is_transitive_and_strict() {
    let p1 = base().extend(&[]);
    let p2 = p1.extend(&[]);
    let instance = p2.construct(&[]).unwrap();
    assert!(is_prototype_of(&p1, &p2));
    assert!(is_prototype_of(&p2, &instance));
    assert!(is_prototype_of(&p1, &instance));
    assert!(is_prototype_of(base(), &instance));
    assert!(!is_prototype_of(&p2, &p1));
    assert!(!is_prototype_of(&p2, &p2));
}

// ===========================================================================
// 2. Attribute inheritance
// ===========================================================================

#[test]
fn parent_prototype_reads_and_calls() {
    let parent = greeting_parent();
    assert_eq!(parent.get("name").unwrap(), Value::from("parent"));
    assert_eq!(parent.call("method", &[]).unwrap(), Value::from("hello parent"));
}

#[test]
fn parent_instances_inherit() {
    let parent = greeting_parent();
    let mut p = parent.construct(&[]).unwrap();
    assert_eq!(p.get("name").unwrap(), parent.get("name").unwrap());
    assert_eq!(
        p.call("method", &[]).unwrap(),
        parent.call("method", &[]).unwrap()
    );
    assert_eq!(
        parent.extend(&[&attrs()]).get("name").unwrap(),
        Value::from("parent")
    );
}

#[test]
fn child_overrides_name_and_shares_method() {
    let parent = greeting_parent();
    let child = parent.extend(&[&attrs().with("name", "child")]);

    assert_ne!(child.get("name").unwrap(), parent.get("name").unwrap());
    assert_eq!(child.call("method", &[]).unwrap(), Value::from("hello child"));
    assert_eq!(child.get("method").unwrap(), parent.get("method").unwrap());
    assert!(!child.has_own("method"));

    let mut c = child.construct(&[]).unwrap();
    assert_eq!(c.get("name").unwrap(), Value::from("child"));
    assert_eq!(c.get("method").unwrap(), parent.get("method").unwrap());
    assert_eq!(c.call("method", &[]).unwrap(), Value::from("hello child"));

    let grandchild = child.extend(&[]);
    assert_eq!(grandchild.get("name").unwrap(), Value::from("child"));
    assert_eq!(
        grandchild.get("method").unwrap(),
        parent.get("method").unwrap()
    );
}

#[test]
fn method_may_be_overridden_by_descendant_data() {
    let parent = greeting_parent();
    let child = parent.extend(&[&attrs().with("name", "child")]);
    let decedent = child.extend(&[&attrs().with("name", "decedent")]);
    let mut instance = decedent.construct(&[]).unwrap();
    assert_eq!(
        instance.call("method", &[]).unwrap(),
        Value::from("hello decedent")
    );
}

// ===========================================================================
// 3. Construction and initializers
// ===========================================================================

#[test]
fn initializer_receives_arguments() {
    let point = base().extend(&[&attrs().with_method(INITIALIZE, |this, args| {
        this.set("x", args.first().cloned().unwrap_or_default())?;
        this.set("y", args.get(1).cloned().unwrap_or_default())?;
        Ok(Value::Undefined)
    })]);
    let p = point.construct(&[Value::from(3), Value::from(4)]).unwrap();
    assert_eq!(p.get("x").unwrap(), Value::from(3));
    assert_eq!(p.get("y").unwrap(), Value::from(4));
    assert_eq!(p.keys(), ["x", "y"]);
}

#[test]
fn initializer_return_value_is_discarded() {
    let p = base().extend(&[&attrs().with_method(INITIALIZE, |_, _| Ok(Value::from("ignored")))]);
    let instance = p.construct(&[]).unwrap();
    assert!(instance.own_attributes().is_empty());
}

#[test]
fn failing_initializer_propagates_unchanged() {
    let p = base().extend(&[&attrs().with_method(INITIALIZE, |_, _| {
        Err(ObjectError::thrown("X"))
    })]);
    let result: Result<Instance, ObjectError> = p.construct(&[]);
    assert_eq!(result.unwrap_err(), ObjectError::thrown("X"));
}

#[test]
fn initializer_failure_after_partial_setup_yields_nothing() {
    let p = base().extend(&[&attrs().with_method(INITIALIZE, |this, _| {
        this.set("half", true)?;
        Err(ObjectError::Message("second step failed".to_string()))
    })]);
    assert_eq!(
        p.construct(&[]).unwrap_err(),
        ObjectError::Message("second step failed".to_string())
    );
}

#[test]
fn super_initializers_chain() {
    let foo = base().extend(&[&attrs().with_method(INITIALIZE, |this, args| {
        this.set("name", option(args, "name"))?;
        Ok(Value::Undefined)
    })]);

    let foo_init = foo.get(INITIALIZE).unwrap();
    let foo_init_for_bar = foo_init.clone();
    let bar = foo.extend(&[&attrs().with_method(INITIALIZE, move |this, args| {
        if let Some(parent_init) = foo_init_for_bar.as_method() {
            parent_init.invoke(this, args)?;
        }
        this.set("type", "bar")?;
        Ok(Value::Undefined)
    })]);
    let c = foo.extend(&[&attrs().with_method(INITIALIZE, move |this, args| {
        if let Some(parent_init) = foo_init.as_method() {
            parent_init.invoke(this, args)?;
        }
        this.set("type", "C")?;
        Ok(Value::Undefined)
    })]);

    let bar_instance = bar.construct(&[named("test")]).unwrap();
    let c_instance = c.construct(&[named("not bar")]).unwrap();

    assert!(bar.is_prototype_of(&bar_instance));
    assert!(foo.is_prototype_of(&bar_instance));
    assert!(base().is_prototype_of(&bar_instance));
    assert!(!c.is_prototype_of(&bar_instance));

    assert_eq!(bar_instance.get("type").unwrap(), Value::from("bar"));
    assert_eq!(bar_instance.get("name").unwrap(), Value::from("test"));
    assert_eq!(c_instance.get("type").unwrap(), Value::from("C"));
    assert_eq!(c_instance.get("name").unwrap(), Value::from("not bar"));
}

// ===========================================================================
// 4. Instance mutability through a deeper lineage
// ===========================================================================

fn abc() -> (Prototype, Prototype, Prototype) {
    let a = base().extend(&[&attrs()
        .with("name", "A")
        .with_method("hello", |this, _| this.get("name"))]);
    let b = a.extend(&[&attrs().with("varB", "B")]);
    let c = b.extend(&[&attrs().with("varC", "C")]);
    (a, b, c)
}

#[test]
fn a_instance_can_modify_name() {
    let (a, _, _) = abc();
    let mut instance = a.construct(&[]).unwrap();
    assert_eq!(instance.call("hello", &[]).unwrap(), Value::from("A"));
    instance.set("name", "Foo").unwrap();
    assert_eq!(instance.get("name").unwrap(), Value::from("Foo"));
    assert_eq!(instance.call("hello", &[]).unwrap(), Value::from("Foo"));
    assert_eq!(a.get("name").unwrap(), Value::from("A"));
}

#[test]
fn b_instance_inherits_and_mutates() {
    let (_, b, _) = abc();
    let mut instance = b.construct(&[]).unwrap();
    assert_eq!(instance.get("name").unwrap(), Value::from("A"));
    assert_eq!(instance.call("hello", &[]).unwrap(), Value::from("A"));
    instance.set("varB", "Foo").unwrap();
    assert_eq!(instance.get("varB").unwrap(), Value::from("Foo"));
    assert_eq!(b.get("varB").unwrap(), Value::from("B"));
}

#[test]
fn c_instance_mutates_every_level() {
    let (_, b, c) = abc();
    let mut instance = c.construct(&[]).unwrap();
    for name in ["name", "varB", "varC"] {
        instance.set(name, "Foo").unwrap();
        assert_eq!(instance.get(name).unwrap(), Value::from("Foo"));
    }
    assert_eq!(instance.call("hello", &[]).unwrap(), Value::from("Foo"));
    assert_eq!(c.get("varC").unwrap(), Value::from("C"));
    assert_eq!(b.get("varB").unwrap(), Value::from("B"));
}

#[test]
fn for_in_keys_walk_the_lineage() {
    let (_, _, c) = abc();
    let mut instance = c.construct(&[]).unwrap();
    instance.set("own", 1).unwrap();
    instance.set("name", "shadow").unwrap();
    assert_eq!(
        instance.for_in_keys(),
        ["own", "name", "varC", "varB", "hello"]
    );
}
