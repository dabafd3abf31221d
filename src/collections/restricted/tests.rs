#![cfg(test)]

use std::rc::Rc;

use super::*;
use crate::collections::linked::LinkedList;
use crate::restrict::{
    ClassRegistry, InvalidArgument, Object, PredicateFilter, RangeError, Restriction,
    RestrictionFilter, RestrictionOptions, TagKind, TypeTag, Value,
};
use crate::util::error::IndexOutOfBounds;
use crate::util::id::IdSource;
use crate::util::panic::assert_panics;

fn ints_only() -> RestrictionFilter {
    RestrictionFilter::new(
        Restriction::from_kinds([TagKind::Int], [] as [&str; 0], RestrictionOptions::new())
            .expect("no classes to resolve"),
    )
}

fn lenient() -> ContainerOptions {
    ContainerOptions::new()
}

fn strict() -> ContainerOptions {
    ContainerOptions::new().strict(true)
}

#[test]
fn test_lenient_push_skips_refused_value() {
    let mut seq: RestrictedSequence<Value> = RestrictedSequence::with_filter(ints_only(), lenient());
    assert_eq!(seq.push(Value::Int(1)), Ok(true));
    assert_eq!(seq.push(Value::from("two")), Ok(false), "Refused values should be skipped.");
    assert_eq!(seq.iter().cloned().collect::<Vec<_>>(), [Value::Int(1)]);
}

#[test]
fn test_strict_push_raises() {
    let mut seq: RestrictedSequence<Value> = RestrictedSequence::with_filter(ints_only(), strict());
    assert_eq!(
        seq.push(Value::from("two")),
        Err(InvalidArgument::filtered(TypeTag::String)),
    );
    assert!(seq.is_empty());
}

#[test]
fn test_push_many_is_all_or_nothing() {
    let mut seq: RestrictedSequence<Value> = RestrictedSequence::with_filter(ints_only(), lenient());
    let values = [Value::Int(1), Value::Int(2), Value::from("three"), Value::Int(4)];

    assert_eq!(seq.push_many(values.clone()), Ok(false));
    assert!(seq.is_empty(), "One refused value should discard the whole batch.");

    assert_eq!(seq.push_each(values), Ok(3), "The best-effort push should keep allowed values.");
    assert_eq!(
        seq.iter().cloned().collect::<Vec<_>>(),
        [Value::Int(1), Value::Int(2), Value::Int(4)],
    );
}

#[test]
fn test_construction_is_checked() {
    let seq = RestrictedSequence::<Value>::from_values(
        [Value::Int(1), Value::Float(2.0)],
        ints_only(),
        lenient(),
    ).expect("lenient construction doesn't fail");
    assert!(seq.is_empty());

    let error = RestrictedSequence::<Value>::from_values([Value::Float(2.0)], ints_only(), strict())
        .err();
    assert_eq!(error, Some(InvalidArgument::filtered(TypeTag::Float)));
}

#[test]
fn test_set_and_insert() {
    let mut seq: RestrictedSequence<i64> = RestrictedSequence::new(lenient());
    seq.push_many([1, 2, 3]).expect("lenient");

    assert_eq!(seq.set(1, 20), Ok(Some(2)));
    assert_eq!(seq.set(9, 90), Ok(None), "Out of range writes should be ignored.");
    assert_eq!(seq.insert(0, 0), Ok(true));
    assert_eq!(seq.insert(4, 4), Ok(true), "Inserting at len should append.");
    assert_eq!(seq.insert(9, 9), Ok(false));
    assert_eq!(seq.iter().copied().collect::<Vec<_>>(), [0, 1, 20, 3, 4]);

    let mut seq: RestrictedSequence<Value> = RestrictedSequence::with_filter(ints_only(), strict());
    seq.push(Value::Int(1)).expect("ints are allowed");
    assert_eq!(
        seq.set(3, Value::Int(2)),
        Err(SetError::Range(RangeError::IndexOutOfBounds(IndexOutOfBounds { index: 3, len: 1 }))),
    );
    assert_eq!(
        seq.set(0, Value::Bool(true)),
        Err(SetError::Invalid(InvalidArgument::filtered(TypeTag::Bool))),
    );
    assert!(seq.insert(5, Value::Int(5)).is_err_and(|e| e.is_range()));
    assert_eq!(seq[0], Value::Int(1));
}

#[test]
fn test_reads_and_removal() {
    let mut seq: RestrictedSequence<u8> = RestrictedSequence::new(lenient());
    seq.push_many([1, 2, 3]).expect("lenient");

    assert_eq!(seq.get(1), Ok(Some(&2)));
    assert_eq!(seq.get(3), Ok(None));
    assert_eq!(seq.remove(5), Ok(None));
    assert_eq!(seq.remove(0), Ok(Some(1)));
    assert_eq!(seq.pop(), Some(3));
    assert_eq!(seq.shift(), Some(2));
    assert_eq!(seq.shift(), None);

    let mut seq: RestrictedSequence<u8> = RestrictedSequence::new(strict());
    seq.push(7).expect("permissive by default");
    assert_eq!(
        seq.get(1),
        Err(RangeError::IndexOutOfBounds(IndexOutOfBounds { index: 1, len: 1 })),
    );
    assert!(seq.remove(1).is_err());
    assert_panics!({ seq[1] });
}

#[test]
fn test_unique_values() {
    let mut seq: RestrictedSequence<&str> = RestrictedSequence::new(lenient().unique(true));
    assert_eq!(seq.push("a"), Ok(true));
    assert_eq!(seq.push("a"), Ok(false));
    assert_eq!(seq.push_many(["b", "b"]), Ok(false), "Duplicates within a batch should count.");
    assert_eq!(seq.push_many(["b", "c"]), Ok(true));
    assert_eq!(seq.set(0, "a"), Ok(Some("a")), "Replacing a value with itself isn't a duplicate.");
    assert_eq!(seq.set(0, "c"), Ok(None));

    let mut seq: RestrictedSequence<&str> = RestrictedSequence::new(strict().unique(true));
    seq.push("a").expect("first push");
    assert_eq!(seq.push("a"), Err(InvalidArgument::duplicate(TypeTag::String)));
}

#[test]
fn test_reference_option() {
    let object = Object::new("Point").with("x", 1);

    let mut aliased: RestrictedSequence<Value> = RestrictedSequence::new(lenient());
    let mut copied: RestrictedSequence<Value> = RestrictedSequence::new(lenient().reference(false));
    aliased.push(Value::Object(object.clone())).expect("lenient");
    copied.push(Value::Object(object.clone())).expect("lenient");

    object.set("x", 2);
    let x = |seq: &RestrictedSequence<Value>| seq[0].as_object().and_then(|o| o.get("x"));
    assert_eq!(x(&aliased), Some(Value::Int(2)), "Referenced values should see outside changes.");
    assert_eq!(x(&copied), Some(Value::Int(1)), "Copied values shouldn't.");
}

#[test]
fn test_shared_restriction_between_containers() {
    let filter = ints_only();
    let mut a: RestrictedSequence<Value> = RestrictedSequence::with_filter(filter.clone(), lenient());
    let mut b: RestrictedStack<Value> = RestrictedStack::with_filter(filter.clone(), lenient());

    assert_eq!(b.push(Value::Float(0.5)), Ok(false));
    a.filter().restriction_mut().add_allowed_tag(TagKind::Float);
    assert_eq!(b.push(Value::Float(0.5)), Ok(true), "Reconfiguration should apply to all sharers.");
    assert_eq!(a.push(Value::Float(0.5)), Ok(true));
}

#[test]
fn test_class_restricted_container() {
    let mut registry = ClassRegistry::new();
    registry
        .declare_class("Shape", None, [])
        .and_then(|r| r.declare_class("Circle", Some("Shape"), []))
        .and_then(|r| r.declare_class("Colour", None, []))
        .expect("declared parents-first");

    let restriction = Restriction::new(
        [] as [&str; 0],
        ["Shape"],
        RestrictionOptions::new().registry(Rc::new(registry)),
    ).expect("Shape is registered");
    let mut shapes: RestrictedSequence<Value> =
        RestrictedSequence::with_filter(RestrictionFilter::new(restriction), strict());

    assert_eq!(shapes.push(Value::Object(Object::new("Circle"))), Ok(true));
    assert!(shapes.push(Value::Object(Object::new("Colour"))).is_err());
    assert!(shapes.push(Value::Object(Object::anonymous())).is_err());
    assert_eq!(shapes.len(), 1);
}

#[test]
fn test_custom_filter() {
    let even = PredicateFilter(|value: &i32| value % 2 == 0);
    let mut seq = RestrictedSequence::<i32, Vec<i32>, _>::with_filter(&even, lenient());

    assert_eq!(seq.push_each([1, 2, 3, 4]), Ok(2));
    assert_eq!(seq.iter().copied().collect::<Vec<_>>(), [2, 4]);
}

#[test]
fn test_linked_backing() {
    let mut seq: RestrictedSequence<Value, LinkedList<Value>> =
        RestrictedSequence::with_filter(ints_only(), lenient());

    seq.push_many([Value::Int(1), Value::Int(3)]).expect("lenient");
    assert_eq!(seq.insert(1, Value::Int(2)), Ok(true));
    assert_eq!(seq.remove(0), Ok(Some(Value::Int(1))));
    assert_eq!(seq.as_inner().to_string(), "(Int(2)) -> (Int(3))");
}

#[test]
fn test_stack_and_queue() {
    let mut stack: RestrictedStack<Value> = RestrictedStack::with_filter(ints_only(), lenient());
    assert_eq!(stack.push_many([Value::Int(1), Value::Int(2)]), Ok(true));
    assert_eq!(stack.push(Value::Null), Ok(false));
    assert_eq!(stack.peek(), Some(&Value::Int(2)));
    assert_eq!(stack.pop(), Some(Value::Int(2)));
    assert_eq!(stack.len(), 1);

    let mut queue: RestrictedQueue<Value> = RestrictedQueue::with_filter(ints_only(), strict());
    queue.enqueue_many([Value::Int(1), Value::Int(2)]).expect("ints are allowed");
    assert!(queue.enqueue(Value::from("3")).is_err());
    assert_eq!(queue.peek(), Some(&Value::Int(1)));
    assert_eq!(queue.dequeue(), Some(Value::Int(1)));
    assert_eq!(queue.dequeue(), Some(Value::Int(2)));
    assert_eq!(queue.dequeue(), None);
    assert!(queue.is_empty());
}

#[test]
fn test_labelled_set() {
    let mut set: RestrictedSet<Value> =
        RestrictedSet::with_filter(ints_only(), lenient().prefix("item-"));

    assert_eq!(set.add(Value::Int(5)), Ok(Some("item-0".to_owned())));
    assert_eq!(set.add(Value::Int(5)), Ok(None), "Sets should skip duplicates.");
    assert_eq!(set.add(Value::from("x")), Ok(None));
    assert_eq!(set.add(Value::Int(6)), Ok(Some("item-1".to_owned())));

    assert_eq!(set.label_of(&Value::Int(6)), Some("item-1"));
    assert_eq!(set.remove("item-0"), Ok(Some(Value::Int(5))));
    assert_eq!(set.remove("item-0"), Ok(None));
    assert_eq!(set.add(Value::Int(5)), Ok(Some("item-2".to_owned())), "Labels shouldn't be reused.");
    assert_eq!(set.iter().map(|(label, _)| label).collect::<Vec<_>>(), ["item-1", "item-2"]);

    let mut strict_set: RestrictedSet<u32> = RestrictedSet::new(strict());
    strict_set.add(1).expect("permissive by default");
    assert_eq!(strict_set.add(1), Err(InvalidArgument::duplicate(TypeTag::Int)));
    assert!(strict_set.remove("missing").is_err_and(|e| e.is_missing_key()));

    let mut counter = 100;
    let ids = move || {
        counter += 1;
        format!("#{counter}")
    };
    let mut custom = RestrictedSet::with_id_source(ints_only(), lenient(), ids);
    assert_eq!(custom.add(Value::Int(1)), Ok(Some("#101".to_owned())));
    assert_eq!(custom.ids.next_id(), "#102");
}

#[test]
fn test_queue_drains_large_batch() {
    let mut queue: RestrictedQueue<Value> = RestrictedQueue::with_filter(ints_only(), strict());
    queue.enqueue_many((0..20_000).map(Value::Int)).expect("ints are allowed");

    let mut expected = 0;
    while let Some(value) = queue.dequeue() {
        assert_eq!(value, Value::Int(expected), "Values should leave in arrival order.");
        expected += 1;
    }
    assert_eq!(expected, 20_000);
}

#[test]
fn test_copying_self_containing_object() {
    let node = Object::new("Node").with("name", "root");
    node.set("me", Value::Object(node.clone()));

    let mut seq: RestrictedSequence<Value> = RestrictedSequence::new(lenient().reference(false));
    assert_eq!(seq.push(Value::Object(node.clone())), Ok(true));

    let copy = seq[0].as_object().expect("an object was pushed").clone();
    assert!(!copy.same(&node), "The stored object should be a copy.");
    let me = copy.get("me").and_then(|me| me.as_object().cloned());
    assert!(
        me.is_some_and(|me| me.same(&copy)),
        "The copy should refer to itself, not to the original."
    );
    assert!(format!("{copy:?}").contains("Node"));

    let mut set: RestrictedSet<Value> = RestrictedSet::new(lenient().reference(false));
    assert!(set.add(Value::Object(node)).is_ok_and(|label| label.is_some()));
}
