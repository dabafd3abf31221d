#![cfg(test)]

use proptest::prelude::*;

use super::*;
use crate::util::panic::assert_panics;

fn collect<T: Clone>(list: &LinkedList<T>) -> Vec<T> {
    list.iter().cloned().collect()
}

fn three_linked() -> (LinkedList<&'static str>, [NodeHandle; 3]) {
    let mut list = LinkedList::new();
    let n1 = list.create_node("first");
    let n2 = list.create_node("second");
    let n3 = list.create_node("third");

    assert!(list.insert_after(n1, None));
    assert!(list.insert_after(n2, Some(n1)));
    assert!(list.insert_after(n3, Some(n2)));
    (list, [n1, n2, n3])
}

#[test]
fn test_build_by_insert_after() {
    let (list, [n1, _, n3]) = three_linked();
    assert_eq!(collect(&list), ["first", "second", "third"]);
    assert_eq!(list.sentinel(), Some(n1));
    assert_eq!(list.last(), Some(n3));
    assert_eq!(list.previous(n1), None, "The sentinel should have no previous node.");
    list.verify_double_links();
}

#[test]
fn test_remove_relinks_neighbours() {
    let (mut list, [n1, n2, n3]) = three_linked();

    assert!(list.remove_element(n2));
    assert_eq!(collect(&list), ["first", "third"]);
    assert_eq!(list.next(n1), Some(n3));
    assert_eq!(list.previous(n3), Some(n1));
    assert_eq!(list.next(n2), None, "A removed node shouldn't keep its next link.");
    assert_eq!(list.previous(n2), None, "A removed node shouldn't keep its previous link.");
    assert_eq!(list.state_of(n2), Some(NodeState::Detached));
    assert_eq!(list.get(n2), Some(&"second"), "A removed node should keep its value.");

    assert!(!list.remove_element(n2), "Removing a detached node should be refused.");
    list.verify_double_links();
}

#[test]
fn test_remove_sentinel_and_tail() {
    let (mut list, [n1, n2, n3]) = three_linked();

    assert!(list.remove_element(n1));
    assert_eq!(list.sentinel(), Some(n2), "The next node should become the sentinel.");
    assert_eq!(list.previous(n2), None);

    assert!(list.remove_element(n3));
    assert_eq!(list.next(n2), None);
    assert_eq!(collect(&list), ["second"]);

    assert!(list.remove_element(n2));
    assert!(list.is_empty());
    assert_eq!(list.sentinel(), None);
}

#[test]
fn test_insert_before() {
    let mut list = LinkedList::new();
    let b = list.push_back('b');
    let a = list.create_node('a');
    let c = list.create_node('c');
    let front = list.create_node('_');

    assert!(list.insert_before(a, Some(b)));
    assert_eq!(list.sentinel(), Some(a), "Inserting before the sentinel should replace it.");
    assert!(list.insert_after(c, None), "A None anchor should append.");
    assert!(list.insert_before(front, None), "A None anchor should prepend.");

    assert_eq!(collect(&list), ['_', 'a', 'b', 'c']);
    assert_eq!(list.position(c), Some(3));
    list.verify_double_links();
}

#[test]
fn test_duplicate_insert_rejected() {
    let (mut list, [n1, n2, n3]) = three_linked();

    assert!(!list.insert_after(n1, Some(n3)), "A linked node shouldn't be inserted again.");
    assert!(!list.insert_before(n3, None));
    assert!(!list.insert_before(n2, Some(n2)));
    assert_eq!(collect(&list), ["first", "second", "third"]);
    assert_eq!(list.len(), 3);

    let loose = list.create_node("loose");
    let orphan = list.create_node("orphan");
    assert!(
        !list.insert_after(orphan, Some(loose)),
        "Anchors that aren't linked should be refused."
    );
    assert_eq!(list.len(), 3);
}

#[test]
fn test_foreign_and_stale_handles() {
    let (mut list, [n1, ..]) = three_linked();
    let mut other = LinkedList::new();
    let foreign = other.push_back("foreign");

    assert!(!list.insert_after(foreign, Some(n1)), "Handles of other lists should be refused.");
    assert!(!list.remove_element(foreign));
    assert_eq!(list.get(foreign), None);
    assert_eq!(other.get(foreign), Some(&"foreign"));

    let temp = list.create_node("temp");
    assert_eq!(list.release(temp), Some("temp"));
    assert_eq!(list.get(temp), None, "Released handles shouldn't resolve.");

    let reused = list.create_node("reused");
    assert_eq!(list.get(temp), None, "Slot reuse shouldn't revive stale handles.");
    assert_eq!(list.get(reused), Some(&"reused"));

    assert_eq!(list.release(n1), None, "Linked nodes can't be released.");
}

#[test]
fn test_mutation_through_handle() {
    let mut list: LinkedList<String> = ["a", "b"].into_iter().map(String::from).collect();
    let second = list.nth_handle(1).expect("list has two nodes");

    if let Some(value) = list.get_mut(second) {
        value.push_str("-edited");
    }
    assert_eq!(collect(&list), ["a", "b-edited"]);

    for value in list.iter_mut() {
        value.make_ascii_uppercase();
    }
    assert_eq!(list.to_string(), "(\"A\") -> (\"B-EDITED\")");
}

#[test]
fn test_cycle_safe_traversal() {
    let (mut list, [n1, _, n3]) = three_linked();

    assert!(list.set_next(n3, Some(n1)), "The escape hatch shouldn't guard invariants.");
    assert!(list.len() <= 3, "Walking a cycle should still terminate.");
    assert!(list.is_element_in_list(n3));

    assert!(list.set_next(n3, None));
    assert_eq!(list.len(), 3);
    list.verify_double_links();
}

#[test]
fn test_push_pop() {
    let mut list = LinkedList::new();
    list.push_back(2);
    list.push_front(1);
    list.push_back(3);
    assert_eq!(list.front(), Some(&1));
    assert_eq!(list.back(), Some(&3));
    assert!(list.contains(&2));
    assert_eq!(list.index_of(&3), Some(2));

    assert_eq!(list.pop_back(), Some(3));
    assert_eq!(list.pop_front(), Some(1));
    assert_eq!(list.pop_front(), Some(2));
    assert_eq!(list.pop_front(), None);
    assert!(list.is_empty());
}

#[test]
fn test_index_operations() {
    let mut list: LinkedList<usize> = (0..3).collect();

    assert_eq!(list.insert_at(3, 3).map(|h| list.position(h)), Ok(Some(3)));
    assert!(list.insert_at(1, 10).is_ok());
    assert_eq!(list.insert_at(9, 9).err(), Some(IndexOutOfBounds { index: 9, len: 5 }));
    assert_eq!(collect(&list), [0, 10, 1, 2, 3]);

    assert_eq!(list.remove_at(1), Ok(10));
    assert_eq!(list.remove_at(7), Err(IndexOutOfBounds { index: 7, len: 4 }));

    list[0] = 100;
    assert_eq!(list[0], 100);
    assert_panics!({
        let list: LinkedList<u8> = LinkedList::new();
        list[0]
    });

    assert_eq!(list.into_iter().rev().collect::<Vec<_>>(), [3, 2, 1, 100]);
}

#[test]
fn test_clear_invalidates_handles() {
    let (mut list, [n1, ..]) = three_linked();
    let loose = list.create_node("loose");

    list.clear();
    assert!(list.is_empty());
    assert_eq!(list.get(n1), None);
    assert_eq!(list.get(loose), None, "Clearing should drop detached nodes too.");

    list.extend(["again"]);
    assert_eq!(collect(&list), ["again"]);
}

#[test]
fn test_release_clears_hand_links() {
    let mut list = LinkedList::new();
    let a = list.create_node(1);
    let b = list.create_node(2);

    assert!(list.set_next(a, Some(b)));
    assert!(list.set_previous(b, Some(a)));
    assert_eq!(list.release(b), Some(2));
    assert_eq!(list.next(a), None, "Links to a released node should be cleared.");

    let c = list.create_node(3);
    assert_eq!(list.next(a), None, "A reused slot shouldn't be reachable through old links.");
    assert_eq!(list.get(c), Some(&3));

    let x = list.push_back(10);
    assert!(list.set_previous(a, Some(x)));
    assert_eq!(list.pop_back(), Some(10));
    assert_eq!(list.previous(a), None, "Popping should clear hand-written links to the node.");
}

#[test]
fn test_pop_front_drains_in_order() {
    let mut list: LinkedList<u32> = (0..50_000).collect();

    let mut expected = 0;
    while let Some(value) = list.pop_front() {
        assert_eq!(value, expected);
        expected += 1;
    }
    assert_eq!(expected, 50_000);
    assert!(!list.hand_linked, "Plain splicing shouldn't need link scans.");
    assert_eq!(list.free.len(), list.slots.len(), "Every slot should be free again.");
}

#[derive(Debug, Clone)]
enum Op {
    Before(usize, Option<usize>),
    After(usize, Option<usize>),
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..8_usize, proptest::option::of(0..8_usize)).prop_map(|(n, a)| Op::Before(n, a)),
        (0..8_usize, proptest::option::of(0..8_usize)).prop_map(|(n, a)| Op::After(n, a)),
        (0..8_usize).prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn prop_splicing_keeps_list_acyclic(ops in prop::collection::vec(op(), 0..64)) {
        let mut list = LinkedList::new();
        let nodes: Vec<NodeHandle> = (0..8).map(|i| list.create_node(i)).collect();

        for op in ops {
            let before = collect(&list);
            match op {
                Op::Before(n, anchor) | Op::After(n, anchor) => {
                    let linked = list.is_element_in_list(nodes[n]);
                    let anchor = anchor.map(|a| nodes[a]);
                    let inserted = match op {
                        Op::Before(..) => list.insert_before(nodes[n], anchor),
                        _ => list.insert_after(nodes[n], anchor),
                    };
                    if linked {
                        prop_assert!(!inserted);
                        prop_assert_eq!(collect(&list), before);
                    }
                },
                Op::Remove(n) => {
                    list.remove_element(nodes[n]);
                    prop_assert_eq!(list.next(nodes[n]), None);
                    prop_assert_eq!(list.previous(nodes[n]), None);
                },
            }

            let mut seen = collect(&list);
            let len = seen.len();
            seen.sort();
            seen.dedup();
            prop_assert_eq!(seen.len(), len, "every node should be visited exactly once");
            list.verify_double_links();
        }
    }
}
