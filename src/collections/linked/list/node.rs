use std::sync::atomic::{AtomicU64, Ordering};

use derive_more::{Display, IsVariant};

pub(crate) type Link = Option<usize>;

// NOTE: Nodes live in an arena owned by the list and link to each other by slot index. A handle
// pairs the index with the slot's generation, so a handle to a released node never resolves to
// whatever reuses its slot.

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[display("list#{_0}")]
pub(crate) struct ListId(u64);

impl ListId {
    pub fn next() -> ListId {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        ListId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identifies a node within the [`LinkedList`](super::LinkedList) that created it.
///
/// Handles compare by identity: two nodes holding equal values still have different handles.
/// Handles are only meaningful to the list that created them, any other list treats them as
/// foreign and refuses them.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[display("{list}:{index}@{generation}")]
pub struct NodeHandle {
    pub(crate) list: ListId,
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

/// Whether a node is currently part of its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum NodeState {
    /// Not reachable from the list's sentinel. Both links are `None`, unless set by hand through
    /// [`LinkedList::set_next`](super::LinkedList::set_next) or
    /// [`set_previous`](super::LinkedList::set_previous).
    Detached,
    /// Reachable from the list's sentinel.
    Linked,
}

pub(crate) struct Node<T> {
    pub value: T,
    pub prev: Link,
    pub next: Link,
}

impl<T> Node<T> {
    pub const fn detached(value: T) -> Node<T> {
        Node {
            value,
            prev: None,
            next: None,
        }
    }
}

pub(crate) struct Slot<T> {
    pub generation: u32,
    pub node: Option<Node<T>>,
}
