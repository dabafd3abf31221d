use std::fmt::{self, Debug, Display, Formatter};
use std::ops::{Index, IndexMut};

use derive_more::IsVariant;
use tracing::debug;

use super::{Handles, Iter, IterMut, Link, ListId, Node, NodeHandle, NodeState, Slot, Walk};
#[doc(inline)]
pub use crate::util::error::IndexOutOfBounds;
use crate::util::result::ResultExtension;

/// A doubly linked list whose nodes are addressed by [`NodeHandle`]s.
///
/// Nodes are allocated by the list, either detached with [`create_node`](LinkedList::create_node)
/// or already linked by [`push_front`](LinkedList::push_front) and
/// [`push_back`](LinkedList::push_back). Detached nodes can then be spliced in anywhere with
/// [`insert_before`](LinkedList::insert_before) and [`insert_after`](LinkedList::insert_after), and
/// taken out again with [`remove_element`](LinkedList::remove_element), which leaves the node
/// detached and still owned by the list until it is [`release`](LinkedList::release)d.
///
/// The list only tracks its first node, the sentinel. Everything else is found by walking forward
/// from it, including membership: inserting a node that is already in the list is refused rather
/// than creating a cycle.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of nodes in the LinkedList.
/// - `a`: The number of nodes allocated by the LinkedList, linked or detached.
/// - `i`: The index of the item in question.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(n)` |
/// | `get/get_mut/next/previous` | `O(1)` |
/// | `create_node` | `O(1)`* |
/// | `release` | `O(n)`** |
/// | `insert_before/after` | `O(n)` |
/// | `remove_element` | `O(n)` |
/// | `push_front` | `O(1)`* |
/// | `pop_front` | `O(1)`** |
/// | `push_back/pop_back` | `O(n)` |
/// | `nth` | `O(i)` |
/// | `contains` | `O(n)` |
///
/// \* Amortized, allocation of the arena may take `O(a)`.
///
/// \*\* Once [`set_next`](LinkedList::set_next) or [`set_previous`](LinkedList::set_previous)
/// has been used, freeing a node scans the arena for links to it, taking `O(a)` until the list
/// is cleared.
///
/// The `O(n)` inserts and removals come from the membership check, which needs no per-node
/// bookkeeping beyond the two links.
pub struct LinkedList<T> {
    pub(crate) id: ListId,
    pub(crate) slots: Vec<Slot<T>>,
    pub(crate) free: Vec<usize>,
    pub(crate) state: ListState,
    /// Set when a link was written by hand, after which freed slots may still be linked to.
    pub(crate) hand_linked: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, IsVariant)]
pub(crate) enum ListState {
    #[default]
    Empty,
    Full {
        sentinel: usize,
    },
}

use ListState::*;

impl<T> LinkedList<T> {
    /// Creates a new LinkedList with no elements.
    pub fn new() -> LinkedList<T> {
        LinkedList {
            id: ListId::next(),
            slots: Vec::new(),
            free: Vec::new(),
            state: Empty,
            hand_linked: false,
        }
    }

    /// Returns the length of the LinkedList, counted by walking it.
    pub fn len(&self) -> usize {
        self.walk().count()
    }

    /// Returns true if the LinkedList contains no elements.
    pub const fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Allocates a detached node holding `value`. The node isn't part of the list until it is
    /// inserted.
    pub fn create_node(&mut self, value: T) -> NodeHandle {
        let index = self.alloc(value);
        self.handle_at(index)
    }

    /// Frees a detached node, returning its value. Returns [`None`] if the node is still linked,
    /// or the handle doesn't belong to a live node of this list.
    ///
    /// Links that other detached nodes hold to the released node are cleared.
    pub fn release(&mut self, node: NodeHandle) -> Option<T> {
        let index = self.detached_index(node)?;
        Some(self.release_index(index))
    }

    /// Returns the state of the node, or [`None`] for handles that don't resolve in this list.
    pub fn state_of(&self, node: NodeHandle) -> Option<NodeState> {
        let index = self.resolve(node)?;
        Some(if self.contains_index(index) {
            NodeState::Linked
        } else {
            NodeState::Detached
        })
    }

    /// Returns true if `node` is reachable by walking forward from the sentinel.
    pub fn is_element_in_list(&self, node: NodeHandle) -> bool {
        self.linked_index(node).is_some()
    }

    /// Returns a reference to the value held by `node`, linked or not.
    pub fn get(&self, node: NodeHandle) -> Option<&T> {
        let index = self.resolve(node)?;
        Some(&self.node(index).value)
    }

    /// Returns a mutable reference to the value held by `node`. Changes are seen by the list
    /// immediately, since the list holds the only copy.
    pub fn get_mut(&mut self, node: NodeHandle) -> Option<&mut T> {
        let index = self.resolve(node)?;
        Some(&mut self.node_mut(index).value)
    }

    /// Returns the node following `node`, if any.
    pub fn next(&self, node: NodeHandle) -> Option<NodeHandle> {
        let index = self.resolve(node)?;
        self.node(index).next.map(|next| self.handle_at(next))
    }

    /// Returns the node preceding `node`, if any.
    pub fn previous(&self, node: NodeHandle) -> Option<NodeHandle> {
        let index = self.resolve(node)?;
        self.node(index).prev.map(|prev| self.handle_at(prev))
    }

    /// Returns the node currently at position 0.
    pub fn sentinel(&self) -> Option<NodeHandle> {
        match self.state {
            Empty => None,
            Full { sentinel } => Some(self.handle_at(sentinel)),
        }
    }

    /// Returns the node at the logical end of the list.
    pub fn last(&self) -> Option<NodeHandle> {
        self.last_index().map(|index| self.handle_at(index))
    }

    /// Links the detached `node` in front of `anchor`, or at position 0 if `anchor` is [`None`].
    ///
    /// Returns false without changing anything if `node` is already in the list, or if `anchor`
    /// isn't.
    pub fn insert_before(&mut self, node: NodeHandle, anchor: Option<NodeHandle>) -> bool {
        let Some((index, anchor)) = self.splice_targets(node, anchor) else {
            debug!(%node, ?anchor, "refused to insert node");
            return false;
        };
        self.attach_before(index, anchor);
        true
    }

    /// Links the detached `node` after `anchor`, or at the logical end if `anchor` is [`None`].
    ///
    /// Returns false without changing anything if `node` is already in the list, or if `anchor`
    /// isn't.
    pub fn insert_after(&mut self, node: NodeHandle, anchor: Option<NodeHandle>) -> bool {
        let Some((index, anchor)) = self.splice_targets(node, anchor) else {
            debug!(%node, ?anchor, "refused to insert node");
            return false;
        };
        self.attach_after(index, anchor);
        true
    }

    /// Unlinks `node`, joining its neighbours together and leaving it detached with both links
    /// cleared. Returns false if `node` isn't in the list.
    pub fn remove_element(&mut self, node: NodeHandle) -> bool {
        match self.linked_index(node) {
            Some(index) => {
                self.detach(index);
                true
            },
            None => {
                debug!(%node, "refused to remove node that isn't in the list");
                false
            },
        }
    }

    /// Overwrites the next link of `node`, without touching any other node.
    ///
    /// This is an escape hatch: the caller is responsible for keeping the links of both
    /// directions consistent. Returns false if either handle doesn't resolve.
    pub fn set_next(&mut self, node: NodeHandle, next: Option<NodeHandle>) -> bool {
        let Some((index, link)) = self.resolve_pair(node, next) else { return false; };
        self.hand_linked |= link.is_some();
        self.node_mut(index).next = link;
        true
    }

    /// Overwrites the previous link of `node`. See [`set_next`](LinkedList::set_next).
    pub fn set_previous(&mut self, node: NodeHandle, previous: Option<NodeHandle>) -> bool {
        let Some((index, link)) = self.resolve_pair(node, previous) else { return false; };
        self.hand_linked |= link.is_some();
        self.node_mut(index).prev = link;
        true
    }

    /// Returns the position of `node` in the list, if it is linked.
    pub fn position(&self, node: NodeHandle) -> Option<usize> {
        let index = self.resolve(node)?;
        self.walk().position(|found| found == index)
    }

    /// Returns the handle of the node at `index`.
    pub fn nth_handle(&self, index: usize) -> Option<NodeHandle> {
        self.walk().nth(index).map(|found| self.handle_at(found))
    }

    /// Returns a reference to the element at `index`.
    pub fn nth(&self, index: usize) -> Option<&T> {
        let found = self.walk().nth(index)?;
        Some(&self.node(found).value)
    }

    /// Returns a mutable reference to the element at `index`.
    pub fn nth_mut(&mut self, index: usize) -> Option<&mut T> {
        let found = self.walk().nth(index)?;
        Some(&mut self.node_mut(found).value)
    }

    /// Returns a reference to the first element in the list, if it exists.
    pub fn front(&self) -> Option<&T> {
        match self.state {
            Empty => None,
            Full { sentinel } => Some(&self.node(sentinel).value),
        }
    }

    /// Returns a reference to the last element in the list, if it exists.
    pub fn back(&self) -> Option<&T> {
        let last = self.last_index()?;
        Some(&self.node(last).value)
    }

    /// Add the provided element to the front of the LinkedList.
    pub fn push_front(&mut self, value: T) -> NodeHandle {
        let index = self.alloc(value);
        self.attach_before(index, None);
        self.handle_at(index)
    }

    /// Add the provided element to the back of the LinkedList.
    pub fn push_back(&mut self, value: T) -> NodeHandle {
        let index = self.alloc(value);
        self.attach_after(index, None);
        self.handle_at(index)
    }

    /// Removes the first element from the list and returns it, if the list isn't empty.
    pub fn pop_front(&mut self) -> Option<T> {
        match self.state {
            Empty => None,
            Full { sentinel } => {
                self.detach(sentinel);
                Some(self.release_index(sentinel))
            },
        }
    }

    /// Removes the last element from the list and returns it, if the list isn't empty.
    pub fn pop_back(&mut self) -> Option<T> {
        let last = self.last_index()?;
        self.detach(last);
        Some(self.release_index(last))
    }

    /// Inserts `value` so that it ends up at `index`, where `index == len` appends.
    pub fn insert_at(&mut self, index: usize, value: T) -> Result<NodeHandle, IndexOutOfBounds> {
        let anchor = self.walk().nth(index);
        if anchor.is_none() {
            IndexOutOfBounds::check_insert(index, self.len())?;
        }

        let new = self.alloc(value);
        match anchor {
            Some(anchor) => self.attach_before(new, Some(anchor)),
            None => self.attach_after(new, None),
        }
        Ok(self.handle_at(new))
    }

    /// Removes and returns the element at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<T, IndexOutOfBounds> {
        let Some(found) = self.walk().nth(index) else {
            return Err(IndexOutOfBounds { index, len: self.len() });
        };
        self.detach(found);
        Ok(self.release_index(found))
    }

    /// Drops every node allocated by the list, linked or detached. Outstanding handles stop
    /// resolving.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index);
            }
        }
        self.state = Empty;
        self.hand_linked = false;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.into_iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.into_iter()
    }

    /// Returns an iterator over the handles of all linked nodes, in order.
    pub fn handles(&self) -> Handles<'_, T> {
        Handles {
            walk: self.walk(),
            list: self.id,
        }
    }
}

impl<T: PartialEq> LinkedList<T> {
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.iter().position(|element| element == item)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.iter().any(|element| element == item)
    }
}

impl<T> LinkedList<T> {
    /// Walks forward from the sentinel. The walk takes at most one step per allocated node, so it
    /// terminates even if [`set_next`](LinkedList::set_next) was used to create a cycle.
    pub(crate) fn walk(&self) -> Walk<'_, T> {
        Walk {
            slots: &self.slots,
            next: match self.state {
                Empty => None,
                Full { sentinel } => Some(sentinel),
            },
            remaining: self.slots.len(),
        }
    }

    pub(crate) fn resolve(&self, handle: NodeHandle) -> Option<usize> {
        if handle.list != self.id {
            return None;
        }
        let slot = self.slots.get(handle.index)?;
        (slot.generation == handle.generation && slot.node.is_some()).then_some(handle.index)
    }

    pub(crate) fn handle_at(&self, index: usize) -> NodeHandle {
        NodeHandle {
            list: self.id,
            index,
            generation: self.slots[index].generation,
        }
    }

    // Links only ever point at occupied slots: splicing never links to a detached node, and
    // release clears hand-written links to the slot it frees.
    pub(crate) fn node(&self, index: usize) -> &Node<T> {
        match &self.slots[index].node {
            Some(node) => node,
            None => unreachable!("link to vacant slot {index}"),
        }
    }

    pub(crate) fn node_mut(&mut self, index: usize) -> &mut Node<T> {
        match &mut self.slots[index].node {
            Some(node) => node,
            None => unreachable!("link to vacant slot {index}"),
        }
    }

    fn contains_index(&self, index: usize) -> bool {
        self.walk().any(|found| found == index)
    }

    fn detached_index(&self, handle: NodeHandle) -> Option<usize> {
        let index = self.resolve(handle)?;
        (!self.contains_index(index)).then_some(index)
    }

    fn linked_index(&self, handle: NodeHandle) -> Option<usize> {
        let index = self.resolve(handle)?;
        self.contains_index(index).then_some(index)
    }

    fn last_index(&self) -> Option<usize> {
        self.walk().last()
    }

    fn resolve_pair(&self, node: NodeHandle, target: Option<NodeHandle>) -> Option<(usize, Link)> {
        let index = self.resolve(node)?;
        match target {
            Some(target) => Some((index, Some(self.resolve(target)?))),
            None => Some((index, None)),
        }
    }

    /// Resolves the node being inserted, which must be detached, and the anchor, which must be
    /// linked.
    fn splice_targets(&self, node: NodeHandle, anchor: Option<NodeHandle>) -> Option<(usize, Link)> {
        let index = self.detached_index(node)?;
        match anchor {
            Some(anchor) => Some((index, Some(self.linked_index(anchor)?))),
            None => Some((index, None)),
        }
    }

    fn alloc(&mut self, value: T) -> usize {
        match self.free.pop() {
            Some(index) => {
                self.slots[index].node = Some(Node::detached(value));
                index
            },
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(Node::detached(value)),
                });
                self.slots.len() - 1
            },
        }
    }

    /// Frees the slot of a detached node. Splicing never leaves a link to a detached node, so
    /// only hand-written links need clearing.
    fn release_index(&mut self, index: usize) -> T {
        if self.hand_linked {
            for node in self.slots.iter_mut().filter_map(|slot| slot.node.as_mut()) {
                if node.next == Some(index) {
                    node.next = None;
                }
                if node.prev == Some(index) {
                    node.prev = None;
                }
            }
        }

        let slot = &mut self.slots[index];
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        match slot.node.take() {
            Some(node) => node.value,
            None => unreachable!("released vacant slot {index}"),
        }
    }

    fn attach_before(&mut self, new: usize, anchor: Link) {
        let anchor = match (anchor, self.state) {
            (Some(anchor), _) => anchor,
            (None, Full { sentinel }) => sentinel,
            (None, Empty) => return self.attach_only(new),
        };

        let prev = self.node(anchor).prev;
        {
            let node = self.node_mut(new);
            node.prev = prev;
            node.next = Some(anchor);
        }
        match prev {
            Some(prev) => self.node_mut(prev).next = Some(new),
            None => self.state = Full { sentinel: new },
        }
        self.node_mut(anchor).prev = Some(new);
    }

    fn attach_after(&mut self, new: usize, anchor: Link) {
        let Some(anchor) = anchor.or_else(|| self.last_index()) else {
            return self.attach_only(new);
        };

        let next = self.node(anchor).next;
        {
            let node = self.node_mut(new);
            node.prev = Some(anchor);
            node.next = next;
        }
        if let Some(next) = next {
            self.node_mut(next).prev = Some(new);
        }
        self.node_mut(anchor).next = Some(new);
    }

    fn attach_only(&mut self, new: usize) {
        let node = self.node_mut(new);
        node.prev = None;
        node.next = None;
        self.state = Full { sentinel: new };
    }

    fn detach(&mut self, index: usize) {
        let (prev, next) = {
            let node = self.node(index);
            (node.prev, node.next)
        };

        if self.state == (Full { sentinel: index }) {
            match next {
                Some(next) => {
                    self.node_mut(next).prev = None;
                    self.state = Full { sentinel: next };
                },
                None => self.state = Empty,
            }
        } else {
            if let Some(prev) = prev {
                self.node_mut(prev).next = next;
            }
            if let Some(next) = next {
                self.node_mut(next).prev = prev;
            }
        }

        let node = self.node_mut(index);
        node.prev = None;
        node.next = None;
    }

    #[cfg(test)]
    pub(crate) fn verify_double_links(&self) {
        let mut prev = None;
        for index in self.walk() {
            assert!(
                self.node(index).prev == prev,
                "node {index} should link back to {prev:?}"
            );
            prev = Some(index);
        }
    }
}

impl<T> Index<usize> for LinkedList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.nth(index)
            .ok_or_else(|| IndexOutOfBounds { index, len: self.len() })
            .throw()
    }
}

impl<T> IndexMut<usize> for LinkedList<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        let len = self.len();
        self.nth_mut(index)
            .ok_or(IndexOutOfBounds { index, len })
            .throw()
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = LinkedList::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for LinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let mut last = self.last_index();
        for value in iter {
            let index = self.alloc(value);
            self.attach_after(index, last);
            last = Some(index);
        }
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for LinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for LinkedList<T> {}

impl<T: Debug> Debug for LinkedList<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedList")
            .field("contents", &self.iter().collect::<Vec<_>>())
            .field("len", &self.len())
            .finish()
    }
}

impl<T: Debug> Display for LinkedList<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({})",
            self.iter()
                .map(|i| format!("{i:?}"))
                .collect::<Vec<String>>()
                .join(") -> (")
        )
    }
}
