use std::iter::FusedIterator;
use std::vec;

use super::{LinkedList, Link, ListId, NodeHandle, Slot};

/// Slot indices of the linked nodes, in list order.
pub(crate) struct Walk<'a, T> {
    pub(crate) slots: &'a [Slot<T>],
    pub(crate) next: Link,
    // Upper bound on steps, so a hand-made cycle can't make the walk run forever.
    pub(crate) remaining: usize,
}

impl<'a, T> Iterator for Walk<'a, T> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.next?;
        self.remaining -= 1;
        self.next = self.slots[index].node.as_ref().and_then(|node| node.next);
        Some(index)
    }
}

impl<'a, T> FusedIterator for Walk<'a, T> {}

impl<T> IntoIterator for LinkedList<T> {
    type Item = T;

    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            list: self,
        }
    }
}

pub struct IntoIter<T> {
    // Popping from the front keeps the arena consistent without any extra bookkeeping here.
    pub(crate) list: LinkedList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.list.pop_back()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<'a, T> IntoIterator for &'a LinkedList<T> {
    type Item = &'a T;

    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            walk: self.walk(),
        }
    }
}

pub struct Iter<'a, T> {
    pub(crate) walk: Walk<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let slots = self.walk.slots;
        let index = self.walk.next()?;
        slots[index].node.as_ref().map(|node| &node.value)
    }
}

impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<'a, T> IntoIterator for &'a mut LinkedList<T> {
    type Item = &'a mut T;

    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        let order: Vec<usize> = self.walk().collect();
        let mut values: Vec<Option<&'a mut T>> = self.slots.iter_mut()
            .map(|slot| slot.node.as_mut().map(|node| &mut node.value))
            .collect();

        IterMut {
            inner: order.into_iter()
                .filter_map(|index| values[index].take())
                .collect::<Vec<_>>()
                .into_iter(),
        }
    }
}

pub struct IterMut<'a, T> {
    // The walk order is resolved up front, because the arena can't be borrowed mutably once per
    // node while walking it.
    pub(crate) inner: vec::IntoIter<&'a mut T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

impl<'a, T> FusedIterator for IterMut<'a, T> {}

pub struct Handles<'a, T> {
    pub(crate) walk: Walk<'a, T>,
    pub(crate) list: ListId,
}

impl<'a, T> Iterator for Handles<'a, T> {
    type Item = NodeHandle;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.walk.next()?;
        Some(NodeHandle {
            list: self.list,
            index,
            generation: self.walk.slots[index].generation,
        })
    }
}

impl<'a, T> FusedIterator for Handles<'a, T> {}
