use std::slice;

#[cfg(feature = "linked")]
use crate::collections::linked::LinkedList;
#[cfg(feature = "linked")]
use crate::collections::linked::list::Iter as ListIter;
use crate::util::error::IndexOutOfBounds;

/// An ordered, index-addressable collection that can back a
/// [`RestrictedSequence`](crate::collections::restricted::RestrictedSequence).
pub trait Sequence<T>: Default + Extend<T> {
    type Iter<'a>: Iterator<Item = &'a T> where Self: 'a, T: 'a;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<&T>;

    fn get_mut(&mut self, index: usize) -> Option<&mut T>;

    fn push_back(&mut self, value: T);

    fn pop_back(&mut self) -> Option<T>;

    fn pop_front(&mut self) -> Option<T>;

    /// Inserts `value` at `index`, where `index == len` appends.
    fn insert(&mut self, index: usize, value: T) -> Result<(), IndexOutOfBounds>;

    fn remove(&mut self, index: usize) -> Result<T, IndexOutOfBounds>;

    fn clear(&mut self);

    /// Returns an iterator over all elements, in order.
    fn iter<'a>(&'a self) -> Self::Iter<'a>;
}

impl<T> Sequence<T> for Vec<T> {
    type Iter<'a> = slice::Iter<'a, T> where T: 'a;

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    fn push_back(&mut self, value: T) {
        Vec::push(self, value);
    }

    fn pop_back(&mut self) -> Option<T> {
        Vec::pop(self)
    }

    fn pop_front(&mut self) -> Option<T> {
        if self.as_slice().is_empty() {
            None
        } else {
            Some(Vec::remove(self, 0))
        }
    }

    fn insert(&mut self, index: usize, value: T) -> Result<(), IndexOutOfBounds> {
        IndexOutOfBounds::check_insert(index, self.as_slice().len())?;
        Vec::insert(self, index, value);
        Ok(())
    }

    fn remove(&mut self, index: usize) -> Result<T, IndexOutOfBounds> {
        IndexOutOfBounds::check(index, self.as_slice().len())?;
        Ok(Vec::remove(self, index))
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn iter<'a>(&'a self) -> Self::Iter<'a> {
        self.as_slice().iter()
    }
}

#[cfg(feature = "linked")]
impl<T> Sequence<T> for LinkedList<T> {
    type Iter<'a> = ListIter<'a, T> where T: 'a;

    fn len(&self) -> usize {
        LinkedList::len(self)
    }

    fn is_empty(&self) -> bool {
        LinkedList::is_empty(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.nth(index)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.nth_mut(index)
    }

    fn push_back(&mut self, value: T) {
        LinkedList::push_back(self, value);
    }

    fn pop_back(&mut self) -> Option<T> {
        LinkedList::pop_back(self)
    }

    fn pop_front(&mut self) -> Option<T> {
        LinkedList::pop_front(self)
    }

    fn insert(&mut self, index: usize, value: T) -> Result<(), IndexOutOfBounds> {
        self.insert_at(index, value).map(|_| ())
    }

    fn remove(&mut self, index: usize) -> Result<T, IndexOutOfBounds> {
        self.remove_at(index)
    }

    fn clear(&mut self) {
        LinkedList::clear(self);
    }

    fn iter<'a>(&'a self) -> Self::Iter<'a> {
        LinkedList::iter(self)
    }
}
