use super::{ContainerOptions, RestrictedSequence};
use crate::collections::linked::LinkedList;
use crate::collections::linked::list::Iter;
use crate::restrict::{Filter, InvalidArgument, Restrictable, RestrictionFilter};

/// A first-in first-out [`RestrictedSequence`], backed by a [`LinkedList`].
///
/// Dequeueing takes the list's sentinel in `O(1)`. Enqueueing walks to the back of the list, since
/// the list tracks no tail.
#[derive(Debug)]
pub struct RestrictedQueue<T, F = RestrictionFilter> {
    pub(crate) inner: RestrictedSequence<T, LinkedList<T>, F>,
}

impl<T, F> RestrictedQueue<T, F>
where
    T: Restrictable + PartialEq,
    F: Filter<T>,
{
    pub fn new(options: ContainerOptions) -> Self where F: Default {
        RestrictedQueue { inner: RestrictedSequence::new(options) }
    }

    pub fn with_filter(filter: F, options: ContainerOptions) -> Self {
        RestrictedQueue { inner: RestrictedSequence::with_filter(filter, options) }
    }

    /// Adds `value` to the back of the queue if it is allowed.
    pub fn enqueue(&mut self, value: T) -> Result<bool, InvalidArgument> {
        self.inner.push(value)
    }

    /// Adds every value in order, or none of them if any is refused.
    pub fn enqueue_many<I: IntoIterator<Item = T>>(&mut self, values: I) -> Result<bool, InvalidArgument> {
        self.inner.push_many(values)
    }

    pub fn dequeue(&mut self) -> Option<T> {
        self.inner.shift()
    }

    pub fn peek(&self) -> Option<&T> {
        self.inner.elements.front()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Iterates from the front of the queue to the back.
    pub fn iter(&self) -> Iter<'_, T> {
        self.inner.elements.iter()
    }

    pub const fn filter(&self) -> &F {
        self.inner.filter()
    }
}
