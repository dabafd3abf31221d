use std::slice;

use super::{ContainerOptions, RestrictedSequence};
use crate::restrict::{Filter, InvalidArgument, Restrictable, RestrictionFilter};

/// A last-in first-out [`RestrictedSequence`].
#[derive(Debug)]
pub struct RestrictedStack<T, F = RestrictionFilter> {
    pub(crate) inner: RestrictedSequence<T, Vec<T>, F>,
}

impl<T, F> RestrictedStack<T, F>
where
    T: Restrictable + PartialEq,
    F: Filter<T>,
{
    pub fn new(options: ContainerOptions) -> Self where F: Default {
        RestrictedStack { inner: RestrictedSequence::new(options) }
    }

    pub fn with_filter(filter: F, options: ContainerOptions) -> Self {
        RestrictedStack { inner: RestrictedSequence::with_filter(filter, options) }
    }

    /// Pushes `value` onto the top of the stack if it is allowed.
    pub fn push(&mut self, value: T) -> Result<bool, InvalidArgument> {
        self.inner.push(value)
    }

    /// Pushes every value, last one on top, or none of them if any is refused.
    pub fn push_many<I: IntoIterator<Item = T>>(&mut self, values: I) -> Result<bool, InvalidArgument> {
        self.inner.push_many(values)
    }

    pub fn pop(&mut self) -> Option<T> {
        self.inner.pop()
    }

    pub fn peek(&self) -> Option<&T> {
        self.inner.elements.last()
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

    /// Iterates from the bottom of the stack to the top.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.inner.elements.iter()
    }

    pub const fn filter(&self) -> &F {
        self.inner.filter()
    }
}
