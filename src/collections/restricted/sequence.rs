use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::mem;
use std::ops::Index;

use tracing::trace;

use super::{ContainerOptions, SetError};
use crate::collections::traits::Sequence;
use crate::restrict::{check_elements, Filter, InvalidArgument, RangeError, Restrictable, RestrictionFilter};
use crate::util::error::IndexOutOfBounds;
use crate::util::result::ResultExtension;

/// An ordered collection that checks every value against a [`Filter`] before storing it.
///
/// The backing [`Sequence`] defaults to [`Vec`], but any sequence works, including
/// [`LinkedList`](crate::collections::linked::LinkedList).
///
/// # Strictness
/// With [`ContainerOptions::strict`] unset, refused values and out of range indices are ignored:
/// mutations report that nothing was stored and reads return [`None`]. With it set, they are
/// returned as errors instead.
///
/// [`push_many`](RestrictedSequence::push_many) is all-or-nothing in both modes, so a single
/// refused value discards the whole batch. Use [`push_each`](RestrictedSequence::push_each) to
/// store whatever is allowed.
pub struct RestrictedSequence<T, S = Vec<T>, F = RestrictionFilter> {
    pub(crate) elements: S,
    pub(crate) filter: F,
    pub(crate) options: ContainerOptions,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T, S, F> RestrictedSequence<T, S, F>
where
    T: Restrictable + PartialEq,
    S: Sequence<T>,
    F: Filter<T>,
{
    /// Creates an empty sequence using the filter's default, which for [`RestrictionFilter`] is
    /// [`Filter::default_restrictions`].
    pub fn new(options: ContainerOptions) -> Self where F: Default {
        Self::with_filter(F::default(), options)
    }

    pub fn with_filter(filter: F, options: ContainerOptions) -> Self {
        RestrictedSequence {
            elements: S::default(),
            filter,
            options,
            _phantom: PhantomData,
        }
    }

    /// Creates a sequence holding `values`, checked as a single batch like
    /// [`push_many`](RestrictedSequence::push_many).
    pub fn from_values<I>(values: I, filter: F, options: ContainerOptions) -> Result<Self, InvalidArgument>
    where
        I: IntoIterator<Item = T>,
    {
        let mut sequence = Self::with_filter(filter, options);
        sequence.push_many(values)?;
        Ok(sequence)
    }

    /// Appends `value` if it is allowed, returning whether it was stored.
    pub fn push(&mut self, value: T) -> Result<bool, InvalidArgument> {
        if !self.admit(&value, None)? {
            return Ok(false);
        }
        let value = self.prepare(value);
        self.elements.push_back(value);
        Ok(true)
    }

    /// Appends every value, but only if all of them are allowed. Returns whether they were stored.
    pub fn push_many<I>(&mut self, values: I) -> Result<bool, InvalidArgument>
    where
        I: IntoIterator<Item = T>,
    {
        let values: Vec<T> = values.into_iter().collect();
        if !self.admit_all(&values)? {
            trace!(count = values.len(), "discarded batch containing a refused value");
            return Ok(false);
        }

        let reference = self.options.reference;
        self.elements.extend(
            values.into_iter().map(|value| if reference { value } else { value.detach() }),
        );
        Ok(true)
    }

    /// Appends each allowed value, skipping the rest, and returns how many were stored. In strict
    /// mode the first refused value stops the push, after the values before it were stored.
    pub fn push_each<I>(&mut self, values: I) -> Result<usize, InvalidArgument>
    where
        I: IntoIterator<Item = T>,
    {
        let mut stored = 0;
        for value in values {
            if self.push(value)? {
                stored += 1;
            }
        }
        Ok(stored)
    }

    /// Replaces the element at `index`, returning the previous one if the replacement happened.
    pub fn set(&mut self, index: usize, value: T) -> Result<Option<T>, SetError> {
        if self.check_index(index)?.is_none() || !self.admit(&value, Some(index))? {
            return Ok(None);
        }

        let value = self.prepare(value);
        Ok(self.elements.get_mut(index).map(|slot| mem::replace(slot, value)))
    }

    /// Inserts `value` at `index`, where `index == len` appends. Returns whether it was stored.
    pub fn insert(&mut self, index: usize, value: T) -> Result<bool, SetError> {
        let checked = IndexOutOfBounds::check_insert(index, self.len())
            .strictly(self.options.strict)?;
        if checked.is_none() || !self.admit(&value, None)? {
            return Ok(false);
        }

        let value = self.prepare(value);
        self.elements.insert(index, value)?;
        Ok(true)
    }

    pub fn get(&self, index: usize) -> Result<Option<&T>, RangeError> {
        Ok(match self.check_index(index)? {
            Some(()) => self.elements.get(index),
            None => None,
        })
    }

    pub fn remove(&mut self, index: usize) -> Result<Option<T>, RangeError> {
        Ok(match self.check_index(index)? {
            Some(()) => Some(self.elements.remove(index)?),
            None => None,
        })
    }

    /// Removes and returns the last element.
    pub fn pop(&mut self) -> Option<T> {
        self.elements.pop_back()
    }

    /// Removes and returns the first element.
    pub fn shift(&mut self) -> Option<T> {
        self.elements.pop_front()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> S::Iter<'_> {
        self.elements.iter()
    }

    pub fn contains(&self, value: &T) -> bool {
        self.elements.iter().any(|element| element == value)
    }

    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.elements.iter().position(|element| element == value)
    }

    pub const fn filter(&self) -> &F {
        &self.filter
    }

    pub const fn options(&self) -> &ContainerOptions {
        &self.options
    }

    pub const fn is_strict(&self) -> bool {
        self.options.strict
    }

    pub const fn as_inner(&self) -> &S {
        &self.elements
    }

    pub fn into_inner(self) -> S {
        self.elements
    }

    /// Returns `Some(())` for a valid index, [`None`] for an invalid one in lenient mode.
    fn check_index(&self, index: usize) -> Result<Option<()>, IndexOutOfBounds> {
        IndexOutOfBounds::check(index, self.len()).strictly(self.options.strict)
    }

    /// Checks a single value. `replacing` is the index of an element the value is about to
    /// replace, which doesn't count as a duplicate.
    pub(crate) fn admit(&self, value: &T, replacing: Option<usize>) -> Result<bool, InvalidArgument> {
        if !self.filter.is_allowed(value, self.options.strict) {
            return self.refuse(InvalidArgument::filtered(value.type_tag()));
        }

        if self.options.unique
            && self.elements.iter()
                .enumerate()
                .any(|(index, element)| Some(index) != replacing && element == value)
        {
            return self.refuse(InvalidArgument::duplicate(value.type_tag()));
        }
        Ok(true)
    }

    pub(crate) fn admit_all(&self, values: &[T]) -> Result<bool, InvalidArgument> {
        if !check_elements(values, &self.filter, self.options.strict)? {
            return Ok(false);
        }

        if self.options.unique {
            for (index, value) in values.iter().enumerate() {
                if self.contains(value) || values[..index].contains(value) {
                    return self.refuse(InvalidArgument::duplicate(value.type_tag()));
                }
            }
        }
        Ok(true)
    }

    fn refuse(&self, error: InvalidArgument) -> Result<bool, InvalidArgument> {
        if self.options.strict {
            Err(error)
        } else {
            trace!(%error, "skipped value");
            Ok(false)
        }
    }

    fn prepare(&self, value: T) -> T {
        if self.options.reference {
            value
        } else {
            value.detach()
        }
    }
}

impl<T, S, F> Default for RestrictedSequence<T, S, F>
where
    T: Restrictable + PartialEq,
    S: Sequence<T>,
    F: Filter<T> + Default,
{
    fn default() -> Self {
        Self::new(ContainerOptions::default())
    }
}

impl<T, S: Sequence<T>, F> Index<usize> for RestrictedSequence<T, S, F> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.elements.get(index)
            .ok_or_else(|| IndexOutOfBounds { index, len: self.elements.len() })
            .throw()
    }
}

impl<T: Debug, S: Sequence<T>, F: Debug> Debug for RestrictedSequence<T, S, F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestrictedSequence")
            .field("elements", &self.elements.iter().collect::<Vec<_>>())
            .field("filter", &self.filter)
            .field("options", &self.options)
            .finish()
    }
}
