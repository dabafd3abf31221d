use std::fmt::{self, Debug, Formatter};

use tracing::trace;

use super::ContainerOptions;
use crate::restrict::{Filter, InvalidArgument, MissingKeyError, RangeError, Restrictable, RestrictionFilter};
use crate::util::id::{IdSource, SequentialIds};
use crate::util::result::ResultExtension;

/// A collection of distinct, filter-checked values, each labelled with a generated identifier.
///
/// Values are always unique, whatever [`ContainerOptions::unique`] says. Labels come from an
/// [`IdSource`], which by default counts up from 0 behind [`ContainerOptions::prefix`].
pub struct RestrictedSet<T, F = RestrictionFilter, I = SequentialIds> {
    pub(crate) entries: Vec<(String, T)>,
    pub(crate) filter: F,
    pub(crate) options: ContainerOptions,
    pub(crate) ids: I,
}

impl<T, F> RestrictedSet<T, F, SequentialIds>
where
    T: Restrictable + PartialEq,
    F: Filter<T>,
{
    pub fn new(options: ContainerOptions) -> Self where F: Default {
        Self::with_filter(F::default(), options)
    }

    pub fn with_filter(filter: F, options: ContainerOptions) -> Self {
        let ids = SequentialIds::new(options.prefix.clone());
        Self::with_id_source(filter, options, ids)
    }
}

impl<T, F, I> RestrictedSet<T, F, I>
where
    T: Restrictable + PartialEq,
    F: Filter<T>,
    I: IdSource,
{
    pub fn with_id_source(filter: F, options: ContainerOptions, ids: I) -> Self {
        RestrictedSet {
            entries: Vec::new(),
            filter,
            options,
            ids,
        }
    }

    /// Adds `value` if it is allowed and not already present, returning its new label.
    pub fn add(&mut self, value: T) -> Result<Option<String>, InvalidArgument> {
        let refusal = if !self.filter.is_allowed(&value, self.options.strict) {
            Some(InvalidArgument::filtered(value.type_tag()))
        } else if self.contains(&value) {
            Some(InvalidArgument::duplicate(value.type_tag()))
        } else {
            None
        };

        if let Some(error) = refusal {
            if self.options.strict {
                return Err(error);
            }
            trace!(%error, "skipped value");
            return Ok(None);
        }

        let value = if self.options.reference { value } else { value.detach() };
        let label = self.ids.next_id();
        self.entries.push((label.clone(), value));
        Ok(Some(label))
    }

    pub fn get(&self, label: &str) -> Option<&T> {
        self.entries.iter()
            .find(|(found, _)| found == label)
            .map(|(_, value)| value)
    }

    /// Removes the value labelled `label`. A missing label is an error in strict mode.
    pub fn remove(&mut self, label: &str) -> Result<Option<T>, RangeError> {
        let position = self.entries.iter()
            .position(|(found, _)| found == label)
            .ok_or_else(|| MissingKeyError { key: label.to_owned() })
            .strictly(self.options.strict)?;

        Ok(position.map(|index| self.entries.remove(index).1))
    }

    pub fn contains(&self, value: &T) -> bool {
        self.entries.iter().any(|(_, found)| found == value)
    }

    pub fn label_of(&self, value: &T) -> Option<&str> {
        self.entries.iter()
            .find(|(_, found)| found == value)
            .map(|(label, _)| label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every value. Labels are not reused afterwards.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates over labels and values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(label, value)| (label.as_str(), value))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub const fn filter(&self) -> &F {
        &self.filter
    }

    pub const fn options(&self) -> &ContainerOptions {
        &self.options
    }
}

impl<T: Debug, F: Debug, I> Debug for RestrictedSet<T, F, I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestrictedSet")
            .field("entries", &self.entries)
            .field("filter", &self.filter)
            .field("options", &self.options)
            .finish()
    }
}
