use std::cell::{Ref, RefMut};
use std::fmt::{self, Debug, Formatter};
use std::rc::Rc;

use tracing::trace;

use super::error::InvalidArgument;
use super::{Restrictable, Restriction, SharedRestriction};

/// A predicate deciding which values a restricted container accepts.
///
/// `strict` tells the filter whether the caller will raise an error on refusal. The built-in
/// [`RestrictionFilter`] ignores it, other implementations may use it to relax their checks.
pub trait Filter<T: ?Sized> {
    fn is_allowed(&self, value: &T, strict: bool) -> bool;

    /// The restriction a container falls back to when it isn't given one explicitly.
    fn default_restrictions() -> Restriction where Self: Sized {
        Restriction::permissive()
    }
}

/// The built-in [`Filter`], backed by a (possibly shared) [`Restriction`].
///
/// Cloning a RestrictionFilter shares the restriction rather than copying it.
#[derive(Clone)]
pub struct RestrictionFilter {
    pub(crate) restriction: SharedRestriction,
}

impl RestrictionFilter {
    pub fn new(restriction: Restriction) -> RestrictionFilter {
        RestrictionFilter::shared(restriction.into_shared())
    }

    pub const fn shared(restriction: SharedRestriction) -> RestrictionFilter {
        RestrictionFilter { restriction }
    }

    pub fn restriction(&self) -> Ref<'_, Restriction> {
        self.restriction.borrow()
    }

    /// Mutably borrows the restriction. The change is visible to every filter sharing it.
    ///
    /// # Panics
    /// Panics if the restriction is currently borrowed elsewhere.
    pub fn restriction_mut(&self) -> RefMut<'_, Restriction> {
        self.restriction.borrow_mut()
    }

    pub fn shared_restriction(&self) -> SharedRestriction {
        Rc::clone(&self.restriction)
    }
}

impl<T: Restrictable + ?Sized> Filter<T> for RestrictionFilter {
    fn is_allowed(&self, value: &T, _strict: bool) -> bool {
        let tag = value.type_tag();
        let allowed = self.restriction.borrow().is_allowed(&tag);
        if !allowed {
            trace!(%tag, "value refused by restriction");
        }
        allowed
    }
}

impl Default for RestrictionFilter {
    fn default() -> Self {
        RestrictionFilter::new(<RestrictionFilter as Filter<()>>::default_restrictions())
    }
}

impl Debug for RestrictionFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.restriction.try_borrow() {
            Ok(restriction) => f.debug_tuple("RestrictionFilter").field(&*restriction).finish(),
            Err(_) => f.write_str("RestrictionFilter(<borrowed>)"),
        }
    }
}

/// A [`Filter`] made from a closure, for checks a [`Restriction`] can't express.
#[derive(Clone)]
pub struct PredicateFilter<P>(pub P);

impl<T: ?Sized, P: Fn(&T) -> bool> Filter<T> for PredicateFilter<P> {
    fn is_allowed(&self, value: &T, _strict: bool) -> bool {
        (self.0)(value)
    }
}

impl<P> Debug for PredicateFilter<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("PredicateFilter(..)")
    }
}

impl<T: ?Sized, F: Filter<T> + ?Sized> Filter<T> for &F {
    fn is_allowed(&self, value: &T, strict: bool) -> bool {
        (**self).is_allowed(value, strict)
    }
}

impl<T: ?Sized, F: Filter<T> + ?Sized> Filter<T> for Rc<F> {
    fn is_allowed(&self, value: &T, strict: bool) -> bool {
        (**self).is_allowed(value, strict)
    }
}

impl<T: ?Sized, F: Filter<T> + ?Sized> Filter<T> for Box<F> {
    fn is_allowed(&self, value: &T, strict: bool) -> bool {
        (**self).is_allowed(value, strict)
    }
}

/// Checks every value against `filter`, in order, stopping at the first refusal.
///
/// A refusal is an [`InvalidArgument`] error if `strict`, or `Ok(false)` otherwise. Only the first
/// refused value is reported, see [`rejected_elements`] for a full report.
pub fn check_elements<'a, T, F, I>(values: I, filter: &F, strict: bool) -> Result<bool, InvalidArgument>
where
    T: Restrictable + ?Sized + 'a,
    F: Filter<T> + ?Sized,
    I: IntoIterator<Item = &'a T>,
{
    for value in values {
        if !filter.is_allowed(value, strict) {
            return if strict {
                Err(InvalidArgument::filtered(value.type_tag()))
            } else {
                Ok(false)
            };
        }
    }
    Ok(true)
}

/// Returns the indices of every value refused by `filter`.
pub fn rejected_elements<'a, T, F, I>(values: I, filter: &F) -> Vec<usize>
where
    T: ?Sized + 'a,
    F: Filter<T> + ?Sized,
    I: IntoIterator<Item = &'a T>,
{
    values.into_iter()
        .enumerate()
        .filter(|&(_, value)| !filter.is_allowed(value, false))
        .map(|(index, _)| index)
        .collect()
}
