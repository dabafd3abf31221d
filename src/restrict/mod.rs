//! Runtime type restrictions for collections of dynamically shaped values.
//!
//! Values are classified into a [`TypeTag`], either directly (see [`Value`]) or through the
//! [`Restrictable`] trait. A [`Restriction`] is an allow-list of tag kinds and, for typed objects,
//! of classes resolved against a [`ClassRegistry`]. A [`Filter`] wraps the check for use by the
//! restricted collections, with [`RestrictionFilter`] being the built-in implementation.
//!
//! # Sharing
//! Restrictions can be shared between filters through [`SharedRestriction`]. Nothing here is
//! thread safe, shared restrictions use [`Rc`](std::rc::Rc) and [`RefCell`](std::cell::RefCell)
//! and need external synchronization to be used across threads.

mod error;
mod filter;
mod registry;
mod restriction;
mod tag;
mod value;

pub use error::*;
pub use filter::*;
pub use registry::*;
pub use restriction::*;
pub use tag::*;
pub use value::*;
