//! Collections that only store values allowed by a [`Filter`](crate::restrict::Filter).
//!
//! [`RestrictedSequence`] is the general ordered container. [`RestrictedStack`] and
//! [`RestrictedQueue`] narrow it to the usual access patterns, while [`RestrictedSet`] keeps
//! distinct values under generated labels. All of them are configured by [`ContainerOptions`].

mod error;
mod options;
mod queue;
mod sequence;
mod set;
mod stack;
mod tests;

pub use error::*;
pub use options::*;
pub use queue::*;
pub use sequence::*;
pub use set::*;
pub use stack::*;
