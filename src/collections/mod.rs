//! Various general-purpose collection types.
//!
//! # Purpose
//! [`linked`] holds the handle-addressed [`LinkedList`](linked::LinkedList). [`restricted`] builds
//! type-checked containers on top of the [`Sequence`](traits::Sequence) abstraction, which both
//! [`Vec`] and the LinkedList implement.

#[cfg(feature = "linked")]
pub mod linked;
#[cfg(feature = "restricted")]
pub mod restricted;
#[cfg(feature = "traits")]
pub mod traits;
