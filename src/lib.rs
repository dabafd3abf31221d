//! Collections that check what they store at runtime.
//!
//! # Purpose
//! Values handled by dynamic code don't come with a static type that the compiler can check. This
//! crate gives such values a runtime classification, a [`TypeTag`](restrict::TypeTag), and builds
//! collections that refuse anything their configured [`Restriction`](restrict::Restriction)
//! doesn't allow.
//!
//! # Layout
//! - [`restrict`]: tags, the dynamic [`Value`](restrict::Value) type, the class hierarchy
//!   registry, restrictions and the [`Filter`](restrict::Filter) contract.
//! - [`collections::linked`]: a doubly linked list whose nodes are addressed by handles and can be
//!   spliced in and out anywhere.
//! - [`collections::restricted`]: the filter-checked sequence, stack, queue and set.
//!
//! # Error Handling
//! Every restricted operation has two modes, picked by the container's
//! [`strict`](collections::restricted::ContainerOptions::strict) option. Lenient containers
//! ignore refused values and bad indices, reporting through a `false` or [`None`]. Strict ones
//! return strongly typed errors, enums of ZST-like structs implementing
//! [`Error`](std::error::Error), rather than boxed dynamic errors. Configuration mistakes, such as
//! an unknown class name, are always errors.
//!
//! # Logging
//! Refusals and list splicing failures are reported as [`tracing`] events at `trace` and `debug`
//! level. The crate never installs a subscriber.
//!
//! # Threading
//! Nothing here is thread safe. Restrictions are shared through `Rc<RefCell<_>>`, so containers
//! sharing one can't leave the thread they were created on.
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod collections;
pub mod restrict;

pub(crate) mod util;

#[doc(inline)]
pub use util::error::IndexOutOfBounds;
#[doc(inline)]
pub use util::id::{IdSource, SequentialIds};
