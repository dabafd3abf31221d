//! Linked collection types. Primarily revolves around [`LinkedList`] and the [`NodeHandle`]s used
//! to address its nodes.

pub mod list;

#[doc(inline)]
pub use list::{LinkedList, NodeHandle, NodeState};
