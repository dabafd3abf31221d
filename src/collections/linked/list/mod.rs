mod iter;
mod linked_list;
mod node;
mod tests;

pub use iter::*;
pub use linked_list::*;
pub use node::{NodeHandle, NodeState};
pub(crate) use node::*;
