pub mod error;
pub mod id;
pub mod panic;
pub mod result;
