use std::error::Error;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOutOfBounds {
    pub index: usize,
    pub len: usize,
}

impl Display for IndexOutOfBounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Index {} out of bounds for collection with {} elements!", self.index, self.len)
    }
}

impl Error for IndexOutOfBounds {}

impl IndexOutOfBounds {
    /// Checks `index` against `len`, for reads and replacements.
    pub const fn check(index: usize, len: usize) -> Result<(), IndexOutOfBounds> {
        if index < len {
            Ok(())
        } else {
            Err(IndexOutOfBounds { index, len })
        }
    }

    /// Checks `index` against `len` for insertion, where `index == len` appends.
    pub const fn check_insert(index: usize, len: usize) -> Result<(), IndexOutOfBounds> {
        if index <= len {
            Ok(())
        } else {
            Err(IndexOutOfBounds { index, len })
        }
    }
}
