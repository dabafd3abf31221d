use derive_more::{Display, Error, From, IsVariant};

use crate::restrict::{InvalidArgument, RangeError};
use crate::util::error::IndexOutOfBounds;

/// The errors of operations that take both a position and a value.
#[derive(Debug, Display, Clone, PartialEq, Eq, From, Error, IsVariant)]
pub enum SetError {
    Range(RangeError),
    Invalid(InvalidArgument),
}

impl From<IndexOutOfBounds> for SetError {
    fn from(value: IndexOutOfBounds) -> Self {
        SetError::Range(value.into())
    }
}
