use derive_more::{Display, Error, From, IsVariant, TryInto};

use super::{TagKind, TypeTag};
use crate::util::error::IndexOutOfBounds;

#[derive(Debug, Display, Clone, PartialEq, Eq, Error)]
#[display("unrecognized type tag `{name}`")]
pub struct UnknownTagError {
    pub name: String,
}

#[derive(Debug, Display, Clone, PartialEq, Eq, Error)]
#[display("class or interface `{name}` is not registered")]
pub struct UnknownClassError {
    pub name: String,
}

#[derive(Debug, Display, Clone, PartialEq, Eq, Error)]
#[display("redeclaring `{name}` would make it its own supertype")]
pub struct CyclicTypeError {
    pub name: String,
}

/// A [`ClassRegistry`](super::ClassRegistry) declaration named an unknown supertype, or would
/// have made the hierarchy cyclic.
#[derive(Debug, Display, Clone, PartialEq, Eq, From, Error, IsVariant, TryInto)]
pub enum DeclarationError {
    UnknownClass(UnknownClassError),
    Cyclic(CyclicTypeError),
}

/// A restriction was configured with something it can't resolve. Always raised immediately, strict
/// or not.
#[derive(Debug, Display, Clone, PartialEq, Eq, From, Error, IsVariant, TryInto)]
pub enum ConfigurationError {
    UnknownTag(UnknownTagError),
    UnknownClass(UnknownClassError),
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum Rejection {
    #[display("is not allowed by the filter")]
    Filtered,
    #[display("is already present")]
    Duplicate,
}

/// A value was offered to a strict restricted operation and refused.
#[derive(Debug, Display, Clone, PartialEq, Eq, Error)]
#[display("value of type {tag} {reason}")]
pub struct InvalidArgument {
    pub tag: TypeTag,
    pub reason: Rejection,
}

impl InvalidArgument {
    pub const fn filtered(tag: TypeTag) -> InvalidArgument {
        InvalidArgument { tag, reason: Rejection::Filtered }
    }

    pub const fn duplicate(tag: TypeTag) -> InvalidArgument {
        InvalidArgument { tag, reason: Rejection::Duplicate }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("tag `{kind}` is not in the allowed set")]
pub struct MissingTagError {
    pub kind: TagKind,
}

#[derive(Debug, Display, Clone, PartialEq, Eq, Error)]
#[display("class `{name}` is not in the allowed set")]
pub struct MissingClassError {
    pub name: String,
}

#[derive(Debug, Display, Clone, PartialEq, Eq, Error)]
#[display("no element labelled `{key}`")]
pub struct MissingKeyError {
    pub key: String,
}

#[derive(Debug, Display, Clone, PartialEq, Eq, From, Error, IsVariant, TryInto)]
pub enum RangeError {
    IndexOutOfBounds(IndexOutOfBounds),
    MissingTag(MissingTagError),
    MissingClass(MissingClassError),
    MissingKey(MissingKeyError),
}
