use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

use derive_more::IsVariant;

use super::error::UnknownTagError;

/// The shape of a restrictable value, as seen at the time it is inspected.
///
/// Exactly one tag describes a value. [`TypedObject`](TypeTag::TypedObject) additionally carries
/// the most-derived class name of the object, which [`Restriction`](super::Restriction) compares
/// against its allowed classes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, IsVariant)]
pub enum TypeTag {
    Null,
    Bool,
    Int,
    Float,
    String,
    Array,
    Object,
    TypedObject(String),
    Resource,
    Closure,
    FunctionRef,
    Callable,
}

impl TypeTag {
    /// Returns the kind of this tag, discarding any class payload.
    pub const fn kind(&self) -> TagKind {
        match self {
            TypeTag::Null => TagKind::Null,
            TypeTag::Bool => TagKind::Bool,
            TypeTag::Int => TagKind::Int,
            TypeTag::Float => TagKind::Float,
            TypeTag::String => TagKind::String,
            TypeTag::Array => TagKind::Array,
            TypeTag::Object => TagKind::Object,
            TypeTag::TypedObject(_) => TagKind::TypedObject,
            TypeTag::Resource => TagKind::Resource,
            TypeTag::Closure => TagKind::Closure,
            TypeTag::FunctionRef => TagKind::FunctionRef,
            TypeTag::Callable => TagKind::Callable,
        }
    }

    /// Returns the carried class name for [`TypeTag::TypedObject`].
    pub fn class(&self) -> Option<&str> {
        match self {
            TypeTag::TypedObject(class) => Some(class.as_str()),
            _ => None,
        }
    }
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::TypedObject(class) => write!(f, "{}<{}>", TagKind::TypedObject, class),
            other => Display::fmt(&other.kind(), f),
        }
    }
}

/// A [`TypeTag`] without its payload. This is what a [`Restriction`](super::Restriction) stores in
/// its allowed tag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, IsVariant)]
pub enum TagKind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Array,
    Object,
    TypedObject,
    Resource,
    Closure,
    FunctionRef,
    Callable,
}

impl TagKind {
    /// Every built-in kind, in declaration order.
    pub const ALL: [TagKind; 12] = [
        TagKind::Null,
        TagKind::Bool,
        TagKind::Int,
        TagKind::Float,
        TagKind::String,
        TagKind::Array,
        TagKind::Object,
        TagKind::TypedObject,
        TagKind::Resource,
        TagKind::Closure,
        TagKind::FunctionRef,
        TagKind::Callable,
    ];

    /// The canonical name of this kind, as accepted by [`BuiltinTags`].
    pub const fn name(self) -> &'static str {
        match self {
            TagKind::Null => "null",
            TagKind::Bool => "bool",
            TagKind::Int => "int",
            TagKind::Float => "float",
            TagKind::String => "string",
            TagKind::Array => "array",
            TagKind::Object => "object",
            TagKind::TypedObject => "typed_object",
            TagKind::Resource => "resource",
            TagKind::Closure => "closure",
            TagKind::FunctionRef => "function",
            TagKind::Callable => "callable",
        }
    }
}

impl Display for TagKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TagKind {
    type Err = UnknownTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuiltinTags.resolve(s)
    }
}

/// A provider of tag names, used when a [`Restriction`](super::Restriction) is configured by name.
///
/// An alternate source can add aliases or narrow the set of recognized kinds.
pub trait TagSource {
    /// Resolves a tag name to its kind.
    fn resolve(&self, name: &str) -> Result<TagKind, UnknownTagError>;

    /// Every kind this source can produce.
    fn kinds(&self) -> &[TagKind];
}

/// The built-in tag names. Matching is case-insensitive and accepts the common long forms
/// (`"integer"`, `"boolean"`, `"double"`).
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinTags;

impl TagSource for BuiltinTags {
    fn resolve(&self, name: &str) -> Result<TagKind, UnknownTagError> {
        let kind = match name.trim().to_ascii_lowercase().as_str() {
            "null" => TagKind::Null,
            "bool" | "boolean" => TagKind::Bool,
            "int" | "integer" => TagKind::Int,
            "float" | "double" => TagKind::Float,
            "string" => TagKind::String,
            "array" => TagKind::Array,
            "object" => TagKind::Object,
            "typed_object" | "class" => TagKind::TypedObject,
            "resource" => TagKind::Resource,
            "closure" => TagKind::Closure,
            "function" => TagKind::FunctionRef,
            "callable" => TagKind::Callable,
            _ => return Err(UnknownTagError { name: name.to_owned() }),
        };
        Ok(kind)
    }

    fn kinds(&self) -> &[TagKind] {
        &TagKind::ALL
    }
}

/// A [`TagSource`] that only recognizes an explicit list of names.
pub struct NamedTags {
    pub(crate) names: Vec<(String, TagKind)>,
    pub(crate) kinds: Vec<TagKind>,
}

impl NamedTags {
    pub fn new<I, S>(names: I) -> NamedTags
    where
        I: IntoIterator<Item = (S, TagKind)>,
        S: Into<String>,
    {
        let names: Vec<(String, TagKind)> = names.into_iter()
            .map(|(name, kind)| (name.into(), kind))
            .collect();

        let mut kinds: Vec<TagKind> = names.iter().map(|(_, kind)| *kind).collect();
        kinds.sort();
        kinds.dedup();

        NamedTags { names, kinds }
    }
}

impl TagSource for NamedTags {
    fn resolve(&self, name: &str) -> Result<TagKind, UnknownTagError> {
        self.names.iter()
            .find(|(known, _)| known == name)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| UnknownTagError { name: name.to_owned() })
    }

    fn kinds(&self) -> &[TagKind] {
        &self.kinds
    }
}

impl Debug for NamedTags {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.names.iter().map(|(name, kind)| (name, kind)))
            .finish()
    }
}
