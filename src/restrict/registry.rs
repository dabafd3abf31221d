use std::collections::{BTreeMap, BTreeSet, VecDeque};

use derive_more::IsVariant;

use super::error::{CyclicTypeError, DeclarationError, UnknownClassError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum TypeKind {
    Class,
    Interface,
}

#[derive(Debug, Clone)]
pub(crate) struct TypeEntry {
    pub kind: TypeKind,
    /// Parent class for classes. Always `None` for interfaces.
    pub parent: Option<String>,
    /// Implemented interfaces for classes, extended interfaces for interfaces.
    pub interfaces: Vec<String>,
}

/// The type hierarchy of the embedding application, used to answer is-a questions for
/// [`TypeTag::TypedObject`](super::TypeTag::TypedObject) values.
///
/// Types have to be declared parents-first: a class can only extend or implement types that are
/// already registered. Redeclaring a type below one of its own descendants is refused, so the
/// hierarchy can't contain cycles.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    pub(crate) types: BTreeMap<String, TypeEntry>,
}

impl ClassRegistry {
    pub fn new() -> ClassRegistry {
        ClassRegistry::default()
    }

    /// Declares a class with an optional parent class and a list of implemented interfaces.
    /// Redeclaring a type replaces it, unless one of the new supertypes already is-a `name`.
    pub fn declare_class<'a, I>(
        &mut self,
        name: impl Into<String>,
        parent: Option<&str>,
        implements: I,
    ) -> Result<&mut ClassRegistry, DeclarationError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let name = name.into();
        if let Some(parent) = parent {
            self.expect_kind(parent, TypeKind::Class)?;
        }
        let interfaces = self.collect_interfaces(implements)?;
        self.check_acyclic(&name, parent.into_iter().chain(interfaces.iter().map(String::as_str)))?;

        self.types.insert(name, TypeEntry {
            kind: TypeKind::Class,
            parent: parent.map(str::to_owned),
            interfaces,
        });
        Ok(self)
    }

    /// Declares an interface extending any number of already declared interfaces.
    pub fn declare_interface<'a, I>(
        &mut self,
        name: impl Into<String>,
        extends: I,
    ) -> Result<&mut ClassRegistry, DeclarationError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let name = name.into();
        let interfaces = self.collect_interfaces(extends)?;
        self.check_acyclic(&name, interfaces.iter().map(String::as_str))?;

        self.types.insert(name, TypeEntry {
            kind: TypeKind::Interface,
            parent: None,
            interfaces,
        });
        Ok(self)
    }

    /// Returns true if `name` is a declared class or interface.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn kind_of(&self, name: &str) -> Option<TypeKind> {
        self.types.get(name).map(|entry| entry.kind)
    }

    /// Returns true if `class` is `target`, extends it, or implements it, directly or through any
    /// number of intermediate types.
    pub fn is_a(&self, class: &str, target: &str) -> bool {
        if class == target {
            return true;
        }
        self.ancestors(class).any(|ancestor| ancestor == target)
    }

    /// Iterates over every type `class` extends or implements, breadth first, without repeats. The
    /// class itself isn't included.
    pub fn ancestors<'a>(&'a self, class: &'a str) -> Ancestors<'a> {
        let mut ancestors = Ancestors {
            registry: self,
            queue: VecDeque::new(),
            seen: BTreeSet::new(),
        };
        ancestors.enqueue_supertypes(class);
        ancestors
    }

    fn check_acyclic<'a>(
        &self,
        name: &str,
        mut supertypes: impl Iterator<Item = &'a str>,
    ) -> Result<(), CyclicTypeError> {
        if supertypes.any(|supertype| self.is_a(supertype, name)) {
            Err(CyclicTypeError { name: name.to_owned() })
        } else {
            Ok(())
        }
    }

    fn expect_kind(&self, name: &str, kind: TypeKind) -> Result<(), UnknownClassError> {
        match self.kind_of(name) {
            Some(found) if found == kind => Ok(()),
            _ => Err(UnknownClassError { name: name.to_owned() }),
        }
    }

    fn collect_interfaces<'a, I>(&self, names: I) -> Result<Vec<String>, UnknownClassError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names.into_iter()
            .map(|name| {
                self.expect_kind(name, TypeKind::Interface)?;
                Ok(name.to_owned())
            })
            .collect()
    }
}

pub struct Ancestors<'a> {
    registry: &'a ClassRegistry,
    queue: VecDeque<&'a str>,
    seen: BTreeSet<&'a str>,
}

impl<'a> Ancestors<'a> {
    fn enqueue_supertypes(&mut self, name: &str) {
        let registry = self.registry;
        let Some(entry) = registry.types.get(name) else { return; };

        for supertype in entry.parent.iter().chain(entry.interfaces.iter()) {
            if self.seen.insert(supertype.as_str()) {
                self.queue.push_back(supertype.as_str());
            }
        }
    }
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.queue.pop_front()?;
        self.enqueue_supertypes(next);
        Some(next)
    }
}
