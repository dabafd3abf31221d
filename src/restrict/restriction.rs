use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt::{self, Debug, Formatter};
use std::rc::Rc;

use tracing::debug;

use super::error::{
    ConfigurationError, MissingClassError, MissingTagError, RangeError, UnknownClassError,
};
use super::{BuiltinTags, ClassRegistry, TagKind, TagSource, TypeTag};

/// A [`Restriction`] that can be referenced by several filters at once. Changes made through any
/// of them are seen by all of them.
pub type SharedRestriction = Rc<RefCell<Restriction>>;

/// Options for [`Restriction::new`].
#[derive(Clone)]
pub struct RestrictionOptions {
    /// Whether removing a tag or class that isn't allowed is an error (`true`) or a no-op.
    pub strict_sets: bool,
    /// Resolves tag names given to [`Restriction::new`].
    pub tag_source: Rc<dyn TagSource>,
    /// The hierarchy class names are resolved and matched against.
    pub registry: Rc<ClassRegistry>,
}

impl RestrictionOptions {
    pub fn new() -> RestrictionOptions {
        RestrictionOptions::default()
    }

    pub fn strict_sets(mut self, strict_sets: bool) -> RestrictionOptions {
        self.strict_sets = strict_sets;
        self
    }

    pub fn tag_source(mut self, tag_source: impl TagSource + 'static) -> RestrictionOptions {
        self.tag_source = Rc::new(tag_source);
        self
    }

    pub fn registry(mut self, registry: Rc<ClassRegistry>) -> RestrictionOptions {
        self.registry = registry;
        self
    }
}

impl Default for RestrictionOptions {
    fn default() -> Self {
        RestrictionOptions {
            strict_sets: true,
            tag_source: Rc::new(BuiltinTags),
            registry: Rc::new(ClassRegistry::new()),
        }
    }
}

impl Debug for RestrictionOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestrictionOptions")
            .field("strict_sets", &self.strict_sets)
            .field("tag_source", &self.tag_source.kinds())
            .field("registry", &self.registry)
            .finish()
    }
}

/// The set of type tags, and for typed objects the set of classes, that a restricted container
/// accepts.
///
/// Whenever the allowed class set is non-empty, [`TagKind::TypedObject`] is in the allowed tag set.
/// Adding a class inserts the tag, while removing the tag clears the classes.
#[derive(Clone)]
pub struct Restriction {
    pub(crate) allowed_tags: BTreeSet<TagKind>,
    pub(crate) allowed_classes: Vec<String>,
    pub(crate) strict_sets: bool,
    pub(crate) tag_source: Rc<dyn TagSource>,
    pub(crate) registry: Rc<ClassRegistry>,
}

impl Restriction {
    /// Creates a restriction from tag names, resolved through the options' tag source, and class
    /// names, resolved through the options' registry.
    pub fn new<T, C>(tags: T, classes: C, options: RestrictionOptions) -> Result<Restriction, ConfigurationError>
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let kinds = tags.into_iter()
            .map(|name| options.tag_source.resolve(name.as_ref()))
            .collect::<Result<Vec<TagKind>, _>>()?;

        Restriction::from_kinds(kinds, classes, options)
    }

    /// Creates a restriction from tag kinds directly. Class names are still resolved through the
    /// options' registry.
    pub fn from_kinds<T, C>(kinds: T, classes: C, options: RestrictionOptions) -> Result<Restriction, ConfigurationError>
    where
        T: IntoIterator<Item = TagKind>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let mut restriction = Restriction {
            allowed_tags: kinds.into_iter().collect(),
            allowed_classes: Vec::new(),
            strict_sets: options.strict_sets,
            tag_source: options.tag_source,
            registry: options.registry,
        };

        for class in classes {
            restriction.add_allowed_class(class.as_ref())?;
        }

        Ok(restriction)
    }

    /// A restriction that allows every built-in tag kind, with default options.
    pub fn permissive() -> Restriction {
        Restriction::permissive_with(RestrictionOptions::default())
    }

    /// A restriction that allows every kind known to the options' tag source.
    pub fn permissive_with(options: RestrictionOptions) -> Restriction {
        Restriction {
            allowed_tags: options.tag_source.kinds().iter().copied().collect(),
            allowed_classes: Vec::new(),
            strict_sets: options.strict_sets,
            tag_source: options.tag_source,
            registry: options.registry,
        }
    }

    pub fn into_shared(self) -> SharedRestriction {
        Rc::new(RefCell::new(self))
    }

    /// Returns true if a value with the provided tag is allowed.
    ///
    /// Typed objects are allowed if their class is, extends or implements one of the allowed
    /// classes. They are also allowed by [`TagKind::Object`], which admits any object.
    pub fn is_allowed(&self, tag: &TypeTag) -> bool {
        match tag {
            TypeTag::TypedObject(class) => {
                self.allows_kind(TagKind::Object)
                    || (self.allows_kind(TagKind::TypedObject) && self.allows_class(class))
            },
            other => self.allows_kind(other.kind()),
        }
    }

    pub fn allows_kind(&self, kind: TagKind) -> bool {
        self.allowed_tags.contains(&kind)
    }

    /// Returns true if `class` is-a one of the allowed classes, walking the whole hierarchy.
    pub fn allows_class(&self, class: &str) -> bool {
        self.allowed_classes.iter().any(|allowed| self.registry.is_a(class, allowed))
    }

    pub fn add_allowed_tag(&mut self, kind: TagKind) {
        if self.allowed_tags.insert(kind) {
            debug!(%kind, "allowed tag added");
        }
    }

    /// Removes a tag from the allowed set. Removing [`TagKind::TypedObject`] also clears the
    /// allowed classes.
    pub fn remove_allowed_tag(&mut self, kind: TagKind) -> Result<(), RangeError> {
        if !self.allowed_tags.remove(&kind) {
            return self.missing(MissingTagError { kind });
        }
        if kind.is_typed_object() {
            self.allowed_classes.clear();
        }
        debug!(%kind, "allowed tag removed");
        Ok(())
    }

    /// Adds a class or interface to the allowed set, also allowing [`TagKind::TypedObject`].
    ///
    /// Unknown names are rejected whether or not `strict_sets` is enabled.
    pub fn add_allowed_class(&mut self, name: &str) -> Result<(), ConfigurationError> {
        self.check_class(name)?;

        if !self.allowed_classes.iter().any(|class| class == name) {
            self.allowed_classes.push(name.to_owned());
            debug!(class = name, "allowed class added");
        }
        self.allowed_tags.insert(TagKind::TypedObject);
        Ok(())
    }

    pub fn remove_allowed_class(&mut self, name: &str) -> Result<(), RangeError> {
        match self.allowed_classes.iter().position(|class| class == name) {
            Some(index) => {
                self.allowed_classes.remove(index);
                debug!(class = name, "allowed class removed");
                Ok(())
            },
            None => self.missing(MissingClassError { name: name.to_owned() }),
        }
    }

    /// Replaces the allowed tag set. If the new set lacks [`TagKind::TypedObject`], the allowed
    /// classes are cleared.
    pub fn set_allowed_tags(&mut self, kinds: impl IntoIterator<Item = TagKind>) {
        self.allowed_tags = kinds.into_iter().collect();
        if !self.allows_kind(TagKind::TypedObject) {
            self.allowed_classes.clear();
        }
        debug!(tags = ?self.allowed_tags, "allowed tags replaced");
    }

    /// Replaces the allowed tag set by name. Nothing changes if any name fails to resolve.
    pub fn set_allowed_tag_names<I>(&mut self, names: I) -> Result<(), ConfigurationError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let kinds = names.into_iter()
            .map(|name| self.resolve_tag(name.as_ref()))
            .collect::<Result<Vec<TagKind>, _>>()?;
        self.set_allowed_tags(kinds);
        Ok(())
    }

    /// Replaces the allowed class set. Nothing changes if any name is unknown.
    pub fn set_allowed_classes<I>(&mut self, names: I) -> Result<(), ConfigurationError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut classes: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref();
            self.check_class(name)?;
            if !classes.iter().any(|class| class == name) {
                classes.push(name.to_owned());
            }
        }

        if !classes.is_empty() {
            self.allowed_tags.insert(TagKind::TypedObject);
        }
        self.allowed_classes = classes;
        debug!(classes = ?self.allowed_classes, "allowed classes replaced");
        Ok(())
    }

    /// Resolves a tag name through this restriction's tag source.
    pub fn resolve_tag(&self, name: &str) -> Result<TagKind, ConfigurationError> {
        Ok(self.tag_source.resolve(name)?)
    }

    pub fn allowed_tags(&self) -> impl Iterator<Item = TagKind> + '_ {
        self.allowed_tags.iter().copied()
    }

    pub fn allowed_classes(&self) -> &[String] {
        &self.allowed_classes
    }

    pub const fn strict_sets(&self) -> bool {
        self.strict_sets
    }

    pub const fn set_strict_sets(&mut self, strict_sets: bool) {
        self.strict_sets = strict_sets;
    }

    pub const fn registry(&self) -> &Rc<ClassRegistry> {
        &self.registry
    }

    fn check_class(&self, name: &str) -> Result<(), UnknownClassError> {
        if self.registry.contains(name) {
            Ok(())
        } else {
            Err(UnknownClassError { name: name.to_owned() })
        }
    }

    fn missing(&self, error: impl Into<RangeError>) -> Result<(), RangeError> {
        if self.strict_sets {
            Err(error.into())
        } else {
            Ok(())
        }
    }
}

impl Default for Restriction {
    fn default() -> Self {
        Restriction::permissive()
    }
}

impl Debug for Restriction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Restriction")
            .field("allowed_tags", &self.allowed_tags)
            .field("allowed_classes", &self.allowed_classes)
            .field("strict_sets", &self.strict_sets)
            .finish()
    }
}
