/// Configuration shared by the restricted containers.
///
/// With the `serde` feature, this can be deserialized from an embedding application's own
/// configuration, with any missing field taking its default.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct ContainerOptions {
    /// Raise errors for refused values and bad indices instead of silently ignoring them.
    /// Defaults to `false`.
    pub strict: bool,
    /// Store values as given (`true`), or as [detached](crate::restrict::Restrictable::detach)
    /// copies that share nothing with the caller. Defaults to `true`.
    pub reference: bool,
    /// Refuse values equal to one already stored. Defaults to `false`.
    pub unique: bool,
    /// Namespace for generated identifiers. Defaults to empty.
    pub prefix: String,
}

impl ContainerOptions {
    pub fn new() -> ContainerOptions {
        ContainerOptions::default()
    }

    pub fn strict(mut self, strict: bool) -> ContainerOptions {
        self.strict = strict;
        self
    }

    pub fn reference(mut self, reference: bool) -> ContainerOptions {
        self.reference = reference;
        self
    }

    pub fn unique(mut self, unique: bool) -> ContainerOptions {
        self.unique = unique;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> ContainerOptions {
        self.prefix = prefix.into();
        self
    }
}

impl Default for ContainerOptions {
    fn default() -> Self {
        ContainerOptions {
            strict: false,
            reference: true,
            unique: false,
            prefix: String::new(),
        }
    }
}
