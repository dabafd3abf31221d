/// A source of identifiers, unique for as long as the source lives.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Produces `{prefix}0`, `{prefix}1`, ... in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> SequentialIds {
        SequentialIds {
            prefix: prefix.into(),
            next: 0,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

impl<F: FnMut() -> String> IdSource for F {
    fn next_id(&mut self) -> String {
        self()
    }
}
