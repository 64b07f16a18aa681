//! The macro table produced by the preprocessor.

use indexmap::IndexMap;

/// Macro names mapped to their bodies, in definition order. A body holds
/// zero or more lines, each terminated by `\n`.
#[derive(Debug, Default)]
pub struct MacroTable {
    macros: IndexMap<String, String>,
}

impl MacroTable {
    pub fn new() -> MacroTable {
        MacroTable::default()
    }

    pub fn insert(&mut self, name: &str, body: String) {
        self.macros.insert(name.to_owned(), body);
    }

    pub fn find(&self, name: &str) -> Option<&str> {
        self.macros.get(name).map(|body| body.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}
