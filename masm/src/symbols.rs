//! The per-file symbol table.

use indexmap::IndexMap;
use mcpu::constants::INITIAL_LOAD_ADDRESS;
use mcpu::Address;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SymbolKind {
    /// Defined by a label in this file.
    Regular,
    /// Declared with `.extern`; resolved by the loader.
    Extern,
    /// A regular symbol promoted by `.entry`.
    Entry,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MemoryArea {
    Code,
    Data,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub address: Address,
    pub kind: SymbolKind,
    pub area: MemoryArea,
}

/// Symbols in definition order. Each name appears at most once across all
/// kinds; the duplicate-definition checks run before insertion.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: IndexMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    /// Defines a regular symbol. Returns `false` when the name is taken.
    pub fn insert(&mut self, name: &str, address: Address, area: MemoryArea) -> bool {
        if self.symbols.contains_key(name) {
            return false;
        }
        self.symbols.insert(
            name.to_owned(),
            Symbol {
                address,
                kind: SymbolKind::Regular,
                area,
            },
        );
        true
    }

    /// Declares an external symbol. Externals have address 0, and their
    /// memory area carries no meaning.
    pub fn insert_extern(&mut self, name: &str) -> bool {
        if self.symbols.contains_key(name) {
            return false;
        }
        self.symbols.insert(
            name.to_owned(),
            Symbol {
                address: 0,
                kind: SymbolKind::Extern,
                area: MemoryArea::Code,
            },
        );
        true
    }

    pub fn find(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Turns an existing symbol into an entry. Returns `false` when no
    /// such symbol exists. The entry/extern conflict check runs first.
    pub fn promote_to_entry(&mut self, name: &str) -> bool {
        match self.symbols.get_mut(name) {
            Some(symbol) => {
                symbol.kind = SymbolKind::Entry;
                true
            }
            None => false,
        }
    }

    /// Moves every data symbol behind the code segment. Invoked exactly
    /// once, between the passes, when the final IC is known.
    pub fn relocate_data_symbols(&mut self, ic: Address) {
        for symbol in self.symbols.values_mut() {
            if symbol.kind != SymbolKind::Extern && symbol.area == MemoryArea::Data {
                symbol.address += INITIAL_LOAD_ADDRESS + ic;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.symbols
            .iter()
            .map(|(name, symbol)| (name.as_str(), symbol))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_duplicate_names() {
        let mut table = SymbolTable::new();
        assert!(table.insert("X", 100, MemoryArea::Code));
        assert!(!table.insert("X", 105, MemoryArea::Code));
        assert!(!table.insert_extern("X"));
        assert_eq!(table.find("X").unwrap().address, 100);
    }

    #[test]
    fn relocates_data_symbols_only() {
        let mut table = SymbolTable::new();
        table.insert("CODE", 102, MemoryArea::Code);
        table.insert("DATA", 4, MemoryArea::Data);
        table.insert_extern("EXT");

        table.relocate_data_symbols(7);

        assert_eq!(table.find("CODE").unwrap().address, 102);
        assert_eq!(table.find("DATA").unwrap().address, 100 + 7 + 4);
        assert_eq!(table.find("EXT").unwrap().address, 0);
    }

    #[test]
    fn promotes_existing_symbols() {
        let mut table = SymbolTable::new();
        table.insert("MAIN", 100, MemoryArea::Code);

        assert!(table.promote_to_entry("MAIN"));
        assert_eq!(table.find("MAIN").unwrap().kind, SymbolKind::Entry);
        assert!(!table.promote_to_entry("MISSING"));
    }

    #[test]
    fn iterates_in_insertion_order() {
        let mut table = SymbolTable::new();
        table.insert("B", 1, MemoryArea::Code);
        table.insert("A", 2, MemoryArea::Code);

        let names: Vec<_> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["B", "A"]);
    }
}
