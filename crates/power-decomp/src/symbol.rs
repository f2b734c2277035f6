//! A lookup table from addresses to symbol names, which can be handed to
//! [`StaticInst::generate_disassembly`](crate::StaticInst::generate_disassembly).

use crate::Addr;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: BTreeMap<Addr, String>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a symbol, returning the name previously stored at the same address.
    pub fn insert(&mut self, addr: Addr, name: impl Into<String>) -> Option<String> {
        self.symbols.insert(addr, name.into())
    }

    /// The symbol starting exactly at `addr`.
    #[must_use]
    pub fn find(&self, addr: Addr) -> Option<&str> {
        self.symbols.get(&addr).map(String::as_str)
    }

    /// The closest symbol at or below `addr`, along with the offset of `addr` into it.
    #[must_use]
    pub fn find_nearest(&self, addr: Addr) -> Option<(&str, u64)> {
        self.symbols
            .range(..=addr)
            .next_back()
            .map(|(start, name)| (name.as_str(), addr - start))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterates over all symbols, ordered by address.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (Addr, &str)> {
        self.symbols.iter().map(|(addr, name)| (*addr, name.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(Addr, S)> for SymbolTable {
    fn from_iter<T: IntoIterator<Item = (Addr, S)>>(iter: T) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<S: Into<String>> Extend<(Addr, S)> for SymbolTable {
    fn extend<T: IntoIterator<Item = (Addr, S)>>(&mut self, iter: T) {
        for (addr, name) in iter {
            self.insert(addr, name);
        }
    }
}
