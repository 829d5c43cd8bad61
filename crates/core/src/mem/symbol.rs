//! Symbol table for address display.

use std::collections::BTreeMap;
use std::fmt;

/// A named span of the address space, typically an ELF function symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    /// Symbol name.
    pub name: String,
    /// Start address.
    pub addr: u64,
    /// Size in bytes (may be zero for markers).
    pub size: u64,
}

/// Maps addresses back to the symbols that cover them.
///
/// Used when rendering faults and disassembly so that addresses show up as
/// `name+offset` rather than bare hex.
#[derive(Default)]
pub struct SymbolTable {
    by_addr: BTreeMap<u64, Symbol>,
}

impl SymbolTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a symbol. A later symbol at the same address replaces the
    /// earlier one.
    pub fn add(&mut self, name: &str, addr: u64, size: u64) {
        self.by_addr.insert(
            addr,
            Symbol {
                name: name.to_owned(),
                addr,
                size,
            },
        );
    }

    /// Finds the symbol whose span covers `addr`, if any.
    pub fn find(&self, addr: u64) -> Option<&Symbol> {
        let (_, sym) = self.by_addr.range(..=addr).next_back()?;
        if sym.size == 0 && sym.addr == addr {
            return Some(sym);
        }
        (addr < sym.addr.saturating_add(sym.size.max(1))).then_some(sym)
    }

    /// Looks up a symbol by exact name.
    pub fn by_name(&self, name: &str) -> Option<&Symbol> {
        self.by_addr.values().find(|s| s.name == name)
    }

    /// Renders `addr` as `name+offset` if a covering symbol exists.
    pub fn display(&self, addr: u64) -> SymbolDisplay<'_> {
        SymbolDisplay { table: self, addr }
    }
}

/// Lazy `name+offset` formatter returned by [`SymbolTable::display`].
pub struct SymbolDisplay<'a> {
    table: &'a SymbolTable,
    addr: u64,
}

impl fmt::Display for SymbolDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.table.find(self.addr) {
            Some(sym) if sym.addr == self.addr => write!(f, "{}", sym.name),
            Some(sym) => write!(f, "{}+{:#x}", sym.name, self.addr - sym.addr),
            None => write!(f, "{:#x}", self.addr),
        }
    }
}
