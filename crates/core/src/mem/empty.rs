//! The unmapped-memory sentinel region.

use super::attr::Attr;
use super::region::Region;

/// The region every unmapped address resolves to.
///
/// Carries no permissions, so any access faults, and loads through the
/// non-faulting peek path return all-ones. The all-ones poison makes stray
/// reads of unmapped memory easy to spot in register dumps.
pub struct Empty {
    attr: Attr,
}

impl Empty {
    /// Creates the sentinel.
    pub fn new() -> Self {
        Self { attr: Attr::NONE }
    }
}

impl Default for Empty {
    fn default() -> Self {
        Self::new()
    }
}

impl Region for Empty {
    fn name(&self) -> &str {
        "empty"
    }

    fn base(&self) -> u64 {
        0
    }

    fn size(&self) -> u64 {
        u64::MAX
    }

    fn attr(&self) -> Attr {
        self.attr
    }

    fn set_attr(&mut self, attr: Attr) {
        self.attr = attr;
    }

    fn load(&self, _addr: u64) -> u8 {
        0xFF
    }

    fn store(&mut self, _addr: u64, _val: u8) {}

    fn contains(&self, _addr: u64, _n: u64) -> bool {
        true
    }
}
