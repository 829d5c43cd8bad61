//! The region abstraction backing the memory map.

use super::attr::Attr;

/// A contiguous span of the physical address space.
///
/// Regions provide raw byte storage; permission, alignment, and breakpoint
/// checks are applied by [`Memory`](super::Memory) using the region's
/// declared [`Attr`] before any byte-level access is made.
pub trait Region {
    /// Display name of the region (e.g. a section name from the loaded ELF).
    fn name(&self) -> &str;

    /// First address covered by the region.
    fn base(&self) -> u64;

    /// Size of the region in bytes.
    fn size(&self) -> u64;

    /// Access attributes of the region.
    fn attr(&self) -> Attr;

    /// Replaces the region's access attributes.
    fn set_attr(&mut self, attr: Attr);

    /// Reads the byte at physical address `addr`.
    fn load(&self, addr: u64) -> u8;

    /// Writes the byte at physical address `addr`.
    fn store(&mut self, addr: u64, val: u8);

    /// Returns true if `addr..addr + n` lies entirely within the region.
    fn contains(&self, addr: u64, n: u64) -> bool {
        let end = self.base().wrapping_add(self.size());
        addr >= self.base() && addr.wrapping_add(n) <= end
    }
}
