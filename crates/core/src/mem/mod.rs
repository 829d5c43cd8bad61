//! The memory subsystem.
//!
//! A [`Memory`] is an ordered list of [`Region`]s plus the machinery that
//! polices access to them:
//! 1. **Regions:** byte-backed [`Section`]s and the unmapped-memory
//!    [`Empty`] sentinel.
//! 2. **Checked access:** typed reads and writes that enforce region
//!    attributes, alignment, and watchpoints, returning a [`MemFault`] on
//!    violation.
//! 3. **Translation:** SV32/SV39 page walkers driven by a per-access
//!    [`TranslationCtx`], so the memory map never reaches into CSR state.
//! 4. **Symbols:** an address-to-name table for fault and disassembly
//!    display.
//!
//! Addresses handed to the checked access methods are physical; the CPU
//! translates first and then accesses.

use std::fmt;

use crate::common::Cause;

pub mod attr;
pub mod bp;
pub mod empty;
pub mod error;
pub mod pte;
pub mod region;
pub mod section;
pub mod sv32;
pub mod sv39;
pub mod symbol;
pub mod va;

pub use attr::Attr;
pub use bp::{BpState, Breakpoints, PendingBreak};
pub use empty::Empty;
pub use error::{FaultKind, MemFault};
pub use region::Region;
pub use section::Section;
pub use symbol::SymbolTable;
pub use va::{TranslationCtx, VmMode};

/// The physical memory map of a simulated hart.
pub struct Memory {
    regions: Vec<Box<dyn Region>>,
    empty: Empty,
    /// Symbols gathered from the loaded program.
    pub symbols: SymbolTable,
    /// Installed watchpoints.
    pub breakpoints: Breakpoints,
    entry: Option<u64>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Creates an empty memory map.
    pub fn new() -> Self {
        Self {
            regions: Vec::new(),
            empty: Empty::new(),
            symbols: SymbolTable::new(),
            breakpoints: Breakpoints::new(),
            entry: None,
        }
    }

    /// Adds a region to the map. Earlier regions win when spans overlap.
    pub fn add(&mut self, region: Box<dyn Region>) {
        self.regions.push(region);
    }

    /// Records the program entry point.
    pub fn set_entry(&mut self, entry: u64) {
        self.entry = Some(entry);
    }

    /// The entry point of the loaded program, if one has been loaded.
    pub fn entry(&self) -> Option<u64> {
        self.entry
    }

    /// Iterates over the mapped regions in map order.
    pub fn regions(&self) -> impl Iterator<Item = &dyn Region> {
        self.regions.iter().map(AsRef::as_ref)
    }

    /// Index of the first region containing `addr..addr + n`, if any.
    fn find(&self, addr: u64, n: u64) -> Option<usize> {
        self.regions.iter().position(|r| r.contains(addr, n))
    }

    /// Validates an `n`-byte access at `addr` requiring `align`-byte
    /// alignment, returning the index of the region it resolves to.
    fn check(&mut self, addr: u64, n: u64, align: u64, access: Attr) -> Result<usize, MemFault> {
        let idx = self.find(addr, n);
        let (region_attr, name) = match idx {
            Some(i) => (self.regions[i].attr(), self.regions[i].name()),
            None => (self.empty.attr(), self.empty.name()),
        };

        let mut kind = FaultKind::default();
        if idx.is_none() {
            kind |= FaultKind::EMPTY;
        }
        if access.has(Attr::R) && !region_attr.has(Attr::R) {
            kind |= FaultKind::READ;
        }
        if access.has(Attr::W) && !region_attr.has(Attr::W) {
            kind |= FaultKind::WRITE;
        }
        if access.has(Attr::X) && !region_attr.has(Attr::X) {
            kind |= FaultKind::EXEC;
        }
        let misaligned = addr % align != 0 && !region_attr.has(Attr::M);
        if misaligned {
            kind |= FaultKind::ALIGN;
        }

        if kind != FaultKind::default() {
            let cause = match (access, misaligned) {
                (a, true) if a.has(Attr::X) => Cause::InstructionAddressMisaligned,
                (a, false) if a.has(Attr::X) => Cause::InstructionAccessFault,
                (a, true) if a.has(Attr::W) => Cause::StoreAddressMisaligned,
                (a, false) if a.has(Attr::W) => Cause::StoreAccessFault,
                (_, true) => Cause::LoadAddressMisaligned,
                (_, false) => Cause::LoadAccessFault,
            };
            return Err(MemFault::new(kind, addr, name, cause));
        }

        self.breakpoints.check(addr, n, access);

        // The empty sentinel never has permissions, so a passing check
        // always resolved to a real region.
        idx.ok_or_else(|| {
            MemFault::new(FaultKind::EMPTY, addr, "empty", Cause::LoadAccessFault)
        })
    }

    /// Takes the pending watchpoint break as a fault record, if one is
    /// armed. Called by the CPU once per instruction boundary.
    pub fn take_pending_break(&mut self) -> Option<MemFault> {
        self.breakpoints.take_pending().map(|bp| {
            MemFault::new(FaultKind::BREAK, bp.addr, &bp.name, Cause::Breakpoint)
        })
    }

    fn load_bytes(&self, idx: usize, addr: u64, buf: &mut [u8]) {
        let r = &self.regions[idx];
        for (i, b) in buf.iter_mut().enumerate() {
            *b = r.load(addr + i as u64);
        }
    }

    fn store_bytes(&mut self, idx: usize, addr: u64, buf: &[u8]) {
        let r = &mut self.regions[idx];
        for (i, b) in buf.iter().enumerate() {
            r.store(addr + i as u64, *b);
        }
    }

    /// Reads a byte.
    pub fn read_u8(&mut self, addr: u64) -> Result<u8, MemFault> {
        let idx = self.check(addr, 1, 1, Attr::R)?;
        Ok(self.regions[idx].load(addr))
    }

    /// Reads a little-endian halfword.
    pub fn read_u16(&mut self, addr: u64) -> Result<u16, MemFault> {
        let idx = self.check(addr, 2, 2, Attr::R)?;
        let mut buf = [0; 2];
        self.load_bytes(idx, addr, &mut buf);
        Ok(u16::from_le_bytes(buf))
    }

    /// Reads a little-endian word.
    pub fn read_u32(&mut self, addr: u64) -> Result<u32, MemFault> {
        let idx = self.check(addr, 4, 4, Attr::R)?;
        let mut buf = [0; 4];
        self.load_bytes(idx, addr, &mut buf);
        Ok(u32::from_le_bytes(buf))
    }

    /// Reads a little-endian doubleword.
    pub fn read_u64(&mut self, addr: u64) -> Result<u64, MemFault> {
        let idx = self.check(addr, 8, 8, Attr::R)?;
        let mut buf = [0; 8];
        self.load_bytes(idx, addr, &mut buf);
        Ok(u64::from_le_bytes(buf))
    }

    /// Writes a byte.
    pub fn write_u8(&mut self, addr: u64, val: u8) -> Result<(), MemFault> {
        let idx = self.check(addr, 1, 1, Attr::W)?;
        self.regions[idx].store(addr, val);
        Ok(())
    }

    /// Writes a little-endian halfword.
    pub fn write_u16(&mut self, addr: u64, val: u16) -> Result<(), MemFault> {
        let idx = self.check(addr, 2, 2, Attr::W)?;
        self.store_bytes(idx, addr, &val.to_le_bytes());
        Ok(())
    }

    /// Writes a little-endian word.
    pub fn write_u32(&mut self, addr: u64, val: u32) -> Result<(), MemFault> {
        let idx = self.check(addr, 4, 4, Attr::W)?;
        self.store_bytes(idx, addr, &val.to_le_bytes());
        Ok(())
    }

    /// Writes a little-endian doubleword.
    pub fn write_u64(&mut self, addr: u64, val: u64) -> Result<(), MemFault> {
        let idx = self.check(addr, 8, 8, Attr::W)?;
        self.store_bytes(idx, addr, &val.to_le_bytes());
        Ok(())
    }

    /// Fetches an instruction.
    ///
    /// Fetch alignment is 2 bytes, the compressed-extension minimum; a
    /// 32-bit instruction may legally straddle a 4-byte boundary. For a
    /// 16-bit instruction the upper half of the returned word is zero.
    pub fn read_ins(&mut self, addr: u64) -> Result<u32, MemFault> {
        let idx = self.check(addr, 2, 2, Attr::X)?;
        let mut buf = [0; 2];
        self.load_bytes(idx, addr, &mut buf);
        let lo = u16::from_le_bytes(buf);
        if lo & 3 != 3 {
            return Ok(u32::from(lo));
        }
        let idx = self.check(addr + 2, 2, 2, Attr::X)?;
        self.load_bytes(idx, addr + 2, &mut buf);
        let hi = u16::from_le_bytes(buf);
        Ok(u32::from(hi) << 16 | u32::from(lo))
    }

    /// Reads a byte without permission checks or fault reporting.
    ///
    /// Unmapped addresses return the all-ones poison value.
    pub fn peek_u8(&self, addr: u64) -> u8 {
        match self.find(addr, 1) {
            Some(i) => self.regions[i].load(addr),
            None => self.empty.load(addr),
        }
    }

    /// Reads a little-endian word without permission checks. Unmapped
    /// bytes read as all-ones.
    pub fn peek_u32(&self, addr: u64) -> u32 {
        let mut buf = [0; 4];
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self.peek_u8(addr + i as u64);
        }
        u32::from_le_bytes(buf)
    }

    /// Reads a little-endian doubleword without permission checks.
    /// Unmapped bytes read as all-ones.
    pub fn peek_u64(&self, addr: u64) -> u64 {
        let mut buf = [0; 8];
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self.peek_u8(addr + i as u64);
        }
        u64::from_le_bytes(buf)
    }

    /// Copies `data` into mapped memory at `addr`, ignoring region
    /// attributes. Used by loaders.
    pub fn load_image(&mut self, addr: u64, data: &[u8]) -> Result<(), MemFault> {
        let idx = self.find(addr, data.len() as u64).ok_or_else(|| {
            MemFault::new(
                FaultKind::EMPTY | FaultKind::WRITE,
                addr,
                "empty",
                Cause::StoreAccessFault,
            )
        })?;
        self.store_bytes(idx, addr, data);
        Ok(())
    }

    /// Raw word read used by the page walkers. No attribute or watchpoint
    /// checks apply to page table accesses.
    pub(super) fn read_phys_u32(&self, addr: u64) -> Result<u32, MemFault> {
        let idx = self.find(addr, 4).ok_or_else(|| {
            MemFault::new(FaultKind::EMPTY, addr, "empty", Cause::LoadAccessFault)
        })?;
        let mut buf = [0; 4];
        self.load_bytes(idx, addr, &mut buf);
        Ok(u32::from_le_bytes(buf))
    }

    /// Raw doubleword read used by the page walkers.
    pub(super) fn read_phys_u64(&self, addr: u64) -> Result<u64, MemFault> {
        let idx = self.find(addr, 8).ok_or_else(|| {
            MemFault::new(FaultKind::EMPTY, addr, "empty", Cause::LoadAccessFault)
        })?;
        let mut buf = [0; 8];
        self.load_bytes(idx, addr, &mut buf);
        Ok(u64::from_le_bytes(buf))
    }

    /// Raw word write used by the page walkers for A/D updates.
    pub(super) fn write_phys_u32(&mut self, addr: u64, val: u32) -> Result<(), MemFault> {
        let idx = self.find(addr, 4).ok_or_else(|| {
            MemFault::new(FaultKind::EMPTY, addr, "empty", Cause::StoreAccessFault)
        })?;
        self.store_bytes(idx, addr, &val.to_le_bytes());
        Ok(())
    }

    /// Raw doubleword write used by the page walkers for A/D updates.
    pub(super) fn write_phys_u64(&mut self, addr: u64, val: u64) -> Result<(), MemFault> {
        let idx = self.find(addr, 8).ok_or_else(|| {
            MemFault::new(FaultKind::EMPTY, addr, "empty", Cause::StoreAccessFault)
        })?;
        self.store_bytes(idx, addr, &val.to_le_bytes());
        Ok(())
    }
}

impl fmt::Display for Memory {
    /// Renders the memory map, one region per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in self.regions() {
            let end = r.base() + r.size() - 1;
            writeln!(
                f,
                "{:16} {:#010x}..{:#010x} {} ({} bytes)",
                r.name(),
                r.base(),
                end,
                r.attr(),
                r.size()
            )?;
        }
        Ok(())
    }
}
